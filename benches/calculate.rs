//! Calculation benchmarks: simple strategy over growing portfolios.

use allotment::{
    AllocationData, AllocationTarget, Holding, RebalanceCalculator, RebalanceOptions,
    aggregate_holdings,
};
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

/// Generate `n` asset classes with deterministic values and targets.
///
/// Every fifth asset has no target and every seventh target has no holding,
/// so the warning paths are exercised too.
fn generate_portfolio(n: usize) -> (Vec<AllocationData>, Vec<AllocationTarget>) {
    // Simple deterministic PRNG (xorshift32)
    let mut rng_state: u32 = 42;
    let mut next = || {
        rng_state ^= rng_state << 13;
        rng_state ^= rng_state >> 17;
        rng_state ^= rng_state << 5;
        rng_state
    };

    let values: Vec<f64> = (0..n).map(|_| (next() % 100_000) as f64 + 1.0).collect();
    let total: f64 = values.iter().sum();
    let allocations = values
        .iter()
        .enumerate()
        .map(|(i, &v)| AllocationData::new(format!("A{i:04}"), v / total * 100.0, v))
        .collect();

    let per_target = 100.0 / n as f64;
    let targets = (0..n)
        .filter(|i| i % 5 != 0)
        .map(|i| {
            let class = if i % 7 == 0 {
                format!("T{i:04}")
            } else {
                format!("A{i:04}")
            };
            AllocationTarget::new(class, per_target)
        })
        .collect();

    (allocations, targets)
}

fn bench_calculate(c: &mut Criterion) {
    let mut group = c.benchmark_group("calculate_rebalance");
    let calculator = RebalanceCalculator::new();
    let options = RebalanceOptions::new()
        .tolerance_percent(0.25)
        .minimum_trade_size(50.0);

    for n in [10, 100, 1_000] {
        let (allocations, targets) = generate_portfolio(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| {
                calculator
                    .calculate_rebalance(
                        black_box(&allocations),
                        black_box(&targets),
                        black_box(&options),
                    )
                    .unwrap()
            })
        });
    }

    group.finish();
}

fn bench_aggregate(c: &mut Criterion) {
    let holdings: Vec<Holding> = (0..5_000)
        .map(|i| {
            if i % 50 == 0 {
                Holding::cash(format!("h{i}"), 100.0)
            } else {
                let sym = format!("S{:03}", i % 300);
                Holding::security(format!("h{i}"), sym.clone(), sym, (i % 97) as f64 * 10.0 + 1.0)
            }
        })
        .collect();

    c.bench_function("aggregate_holdings_5000", |b| {
        b.iter(|| aggregate_holdings(black_box(&holdings)))
    });
}

criterion_group!(benches, bench_calculate, bench_aggregate);
criterion_main!(benches);
