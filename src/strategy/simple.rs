//! Direct-delta rebalancing.
//!
//! Every asset class is moved straight to its target value. Two filters turn
//! a computed trade into HOLD with a reported delta of zero:
//!
//! - **Tolerance**: `|target% - current%| <= tolerance_percent`
//! - **Minimum size**: a nonzero `|delta_value| < minimum_trade_size`, which
//!   also raises a `SMALL_TRADE` warning
//!
//! Rows come back sorted by absolute value delta, largest first. The sort is
//! stable so equal deltas keep join order.

use crate::result::{
    RebalanceMetadata, RebalanceResult, RebalanceSummary, RebalanceWarning, TradeRecommendation,
};
use crate::strategy::{AssetMap, MergedAssetData, RebalanceInput, RebalanceStrategy};
use crate::{ResolvedOptions, TradeAction};

/// The built-in `"simple"` strategy.
#[derive(Clone, Copy, Debug, Default)]
pub struct SimpleStrategy;

impl SimpleStrategy {
    pub const NAME: &'static str = "simple";
    pub const DESCRIPTION: &'static str = "Calculate direct path to target allocations";
}

impl RebalanceStrategy for SimpleStrategy {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        Self::DESCRIPTION
    }

    fn calculate(&self, input: &RebalanceInput<'_>, options: &ResolvedOptions) -> RebalanceResult {
        let mut warnings = Vec::new();

        let assets = AssetMap::build(input.allocations, input.targets, &mut warnings);
        let recommendations =
            recommend(&assets, input.total_portfolio_value, options, &mut warnings);
        let summary = summarize(&recommendations, options);

        RebalanceResult {
            recommendations,
            summary,
            warnings,
            metadata: RebalanceMetadata {
                calculated_at: input.calculated_at,
                strategy_used: Self::NAME.to_string(),
                base_currency: input.base_currency.to_string(),
                total_portfolio_value: input.total_portfolio_value,
            },
        }
    }
}

/// Value a target percentage represents. Never divides by a non-positive total.
#[inline]
fn target_value(target_percent: f64, total_value: f64) -> f64 {
    if total_value <= 0.0 {
        0.0
    } else {
        target_percent / 100.0 * total_value
    }
}

fn recommend(
    assets: &AssetMap,
    total_value: f64,
    options: &ResolvedOptions,
    warnings: &mut Vec<RebalanceWarning>,
) -> Vec<TradeRecommendation> {
    let mut recommendations: Vec<TradeRecommendation> = assets
        .iter()
        .map(|(asset_class, data)| {
            let target_value = target_value(data.target_percent, total_value);
            let delta_value = target_value - data.current_value;
            let delta_percent = data.target_percent - data.current_percent;

            if delta_percent.abs() <= options.tolerance_percent {
                return hold(asset_class, data, target_value);
            }

            if delta_value != 0.0 && delta_value.abs() < options.minimum_trade_size {
                warnings.push(RebalanceWarning::small_trade(
                    asset_class,
                    delta_value,
                    options.minimum_trade_size,
                ));
                return hold(asset_class, data, target_value);
            }

            TradeRecommendation {
                action: TradeAction::from_delta(delta_value),
                delta_value,
                delta_percent,
                ..hold(asset_class, data, target_value)
            }
        })
        .collect();

    recommendations.sort_by(|a, b| b.delta_value.abs().total_cmp(&a.delta_value.abs()));
    recommendations
}

/// A HOLD row with zeroed deltas.
fn hold(asset_class: &str, data: &MergedAssetData, target_value: f64) -> TradeRecommendation {
    TradeRecommendation {
        asset_class: asset_class.to_string(),
        symbol: data.symbol.clone(),
        name: data.name.clone(),
        action: TradeAction::Hold,
        current_value: data.current_value,
        target_value,
        current_percent: data.current_percent,
        target_percent: data.target_percent,
        delta_value: 0.0,
        delta_percent: 0.0,
    }
}

fn summarize(
    recommendations: &[TradeRecommendation],
    options: &ResolvedOptions,
) -> RebalanceSummary {
    // Seeded folds: an empty f64 `sum` is -0.0.
    let total_buy_amount = recommendations
        .iter()
        .filter(|r| r.action == TradeAction::Buy)
        .fold(0.0, |acc, r| acc + r.delta_value);
    let total_sell_amount = recommendations
        .iter()
        .filter(|r| r.action == TradeAction::Sell)
        .fold(0.0, |acc: f64, r| acc + r.delta_value)
        .abs();
    let trade_count = recommendations.iter().filter(|r| r.action.is_trade()).count();
    let is_balanced = recommendations.iter().all(|r| {
        r.action == TradeAction::Hold || r.delta_percent.abs() <= options.tolerance_percent
    });

    RebalanceSummary {
        total_buy_amount,
        total_sell_amount,
        net_cash_flow: total_sell_amount - total_buy_amount,
        trade_count,
        is_balanced,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AllocationData, AllocationTarget};
    use crate::{RebalanceOptions, WarningKind};

    fn run(
        allocations: &[AllocationData],
        targets: &[AllocationTarget],
        options: RebalanceOptions,
    ) -> RebalanceResult {
        let input = RebalanceInput::new(allocations, targets);
        SimpleStrategy.calculate(&input, &options.resolve())
    }

    fn stocks_bonds() -> Vec<AllocationData> {
        vec![
            AllocationData::new("Stocks", 40.0, 4000.0),
            AllocationData::new("Bonds", 60.0, 6000.0),
        ]
    }

    #[test]
    fn target_value_guards_zero_total() {
        assert_eq!(target_value(50.0, 0.0), 0.0);
        assert_eq!(target_value(50.0, -10.0), 0.0);
        assert_eq!(target_value(25.0, 1000.0), 250.0);
    }

    #[test]
    fn buy_and_sell_to_target() {
        let result = run(
            &stocks_bonds(),
            &[
                AllocationTarget::new("Stocks", 60.0),
                AllocationTarget::new("Bonds", 40.0),
            ],
            RebalanceOptions::new(),
        );
        let stocks = result.recommendation("Stocks").unwrap();
        assert_eq!(stocks.action, TradeAction::Buy);
        assert_eq!(stocks.delta_value, 2000.0);
        assert_eq!(stocks.delta_percent, 20.0);
        assert_eq!(stocks.target_value, 6000.0);
        let bonds = result.recommendation("Bonds").unwrap();
        assert_eq!(bonds.action, TradeAction::Sell);
        assert_eq!(bonds.delta_value, -2000.0);
        assert_eq!(result.summary.trade_count, 2);
        assert_eq!(result.metadata.strategy_used, "simple");
    }

    #[test]
    fn tolerance_zeroes_reported_delta() {
        let result = run(
            &stocks_bonds(),
            &[
                AllocationTarget::new("Stocks", 42.0),
                AllocationTarget::new("Bonds", 58.0),
            ],
            RebalanceOptions::new().tolerance_percent(2.0),
        );
        for r in &result.recommendations {
            assert_eq!(r.action, TradeAction::Hold);
            assert_eq!(r.delta_value, 0.0);
            assert_eq!(r.delta_percent, 0.0);
        }
        // Target value is still reported.
        let stocks = result.recommendation("Stocks").unwrap();
        assert!((stocks.target_value - 4200.0).abs() < 1e-9);
        assert!(result.summary.is_balanced);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn tolerance_is_checked_before_minimum_size() {
        let result = run(
            &stocks_bonds(),
            &[
                AllocationTarget::new("Stocks", 40.1),
                AllocationTarget::new("Bonds", 59.9),
            ],
            RebalanceOptions::new()
                .tolerance_percent(0.5)
                .minimum_trade_size(100.0),
        );
        assert!(result.warnings.is_empty());
        assert_eq!(result.summary.trade_count, 0);
    }

    #[test]
    fn small_trade_is_held_with_warning() {
        let allocations = [
            AllocationData::new("Stocks", 50.3, 5030.0),
            AllocationData::new("Bonds", 49.7, 4970.0),
        ];
        let result = run(
            &allocations,
            &[
                AllocationTarget::new("Stocks", 50.0),
                AllocationTarget::new("Bonds", 50.0),
            ],
            RebalanceOptions::new().minimum_trade_size(50.0),
        );
        assert_eq!(result.summary.trade_count, 0);
        let small: Vec<_> = result.warnings_of(WarningKind::SmallTrade).collect();
        assert_eq!(small.len(), 2);
        assert_eq!(small[0].asset_class, "Stocks");
        assert!(small[0].message.starts_with("Trade of $30.00"));
        for r in &result.recommendations {
            assert_eq!(r.delta_value, 0.0);
        }
    }

    #[test]
    fn exact_minimum_is_not_suppressed() {
        let allocations = [
            AllocationData::new("A", 50.0, 500.0),
            AllocationData::new("B", 50.0, 500.0),
        ];
        let result = run(
            &allocations,
            &[AllocationTarget::new("A", 55.0), AllocationTarget::new("B", 45.0)],
            RebalanceOptions::new().minimum_trade_size(50.0),
        );
        assert_eq!(result.summary.trade_count, 2);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn sorted_by_absolute_delta() {
        let allocations = [
            AllocationData::new("A", 10.0, 100.0),
            AllocationData::new("B", 50.0, 500.0),
            AllocationData::new("C", 40.0, 400.0),
        ];
        let result = run(
            &allocations,
            &[
                AllocationTarget::new("A", 15.0),
                AllocationTarget::new("B", 20.0),
                AllocationTarget::new("C", 65.0),
            ],
            RebalanceOptions::new(),
        );
        let order: Vec<&str> = result
            .recommendations
            .iter()
            .map(|r| r.asset_class.as_str())
            .collect();
        assert_eq!(order, vec!["B", "C", "A"]);
    }

    #[test]
    fn target_only_asset_in_empty_portfolio_holds() {
        let result = run(
            &[],
            &[AllocationTarget::new("Gold", 100.0)],
            RebalanceOptions::new(),
        );
        // No holdings, so the total is zero and nothing can be bought.
        let gold = result.recommendation("Gold").unwrap();
        assert_eq!(gold.target_value, 0.0);
        assert_eq!(gold.action, TradeAction::Hold);
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn zero_total_never_buys() {
        let allocations = [AllocationData::new("Cash", 0.0, 0.0)];
        let result = run(
            &allocations,
            &[AllocationTarget::new("Cash", 50.0), AllocationTarget::new("Stocks", 50.0)],
            RebalanceOptions::new(),
        );
        assert!(result.recommendations.iter().all(|r| r.delta_value <= 0.0));
        assert_eq!(result.summary.total_buy_amount, 0.0);
        assert!(result.recommendations.iter().all(|r| r.delta_value.is_finite()));
    }

    #[test]
    fn empty_inputs() {
        let result = run(&[], &[], RebalanceOptions::new());
        assert!(result.recommendations.is_empty());
        assert!(result.warnings.is_empty());
        assert!(result.summary.is_balanced);
        assert_eq!(result.summary.trade_count, 0);
        assert_eq!(result.metadata.total_portfolio_value, 0.0);
    }

    #[test]
    fn untargeted_holdings_are_sold_off() {
        let result = run(
            &stocks_bonds(),
            &[AllocationTarget::new("Stocks", 100.0)],
            RebalanceOptions::new(),
        );
        let bonds = result.recommendation("Bonds").unwrap();
        assert_eq!(bonds.action, TradeAction::Sell);
        assert_eq!(bonds.delta_value, -6000.0);
        assert_eq!(result.warnings_of(WarningKind::AssetNoTarget).count(), 1);
    }

    #[test]
    fn summary_nets_cash_flow() {
        let allocations = [
            AllocationData::new("A", 50.0, 500.0),
            AllocationData::new("B", 50.0, 500.0),
        ];
        // Targets sum to 80: more is sold than bought.
        let result = run(
            &allocations,
            &[AllocationTarget::new("A", 60.0), AllocationTarget::new("B", 20.0)],
            RebalanceOptions::new(),
        );
        assert_eq!(result.summary.total_buy_amount, 100.0);
        assert_eq!(result.summary.total_sell_amount, 300.0);
        assert_eq!(result.summary.net_cash_flow, 200.0);
        assert!(!result.summary.is_balanced);
    }

    #[test]
    fn metadata_comes_from_input() {
        let allocations = stocks_bonds();
        let at = chrono::DateTime::from_timestamp(1_760_000_000, 0).unwrap();
        let input = RebalanceInput {
            base_currency: "EUR",
            calculated_at: at,
            ..RebalanceInput::new(&allocations, &[])
        };
        let result = SimpleStrategy.calculate(&input, &RebalanceOptions::new().resolve());
        assert_eq!(result.metadata.calculated_at, at);
        assert_eq!(result.metadata.base_currency, "EUR");
        assert_eq!(result.metadata.total_portfolio_value, 10_000.0);
    }

    #[test]
    fn empty_totals_are_positive_zero() {
        let balanced = run(
            &[
                AllocationData::new("Stocks", 60.0, 6000.0),
                AllocationData::new("Bonds", 40.0, 4000.0),
            ],
            &[
                AllocationTarget::new("Stocks", 60.0),
                AllocationTarget::new("Bonds", 40.0),
            ],
            RebalanceOptions::new(),
        );
        let empty = run(&[], &[], RebalanceOptions::new());

        for summary in [&balanced.summary, &empty.summary] {
            assert!(!summary.total_buy_amount.is_sign_negative());
            assert!(!summary.total_sell_amount.is_sign_negative());
            assert!(!summary.net_cash_flow.is_sign_negative());
        }
        assert!(balanced.to_string().contains("buy 0.00, sell 0.00"));
    }

    #[test]
    fn sell_only_plan_has_positive_zero_buys() {
        let result = run(
            &[AllocationData::new("Cash", 100.0, 1000.0)],
            &[],
            RebalanceOptions::new(),
        );
        assert_eq!(result.summary.total_sell_amount, 1000.0);
        assert!(!result.summary.total_buy_amount.is_sign_negative());
    }
}
