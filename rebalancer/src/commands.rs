//! Command orchestration: load holdings and targets, compute, report.
//!
//! Output goes to a caller-supplied writer so the binary prints to stdout
//! and tests capture into a buffer.

use std::io::Write;
use std::path::PathBuf;

use allotment::{AllocationData, AllocationTarget, RebalanceCalculator, RebalanceOptions};
use log::info;

use crate::audit::{self, AuditLog};
use crate::config::{Config, check_threshold};
use crate::error::Result;
use crate::source::{JsonHoldingsFile, load_allocations};
use crate::store::JsonFileStore;
use crate::target::{self, TargetRepository};

/// Per-invocation overrides for `plan`. `None` falls back to the config.
#[derive(Debug, Clone, Default)]
pub struct PlanOptions {
    pub holdings: Option<PathBuf>,
    pub strategy: Option<String>,
    pub min_trade: Option<f64>,
    pub tolerance: Option<f64>,
    pub json: bool,
}

impl PlanOptions {
    /// Config thresholds with command-line values layered on top.
    ///
    /// Command-line thresholds are checked with the same rules as the config.
    pub fn rebalance_options(&self, config: &Config) -> Result<RebalanceOptions> {
        let mut options = config.rebalance_options();
        if let Some(name) = &self.strategy {
            options = options.strategy(name.clone());
        }
        if let Some(amount) = self.min_trade {
            check_threshold("--min-trade", amount)?;
            options = options.minimum_trade_size(amount);
        }
        if let Some(percent) = self.tolerance {
            check_threshold("--tolerance", percent)?;
            options = options.tolerance_percent(percent);
        }
        Ok(options)
    }
}

fn calculator(config: &Config) -> RebalanceCalculator {
    RebalanceCalculator::new().with_base_currency(config.rebalance.base_currency.clone())
}

fn repository(config: &Config) -> TargetRepository<JsonFileStore> {
    TargetRepository::new(JsonFileStore::new(&config.storage.targets_file))
}

/// Compute and print a rebalance plan.
pub fn run_plan(config: &Config, opts: &PlanOptions, out: &mut impl Write) -> Result<()> {
    let holdings_path = opts
        .holdings
        .clone()
        .unwrap_or_else(|| config.storage.holdings_file.clone());
    let options = opts.rebalance_options(config)?;
    let strategy = options.resolve().strategy;

    let mut audit = AuditLog::open(&config.audit_path())?;
    audit::log_plan_started(&mut audit, &holdings_path.display().to_string(), &strategy)?;

    let source = JsonHoldingsFile::load(&holdings_path)?;
    let allocations = load_allocations(&source)?;
    audit::log_allocations(&mut audit, &allocations)?;
    info!(
        "Loaded {} asset classes from {}",
        allocations.len(),
        holdings_path.display()
    );

    let targets = repository(config).load()?;
    if targets.is_empty() {
        writeln!(
            out,
            "No allocation targets set. Use `rebalancer targets set ASSET=PCT ...` first."
        )?;
        audit.log_simple("no_targets")?;
        return Ok(());
    }

    let result = calculator(config).calculate_rebalance(&allocations, &targets, &options)?;
    audit::log_rebalance(&mut audit, &result)?;
    info!(
        "Plan computed: {} trade(s), {} warning(s)",
        result.summary.trade_count,
        result.warnings.len()
    );

    if opts.json {
        serde_json::to_writer_pretty(&mut *out, &result)?;
        writeln!(out)?;
    } else {
        write!(out, "{result}")?;
    }
    Ok(())
}

/// Print the aggregated current allocation.
pub fn show_allocation(
    config: &Config,
    holdings: Option<PathBuf>,
    out: &mut impl Write,
) -> Result<()> {
    let path = holdings.unwrap_or_else(|| config.storage.holdings_file.clone());
    let source = JsonHoldingsFile::load(&path)?;
    let allocations = load_allocations(&source)?;
    display_allocation(&allocations, &config.rebalance.base_currency, out)
}

fn display_allocation(
    allocations: &[AllocationData],
    currency: &str,
    out: &mut impl Write,
) -> Result<()> {
    if allocations.is_empty() {
        writeln!(out, "No holdings.")?;
        return Ok(());
    }

    let total = allotment::total_market_value(allocations);
    writeln!(out, "CURRENT ALLOCATION ({total:.2} {currency}):")?;
    writeln!(
        out,
        "  {:24} {:8} {:>14} {:>8}",
        "Asset", "Symbol", "Value", "Weight"
    )?;
    for a in allocations {
        writeln!(
            out,
            "  {:24} {:8} {:>14.2} {:>7.2}%",
            a.asset_class,
            a.symbol.as_deref().unwrap_or("-"),
            a.market_value,
            a.current,
        )?;
    }
    Ok(())
}

/// Print the saved targets and their total.
pub fn show_targets(config: &Config, out: &mut impl Write) -> Result<()> {
    let targets = repository(config).load()?;
    display_targets(&targets, out)
}

fn display_targets(targets: &[AllocationTarget], out: &mut impl Write) -> Result<()> {
    if targets.is_empty() {
        writeln!(out, "No allocation targets set.")?;
        return Ok(());
    }

    writeln!(out, "ALLOCATION TARGETS:")?;
    for t in targets {
        writeln!(out, "  {t}")?;
    }
    writeln!(
        out,
        "  Total: {:.2}%",
        allotment::total_target_percent(targets)
    )?;
    Ok(())
}

/// Replace the saved targets with `assignments` (`ASSET=PCT` each).
pub fn set_targets(config: &Config, assignments: &[String], out: &mut impl Write) -> Result<()> {
    let targets = assignments
        .iter()
        .map(|raw| target::parse_assignment(raw))
        .collect::<Result<Vec<_>>>()?;

    repository(config).save(&targets)?;

    let mut audit = AuditLog::open(&config.audit_path())?;
    audit::log_targets_saved(&mut audit, &targets)?;
    info!("Saved {} allocation targets", targets.len());

    display_targets(&targets, out)
}

/// Delete the saved targets.
pub fn reset_targets(config: &Config, out: &mut impl Write) -> Result<()> {
    repository(config).reset()?;

    let mut audit = AuditLog::open(&config.audit_path())?;
    audit::log_targets_reset(&mut audit)?;

    writeln!(out, "Allocation targets cleared.")?;
    Ok(())
}

/// List registered strategies with their descriptions.
pub fn list_strategies(config: &Config, out: &mut impl Write) -> Result<()> {
    let calculator = calculator(config);
    for name in calculator.available_strategies() {
        let description = calculator.strategy_description(name).unwrap_or_default();
        let marker = if name == config.rebalance.strategy {
            " (default)"
        } else {
            ""
        };
        writeln!(out, "  {name:12} {description}{marker}")?;
    }
    Ok(())
}
