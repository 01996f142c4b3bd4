//! # allotment
//!
//! A deterministic portfolio rebalance calculation engine.
//!
//! Given the current allocation of a portfolio (asset classes with market
//! values and percentages) and a set of target percentages, the engine
//! computes the BUY/SELL amounts that move the portfolio to its targets,
//! warnings about inconsistent input, and a cash-flow summary.
//!
//! ## Features
//!
//! - **Pluggable strategies**: algorithms implement [`RebalanceStrategy`] and are looked up by name
//! - **Tolerance band**: deltas within `tolerance_percent` points are held
//! - **Minimum trade size**: trades below `minimum_trade_size` are held and flagged
//! - **Deterministic output**: rows sorted by absolute delta, injectable [`Clock`]
//! - **Holdings aggregation**: raw account holdings grouped into allocation buckets
//!
//! ## Quick Start
//!
//! ```
//! use allotment::{AllocationData, AllocationTarget, RebalanceOptions, TradeAction};
//!
//! let allocations = [
//!     AllocationData::new("Stocks", 40.0, 4000.0),
//!     AllocationData::new("Bonds", 60.0, 6000.0),
//! ];
//! let targets = [
//!     AllocationTarget::new("Stocks", 60.0),
//!     AllocationTarget::new("Bonds", 40.0),
//! ];
//!
//! let result = allotment::calculate_rebalance(&allocations, &targets, &RebalanceOptions::new())?;
//!
//! assert_eq!(result.recommendations[0].action, TradeAction::Buy);
//! assert_eq!(result.recommendations[0].delta_value, 2000.0);
//! assert_eq!(result.summary.trade_count, 2);
//! # Ok::<(), allotment::RebalanceError>(())
//! ```
//!
//! ## Thresholds
//!
//! | Option | Default | Effect |
//! |--------|---------|--------|
//! | `tolerance_percent` | 0 | `\|target% - current%\| <= tolerance` → HOLD, delta reported as 0 |
//! | `minimum_trade_size` | 0 | nonzero `\|delta\| < minimum` → HOLD, delta 0, `SMALL_TRADE` warning |
//! | `strategy` | `"simple"` | registry key; unknown keys fail with [`RebalanceError::UnknownStrategy`] |
//!
//! ```
//! use allotment::{AllocationData, AllocationTarget, RebalanceOptions, WarningKind};
//!
//! let allocations = [
//!     AllocationData::new("Stocks", 50.3, 5030.0),
//!     AllocationData::new("Bonds", 49.7, 4970.0),
//! ];
//! let targets = [
//!     AllocationTarget::new("Stocks", 50.0),
//!     AllocationTarget::new("Bonds", 50.0),
//! ];
//!
//! let options = RebalanceOptions::new().minimum_trade_size(50.0);
//! let result = allotment::calculate_rebalance(&allocations, &targets, &options)?;
//!
//! assert!(result.summary.is_balanced);
//! assert_eq!(result.warnings_of(WarningKind::SmallTrade).count(), 2);
//! # Ok::<(), allotment::RebalanceError>(())
//! ```
//!
//! ## Custom Strategies
//!
//! Register additional strategies on a [`RebalanceCalculator`] at startup:
//!
//! ```
//! use allotment::strategy::{RebalanceInput, RebalanceStrategy, SimpleStrategy};
//! use allotment::{RebalanceCalculator, RebalanceOptions, RebalanceResult, ResolvedOptions};
//!
//! struct HoldEverything;
//!
//! impl RebalanceStrategy for HoldEverything {
//!     fn name(&self) -> &str { "hold" }
//!     fn description(&self) -> &str { "Never trade" }
//!     fn calculate(&self, input: &RebalanceInput<'_>, options: &ResolvedOptions) -> RebalanceResult {
//!         let wide = ResolvedOptions { tolerance_percent: 100.0, ..options.clone() };
//!         SimpleStrategy.calculate(input, &wide)
//!     }
//! }
//!
//! let mut calculator = RebalanceCalculator::new();
//! calculator.register_strategy("hold", HoldEverything);
//! assert_eq!(calculator.available_strategies(), vec!["hold", "simple"]);
//! ```

mod action;
pub mod calculator;
pub mod clock;
mod error;
pub mod holdings;
mod options;
mod result;
pub mod strategy;
mod types;

// Re-export public API
pub use action::TradeAction;
pub use calculator::{
    DEFAULT_BASE_CURRENCY, RebalanceCalculator, available_strategies, calculate_rebalance,
    strategy_description,
};
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::RebalanceError;
pub use holdings::{Holding, HoldingKind, Instrument, aggregate_holdings};
pub use options::{DEFAULT_STRATEGY, RebalanceOptions, ResolvedOptions};
pub use result::{
    RebalanceMetadata, RebalanceResult, RebalanceSummary, RebalanceWarning, TradeRecommendation,
    WarningKind,
};
pub use strategy::{RebalanceStrategy, SimpleStrategy, StrategyRegistry};
pub use types::{AllocationData, AllocationTarget, total_market_value, total_target_percent};
