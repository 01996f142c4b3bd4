//! Rebalancing strategies and the registry that names them.
//!
//! A strategy is a pure function from current allocations, targets and
//! resolved options to a [`RebalanceResult`]. The registry maps names to
//! strategy instances and is owned by a
//! [`RebalanceCalculator`](crate::RebalanceCalculator); it is filled at
//! construction time, then only read.
//!
//! # Example
//!
//! ```
//! use allotment::strategy::{RebalanceInput, RebalanceStrategy, SimpleStrategy};
//! use allotment::{AllocationData, AllocationTarget, RebalanceOptions, TradeAction};
//!
//! let allocations = [AllocationData::new("Cash", 100.0, 1000.0)];
//! let targets = [AllocationTarget::new("Stocks", 100.0)];
//! let input = RebalanceInput::new(&allocations, &targets);
//!
//! let result = SimpleStrategy.calculate(&input, &RebalanceOptions::new().resolve());
//! let stocks = result.recommendation("Stocks").unwrap();
//! assert_eq!(stocks.action, TradeAction::Buy);
//! assert_eq!(stocks.delta_value, 1000.0);
//! assert_eq!(result.recommendation("Cash").unwrap().action, TradeAction::Sell);
//! ```

pub mod merge;
pub mod simple;

pub use merge::{AssetMap, MergedAssetData};
pub use simple::SimpleStrategy;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rustc_hash::FxHashMap;

use crate::calculator::DEFAULT_BASE_CURRENCY;
use crate::options::DEFAULT_STRATEGY;
use crate::types::{AllocationData, AllocationTarget, total_market_value};
use crate::{RebalanceResult, ResolvedOptions};

/// Everything a strategy needs to produce a result.
#[derive(Clone, Debug)]
pub struct RebalanceInput<'a> {
    pub allocations: &'a [AllocationData],
    pub targets: &'a [AllocationTarget],
    pub total_portfolio_value: f64,
    pub base_currency: &'a str,
    pub calculated_at: DateTime<Utc>,
}

impl<'a> RebalanceInput<'a> {
    /// Input with the total taken from the allocations, USD, and the Unix epoch
    /// as timestamp.
    pub fn new(allocations: &'a [AllocationData], targets: &'a [AllocationTarget]) -> Self {
        Self {
            allocations,
            targets,
            total_portfolio_value: total_market_value(allocations),
            base_currency: DEFAULT_BASE_CURRENCY,
            calculated_at: DateTime::<Utc>::UNIX_EPOCH,
        }
    }
}

/// A rebalancing algorithm.
///
/// Implementations must be deterministic: identical input and options give
/// an identical result. No I/O.
pub trait RebalanceStrategy: Send + Sync {
    /// Short identifier shown in listings.
    fn name(&self) -> &str;

    /// One-line description of what the strategy does.
    fn description(&self) -> &str;

    /// Compute recommendations, summary, warnings and metadata.
    fn calculate(&self, input: &RebalanceInput<'_>, options: &ResolvedOptions) -> RebalanceResult;
}

/// Name-to-strategy mapping.
#[derive(Clone)]
pub struct StrategyRegistry {
    strategies: FxHashMap<String, Arc<dyn RebalanceStrategy>>,
}

impl StrategyRegistry {
    /// A registry with no strategies at all.
    pub fn empty() -> Self {
        Self {
            strategies: FxHashMap::default(),
        }
    }

    /// Register `strategy` under `name`. An existing entry is replaced.
    pub fn register<S>(&mut self, name: impl Into<String>, strategy: S)
    where
        S: RebalanceStrategy + 'static,
    {
        self.register_shared(name, Arc::new(strategy));
    }

    /// Register an already shared strategy under `name`.
    pub fn register_shared(
        &mut self,
        name: impl Into<String>,
        strategy: Arc<dyn RebalanceStrategy>,
    ) {
        self.strategies.insert(name.into(), strategy);
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn RebalanceStrategy>> {
        self.strategies.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.strategies.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.strategies.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn description(&self, name: &str) -> Option<&str> {
        self.strategies.get(name).map(|s| s.description())
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }
}

impl Default for StrategyRegistry {
    /// Seeded with the built-in `"simple"` strategy.
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(DEFAULT_STRATEGY, SimpleStrategy);
        registry
    }
}

impl std::fmt::Debug for StrategyRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StrategyRegistry")
            .field("strategies", &self.names())
            .finish()
    }
}
