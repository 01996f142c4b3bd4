//! Calculator facade: option resolution, strategy lookup and dispatch.

use std::sync::{Arc, OnceLock};

use log::debug;

use crate::clock::{Clock, SystemClock};
use crate::error::RebalanceError;
use crate::strategy::{RebalanceInput, RebalanceStrategy, StrategyRegistry};
use crate::types::{AllocationData, AllocationTarget, total_market_value};
use crate::{RebalanceOptions, RebalanceResult, ResolvedOptions};

/// Base currency reported in result metadata unless overridden.
pub const DEFAULT_BASE_CURRENCY: &str = "USD";

/// Entry point for rebalance calculations.
///
/// Owns the strategy registry. Strategies are registered while the
/// calculator is being set up (`&mut self`); calculation only needs `&self`,
/// so a configured calculator can be shared freely.
///
/// # Example
///
/// ```
/// use allotment::{AllocationData, AllocationTarget, RebalanceCalculator, RebalanceOptions};
///
/// let calculator = RebalanceCalculator::new();
/// let allocations = [
///     AllocationData::new("Stocks", 40.0, 4000.0).with_symbol("VTI"),
///     AllocationData::new("Bonds", 60.0, 6000.0).with_symbol("BND"),
/// ];
/// let targets = [
///     AllocationTarget::new("Stocks", 60.0),
///     AllocationTarget::new("Bonds", 40.0),
/// ];
///
/// let result = calculator
///     .calculate_rebalance(&allocations, &targets, &RebalanceOptions::new())
///     .unwrap();
/// assert_eq!(result.summary.total_buy_amount, 2000.0);
/// assert_eq!(result.summary.net_cash_flow, 0.0);
/// ```
pub struct RebalanceCalculator {
    registry: StrategyRegistry,
    clock: Arc<dyn Clock>,
    base_currency: String,
    defaults: ResolvedOptions,
}

impl RebalanceCalculator {
    /// Calculator with the built-in strategies, the system clock and USD.
    pub fn new() -> Self {
        Self {
            registry: StrategyRegistry::default(),
            clock: Arc::new(SystemClock),
            base_currency: DEFAULT_BASE_CURRENCY.to_string(),
            defaults: ResolvedOptions::default(),
        }
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn with_base_currency(mut self, currency: impl Into<String>) -> Self {
        self.base_currency = currency.into();
        self
    }

    pub fn with_registry(mut self, registry: StrategyRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Replace the options unset fields fall back to.
    pub fn with_defaults(mut self, defaults: ResolvedOptions) -> Self {
        self.defaults = defaults;
        self
    }

    /// Register a strategy. Last registration for a name wins.
    pub fn register_strategy<S>(&mut self, name: impl Into<String>, strategy: S)
    where
        S: RebalanceStrategy + 'static,
    {
        self.registry.register(name, strategy);
    }

    /// Compute the trades that move `allocations` toward `targets`.
    ///
    /// # Errors
    ///
    /// [`RebalanceError::UnknownStrategy`] if the resolved strategy name is
    /// not registered. Every other input is accepted.
    pub fn calculate_rebalance(
        &self,
        allocations: &[AllocationData],
        targets: &[AllocationTarget],
        options: &RebalanceOptions,
    ) -> Result<RebalanceResult, RebalanceError> {
        let resolved = options.resolve_over(&self.defaults);

        let strategy = self
            .registry
            .get(&resolved.strategy)
            .ok_or_else(|| RebalanceError::UnknownStrategy(resolved.strategy.clone()))?;

        let input = RebalanceInput {
            allocations,
            targets,
            total_portfolio_value: total_market_value(allocations),
            base_currency: &self.base_currency,
            calculated_at: self.clock.now(),
        };
        debug!(
            "rebalancing {} allocation(s) against {} target(s) with '{}' (total {:.2} {})",
            allocations.len(),
            targets.len(),
            resolved.strategy,
            input.total_portfolio_value,
            self.base_currency,
        );

        let result = strategy.calculate(&input, &resolved);
        debug!(
            "'{}' produced {} row(s), {} trade(s), {} warning(s)",
            resolved.strategy,
            result.recommendations.len(),
            result.summary.trade_count,
            result.warnings.len(),
        );
        Ok(result)
    }

    /// Registered strategy names, sorted.
    pub fn available_strategies(&self) -> Vec<&str> {
        self.registry.names()
    }

    pub fn strategy_description(&self, name: &str) -> Option<&str> {
        self.registry.description(name)
    }

    pub fn registry(&self) -> &StrategyRegistry {
        &self.registry
    }

    pub fn base_currency(&self) -> &str {
        &self.base_currency
    }
}

impl Default for RebalanceCalculator {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RebalanceCalculator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RebalanceCalculator")
            .field("registry", &self.registry)
            .field("base_currency", &self.base_currency)
            .field("defaults", &self.defaults)
            .finish()
    }
}

fn default_calculator() -> &'static RebalanceCalculator {
    static CALCULATOR: OnceLock<RebalanceCalculator> = OnceLock::new();
    CALCULATOR.get_or_init(RebalanceCalculator::new)
}

/// [`RebalanceCalculator::calculate_rebalance`] on a default calculator.
pub fn calculate_rebalance(
    allocations: &[AllocationData],
    targets: &[AllocationTarget],
    options: &RebalanceOptions,
) -> Result<RebalanceResult, RebalanceError> {
    default_calculator().calculate_rebalance(allocations, targets, options)
}

/// Strategies built into every calculator.
pub fn available_strategies() -> Vec<&'static str> {
    default_calculator().available_strategies()
}

/// Description of a built-in strategy.
pub fn strategy_description(name: &str) -> Option<&'static str> {
    default_calculator().strategy_description(name)
}
