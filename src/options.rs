//! Calculation options and their defaults.

/// Name of the built-in strategy.
pub const DEFAULT_STRATEGY: &str = "simple";

/// Caller-supplied options. Unset fields fall back to [`ResolvedOptions::default`].
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct RebalanceOptions {
    /// Currency floor below which a nonzero delta is suppressed to HOLD.
    pub minimum_trade_size: Option<f64>,
    /// Percentage-point band within which a delta is suppressed to HOLD.
    pub tolerance_percent: Option<f64>,
    /// Registry key of the strategy to run.
    pub strategy: Option<String>,
}

impl RebalanceOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn minimum_trade_size(mut self, amount: f64) -> Self {
        self.minimum_trade_size = Some(amount);
        self
    }

    pub fn tolerance_percent(mut self, percent: f64) -> Self {
        self.tolerance_percent = Some(percent);
        self
    }

    pub fn strategy(mut self, name: impl Into<String>) -> Self {
        self.strategy = Some(name.into());
        self
    }

    /// Overlay these options on `base`, key by key. Set fields win.
    pub fn resolve_over(&self, base: &ResolvedOptions) -> ResolvedOptions {
        ResolvedOptions {
            minimum_trade_size: self.minimum_trade_size.unwrap_or(base.minimum_trade_size),
            tolerance_percent: self.tolerance_percent.unwrap_or(base.tolerance_percent),
            strategy: self
                .strategy
                .clone()
                .unwrap_or_else(|| base.strategy.clone()),
        }
    }

    /// Overlay these options on the defaults.
    pub fn resolve(&self) -> ResolvedOptions {
        self.resolve_over(&ResolvedOptions::default())
    }
}

/// Fully resolved options handed to a strategy.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ResolvedOptions {
    pub minimum_trade_size: f64,
    pub tolerance_percent: f64,
    pub strategy: String,
}

impl Default for ResolvedOptions {
    /// Both thresholds zero: every nonzero delta is recommended.
    fn default() -> Self {
        Self {
            minimum_trade_size: 0.0,
            tolerance_percent: 0.0,
            strategy: DEFAULT_STRATEGY.to_string(),
        }
    }
}
