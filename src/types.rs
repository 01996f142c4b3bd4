//! Input types: current allocations and user targets.

use std::fmt;

/// One owned-asset bucket of the current portfolio.
///
/// `asset_class` is the display key (symbol, instrument name or "Cash") and
/// is the only field used to join against [`AllocationTarget`]s. Matching is
/// exact and case-sensitive.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct AllocationData {
    pub asset_class: String,
    /// Percent of total portfolio value, 0-100.
    pub current: f64,
    /// Absolute value in the base currency.
    pub market_value: f64,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub symbol: Option<String>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub name: Option<String>,
}

impl AllocationData {
    /// Create an allocation row without display metadata.
    pub fn new(asset_class: impl Into<String>, current: f64, market_value: f64) -> Self {
        Self {
            asset_class: asset_class.into(),
            current,
            market_value,
            symbol: None,
            name: None,
        }
    }

    /// Attach a ticker symbol.
    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = Some(symbol.into());
        self
    }

    /// Attach a display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// A user-defined target percentage for one asset class.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct AllocationTarget {
    pub asset_class: String,
    /// Target percent, 0-100 inclusive.
    pub target: f64,
}

impl AllocationTarget {
    pub fn new(asset_class: impl Into<String>, target: f64) -> Self {
        Self {
            asset_class: asset_class.into(),
            target,
        }
    }
}

impl fmt::Display for AllocationTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {:.2}%", self.asset_class, self.target)
    }
}

/// Sum of `market_value` over a set of allocations.
pub fn total_market_value(allocations: &[AllocationData]) -> f64 {
    allocations.iter().map(|a| a.market_value).sum()
}

/// Sum of target percentages. Not required to be 100.
pub fn total_target_percent(targets: &[AllocationTarget]) -> f64 {
    targets.iter().map(|t| t.target).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_display_fields() {
        let a = AllocationData::new("Vanguard Total", 40.0, 4000.0)
            .with_symbol("VTI")
            .with_name("Vanguard Total");
        assert_eq!(a.symbol.as_deref(), Some("VTI"));
        assert_eq!(a.name.as_deref(), Some("Vanguard Total"));
    }

    #[test]
    fn totals() {
        let allocations = [
            AllocationData::new("Stocks", 40.0, 4000.0),
            AllocationData::new("Bonds", 60.0, 6000.0),
        ];
        assert_eq!(total_market_value(&allocations), 10_000.0);
        assert_eq!(total_market_value(&[]), 0.0);

        let targets = [
            AllocationTarget::new("Stocks", 70.0),
            AllocationTarget::new("Bonds", 20.0),
        ];
        assert_eq!(total_target_percent(&targets), 90.0);
    }

    #[test]
    fn target_display() {
        assert_eq!(
            format!("{}", AllocationTarget::new("Bonds", 40.0)),
            "Bonds = 40.00%"
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn target_json_shape() {
        let t: AllocationTarget =
            serde_json::from_str(r#"{"assetClass":"Stocks","target":60}"#).unwrap();
        assert_eq!(t, AllocationTarget::new("Stocks", 60.0));

        let json = serde_json::to_string(&AllocationData::new("Cash", 100.0, 1000.0)).unwrap();
        assert_eq!(
            json,
            r#"{"assetClass":"Cash","current":100.0,"marketValue":1000.0}"#
        );
    }
}
