//! Result types for rebalance calculations.

use std::fmt;

use chrono::{DateTime, Utc};

use crate::TradeAction;

/// One row of a rebalance plan.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct TradeRecommendation {
    pub asset_class: String,
    pub symbol: Option<String>,
    pub name: Option<String>,
    pub action: TradeAction,
    pub current_value: f64,
    pub target_value: f64,
    pub current_percent: f64,
    pub target_percent: f64,
    /// Target minus current value. Positive buys, negative sells.
    pub delta_value: f64,
    /// Target minus current percent.
    pub delta_percent: f64,
}

/// Aggregate cash movement of a plan.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct RebalanceSummary {
    pub total_buy_amount: f64,
    pub total_sell_amount: f64,
    /// Sell proceeds minus buy cost. Positive means the plan frees cash.
    pub net_cash_flow: f64,
    pub trade_count: usize,
    pub is_balanced: bool,
}

/// Category of a data-quality warning.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum WarningKind {
    /// Holdings exist but no target percentage was set.
    AssetNoTarget,
    /// A target was set for an asset class with no holdings.
    TargetNoAsset,
    /// A trade was suppressed because it is below the minimum size.
    SmallTrade,
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WarningKind::AssetNoTarget => write!(f, "ASSET_NO_TARGET"),
            WarningKind::TargetNoAsset => write!(f, "TARGET_NO_ASSET"),
            WarningKind::SmallTrade => write!(f, "SMALL_TRADE"),
        }
    }
}

/// A non-fatal problem found while calculating.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct RebalanceWarning {
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub kind: WarningKind,
    pub asset_class: String,
    pub message: String,
}

impl RebalanceWarning {
    pub(crate) fn asset_no_target(asset_class: &str) -> Self {
        Self {
            kind: WarningKind::AssetNoTarget,
            asset_class: asset_class.to_string(),
            message: format!("\"{asset_class}\" has holdings but no target allocation set"),
        }
    }

    pub(crate) fn target_no_asset(asset_class: &str) -> Self {
        Self {
            kind: WarningKind::TargetNoAsset,
            asset_class: asset_class.to_string(),
            message: format!("Target set for \"{asset_class}\" but no current holdings found"),
        }
    }

    pub(crate) fn small_trade(asset_class: &str, delta_value: f64, minimum: f64) -> Self {
        Self {
            kind: WarningKind::SmallTrade,
            asset_class: asset_class.to_string(),
            message: format!(
                "Trade of ${:.2} is below minimum of ${minimum}",
                delta_value.abs()
            ),
        }
    }
}

impl fmt::Display for RebalanceWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)
    }
}

/// Provenance of a result.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct RebalanceMetadata {
    pub calculated_at: DateTime<Utc>,
    pub strategy_used: String,
    pub base_currency: String,
    pub total_portfolio_value: f64,
}

/// Complete output of one calculation.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RebalanceResult {
    /// Largest absolute `delta_value` first.
    pub recommendations: Vec<TradeRecommendation>,
    pub summary: RebalanceSummary,
    pub warnings: Vec<RebalanceWarning>,
    pub metadata: RebalanceMetadata,
}

impl RebalanceResult {
    /// Rows whose action is BUY or SELL.
    pub fn trades(&self) -> impl Iterator<Item = &TradeRecommendation> {
        self.recommendations.iter().filter(|r| r.action.is_trade())
    }

    /// Recommendation for an asset class, if present.
    pub fn recommendation(&self, asset_class: &str) -> Option<&TradeRecommendation> {
        self.recommendations
            .iter()
            .find(|r| r.asset_class == asset_class)
    }

    /// Returns true if any warnings were produced.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Warnings of one kind, in emission order.
    pub fn warnings_of(&self, kind: WarningKind) -> impl Iterator<Item = &RebalanceWarning> {
        self.warnings.iter().filter(move |w| w.kind == kind)
    }
}

impl fmt::Display for RebalanceResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let currency = &self.metadata.base_currency;
        writeln!(
            f,
            "REBALANCE PLAN ({}, {:.2} {currency}):",
            self.metadata.strategy_used, self.metadata.total_portfolio_value
        )?;
        writeln!(
            f,
            "  {:20} {:>6} {:>9} {:>9} {:>14} {:>14}",
            "Asset", "Action", "Current%", "Target%", "Current", "Delta"
        )?;
        for r in &self.recommendations {
            writeln!(
                f,
                "  {:20} {:>6} {:>8.2}% {:>8.2}% {:>14.2} {:>+14.2}",
                r.asset_class,
                r.action,
                r.current_percent,
                r.target_percent,
                r.current_value,
                r.delta_value,
            )?;
        }
        let s = &self.summary;
        writeln!(
            f,
            "\n  {} trade(s): buy {:.2}, sell {:.2}, net cash flow {:+.2} {currency}",
            s.trade_count, s.total_buy_amount, s.total_sell_amount, s.net_cash_flow
        )?;
        if s.is_balanced {
            writeln!(f, "  Portfolio is balanced.")?;
        }
        if !self.warnings.is_empty() {
            writeln!(f, "\nWARNINGS:")?;
            for w in &self.warnings {
                writeln!(f, "  {w}")?;
            }
        }
        Ok(())
    }
}
