//! Trade action: Buy, Sell or Hold

use std::fmt;

/// Recommended action for one asset class.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum TradeAction {
    Buy,
    Sell,
    Hold,
}

impl TradeAction {
    /// Classify a value delta: positive buys, negative sells, zero holds.
    #[inline]
    pub fn from_delta(delta_value: f64) -> Self {
        if delta_value > 0.0 {
            TradeAction::Buy
        } else if delta_value < 0.0 {
            TradeAction::Sell
        } else {
            TradeAction::Hold
        }
    }

    /// True for BUY and SELL.
    #[inline]
    pub fn is_trade(self) -> bool {
        self != TradeAction::Hold
    }
}

impl fmt::Display for TradeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            TradeAction::Buy => "BUY",
            TradeAction::Sell => "SELL",
            TradeAction::Hold => "HOLD",
        })
    }
}
