//! Aggregation of raw account holdings into [`AllocationData`] buckets.
//!
//! Buckets are keyed by identifier:
//!
//! | Holding | Identifier | Display name |
//! |---------|------------|--------------|
//! | cash, or instrument of class `MONEY_MARKET` | `CASH` | `Cash` |
//! | instrument with symbol | symbol | name, else symbol |
//! | instrument without symbol | `UNKNOWN_<id>` | name, else `Unknown` |
//! | no instrument | `UNKNOWN_<id>` | `Unknown Asset (<id>)` |
//!
//! The display name becomes the bucket's `asset_class`, the join key the
//! engine matches targets against.

use rustc_hash::FxHashMap;

use crate::types::AllocationData;

/// Instrument asset class that is bucketed together with cash.
pub const MONEY_MARKET: &str = "MONEY_MARKET";

const CASH_ID: &str = "CASH";
const CASH_NAME: &str = "Cash";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum HoldingKind {
    Cash,
    #[default]
    Security,
}

/// Instrument metadata attached to a security holding.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct Instrument {
    pub symbol: Option<String>,
    pub name: Option<String>,
    pub asset_class: Option<String>,
}

/// One position as reported by a holdings source.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Holding {
    pub id: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub kind: HoldingKind,
    /// Market value in the base currency, if known.
    #[cfg_attr(feature = "serde", serde(default))]
    pub market_value: Option<f64>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub instrument: Option<Instrument>,
}

impl Holding {
    pub fn cash(id: impl Into<String>, market_value: f64) -> Self {
        Self {
            id: id.into(),
            kind: HoldingKind::Cash,
            market_value: Some(market_value),
            instrument: None,
        }
    }

    pub fn security(
        id: impl Into<String>,
        symbol: impl Into<String>,
        name: impl Into<String>,
        market_value: f64,
    ) -> Self {
        Self {
            id: id.into(),
            kind: HoldingKind::Security,
            market_value: Some(market_value),
            instrument: Some(Instrument {
                symbol: Some(symbol.into()),
                name: Some(name.into()),
                asset_class: None,
            }),
        }
    }

    fn is_cash_like(&self) -> bool {
        self.kind == HoldingKind::Cash
            || self
                .instrument
                .as_ref()
                .and_then(|i| i.asset_class.as_deref())
                .is_some_and(|class| class == MONEY_MARKET)
    }

    /// Bucket identifier, display name and symbol.
    fn bucket(&self) -> (String, String, Option<String>) {
        if self.is_cash_like() {
            return (CASH_ID.to_string(), CASH_NAME.to_string(), None);
        }
        match &self.instrument {
            Some(instrument) => {
                let symbol = instrument.symbol.clone().filter(|s| !s.is_empty());
                let name = instrument
                    .name
                    .clone()
                    .filter(|n| !n.is_empty())
                    .or_else(|| symbol.clone())
                    .unwrap_or_else(|| "Unknown".to_string());
                let id = symbol
                    .clone()
                    .unwrap_or_else(|| format!("UNKNOWN_{}", self.id));
                (id, name, symbol)
            }
            None => (
                format!("UNKNOWN_{}", self.id),
                format!("Unknown Asset ({})", self.id),
                None,
            ),
        }
    }
}

struct Bucket {
    market_value: f64,
    symbol: Option<String>,
    name: String,
}

/// Group holdings into allocation rows with percentages of the total.
///
/// Holdings with no, zero or non-finite market value are skipped. Rows are
/// sorted by market value, largest first.
pub fn aggregate_holdings(holdings: &[Holding]) -> Vec<AllocationData> {
    let mut order: Vec<String> = Vec::new();
    let mut buckets: FxHashMap<String, Bucket> = FxHashMap::default();
    let mut total = 0.0_f64;

    for holding in holdings {
        let value = match holding.market_value {
            Some(v) if v.is_finite() && v != 0.0 => v,
            _ => continue,
        };
        total += value;

        let (id, name, symbol) = holding.bucket();
        let bucket = buckets.entry(id.clone()).or_insert_with(|| {
            order.push(id);
            Bucket {
                market_value: 0.0,
                symbol: None,
                name: name.clone(),
            }
        });
        bucket.market_value += value;
        bucket.name = name;
        if bucket.symbol.is_none() {
            bucket.symbol = symbol;
        }
    }

    let mut allocations: Vec<AllocationData> = order
        .iter()
        .filter_map(|id| buckets.remove(id))
        .map(|b| AllocationData {
            asset_class: b.name.clone(),
            current: if total > 0.0 {
                b.market_value / total * 100.0
            } else {
                0.0
            },
            market_value: b.market_value,
            symbol: b.symbol,
            name: Some(b.name),
        })
        .collect();

    allocations.sort_by(|a, b| b.market_value.total_cmp(&a.market_value));
    allocations
}
