//! Outer join of current allocations and targets.
//!
//! The asset-class string is the sole join key, matched exactly and
//! case-sensitively: "US Stocks" and "US stocks" become two rows and two
//! warnings.

use rustc_hash::FxHashMap;

use crate::types::{AllocationData, AllocationTarget};
use crate::RebalanceWarning;

/// Current and target state of one asset class.
#[derive(Clone, Debug, PartialEq)]
pub struct MergedAssetData {
    pub current_percent: f64,
    /// Zero when no target was set.
    pub target_percent: f64,
    pub current_value: f64,
    pub symbol: Option<String>,
    pub name: Option<String>,
}

/// Insertion-ordered map from asset class to [`MergedAssetData`].
///
/// Iteration follows first-insertion order; replacing an entry keeps its slot.
#[derive(Clone, Debug, Default)]
pub struct AssetMap {
    entries: Vec<(String, MergedAssetData)>,
    index: FxHashMap<String, usize>,
}

impl AssetMap {
    /// Join `allocations` and `targets`, appending data-quality warnings.
    ///
    /// Duplicate keys are last-wins on both sides. A target with no
    /// matching allocation produces a zero-current row and a
    /// `TARGET_NO_ASSET` warning; afterwards every row with holdings but a
    /// zero target produces `ASSET_NO_TARGET`.
    pub fn build(
        allocations: &[AllocationData],
        targets: &[AllocationTarget],
        warnings: &mut Vec<RebalanceWarning>,
    ) -> Self {
        let mut map = Self::default();

        for allocation in allocations {
            map.insert(
                &allocation.asset_class,
                MergedAssetData {
                    current_percent: allocation.current,
                    target_percent: 0.0,
                    current_value: allocation.market_value,
                    symbol: allocation.symbol.clone(),
                    name: allocation.name.clone(),
                },
            );
        }

        for target in targets {
            match map.get_mut(&target.asset_class) {
                Some(existing) => existing.target_percent = target.target,
                None => {
                    map.insert(
                        &target.asset_class,
                        MergedAssetData {
                            current_percent: 0.0,
                            target_percent: target.target,
                            current_value: 0.0,
                            symbol: None,
                            name: Some(target.asset_class.clone()),
                        },
                    );
                    warnings.push(RebalanceWarning::target_no_asset(&target.asset_class));
                }
            }
        }

        for (asset_class, data) in map.iter() {
            if data.current_percent > 0.0 && data.target_percent == 0.0 {
                warnings.push(RebalanceWarning::asset_no_target(asset_class));
            }
        }

        map
    }

    fn insert(&mut self, asset_class: &str, data: MergedAssetData) {
        match self.index.get(asset_class) {
            Some(&slot) => self.entries[slot].1 = data,
            None => {
                self.index.insert(asset_class.to_string(), self.entries.len());
                self.entries.push((asset_class.to_string(), data));
            }
        }
    }

    pub fn get(&self, asset_class: &str) -> Option<&MergedAssetData> {
        self.index.get(asset_class).map(|&slot| &self.entries[slot].1)
    }

    fn get_mut(&mut self, asset_class: &str) -> Option<&mut MergedAssetData> {
        let slot = *self.index.get(asset_class)?;
        Some(&mut self.entries[slot].1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MergedAssetData)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
