//! Persisted allocation targets: validation and the repository over a
//! [`KeyValueStore`].

use allotment::{AllocationTarget, total_target_percent};
use log::{debug, warn};
use rustc_hash::FxHashSet;

use crate::error::{Error, Result};
use crate::store::KeyValueStore;

/// Store key holding the JSON-encoded target list.
pub const TARGETS_KEY: &str = "rebalancer_targets";

/// Allowed distance between the target total and 100%.
pub const TOTAL_EPSILON: f64 = 0.01;

/// Check a target set before it is saved.
///
/// The engine itself accepts any target list; only saved sets must be
/// complete allocations.
pub fn validate_targets(targets: &[AllocationTarget]) -> Result<()> {
    let mut seen = FxHashSet::default();
    for t in targets {
        if t.asset_class.trim().is_empty() {
            return Err(Error::Target("empty asset class".into()));
        }
        if !t.target.is_finite() || !(0.0..=100.0).contains(&t.target) {
            return Err(Error::Target(format!(
                "target for {} ({}) must be between 0 and 100",
                t.asset_class, t.target
            )));
        }
        if !seen.insert(t.asset_class.as_str()) {
            return Err(Error::Target(format!(
                "duplicate asset class: {}",
                t.asset_class
            )));
        }
    }

    let total = total_target_percent(targets);
    if (total - 100.0).abs() >= TOTAL_EPSILON {
        let side = if total > 100.0 { "over" } else { "under" };
        return Err(Error::Target(format!(
            "targets total {total:.2}%, {side} by {:.2}%",
            (total - 100.0).abs()
        )));
    }
    Ok(())
}

/// Parse an `ASSET=PCT` assignment as given on the command line.
///
/// Splits on the last `=` so asset class names may contain one.
pub fn parse_assignment(raw: &str) -> Result<AllocationTarget> {
    let (asset, pct) = raw
        .rsplit_once('=')
        .ok_or_else(|| Error::Target(format!("expected ASSET=PERCENT, got '{raw}'")))?;
    let pct = pct.trim().trim_end_matches('%');
    let target: f64 = pct
        .parse()
        .map_err(|_| Error::Target(format!("invalid percentage '{pct}' for {}", asset.trim())))?;
    Ok(AllocationTarget::new(asset.trim(), target))
}

/// Loads and saves the target list under [`TARGETS_KEY`].
#[derive(Debug)]
pub struct TargetRepository<S> {
    store: S,
}

impl<S: KeyValueStore> TargetRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Current targets. Missing or unreadable data yields an empty list.
    pub fn load(&self) -> Result<Vec<AllocationTarget>> {
        let Some(raw) = self.store.get(TARGETS_KEY)? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str(&raw) {
            Ok(targets) => Ok(targets),
            Err(e) => {
                warn!("Failed to load allocation targets, using empty: {e}");
                Ok(Vec::new())
            }
        }
    }

    /// Validate and persist `targets`, replacing any previous set.
    pub fn save(&mut self, targets: &[AllocationTarget]) -> Result<()> {
        validate_targets(targets)?;
        let json = serde_json::to_string(targets)?;
        self.store.set(TARGETS_KEY, &json)?;
        debug!("Saved {} allocation targets", targets.len());
        Ok(())
    }

    /// Forget all saved targets.
    pub fn reset(&mut self) -> Result<()> {
        self.store.remove(TARGETS_KEY)
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
