//! Holdings sources: where the current portfolio comes from.

use std::path::{Path, PathBuf};

use allotment::{AllocationData, Holding, aggregate_holdings};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// An account as listed by a holdings source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// Read-only view over accounts and their positions.
pub trait HoldingsSource {
    fn accounts(&self) -> Result<Vec<Account>>;
    fn holdings(&self, account_id: &str) -> Result<Vec<Holding>>;
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HoldingsDocument {
    #[serde(default)]
    pub accounts: Vec<AccountHoldings>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountHoldings {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub holdings: Vec<Holding>,
}

/// Holdings from a JSON snapshot file:
///
/// ```json
/// { "accounts": [ { "id": "a1", "name": "Brokerage", "holdings": [
///     { "id": "h1", "kind": "security", "marketValue": 3000.0,
///       "instrument": { "symbol": "VTI", "name": "Total Stock" } }
/// ] } ] }
/// ```
#[derive(Debug, Clone)]
pub struct JsonHoldingsFile {
    path: PathBuf,
    document: HoldingsDocument,
}

impl JsonHoldingsFile {
    /// Read and parse the snapshot.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| Error::HoldingsRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let document = serde_json::from_str(&contents).map_err(|e| Error::HoldingsParse {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(Self {
            path: path.to_path_buf(),
            document,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HoldingsSource for JsonHoldingsFile {
    fn accounts(&self) -> Result<Vec<Account>> {
        Ok(self
            .document
            .accounts
            .iter()
            .map(|a| Account {
                id: a.id.clone(),
                name: a.name.clone(),
            })
            .collect())
    }

    fn holdings(&self, account_id: &str) -> Result<Vec<Holding>> {
        self.document
            .accounts
            .iter()
            .find(|a| a.id == account_id)
            .map(|a| a.holdings.clone())
            .ok_or_else(|| Error::UnknownAccount(account_id.to_string()))
    }
}

/// Fetch every account's holdings and aggregate them into allocations.
pub fn load_allocations(source: &impl HoldingsSource) -> Result<Vec<AllocationData>> {
    let accounts = source.accounts()?;
    let mut all = Vec::new();
    for account in &accounts {
        let holdings = source.holdings(&account.id)?;
        debug!("account {}: {} holdings", account.id, holdings.len());
        all.extend(holdings);
    }
    Ok(aggregate_holdings(&all))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> &'static str {
        r#"{
            "accounts": [
                {
                    "id": "a1",
                    "name": "Brokerage",
                    "holdings": [
                        { "id": "h1", "kind": "security", "marketValue": 3000.0,
                          "instrument": { "symbol": "VTI", "name": "Total Stock" } },
                        { "id": "h2", "kind": "cash", "marketValue": 500.0 }
                    ]
                },
                {
                    "id": "a2",
                    "name": "IRA",
                    "holdings": [
                        { "id": "h3", "marketValue": 1000.0,
                          "instrument": { "symbol": "VTI", "name": "Total Stock" } },
                        { "id": "h4", "marketValue": 500.0,
                          "instrument": { "symbol": "SPAXX", "assetClass": "MONEY_MARKET" } },
                        { "id": "h5", "marketValue": null,
                          "instrument": { "symbol": "BND" } }
                    ]
                }
            ]
        }"#
    }

    fn write_snapshot(dir: &Path) -> PathBuf {
        let path = dir.join("holdings.json");
        std::fs::write(&path, snapshot()).unwrap();
        path
    }

    #[test]
    fn lists_accounts() {
        let dir = tempfile::tempdir().unwrap();
        let source = JsonHoldingsFile::load(&write_snapshot(dir.path())).unwrap();
        let accounts = source.accounts().unwrap();
        assert_eq!(accounts.len(), 2);
        assert_eq!(accounts[1].name, "IRA");
    }

    #[test]
    fn unknown_account_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = JsonHoldingsFile::load(&write_snapshot(dir.path())).unwrap();
        assert!(matches!(
            source.holdings("nope"),
            Err(Error::UnknownAccount(_))
        ));
    }

    #[test]
    fn aggregates_across_accounts() {
        let dir = tempfile::tempdir().unwrap();
        let source = JsonHoldingsFile::load(&write_snapshot(dir.path())).unwrap();
        let allocations = load_allocations(&source).unwrap();

        assert_eq!(allocations.len(), 2);
        assert_eq!(allocations[0].asset_class, "Total Stock");
        assert_eq!(allocations[0].market_value, 4000.0);
        assert!((allocations[0].current - 80.0).abs() < 1e-9);
        assert_eq!(allocations[1].asset_class, "Cash");
        assert_eq!(allocations[1].market_value, 1000.0);
    }

    #[test]
    fn missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = JsonHoldingsFile::load(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, Error::HoldingsRead { .. }));
    }

    #[test]
    fn malformed_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("holdings.json");
        std::fs::write(&path, "{ \"accounts\": 7 }").unwrap();
        let err = JsonHoldingsFile::load(&path).unwrap_err();
        assert!(matches!(err, Error::HoldingsParse { .. }));
    }
}
