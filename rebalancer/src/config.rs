//! TOML configuration loading and validation.
//!
//! Every section is optional; a missing file at the default location means
//! "run with defaults".

use std::path::{Path, PathBuf};

use allotment::{DEFAULT_BASE_CURRENCY, DEFAULT_STRATEGY, RebalanceOptions};
use serde::Deserialize;

use crate::error::{Error, Result};

/// Config file looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "rebalancer.toml";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub rebalance: RebalanceConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RebalanceConfig {
    #[serde(default = "default_strategy")]
    pub strategy: String,
    #[serde(default)]
    pub minimum_trade_size: f64,
    #[serde(default)]
    pub tolerance_percent: f64,
    #[serde(default = "default_base_currency")]
    pub base_currency: String,
}

impl Default for RebalanceConfig {
    fn default() -> Self {
        Self {
            strategy: default_strategy(),
            minimum_trade_size: 0.0,
            tolerance_percent: 0.0,
            base_currency: default_base_currency(),
        }
    }
}

fn default_strategy() -> String {
    DEFAULT_STRATEGY.into()
}
fn default_base_currency() -> String {
    DEFAULT_BASE_CURRENCY.into()
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_holdings_file")]
    pub holdings_file: PathBuf,
    #[serde(default = "default_targets_file")]
    pub targets_file: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            holdings_file: default_holdings_file(),
            targets_file: default_targets_file(),
        }
    }
}

fn default_holdings_file() -> PathBuf {
    "holdings.json".into()
}
fn default_targets_file() -> PathBuf {
    "targets.json".into()
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_dir")]
    pub dir: String,
    #[serde(default = "default_audit_file")]
    pub audit_file: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: default_log_dir(),
            audit_file: default_audit_file(),
        }
    }
}

fn default_log_dir() -> String {
    "./logs".into()
}
fn default_audit_file() -> String {
    "audit.jsonl".into()
}

/// Thresholds must be finite and non-negative, whether they come from the
/// config file or the command line.
pub fn check_threshold(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(Error::Config(format!("{name} must be >= 0, got {value}")));
    }
    Ok(())
}

impl Config {
    /// Load config from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| Error::ConfigRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml(&contents)
    }

    /// Parse and validate from a TOML string.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load an explicitly requested file, or fall back to
    /// [`DEFAULT_CONFIG_FILE`] when it exists, or to defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILE);
                if fallback.exists() {
                    Self::load(fallback)
                } else {
                    log::debug!("no {DEFAULT_CONFIG_FILE} found, using defaults");
                    Ok(Self::default())
                }
            }
        }
    }

    /// Validate config invariants.
    fn validate(&self) -> Result<()> {
        let r = &self.rebalance;
        if r.strategy.trim().is_empty() {
            return Err(Error::Config("strategy must not be empty".into()));
        }
        if r.base_currency.trim().is_empty() {
            return Err(Error::Config("base_currency must not be empty".into()));
        }
        check_threshold("minimum_trade_size", r.minimum_trade_size)?;
        check_threshold("tolerance_percent", r.tolerance_percent)?;
        Ok(())
    }

    /// Engine options carrying the configured thresholds and strategy.
    pub fn rebalance_options(&self) -> RebalanceOptions {
        RebalanceOptions::new()
            .strategy(self.rebalance.strategy.clone())
            .minimum_trade_size(self.rebalance.minimum_trade_size)
            .tolerance_percent(self.rebalance.tolerance_percent)
    }

    /// Full path to the audit log file.
    pub fn audit_path(&self) -> PathBuf {
        Path::new(&self.logging.dir).join(&self.logging.audit_file)
    }
}
