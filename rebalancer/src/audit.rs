//! JSONL audit trail logging.
//!
//! Every command that computes or changes something appends events to an
//! audit.jsonl file, one JSON object per line.

use std::fs::{self, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use allotment::{AllocationData, AllocationTarget, RebalanceResult};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::Result;

/// An audit event written to the JSONL trail.
#[derive(Debug, Clone, Serialize)]
pub struct AuditEvent {
    pub event: &'static str,
    pub ts: DateTime<Utc>,
    #[serde(flatten)]
    pub data: serde_json::Value,
}

/// Append-only audit logger.
pub struct AuditLog {
    writer: BufWriter<std::fs::File>,
}

impl AuditLog {
    /// Open (or create) the audit log file for appending.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new().create(true).append(true).open(path)?;

        Ok(Self {
            writer: BufWriter::new(file),
        })
    }

    /// Log an event with arbitrary JSON data.
    pub fn log(&mut self, event: &'static str, data: serde_json::Value) -> Result<()> {
        let entry = AuditEvent {
            event,
            ts: Utc::now(),
            data,
        };
        let json = serde_json::to_string(&entry)?;
        writeln!(self.writer, "{json}")?;
        self.writer.flush()?;
        Ok(())
    }

    /// Log a simple event with no additional data.
    pub fn log_simple(&mut self, event: &'static str) -> Result<()> {
        self.log(event, serde_json::json!({}))
    }
}

pub fn log_plan_started(audit: &mut AuditLog, holdings_file: &str, strategy: &str) -> Result<()> {
    audit.log(
        "plan_started",
        serde_json::json!({
            "holdings_file": holdings_file,
            "strategy": strategy,
        }),
    )
}

pub fn log_allocations(audit: &mut AuditLog, allocations: &[AllocationData]) -> Result<()> {
    let rows: Vec<_> = allocations
        .iter()
        .map(|a| {
            serde_json::json!({
                "asset_class": a.asset_class,
                "symbol": a.symbol,
                "market_value": a.market_value,
                "current": a.current,
            })
        })
        .collect();

    audit.log(
        "allocations_loaded",
        serde_json::json!({
            "allocations": rows,
            "total": allotment::total_market_value(allocations),
        }),
    )
}

/// Log the computed plan: trades only, plus summary and warning counts.
pub fn log_rebalance(audit: &mut AuditLog, result: &RebalanceResult) -> Result<()> {
    let trades: Vec<_> = result
        .trades()
        .map(|r| {
            serde_json::json!({
                "asset_class": r.asset_class,
                "action": r.action.to_string(),
                "delta": r.delta_value,
            })
        })
        .collect();

    audit.log(
        "rebalance_computed",
        serde_json::json!({
            "strategy": result.metadata.strategy_used,
            "calculated_at": result.metadata.calculated_at,
            "total": result.metadata.total_portfolio_value,
            "trades": trades,
            "buy": result.summary.total_buy_amount,
            "sell": result.summary.total_sell_amount,
            "net_cash_flow": result.summary.net_cash_flow,
            "warnings": result.warnings.len(),
        }),
    )
}

pub fn log_targets_saved(audit: &mut AuditLog, targets: &[AllocationTarget]) -> Result<()> {
    let rows: Vec<_> = targets
        .iter()
        .map(|t| serde_json::json!({ "asset_class": t.asset_class, "target": t.target }))
        .collect();

    audit.log("targets_saved", serde_json::json!({ "targets": rows }))
}

pub fn log_targets_reset(audit: &mut AuditLog) -> Result<()> {
    audit.log_simple("targets_reset")
}
