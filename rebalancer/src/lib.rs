//! allotment-rebalancer: rebalance planning from local snapshots.
//!
//! Reads holdings from a JSON snapshot, keeps allocation targets in a small
//! JSON key-value file, runs the `allotment` engine and prints the plan,
//! appending every step to a JSONL audit trail.

pub mod audit;
pub mod commands;
pub mod config;
pub mod error;
pub mod source;
pub mod store;
pub mod target;
