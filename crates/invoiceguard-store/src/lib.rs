//! # invoiceguard-store
//!
//! File-backed persistence for the audit pipeline:
//!
//! - [`JsonProfileStore`]: one JSON file per vendor profile
//! - [`AuditHistoryStore`]: append-only audit report log with aggregate
//!   insights (total audits, average score, high-risk count)
//!
//! Reads are total: missing or corrupt files behave as empty, so a
//! damaged data directory degrades detection quality instead of failing
//! audits.

pub mod history;
pub mod profiles;

pub use history::{AuditHistoryStore, AuditInsights, HistoryStoreError};
pub use profiles::JsonProfileStore;
