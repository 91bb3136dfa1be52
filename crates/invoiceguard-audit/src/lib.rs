//! # invoiceguard-audit
//!
//! The audit engine tying every detector together:
//!
//! - [`catalog`]: the fixed 26-check catalog (5 categories), stable ids
//!   and risk indicators
//! - [`context`]: the per-upload snapshot of all collaborator signals
//! - [`evaluate`]: one classification rule per check, with explicit
//!   data-missing and not-applicable gating
//! - [`engine`]: upload validation, signal collection, evaluation and
//!   report assembly, plus the composite risk score
//!
//! The engine is deliberately total past upload validation: a missing
//! backend, unreadable document or thin history degrades into per-check
//! `data_missing` / `not_applicable` statuses, never into a failed audit.

pub mod catalog;
pub mod context;
pub mod engine;
pub mod evaluate;

pub use catalog::CATALOG;
pub use context::CheckContext;
pub use engine::{
    collect_alerts, compute_risk_score, AuditEngine, AuditError, AuditRequest, MAX_FILE_SIZE,
    NO_ANOMALY_ALERT,
};
pub use evaluate::evaluate;
