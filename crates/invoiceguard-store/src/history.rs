//! Append-only audit history log with aggregate insights.
//!
//! The whole history lives in one JSON array file. Appends re-read,
//! extend and rewrite the array under a process-local lock; readers
//! tolerate a missing or corrupt file by returning an empty history.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use invoiceguard_types::AuditReport;

#[derive(Debug, Error)]
pub enum HistoryStoreError {
    #[error("history I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("history serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Aggregates over the stored audit history.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AuditInsights {
    pub total_audits: u32,
    /// Mean composite risk score, rounded to one decimal.
    pub avg_risk_score: f64,
    /// Audits with composite score >= 70.
    pub high_risk_count: u32,
    pub total_alerts: u32,
}

pub struct AuditHistoryStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl AuditHistoryStore {
    /// Open (and create if needed) the history file.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, HistoryStoreError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        if !path.exists() {
            fs::write(&path, "[]")?;
        }
        Ok(Self {
            path,
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, report: &AuditReport) -> Result<(), HistoryStoreError> {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        let mut history = self.read_all();
        history.push(report.clone());
        let json = serde_json::to_string_pretty(&history)?;
        fs::write(&self.path, json)?;
        Ok(())
    }

    /// Every stored report, oldest first. A missing or corrupt file is an
    /// empty history.
    pub fn read_all(&self) -> Vec<AuditReport> {
        match fs::read_to_string(&self.path) {
            Ok(raw) if !raw.trim().is_empty() => {
                serde_json::from_str(&raw).unwrap_or_else(|e| {
                    warn!(path = %self.path.display(), error = %e, "corrupt audit history");
                    Vec::new()
                })
            }
            _ => Vec::new(),
        }
    }

    pub fn insights(&self) -> AuditInsights {
        let reports = self.read_all();
        if reports.is_empty() {
            return AuditInsights::default();
        }
        let total = reports.len() as u32;
        let score_sum: u32 = reports.iter().map(|r| r.composite_risk_score).sum();
        let avg = score_sum as f64 / total as f64;
        AuditInsights {
            total_audits: total,
            avg_risk_score: (avg * 10.0).round() / 10.0,
            high_risk_count: reports
                .iter()
                .filter(|r| r.composite_risk_score >= 70)
                .count() as u32,
            total_alerts: reports.iter().map(|r| r.alerts.len() as u32).sum(),
        }
    }
}
