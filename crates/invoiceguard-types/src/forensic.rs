//! Forensic collaborator signal records.
//!
//! Each record carries an explicit escape hatch (`error` or `available`)
//! so the evaluator can distinguish "collaborator ran and found X" from
//! "collaborator could not run". A populated `error` means the document
//! could not be verified and is surfaced as a check failure.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Document metadata extraction result (PDF Info dictionary or image info).
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MetadataReport {
    /// "pdf" or "image".
    pub file_type: String,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
    /// Editing-software keywords found in the metadata values.
    #[serde(default)]
    pub suspicious_software: Vec<String>,
    /// Number of incremental saves observed in a PDF byte stream.
    pub incremental_saves: u32,
    /// ModifyDate differs from CreationDate.
    pub modify_after_create: bool,
    pub page_count: Option<u32>,
    /// Set when the document could not be decoded.
    pub error: Option<String>,
}

/// Error-level-analysis result. Only meaningful for image uploads.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ElaReport {
    /// False for non-image uploads or when the image could not be decoded
    /// without error (see `error`).
    pub possible: bool,
    pub mean_diff: Option<f64>,
    pub max_diff: Option<u32>,
    pub flagged: bool,
    pub high_variance_regions: u32,
    pub error: Option<String>,
}

impl ElaReport {
    /// The record produced for non-image uploads.
    pub fn not_applicable() -> Self {
        Self::default()
    }
}

/// OCR-confidence-based font consistency result.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FontReport {
    pub available: bool,
    pub reason: Option<String>,
    pub consistent: bool,
    pub mean_confidence: f64,
    pub std_confidence: f64,
    pub word_count: u32,
    pub low_confidence_words: u32,
}

impl Default for FontReport {
    fn default() -> Self {
        Self {
            available: false,
            reason: None,
            consistent: true,
            mean_confidence: 0.0,
            std_confidence: 0.0,
            word_count: 0,
            low_confidence_words: 0,
        }
    }
}

impl FontReport {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            reason: Some(reason.into()),
            ..Self::default()
        }
    }
}

/// Document quality assessment. `score` is `None` for non-image uploads.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct QualityReport {
    /// 0-100; `None` when the check does not apply.
    pub score: Option<u32>,
    pub dpi: Option<f64>,
    pub moire_detected: bool,
    #[serde(default)]
    pub issues: Vec<String>,
}
