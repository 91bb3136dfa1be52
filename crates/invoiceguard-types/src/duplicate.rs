//! Duplicate detector verdict records.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Exact duplicate verdict (composite identity hash match).
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ExactDuplicate {
    pub is_duplicate: bool,
    /// Set when no invoice number was available to build the identity.
    pub data_missing: bool,
    pub similarity_score: f64,
    pub matching_invoice: Option<String>,
    pub original_date: Option<String>,
    /// Identity hash stored for this invoice (hex).
    pub hash: Option<String>,
    pub alert: Option<String>,
}

/// Near-duplicate (weighted fuzzy similarity) verdict.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NearDuplicate {
    pub available: bool,
    pub reason: Option<String>,
    pub data_missing: bool,
    pub is_duplicate: bool,
    /// Best weighted similarity found across all prior records, 0 when the
    /// registry is empty.
    pub best_similarity: f64,
    pub matching_invoice: Option<String>,
    /// Per-signal similarity components of the best match.
    #[serde(default)]
    pub components: BTreeMap<String, f64>,
    pub alert: Option<String>,
}

impl Default for NearDuplicate {
    fn default() -> Self {
        Self {
            available: true,
            reason: None,
            data_missing: false,
            is_duplicate: false,
            best_similarity: 0.0,
            matching_invoice: None,
            components: BTreeMap::new(),
            alert: None,
        }
    }
}

/// Perceptual image hash duplicate verdict.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ImageDuplicate {
    pub available: bool,
    pub reason: Option<String>,
    pub is_duplicate: bool,
    pub hamming_distance: Option<u32>,
    /// Coarse modification label: "exact same image", "minor edits
    /// (brightness/crop)" or "identical".
    pub modification: Option<String>,
    pub matching_file: Option<String>,
    pub phash: Option<String>,
    pub dhash: Option<String>,
    pub alert: Option<String>,
}

impl Default for ImageDuplicate {
    fn default() -> Self {
        Self {
            available: true,
            reason: None,
            is_duplicate: false,
            hamming_distance: None,
            modification: None,
            matching_file: None,
            phash: None,
            dhash: None,
            alert: None,
        }
    }
}

impl ImageDuplicate {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            available: false,
            reason: Some(reason.into()),
            ..Self::default()
        }
    }
}

/// OCR text content duplicate verdict.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ContentDuplicate {
    pub available: bool,
    pub reason: Option<String>,
    pub is_duplicate: bool,
    /// "content" (cosine similarity) or "content-exact" (hash fallback).
    pub duplicate_type: Option<String>,
    pub best_similarity: f64,
    pub matching_invoice: Option<String>,
    pub corpus_size: u32,
    pub alert: Option<String>,
}

impl Default for ContentDuplicate {
    fn default() -> Self {
        Self {
            available: true,
            reason: None,
            is_duplicate: false,
            duplicate_type: None,
            best_similarity: 0.0,
            matching_invoice: None,
            corpus_size: 0,
            alert: None,
        }
    }
}

impl ContentDuplicate {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            available: false,
            reason: Some(reason.into()),
            ..Self::default()
        }
    }
}
