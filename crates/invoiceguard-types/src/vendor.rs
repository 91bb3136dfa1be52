//! Vendor profile records and pattern-analysis verdicts.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One historical invoice observation for a vendor.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InvoiceRecord {
    pub invoice_number: Option<String>,
    pub date: Option<String>,
    pub amount: Option<f64>,
    pub timestamp: DateTime<Utc>,
}

/// Payment/warranty terms snapshot.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermsSnapshot {
    pub payment_days: Option<u32>,
    pub warranty_months: Option<u32>,
}

/// Persisted per-vendor history used as the comparison baseline for all
/// drift and variance analysis.
///
/// Lifecycle: created empty on first sight of a vendor id, appended to by
/// every subsequent audit, never deleted. The invoice list is append-only;
/// price lists per description key only grow.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VendorProfile {
    pub vendor_id: String,
    #[serde(default)]
    pub invoices: Vec<InvoiceRecord>,
    /// Perceptual template hashes, capped at the most recent 20.
    #[serde(default)]
    pub template_hashes: Vec<String>,
    /// Unit price history keyed by normalized line-item description.
    #[serde(default)]
    pub prices: BTreeMap<String, Vec<f64>>,
    /// Distinct address strings seen, in first-seen order.
    #[serde(default)]
    pub addresses: Vec<String>,
    #[serde(default)]
    pub terms: Vec<TermsSnapshot>,
}

impl VendorProfile {
    /// The empty skeleton created on first sight of a vendor id.
    pub fn empty(vendor_id: impl Into<String>) -> Self {
        Self {
            vendor_id: vendor_id.into(),
            invoices: Vec::new(),
            template_hashes: Vec::new(),
            prices: BTreeMap::new(),
            addresses: Vec::new(),
            terms: Vec::new(),
        }
    }
}

/// Template consistency verdict (check 3.1).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TemplateConsistency {
    pub available: bool,
    pub reason: Option<String>,
    /// First invoice from this vendor established the baseline.
    pub is_baseline: bool,
    pub template_match: bool,
    /// `max(0, 100 - hamming_distance * 3)`.
    pub match_score: u32,
    pub hamming_distance: Option<u32>,
    pub baseline_count: u32,
    #[serde(default)]
    pub alerts: Vec<String>,
}

impl Default for TemplateConsistency {
    fn default() -> Self {
        Self {
            available: true,
            reason: None,
            is_baseline: false,
            template_match: true,
            match_score: 100,
            hamming_distance: None,
            baseline_count: 0,
            alerts: Vec::new(),
        }
    }
}

impl TemplateConsistency {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            available: false,
            reason: Some(reason.into()),
            ..Self::default()
        }
    }
}

/// Direction of the last three observed prices for an item.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceTrend {
    Increasing,
    Decreasing,
    #[default]
    Stable,
}

/// Per-item pricing evidence for check 3.2.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PricedItem {
    pub description: String,
    pub current_price: f64,
    pub historical_avg: f64,
    pub variance_pct: f64,
    pub last_price: f64,
    pub trend: PriceTrend,
    /// More than two standard deviations from the historical mean.
    pub outlier: bool,
}

/// Pricing variance verdict (check 3.2).
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PricingVariance {
    pub variance_detected: bool,
    pub items_checked: u32,
    pub reason: Option<String>,
    #[serde(default)]
    pub item_details: Vec<PricedItem>,
    #[serde(default)]
    pub alerts: Vec<String>,
}

/// Frequency and amount pattern verdict (check 3.3).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FrequencyPattern {
    pub pattern_normal: bool,
    pub invoice_count: u32,
    pub avg_amount: f64,
    pub reason: Option<String>,
    #[serde(default)]
    pub alerts: Vec<String>,
}

impl Default for FrequencyPattern {
    fn default() -> Self {
        Self {
            pattern_normal: true,
            invoice_count: 0,
            avg_amount: 0.0,
            reason: None,
            alerts: Vec::new(),
        }
    }
}

/// Address consistency verdict (check 3.4).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AddressConsistency {
    pub consistent: bool,
    pub data_missing: bool,
    pub match_score: u32,
    pub stored_addresses: u32,
    pub reason: Option<String>,
    #[serde(default)]
    pub alerts: Vec<String>,
}

impl Default for AddressConsistency {
    fn default() -> Self {
        Self {
            consistent: true,
            data_missing: false,
            match_score: 100,
            stored_addresses: 0,
            reason: None,
            alerts: Vec::new(),
        }
    }
}

/// Terms & conditions variance verdict (check 3.5).
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TermsVariance {
    pub variance_detected: bool,
    pub data_missing: bool,
    pub reason: Option<String>,
    #[serde(default)]
    pub alerts: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_profile_skeleton() {
        let p = VendorProfile::empty("27AAPFU0939F1ZV");
        assert_eq!(p.vendor_id, "27AAPFU0939F1ZV");
        assert!(p.invoices.is_empty());
        assert!(p.prices.is_empty());
    }

    #[test]
    fn profile_roundtrips_through_json() {
        let mut p = VendorProfile::empty("v1");
        p.prices.insert("widget".into(), vec![10.0, 11.0]);
        let json = serde_json::to_string(&p).unwrap();
        let back: VendorProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(back.prices["widget"], vec![10.0, 11.0]);
    }
}
