//! Analytics and anomaly-scoring records.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The numeric feature vector accumulated per audit for the statistical
/// anomaly detectors.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct InvoiceFeatures {
    pub amount: f64,
    pub line_item_count: f64,
    pub tax_rate: f64,
    pub day_of_month: f64,
}

impl InvoiceFeatures {
    pub const NAMES: [&'static str; 4] = ["amount", "line_item_count", "tax_rate", "day_of_month"];

    pub fn as_array(&self) -> [f64; 4] {
        [
            self.amount,
            self.line_item_count,
            self.tax_rate,
            self.day_of_month,
        ]
    }
}

/// The ten boolean factors feeding the vendor risk composite.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct RiskFactors {
    pub gstin_invalid: bool,
    pub metadata_tampering: bool,
    pub image_manipulation: bool,
    pub font_inconsistency: bool,
    pub low_document_quality: bool,
    pub hsn_mismatch: bool,
    pub calculation_error: bool,
    pub duplicate_detected: bool,
    pub price_variance: bool,
    pub statistical_anomaly: bool,
}

/// Risk band derived from the composite score.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    /// Band boundaries: <=30 Low, <=60 Medium, <=80 High, else Critical.
    pub fn from_score(score: f64) -> Self {
        if score <= 30.0 {
            RiskLevel::Low
        } else if score <= 60.0 {
            RiskLevel::Medium
        } else if score <= 80.0 {
            RiskLevel::High
        } else {
            RiskLevel::Critical
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
            RiskLevel::Critical => "Critical",
        }
    }

    pub fn recommended_action(self) -> &'static str {
        match self {
            RiskLevel::Low => "Auto-approve",
            RiskLevel::Medium => "Manual review recommended",
            RiskLevel::High => "Hold payment for review",
            RiskLevel::Critical => "Block vendor - immediate investigation",
        }
    }
}

/// Weighted vendor risk composite (check 5.1).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VendorRiskReport {
    /// Clamped to [0, 100].
    pub risk_score: f64,
    pub risk_level: RiskLevel,
    pub recommended_action: String,
    /// Top contributing factors by weight, at most five.
    #[serde(default)]
    pub top_risk_factors: Vec<String>,
    pub factor_count: u32,
}

impl Default for VendorRiskReport {
    fn default() -> Self {
        Self {
            risk_score: 0.0,
            risk_level: RiskLevel::Low,
            recommended_action: RiskLevel::Low.recommended_action().to_string(),
            top_risk_factors: Vec::new(),
            factor_count: 0,
        }
    }
}

/// Per-feature z-score analysis against the training population.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ZScoreReport {
    /// Requires at least 3 prior samples.
    pub available: bool,
    pub is_outlier: bool,
    #[serde(default)]
    pub z_scores: BTreeMap<String, f64>,
    #[serde(default)]
    pub outlier_features: Vec<String>,
}

/// Model-based ensemble outlier verdict.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct OutlierModelReport {
    /// Requires at least 10 training samples and an injected model.
    pub available: bool,
    pub is_anomaly: bool,
    pub score: f64,
}

/// Benford's-law first-digit distribution test over historical amounts.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BenfordReport {
    /// Requires at least 20 positive historical amounts.
    pub available: bool,
    /// Fail-open: true whenever the test could not run.
    pub benford_pass: bool,
    pub chi_squared: Option<f64>,
    /// Observed first-digit frequencies, keyed "1".."9".
    #[serde(default)]
    pub observed_distribution: BTreeMap<String, f64>,
    pub sample_size: u32,
    pub reason: Option<String>,
}

impl Default for BenfordReport {
    fn default() -> Self {
        Self {
            available: false,
            benford_pass: true,
            chi_squared: None,
            observed_distribution: BTreeMap::new(),
            sample_size: 0,
            reason: None,
        }
    }
}

/// Combined statistical anomaly verdict (check 5.2).
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AnomalyReport {
    pub is_anomaly: bool,
    /// 0-100, scaled from `confidence`.
    pub anomaly_score: f64,
    /// 0-1: 0.4 z-score + 0.4 model + 0.2 Benford.
    pub confidence: f64,
    #[serde(default)]
    pub anomaly_factors: Vec<String>,
    pub z_score: ZScoreReport,
    pub outlier_model: OutlierModelReport,
    pub benford: BenfordReport,
    pub training_samples: u32,
}

/// One near-threshold observation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ThresholdProximity {
    pub threshold: f64,
    /// Percentage of the threshold this amount sits at, within [90, 100).
    pub percentage: f64,
}

/// Approval-threshold circumvention verdict (check 5.5).
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ThresholdReport {
    #[serde(default)]
    pub threshold_proximity: Vec<ThresholdProximity>,
    pub split_detected: bool,
    /// Number of invoices implicated in a detected splitting pattern.
    pub split_invoice_count: u32,
    pub round_number_flag: bool,
    #[serde(default)]
    pub alerts: Vec<String>,
    pub pattern_score: u32,
}

/// Shared-attribute relationship between two vendors.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VendorLink {
    /// "same_address", "same_bank_account" or "same_phone".
    pub kind: String,
    pub vendors: String,
}

/// Multi-vendor collusion verdict (check 5.4).
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CollusionReport {
    pub collusion_detected: bool,
    pub data_missing: bool,
    pub collusion_score: u32,
    #[serde(default)]
    pub relationships: Vec<VendorLink>,
    #[serde(default)]
    pub alerts: Vec<String>,
    pub vendors_analyzed: u32,
    pub reason: Option<String>,
}

/// Invoice-expense correlation verdict (check 5.3).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExpenseCorrelation {
    pub correlated: bool,
    pub data_missing: bool,
    pub category: Option<String>,
    pub amount: Option<f64>,
    pub reason: Option<String>,
    #[serde(default)]
    pub alerts: Vec<String>,
}

impl Default for ExpenseCorrelation {
    fn default() -> Self {
        Self {
            correlated: true,
            data_missing: false,
            category: None,
            amount: None,
            reason: None,
            alerts: Vec::new(),
        }
    }
}

/// PO/GRN three-way match verdict (check 4.3).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PoGrnMatch {
    pub matched: bool,
    pub data_missing: bool,
    pub po_total: Option<f64>,
    pub grn_total: Option<f64>,
    pub invoice_total: Option<f64>,
    pub reason: Option<String>,
    #[serde(default)]
    pub alerts: Vec<String>,
}

impl Default for PoGrnMatch {
    fn default() -> Self {
        Self {
            matched: true,
            data_missing: false,
            po_total: None,
            grn_total: None,
            invoice_total: None,
            reason: None,
            alerts: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn risk_bands() {
        assert_eq!(RiskLevel::from_score(0.0), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(30.0), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(30.1), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(60.0), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(80.0), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(80.1), RiskLevel::Critical);
    }

    #[test]
    fn feature_names_align_with_array() {
        let f = InvoiceFeatures {
            amount: 1.0,
            line_item_count: 2.0,
            tax_rate: 3.0,
            day_of_month: 4.0,
        };
        assert_eq!(f.as_array(), [1.0, 2.0, 3.0, 4.0]);
        assert_eq!(InvoiceFeatures::NAMES.len(), 4);
    }
}
