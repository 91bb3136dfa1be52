//! Check catalog records and the audit report envelope.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analytics::{AnomalyReport, VendorRiskReport};
use crate::forensic::{ElaReport, FontReport, MetadataReport, QualityReport};
use crate::ocr::OcrFields;
use crate::statutory::{CalcVerification, GstinValidation, HsnValidation, PanValidation};

/// Outcome status of a single check.
///
/// `DataMissing` is deliberately distinct from `Fail`: a check that could
/// not run for lack of input must never be reported as passed *or* failed.
/// `NotApplicable` means the check's precondition (e.g. "upload is an
/// image") was not met.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    Pass,
    Fail,
    Warning,
    DataMissing,
    NotApplicable,
}

impl CheckStatus {
    /// Contribution of this status to the composite risk score.
    ///
    /// The weight table is fixed: fail=15, warning=8, data_missing=3,
    /// pass and not_applicable contribute nothing.
    pub fn weight(self) -> u32 {
        match self {
            CheckStatus::Fail => 15,
            CheckStatus::Warning => 8,
            CheckStatus::DataMissing => 3,
            CheckStatus::Pass | CheckStatus::NotApplicable => 0,
        }
    }
}

/// The five fixed check categories.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CheckCategory {
    #[serde(rename = "Metadata & Image Integrity")]
    MetadataIntegrity,
    #[serde(rename = "Statutory Validation")]
    StatutoryValidation,
    #[serde(rename = "Vendor History Analysis")]
    VendorHistory,
    #[serde(rename = "Duplicate Detection")]
    DuplicateDetection,
    #[serde(rename = "Advanced Analytics")]
    AdvancedAnalytics,
}

impl CheckCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            CheckCategory::MetadataIntegrity => "Metadata & Image Integrity",
            CheckCategory::StatutoryValidation => "Statutory Validation",
            CheckCategory::VendorHistory => "Vendor History Analysis",
            CheckCategory::DuplicateDetection => "Duplicate Detection",
            CheckCategory::AdvancedAnalytics => "Advanced Analytics",
        }
    }
}

/// One immutable entry of the fixed 26-check catalog.
///
/// Instances live in a `const` array in `invoiceguard-audit` and are never
/// constructed at runtime.
#[derive(Clone, Copy, Debug)]
pub struct CheckDefinition {
    /// Dotted major.minor id, e.g. "4.2".
    pub id: &'static str,
    pub category: CheckCategory,
    pub name: &'static str,
    /// Human explanation of why this check matters.
    pub risk_indicator: &'static str,
}

/// Result of evaluating one catalog check against one audit context.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CheckResult {
    pub check_id: String,
    pub category: CheckCategory,
    pub check_name: String,
    pub status: CheckStatus,
    /// Human-readable alert; `None` when the check found nothing to report.
    pub alert: Option<String>,
    pub risk_indicator: String,
    /// Open key-value bag of the signal evidence behind the verdict.
    #[serde(default)]
    pub details: serde_json::Value,
}

impl CheckResult {
    /// Build a result from a catalog definition plus the evaluated verdict.
    pub fn new(
        definition: &CheckDefinition,
        status: CheckStatus,
        alert: Option<String>,
        details: serde_json::Value,
    ) -> Self {
        Self {
            check_id: definition.id.to_string(),
            category: definition.category,
            check_name: definition.name.to_string(),
            status,
            alert,
            risk_indicator: definition.risk_indicator.to_string(),
            details,
        }
    }
}

/// Raw collaborator outputs re-exposed for persistence and export.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AuditArtifacts {
    pub metadata: MetadataReport,
    pub ela: ElaReport,
    pub font_analysis: FontReport,
    pub document_quality: QualityReport,
    pub ocr: OcrFields,
    pub gstin: GstinValidation,
    pub pan: PanValidation,
    pub hsn_sac: HsnValidation,
    pub gst_calculation: CalcVerification,
    pub vendor_risk: VendorRiskReport,
    pub anomaly_detection: AnomalyReport,
}

/// The complete response for one audit: exactly 26 check results, a
/// bounded composite score, the alert list, and the artifact bundle.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AuditReport {
    pub audit_id: Uuid,
    pub file_name: String,
    /// Always within [0, 100].
    pub composite_risk_score: u32,
    pub alerts: Vec<String>,
    pub checks: Vec<CheckResult>,
    pub artifacts: AuditArtifacts,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_weights_match_fixed_table() {
        assert_eq!(CheckStatus::Fail.weight(), 15);
        assert_eq!(CheckStatus::Warning.weight(), 8);
        assert_eq!(CheckStatus::DataMissing.weight(), 3);
        assert_eq!(CheckStatus::Pass.weight(), 0);
        assert_eq!(CheckStatus::NotApplicable.weight(), 0);
    }

    #[test]
    fn status_serializes_snake_case() {
        let s = serde_json::to_string(&CheckStatus::DataMissing).unwrap();
        assert_eq!(s, "\"data_missing\"");
        let s = serde_json::to_string(&CheckStatus::NotApplicable).unwrap();
        assert_eq!(s, "\"not_applicable\"");
    }

    #[test]
    fn category_serializes_display_name() {
        let s = serde_json::to_string(&CheckCategory::MetadataIntegrity).unwrap();
        assert_eq!(s, "\"Metadata & Image Integrity\"");
    }
}
