//! # invoiceguard-types
//!
//! Shared data model for the InvoiceGuard fraud triage engine:
//!
//! - The fixed check catalog records (`CheckDefinition`, `CheckResult`,
//!   `CheckStatus`) and the audit report envelope
//! - Collaborator signal records (forensic, OCR, statutory) with their
//!   explicit `available` / `data_missing` escape hatches
//! - Detector verdicts (duplicate, vendor pattern, analytics)
//! - The persisted `VendorProfile` and its sub-records
//!
//! Every record here is serde-serializable; the audit report is persisted
//! and exported as its serialized form, so field names are part of the
//! external contract.

pub mod analytics;
pub mod check;
pub mod duplicate;
pub mod forensic;
pub mod ocr;
pub mod statutory;
pub mod vendor;

pub use analytics::{
    AnomalyReport, BenfordReport, CollusionReport, ExpenseCorrelation, InvoiceFeatures,
    OutlierModelReport, PoGrnMatch, RiskFactors, RiskLevel, ThresholdProximity, ThresholdReport,
    VendorLink, VendorRiskReport, ZScoreReport,
};
pub use check::{
    AuditArtifacts, AuditReport, CheckCategory, CheckDefinition, CheckResult, CheckStatus,
};
pub use duplicate::{ContentDuplicate, ExactDuplicate, ImageDuplicate, NearDuplicate};
pub use forensic::{ElaReport, FontReport, MetadataReport, QualityReport};
pub use ocr::{LineItem, OcrFields};
pub use statutory::{
    BankValidation, CalcVerification, EInvoiceValidation, GstinValidation, HsnValidation,
    InvoiceNumberValidation, PanValidation,
};
pub use vendor::{
    AddressConsistency, FrequencyPattern, InvoiceRecord, PriceTrend, PricedItem, PricingVariance,
    TemplateConsistency, TermsSnapshot, TermsVariance, VendorProfile,
};
