//! The audit engine: upload validation, signal collection, check
//! evaluation and report assembly.
//!
//! One call to [`AuditEngine::run`] performs the whole pipeline:
//!
//! 1. Reject empty or oversized uploads (the only fatal errors).
//! 2. Collect every collaborator signal (forensics, OCR, statutory,
//!    duplicates, vendor history, analytics) into a [`CheckContext`].
//! 3. Evaluate all 26 catalog checks.
//! 4. Record the invoice into the vendor profile and persist it.
//!
//! All history analysis runs against the profile as it was *before* this
//! invoice; `record_invoice` is the single mutation point, applied after
//! evaluation inside [`ProfileStore::update`], so an invoice is never
//! compared against itself and concurrent audits of the same vendor
//! never lose a recorded invoice.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use invoiceguard_analytics::{
    detect_threshold_circumvention, AnomalyEngine, DistanceOutlierModel, OutlierModel,
    DEFAULT_THRESHOLDS,
};
use invoiceguard_duplicate::{DuplicateDetector, ImageHasher, UnavailableHasher};
use invoiceguard_forensic::{
    is_image_file, ByteInspector, ImageForensics, MetadataInspector, UnavailableForensics,
};
use invoiceguard_ocr::{extract_fields, NoopExtractor, TextExtractor};
use invoiceguard_statutory::{
    validate_gstin, validate_hsn_sac, validate_invoice_number, validate_pan,
    verify_gst_calculations,
};
use invoiceguard_types::{
    AuditArtifacts, AuditReport, BankValidation, CheckResult, CollusionReport, EInvoiceValidation,
    ElaReport, ExpenseCorrelation, FontReport, ImageDuplicate, InvoiceFeatures, PoGrnMatch,
    QualityReport, RiskFactors,
};
use invoiceguard_vendor::{
    address_consistency, frequency_patterns, pricing_variance, record_invoice,
    template_consistency, terms_variance, InvoiceObservation, ProfileStore, ProfileStoreError,
};

use crate::catalog::CATALOG;
use crate::context::CheckContext;
use crate::evaluate::evaluate;

/// Maximum accepted upload size in bytes.
pub const MAX_FILE_SIZE: usize = 20 * 1024 * 1024;

/// Placeholder alert when no check raised one.
pub const NO_ANOMALY_ALERT: &str = "No major anomalies detected.";

/// Fatal request errors. Everything past upload validation degrades into
/// per-check statuses instead of failing the audit.
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("uploaded file is empty")]
    EmptyFile,
    #[error("file too large ({size} bytes); maximum is {max} bytes")]
    FileTooLarge { size: usize, max: usize },
    #[error("vendor profile store failed: {0}")]
    Store(#[from] ProfileStoreError),
}

/// One audit request: the uploaded document plus caller-declared fields.
#[derive(Clone, Copy, Debug)]
pub struct AuditRequest<'a> {
    pub file_name: &'a str,
    pub bytes: &'a [u8],
    /// Vendor tax id declared by the submitter; falls back to the
    /// OCR-extracted one.
    pub gstin: Option<&'a str>,
    pub hsn_or_sac: Option<&'a str>,
    pub claimed_tax_rate: Option<f64>,
}

pub struct AuditEngine {
    extractor: Box<dyn TextExtractor>,
    inspector: Box<dyn MetadataInspector>,
    forensics: Box<dyn ImageForensics>,
    hasher: Box<dyn ImageHasher>,
    outlier_model: Option<Box<dyn OutlierModel>>,
    store: Arc<dyn ProfileStore>,
    duplicates: DuplicateDetector,
    anomalies: AnomalyEngine,
}

impl AuditEngine {
    /// Engine with the default collaborator set: byte-level metadata
    /// inspection and the distance outlier model, with text extraction,
    /// pixel forensics and image hashing stubbed out until a backend is
    /// injected.
    pub fn new(store: Arc<dyn ProfileStore>) -> Self {
        Self {
            extractor: Box::new(NoopExtractor),
            inspector: Box::new(ByteInspector),
            forensics: Box::new(UnavailableForensics),
            hasher: Box::new(UnavailableHasher),
            outlier_model: Some(Box::new(DistanceOutlierModel::new())),
            store,
            duplicates: DuplicateDetector::new(),
            anomalies: AnomalyEngine::new(),
        }
    }

    pub fn with_extractor(mut self, extractor: Box<dyn TextExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn with_forensics(mut self, forensics: Box<dyn ImageForensics>) -> Self {
        self.forensics = forensics;
        self
    }

    pub fn with_hasher(mut self, hasher: Box<dyn ImageHasher>) -> Self {
        self.hasher = hasher;
        self
    }

    pub fn with_outlier_model(mut self, model: Option<Box<dyn OutlierModel>>) -> Self {
        self.outlier_model = model;
        self
    }

    /// Run every check against one uploaded document and assemble the
    /// full report.
    pub fn run(&self, request: AuditRequest<'_>) -> Result<AuditReport, AuditError> {
        if request.bytes.is_empty() {
            return Err(AuditError::EmptyFile);
        }
        if request.bytes.len() > MAX_FILE_SIZE {
            return Err(AuditError::FileTooLarge {
                size: request.bytes.len(),
                max: MAX_FILE_SIZE,
            });
        }

        let declared_gstin = normalized(request.gstin);
        let hsn_or_sac = normalized(request.hsn_or_sac);
        let is_image = is_image_file(request.file_name);
        info!(
            file_name = request.file_name,
            size = request.bytes.len(),
            is_image,
            "audit started"
        );

        // Forensic signals. Pixel-level analysis applies to images only.
        let metadata = self.inspector.inspect(request.file_name, request.bytes);
        let ela = if is_image {
            self.forensics.error_level_analysis(request.bytes)
        } else {
            ElaReport::not_applicable()
        };
        let font_analysis = if is_image {
            self.forensics.font_consistency(request.bytes)
        } else {
            FontReport::default()
        };
        let quality = if is_image {
            self.forensics.quality(request.bytes)
        } else {
            QualityReport::default()
        };

        // Extraction and statutory validation.
        let ocr = extract_fields(self.extractor.as_ref(), request.file_name, request.bytes);
        let gstin = validate_gstin(declared_gstin.or(ocr.gstin.as_deref()));
        let pan = validate_pan(gstin.pan.as_deref());
        let hsn = validate_hsn_sac(hsn_or_sac, request.claimed_tax_rate);
        let gst_calc = verify_gst_calculations(&ocr);

        let vendor_id = declared_gstin
            .map(str::to_string)
            .or_else(|| ocr.gstin.clone())
            .unwrap_or_else(|| "unknown".to_string());
        let profile = self.store.load(&vendor_id);
        debug!(%vendor_id, prior_invoices = profile.invoices.len(), "vendor profile loaded");

        let invoice_number =
            validate_invoice_number(ocr.invoice_number.as_deref(), &profile.invoices);

        // The near-duplicate scan must run before the exact check, which
        // registers this invoice's identity on a miss.
        let near_dup = self.duplicates.check_near(
            Some(&vendor_id),
            ocr.invoice_number.as_deref(),
            ocr.invoice_date.as_deref(),
            ocr.total_amount,
        );
        let exact_dup = self.duplicates.check_exact(
            Some(&vendor_id),
            ocr.invoice_number.as_deref(),
            ocr.invoice_date.as_deref(),
            ocr.total_amount,
        );
        let image_dup = if is_image {
            self.duplicates
                .check_image(self.hasher.as_ref(), request.file_name, request.bytes)
        } else {
            ImageDuplicate {
                available: false,
                ..ImageDuplicate::default()
            }
        };
        let content_dup = self
            .duplicates
            .check_content(&ocr.raw_text, ocr.invoice_number.as_deref());

        // Vendor history signals, all against the pre-update profile.
        let template_phash = if is_image {
            self.hasher.hashes(request.bytes).map(|h| h.phash)
        } else {
            None
        };
        let template = template_consistency(&profile, template_phash.as_deref());
        let pricing = pricing_variance(&profile, &ocr.line_items);
        let frequency = frequency_patterns(&profile);
        // Address and terms are not yet extracted by the parser; the
        // checks report data-missing until a richer extractor is wired in.
        let address = address_consistency(&profile, None);
        let terms = terms_variance(&profile, None);

        // Analytics.
        let features = InvoiceFeatures {
            amount: ocr.total_amount.unwrap_or(0.0),
            line_item_count: ocr.line_items.len() as f64,
            tax_rate: request.claimed_tax_rate.unwrap_or(0.0),
            day_of_month: day_of_month(ocr.invoice_date.as_deref()),
        };
        let anomaly = self.anomalies.detect(features, self.outlier_model.as_deref());

        let risk_factors = RiskFactors {
            gstin_invalid: !gstin.is_valid,
            metadata_tampering: !metadata.suspicious_software.is_empty(),
            image_manipulation: ela.flagged,
            font_inconsistency: !font_analysis.consistent,
            low_document_quality: quality.score.unwrap_or(100) < 50,
            hsn_mismatch: !hsn.is_valid,
            calculation_error: !gst_calc.verified && !gst_calc.data_missing,
            duplicate_detected: exact_dup.is_duplicate || near_dup.is_duplicate,
            price_variance: pricing.variance_detected,
            statistical_anomaly: anomaly.is_anomaly,
        };
        let vendor_risk = invoiceguard_analytics::compute_vendor_risk_score(&risk_factors);

        let recent_amounts: Vec<f64> = profile
            .invoices
            .iter()
            .filter_map(|inv| inv.amount)
            .filter(|a| *a != 0.0)
            .collect();
        let threshold = detect_threshold_circumvention(
            ocr.total_amount.unwrap_or(0.0),
            &DEFAULT_THRESHOLDS,
            &recent_amounts,
        );

        let ctx = CheckContext {
            is_image,
            metadata,
            ela,
            font_analysis,
            quality,
            ocr: ocr.clone(),
            gstin,
            pan,
            hsn,
            gst_calc,
            invoice_number,
            bank: unavailable_bank_validation(),
            einvoice: unavailable_einvoice_validation(),
            template,
            pricing,
            frequency,
            address,
            terms,
            exact_dup,
            near_dup,
            po_grn: unavailable_po_grn(),
            image_dup,
            content_dup,
            vendor_risk,
            anomaly,
            expense: unavailable_expense_correlation(),
            collusion: unavailable_collusion(),
            threshold,
        };

        let checks: Vec<CheckResult> = CATALOG.iter().map(|defn| evaluate(defn, &ctx)).collect();

        // Single profile mutation, after all analysis. The store holds
        // its lock across the read-modify-write, so a parallel audit of
        // the same vendor cannot overwrite this record.
        let observation = InvoiceObservation {
            invoice_number: ocr.invoice_number.clone(),
            invoice_date: ocr.invoice_date.clone(),
            total_amount: ocr.total_amount,
            line_items: ocr.line_items.clone(),
            template_phash,
            address: None,
            terms: None,
        };
        self.store
            .update(&vendor_id, &mut |p| record_invoice(p, &observation))?;

        let composite_risk_score = compute_risk_score(&checks);
        let mut alerts = collect_alerts(&checks);
        if alerts.is_empty() {
            alerts.push(NO_ANOMALY_ALERT.to_string());
        }
        info!(
            %vendor_id,
            composite_risk_score,
            alert_count = alerts.len(),
            "audit complete"
        );

        Ok(AuditReport {
            audit_id: Uuid::new_v4(),
            file_name: request.file_name.to_string(),
            composite_risk_score,
            alerts,
            checks,
            artifacts: AuditArtifacts {
                metadata: ctx.metadata,
                ela: ctx.ela,
                font_analysis: ctx.font_analysis,
                document_quality: ctx.quality,
                ocr,
                gstin: ctx.gstin,
                pan: ctx.pan,
                hsn_sac: ctx.hsn,
                gst_calculation: ctx.gst_calc,
                vendor_risk: ctx.vendor_risk,
                anomaly_detection: ctx.anomaly,
            },
            created_at: Utc::now(),
        })
    }
}

/// Fixed status weights summed over all results, clamped to [0, 100].
pub fn compute_risk_score(checks: &[CheckResult]) -> u32 {
    checks
        .iter()
        .map(|c| c.status.weight())
        .sum::<u32>()
        .min(100)
}

/// Every raised alert, prefixed with its check id.
pub fn collect_alerts(checks: &[CheckResult]) -> Vec<String> {
    checks
        .iter()
        .filter_map(|c| c.alert.as_ref().map(|a| format!("[{}] {}", c.check_id, a)))
        .collect()
}

fn normalized(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

/// Day-of-month feature from the extracted invoice date, defaulting to
/// mid-month when the date is absent or unparseable.
fn day_of_month(date: Option<&str>) -> f64 {
    let date = match date {
        Some(d) => d.trim(),
        None => return 15.0,
    };
    for fmt in ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y"] {
        if let Ok(parsed) = NaiveDate::parse_from_str(date, fmt) {
            return chrono::Datelike::day(&parsed) as f64;
        }
    }
    15.0
}

// Signals that need ERP or vendor-master integration report data-missing
// until those feeds exist.

fn unavailable_po_grn() -> PoGrnMatch {
    PoGrnMatch {
        matched: false,
        data_missing: true,
        reason: Some("Data Missing: PO/GRN data requires ERP integration.".to_string()),
        ..PoGrnMatch::default()
    }
}

fn unavailable_expense_correlation() -> ExpenseCorrelation {
    ExpenseCorrelation {
        correlated: false,
        data_missing: true,
        reason: Some("Data Missing: Expense/activity data requires ERP integration.".to_string()),
        ..ExpenseCorrelation::default()
    }
}

fn unavailable_collusion() -> CollusionReport {
    CollusionReport {
        data_missing: true,
        reason: Some("Data Missing: Multi-vendor analysis requires vendor master.".to_string()),
        ..CollusionReport::default()
    }
}

fn unavailable_bank_validation() -> BankValidation {
    BankValidation {
        data_missing: true,
        alerts: vec!["Data Missing: Bank details not extracted from invoice.".to_string()],
        ..BankValidation::default()
    }
}

fn unavailable_einvoice_validation() -> EInvoiceValidation {
    EInvoiceValidation {
        data_missing: true,
        alert: Some("Data Missing: IRN/QR not extracted from invoice.".to_string()),
        ..EInvoiceValidation::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use invoiceguard_types::CheckStatus;
    use invoiceguard_vendor::InMemoryProfileStore;
    use proptest::prelude::*;

    struct FixedText(String);

    impl TextExtractor for FixedText {
        fn name(&self) -> &str {
            "fixed"
        }

        fn extract_text(&self, _file_name: &str, _bytes: &[u8]) -> Option<String> {
            Some(self.0.clone())
        }
    }

    const INVOICE_TEXT: &str = "Acme Supplies Pvt Ltd\n\
        GSTIN: 27AAPFU0939F1ZV\n\
        Invoice No: INV-2024-001\n\
        Date: 15/01/2024\n\
        Taxable Value: 1000.00\n\
        CGST @ 9%: 90.00\n\
        SGST @ 9%: 90.00\n\
        Grand Total: 1180.00\n";

    fn engine() -> AuditEngine {
        AuditEngine::new(Arc::new(InMemoryProfileStore::new()))
            .with_extractor(Box::new(FixedText(INVOICE_TEXT.to_string())))
    }

    fn pdf_request(name: &'static str) -> AuditRequest<'static> {
        AuditRequest {
            file_name: name,
            bytes: b"%PDF-1.4 content %%EOF",
            gstin: None,
            hsn_or_sac: None,
            claimed_tax_rate: None,
        }
    }

    #[test]
    fn empty_upload_is_rejected() {
        let engine = engine();
        let request = AuditRequest {
            bytes: b"",
            ..pdf_request("a.pdf")
        };
        assert!(matches!(engine.run(request), Err(AuditError::EmptyFile)));
    }

    #[test]
    fn oversized_upload_is_rejected() {
        let engine = engine();
        let bytes = vec![0u8; MAX_FILE_SIZE + 1];
        let request = AuditRequest {
            bytes: &bytes,
            ..pdf_request("a.pdf")
        };
        assert!(matches!(
            engine.run(request),
            Err(AuditError::FileTooLarge { .. })
        ));
    }

    #[test]
    fn report_carries_all_twenty_six_checks_in_order() {
        let report = engine().run(pdf_request("invoice.pdf")).unwrap();
        assert_eq!(report.checks.len(), 26);
        let ids: Vec<&str> = report.checks.iter().map(|c| c.check_id.as_str()).collect();
        let expected: Vec<&str> = CATALOG.iter().map(|d| d.id).collect();
        assert_eq!(ids, expected);
        assert!(report.composite_risk_score <= 100);
    }

    #[test]
    fn image_only_checks_gated_for_pdf_uploads() {
        let report = engine().run(pdf_request("invoice.pdf")).unwrap();
        for id in ["1.2", "1.4", "3.1", "4.4"] {
            let check = report.checks.iter().find(|c| c.check_id == id).unwrap();
            assert_eq!(check.status, CheckStatus::NotApplicable, "check {id}");
        }
    }

    #[test]
    fn first_submission_is_not_its_own_duplicate() {
        let report = engine().run(pdf_request("invoice.pdf")).unwrap();
        let exact = report.checks.iter().find(|c| c.check_id == "4.1").unwrap();
        let near = report.checks.iter().find(|c| c.check_id == "4.2").unwrap();
        assert_eq!(exact.status, CheckStatus::Pass);
        assert_eq!(near.status, CheckStatus::Pass);
    }

    #[test]
    fn resubmission_is_an_exact_duplicate() {
        let engine = engine();
        engine.run(pdf_request("invoice.pdf")).unwrap();
        let second = engine.run(pdf_request("invoice.pdf")).unwrap();
        let exact = second.checks.iter().find(|c| c.check_id == "4.1").unwrap();
        assert_eq!(exact.status, CheckStatus::Fail);
        let content = second.checks.iter().find(|c| c.check_id == "4.5").unwrap();
        assert_eq!(content.status, CheckStatus::Warning);
    }

    #[test]
    fn audit_records_the_invoice_into_the_vendor_profile() {
        let store = Arc::new(InMemoryProfileStore::new());
        let engine = AuditEngine::new(store.clone())
            .with_extractor(Box::new(FixedText(INVOICE_TEXT.to_string())));
        engine.run(pdf_request("invoice.pdf")).unwrap();
        let profile = store.load("27AAPFU0939F1ZV");
        assert_eq!(profile.invoices.len(), 1);
        assert_eq!(
            profile.invoices[0].invoice_number.as_deref(),
            Some("INV-2024-001")
        );
    }

    /// Delays every profile load until two audits have reached it, so
    /// both pipelines run from the same profile snapshot.
    struct RendezvousStore {
        inner: Arc<InMemoryProfileStore>,
        gate: std::sync::Barrier,
    }

    impl ProfileStore for RendezvousStore {
        fn load(&self, vendor_id: &str) -> invoiceguard_types::VendorProfile {
            self.gate.wait();
            self.inner.load(vendor_id)
        }

        fn save(
            &self,
            profile: &invoiceguard_types::VendorProfile,
        ) -> Result<(), ProfileStoreError> {
            self.inner.save(profile)
        }

        fn update(
            &self,
            vendor_id: &str,
            apply: &mut dyn FnMut(&mut invoiceguard_types::VendorProfile),
        ) -> Result<(), ProfileStoreError> {
            self.inner.update(vendor_id, apply)
        }
    }

    #[test]
    fn parallel_audits_of_one_vendor_record_both_invoices() {
        let inner = Arc::new(InMemoryProfileStore::new());
        let store = Arc::new(RendezvousStore {
            inner: inner.clone(),
            gate: std::sync::Barrier::new(2),
        });
        let engine_a = AuditEngine::new(store.clone())
            .with_extractor(Box::new(FixedText(INVOICE_TEXT.to_string())));
        let engine_b = AuditEngine::new(store).with_extractor(Box::new(FixedText(
            INVOICE_TEXT.replace("INV-2024-001", "INV-2024-002"),
        )));

        std::thread::scope(|s| {
            s.spawn(|| engine_a.run(pdf_request("a.pdf")).unwrap());
            s.spawn(|| engine_b.run(pdf_request("b.pdf")).unwrap());
        });

        let profile = inner.load("27AAPFU0939F1ZV");
        assert_eq!(profile.invoices.len(), 2);
    }

    #[test]
    fn declared_gstin_overrides_extracted_one() {
        let store = Arc::new(InMemoryProfileStore::new());
        let engine = AuditEngine::new(store.clone())
            .with_extractor(Box::new(FixedText(INVOICE_TEXT.to_string())));
        let request = AuditRequest {
            gstin: Some("29AAGCB7383J1Z4"),
            ..pdf_request("invoice.pdf")
        };
        engine.run(request).unwrap();
        assert_eq!(store.load("29AAGCB7383J1Z4").invoices.len(), 1);
        assert_eq!(store.load("27AAPFU0939F1ZV").invoices.len(), 0);
    }

    #[test]
    fn unreadable_text_falls_back_to_data_missing_statuses() {
        let engine = AuditEngine::new(Arc::new(InMemoryProfileStore::new()));
        let report = engine.run(pdf_request("scan.pdf")).unwrap();
        let gstin = report.checks.iter().find(|c| c.check_id == "2.1").unwrap();
        assert_eq!(gstin.status, CheckStatus::DataMissing);
        let exact = report.checks.iter().find(|c| c.check_id == "4.1").unwrap();
        assert_eq!(exact.status, CheckStatus::DataMissing);
        assert!(!report.alerts.is_empty());
    }

    #[test]
    fn alert_lines_are_prefixed_with_check_ids() {
        let report = engine().run(pdf_request("invoice.pdf")).unwrap();
        for alert in &report.alerts {
            assert!(alert.starts_with('['), "unprefixed alert: {alert}");
        }
    }

    #[test]
    fn day_of_month_parses_common_formats() {
        assert_eq!(day_of_month(Some("2024-01-07")), 7.0);
        assert_eq!(day_of_month(Some("07/01/2024")), 7.0);
        assert_eq!(day_of_month(Some("garbled")), 15.0);
        assert_eq!(day_of_month(None), 15.0);
    }

    proptest! {
        #[test]
        fn any_nonempty_upload_yields_a_bounded_report(
            bytes in proptest::collection::vec(any::<u8>(), 1..512),
            name_idx in 0usize..4,
        ) {
            let names = ["a.pdf", "b.jpg", "c.png", "d.txt"];
            let engine = AuditEngine::new(Arc::new(InMemoryProfileStore::new()));
            let report = engine.run(AuditRequest {
                file_name: names[name_idx],
                bytes: &bytes,
                gstin: None,
                hsn_or_sac: None,
                claimed_tax_rate: None,
            }).unwrap();
            prop_assert_eq!(report.checks.len(), 26);
            prop_assert!(report.composite_risk_score <= 100);
            prop_assert!(!report.alerts.is_empty());
        }
    }
}
