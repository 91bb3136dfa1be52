//! The evaluation context: every collaborator verdict gathered for one
//! upload, in one place, before any check rule runs.

use invoiceguard_types::{
    AddressConsistency, AnomalyReport, BankValidation, CalcVerification, CollusionReport,
    ContentDuplicate, EInvoiceValidation, ElaReport, ExactDuplicate, ExpenseCorrelation,
    FontReport, FrequencyPattern, GstinValidation, HsnValidation, ImageDuplicate,
    InvoiceNumberValidation, MetadataReport, NearDuplicate, OcrFields, PanValidation, PoGrnMatch,
    PricingVariance, QualityReport, TemplateConsistency, TermsVariance, ThresholdReport,
    VendorRiskReport,
};

/// Snapshot of all signals for one audited upload.
///
/// Built once by the engine, read by all 26 check rules. `is_image`
/// drives the `not_applicable` gating of the image-only checks.
#[derive(Clone, Debug)]
pub struct CheckContext {
    pub is_image: bool,
    pub metadata: MetadataReport,
    pub ela: ElaReport,
    pub font_analysis: FontReport,
    pub quality: QualityReport,
    pub ocr: OcrFields,
    pub gstin: GstinValidation,
    pub pan: PanValidation,
    pub hsn: HsnValidation,
    pub gst_calc: CalcVerification,
    pub invoice_number: InvoiceNumberValidation,
    pub bank: BankValidation,
    pub einvoice: EInvoiceValidation,
    pub template: TemplateConsistency,
    pub pricing: PricingVariance,
    pub frequency: FrequencyPattern,
    pub address: AddressConsistency,
    pub terms: TermsVariance,
    pub exact_dup: ExactDuplicate,
    pub near_dup: NearDuplicate,
    pub po_grn: PoGrnMatch,
    pub image_dup: ImageDuplicate,
    pub content_dup: ContentDuplicate,
    pub vendor_risk: VendorRiskReport,
    pub anomaly: AnomalyReport,
    pub expense: ExpenseCorrelation,
    pub collusion: CollusionReport,
    pub threshold: ThresholdReport,
}
