//! Statutory validation result records.
//!
//! `data_missing` is an explicit flag on every record: "the input was not
//! there to validate" must map to the `data_missing` check status, never
//! to a format failure.

use serde::{Deserialize, Serialize};

/// GSTIN (tax registration id) validation result.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct GstinValidation {
    pub is_valid: bool,
    pub data_missing: bool,
    /// The PAN embedded in characters 3..12 of a well-formed GSTIN.
    pub pan: Option<String>,
    pub entity_type: Option<String>,
    pub state_code: Option<String>,
    pub state_name: Option<String>,
    pub registration_status: Option<String>,
    #[serde(default)]
    pub alerts: Vec<String>,
}

/// PAN (permanent account number) validation result.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PanValidation {
    pub is_valid: bool,
    pub data_missing: bool,
    pub pan: Option<String>,
    pub entity_type: Option<String>,
    pub entity_code: Option<String>,
    #[serde(default)]
    pub alerts: Vec<String>,
}

/// HSN/SAC classification-code validation result.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct HsnValidation {
    pub is_valid: bool,
    pub data_missing: bool,
    pub code: Option<String>,
    /// "HSN" (goods) or "SAC" (services).
    pub code_type: Option<String>,
    pub expected_tax_rate: Option<f64>,
    pub claimed_tax_rate: Option<f64>,
    pub rate_match: bool,
    pub alert: Option<String>,
}

/// GST arithmetic verification over OCR-extracted amounts.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CalcVerification {
    pub verified: bool,
    pub data_missing: bool,
    /// "intra-state (CGST+SGST)" or "inter-state (IGST)".
    pub gst_type: Option<String>,
    pub taxable_amount: Option<f64>,
    pub computed_tax: Option<f64>,
    pub expected_total: Option<f64>,
    pub invoice_total: Option<f64>,
    pub variance: Option<f64>,
    pub reason: Option<String>,
    #[serde(default)]
    pub alerts: Vec<String>,
}

/// Invoice number format and sequence validation result.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct InvoiceNumberValidation {
    pub valid: bool,
    pub data_missing: bool,
    pub invoice_number: Option<String>,
    pub length: u32,
    pub historical_count: u32,
    /// Same number already seen for this vendor — a critical signal.
    pub duplicate_in_history: bool,
    #[serde(default)]
    pub alerts: Vec<String>,
}

/// IFSC and account-number format validation result.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct BankValidation {
    pub valid: bool,
    pub data_missing: bool,
    pub ifsc: Option<String>,
    pub account_number: Option<String>,
    #[serde(default)]
    pub alerts: Vec<String>,
}

/// E-invoice / IRN validation result.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct EInvoiceValidation {
    pub applicable: bool,
    pub irn_present: bool,
    pub data_missing: bool,
    pub irn: Option<String>,
    pub irn_length_valid: bool,
    pub alert: Option<String>,
    #[serde(default)]
    pub alerts: Vec<String>,
}
