//! Structured fields extracted from invoice text.

use serde::{Deserialize, Serialize};

/// One invoice line item as parsed from the document body.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub description: String,
    pub quantity: Option<f64>,
    /// Unit price.
    pub rate: Option<f64>,
    /// Line total (quantity x rate on a well-formed invoice).
    pub amount: Option<f64>,
}

/// Everything the text-extraction collaborator produced for one document.
///
/// Fields are `None` when the corresponding value could not be located in
/// the raw text; downstream checks must treat absence as data-missing,
/// never as a pass.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct OcrFields {
    pub raw_text: String,
    pub invoice_number: Option<String>,
    pub invoice_date: Option<String>,
    pub vendor_name: Option<String>,
    pub gstin: Option<String>,
    pub pan: Option<String>,
    pub total_amount: Option<f64>,
    pub taxable_amount: Option<f64>,
    pub cgst: Option<f64>,
    pub sgst: Option<f64>,
    pub igst: Option<f64>,
    #[serde(default)]
    pub line_items: Vec<LineItem>,
    #[serde(default)]
    pub hsn_codes: Vec<String>,
    /// Crude 0-1 extraction confidence.
    pub confidence: f64,
}
