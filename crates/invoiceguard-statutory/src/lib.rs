//! # invoiceguard-statutory
//!
//! Statutory validation for Indian GST invoices:
//!
//! - **GSTIN** format, state code, embedded PAN and Mod-36 check digit
//! - **PAN** format and entity-type linkage
//! - **HSN/SAC** classification codes against a fixed rate master
//! - **GST arithmetic** (CGST/SGST/IGST component and total verification)
//! - **Invoice number** format, history duplicates and sequence patterns
//! - **Bank details** (IFSC / account number format) and **IRN** presence
//!
//! All operations are total: a missing input yields a record with
//! `data_missing = true`, never an error. Format problems yield
//! `is_valid = false` with explanatory alerts.

pub mod bank;
pub mod calculation;
pub mod gstin;
pub mod hsn;
pub mod invoice_number;
pub mod masters;

pub use bank::{validate_bank_details, validate_einvoice};
pub use calculation::verify_gst_calculations;
pub use gstin::{validate_gstin, validate_pan};
pub use hsn::validate_hsn_sac;
pub use invoice_number::validate_invoice_number;
