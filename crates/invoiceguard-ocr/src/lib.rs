//! # invoiceguard-ocr
//!
//! Text extraction and invoice field parsing:
//!
//! - [`TextExtractor`]: the capability interface a real OCR/PDF-text
//!   backend implements. Extraction failure is a `None`, not an error.
//! - [`parser`]: regex-driven extraction of structured invoice fields
//!   (numbers, dates, amounts, tax components, GSTIN/PAN, HSN codes)
//!   from raw document text.

pub mod extractor;
pub mod parser;

pub use extractor::{extract_fields, NoopExtractor, TextExtractor};
pub use parser::parse_fields;
