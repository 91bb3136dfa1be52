//! Text extraction capability interface.

use tracing::debug;

use invoiceguard_types::OcrFields;

use crate::parser;

/// Turns document bytes into raw text.
///
/// Implementations wrap an OCR engine or a PDF text layer. Returning
/// `None` means the backend could not produce text for this document;
/// downstream checks then report data-missing rather than failing.
pub trait TextExtractor: Send + Sync {
    /// Backend name, for logging and report details.
    fn name(&self) -> &str;

    /// Extract raw text, or `None` when the document cannot be read.
    fn extract_text(&self, file_name: &str, bytes: &[u8]) -> Option<String>;
}

/// Extractor used when no OCR backend is wired in. Always yields no text,
/// which drives every text-dependent check to data-missing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopExtractor;

impl TextExtractor for NoopExtractor {
    fn name(&self) -> &str {
        "noop"
    }

    fn extract_text(&self, _file_name: &str, _bytes: &[u8]) -> Option<String> {
        None
    }
}

/// Run an extractor and parse whatever text it produced into structured
/// fields. No text yields an empty record with zero confidence.
pub fn extract_fields(
    extractor: &dyn TextExtractor,
    file_name: &str,
    bytes: &[u8],
) -> OcrFields {
    match extractor.extract_text(file_name, bytes) {
        Some(text) if !text.trim().is_empty() => {
            debug!(backend = extractor.name(), chars = text.len(), "text extracted");
            parser::parse_fields(&text)
        }
        _ => {
            debug!(backend = extractor.name(), file_name, "no text extracted");
            OcrFields::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedText(&'static str);

    impl TextExtractor for FixedText {
        fn name(&self) -> &str {
            "fixed"
        }

        fn extract_text(&self, _file_name: &str, _bytes: &[u8]) -> Option<String> {
            Some(self.0.to_string())
        }
    }

    #[test]
    fn noop_extractor_yields_empty_fields() {
        let fields = extract_fields(&NoopExtractor, "invoice.pdf", b"%PDF-1.4");
        assert!(fields.raw_text.is_empty());
        assert_eq!(fields.confidence, 0.0);
        assert!(fields.invoice_number.is_none());
    }

    #[test]
    fn extractor_output_is_parsed() {
        let fields = extract_fields(
            &FixedText("Acme Traders\nInvoice No: INV-42\nTotal: \u{20b9} 500.00"),
            "invoice.pdf",
            b"",
        );
        assert_eq!(fields.invoice_number.as_deref(), Some("INV-42"));
        assert_eq!(fields.vendor_name.as_deref(), Some("Acme Traders"));
    }

    #[test]
    fn whitespace_only_text_is_treated_as_absent() {
        let fields = extract_fields(&FixedText("   \n  "), "invoice.pdf", b"");
        assert!(fields.raw_text.is_empty());
        assert_eq!(fields.confidence, 0.0);
    }
}
