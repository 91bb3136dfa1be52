//! Pixel-level image forensics capability interface.

use invoiceguard_types::{ElaReport, FontReport, QualityReport};

/// Pixel-level analysis of image uploads.
///
/// A real implementation wraps an imaging backend (JPEG recompression for
/// error level analysis, OCR word confidences for font consistency,
/// sharpness/noise/moire measures for quality). When no backend is wired
/// in, [`UnavailableForensics`] reports each signal as unavailable and the
/// corresponding checks record data-missing instead of failing.
pub trait ImageForensics: Send + Sync {
    /// Backend name, for logging and report details.
    fn name(&self) -> &str;

    /// Error level analysis: recompress and compare to expose regions
    /// saved at a different compression generation.
    fn error_level_analysis(&self, bytes: &[u8]) -> ElaReport;

    /// Font consistency via OCR word-confidence dispersion.
    fn font_consistency(&self, bytes: &[u8]) -> FontReport;

    /// Scan quality: DPI, sharpness, noise, moire, resolution.
    fn quality(&self, bytes: &[u8]) -> QualityReport;
}

/// Stub used when no imaging backend is configured.
#[derive(Clone, Copy, Debug, Default)]
pub struct UnavailableForensics;

impl ImageForensics for UnavailableForensics {
    fn name(&self) -> &str {
        "unavailable"
    }

    fn error_level_analysis(&self, _bytes: &[u8]) -> ElaReport {
        // `error` stays unset: an absent backend is data-missing, not a
        // verification failure.
        ElaReport::not_applicable()
    }

    fn font_consistency(&self, _bytes: &[u8]) -> FontReport {
        FontReport::unavailable("No imaging backend configured for font analysis.")
    }

    fn quality(&self, _bytes: &[u8]) -> QualityReport {
        QualityReport::default()
    }
}
