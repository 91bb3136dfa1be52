//! Regex field extraction from raw invoice text.

use std::sync::LazyLock;

use regex::Regex;

use invoiceguard_types::OcrFields;

static GSTIN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]{2}[A-Z]{5}[0-9]{4}[A-Z][A-Z0-9]Z[A-Z0-9]").unwrap());

static PAN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Z]{3}[PCHABGJLFT][A-Z][0-9]{4}[A-Z]").unwrap());

static INV_NO_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)invoice\s*(?:no|number|#)[:\s]*([\w\-/]+)").unwrap());

static DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:date[:\s]*)?(\d{1,2}[/\-.]\d{1,2}[/\-.]\d{2,4})").unwrap()
});

static TOTAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:total|grand\s*total|net\s*amount|amount\s*payable)[:\s]*[₹$]?\s*([\d,]+\.?\d*)")
        .unwrap()
});

static TAXABLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:taxable\s*(?:value|amount)|sub\s*total)[:\s]*[₹$]?\s*([\d,]+\.?\d*)")
        .unwrap()
});

static CGST_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)CGST[:\s@%]*(?:\d{1,2}(?:\.\d+)?%)?[:\s]*[₹$]?\s*([\d,]+\.?\d*)").unwrap());

static SGST_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)SGST[:\s@%]*(?:\d{1,2}(?:\.\d+)?%)?[:\s]*[₹$]?\s*([\d,]+\.?\d*)").unwrap());

static IGST_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)IGST[:\s@%]*(?:\d{1,2}(?:\.\d+)?%)?[:\s]*[₹$]?\s*([\d,]+\.?\d*)").unwrap());

static HSN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b(\d{4,8})\b").unwrap());

/// Parse structured invoice fields out of raw text.
///
/// Every field is best-effort: an absent label leaves the field `None`.
pub fn parse_fields(text: &str) -> OcrFields {
    OcrFields {
        raw_text: text.to_string(),
        invoice_number: capture(&INV_NO_RE, text),
        invoice_date: capture(&DATE_RE, text),
        vendor_name: vendor_name(text),
        gstin: GSTIN_RE.find(text).map(|m| m.as_str().to_string()),
        pan: PAN_RE.find(text).map(|m| m.as_str().to_string()),
        total_amount: amount(&TOTAL_RE, text),
        taxable_amount: amount(&TAXABLE_RE, text),
        cgst: amount(&CGST_RE, text),
        sgst: amount(&SGST_RE, text),
        igst: amount(&IGST_RE, text),
        line_items: Vec::new(),
        hsn_codes: hsn_codes(text),
        confidence: estimate_confidence(text),
    }
}

fn capture(re: &Regex, text: &str) -> Option<String> {
    re.captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
}

fn amount(re: &Regex, text: &str) -> Option<f64> {
    let raw = capture(re, text)?;
    raw.replace(',', "").parse::<f64>().ok()
}

/// The vendor name is taken as the first non-empty line of the document,
/// truncated to 120 characters.
fn vendor_name(text: &str) -> Option<String> {
    text.lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .map(|l| l.chars().take(120).collect())
}

/// HSN/SAC candidates: 4, 6 or 8 digit tokens with no leading zero,
/// deduplicated and sorted.
fn hsn_codes(text: &str) -> Vec<String> {
    let mut codes: Vec<String> = HSN_RE
        .captures_iter(text)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .filter(|c| matches!(c.len(), 4 | 6 | 8) && !c.starts_with('0'))
        .collect();
    codes.sort();
    codes.dedup();
    codes
}

/// Crude extraction confidence: fraction of words containing at least one
/// alphabetic character. Very short output is near-zero confidence.
fn estimate_confidence(text: &str) -> f64 {
    if text.trim().is_empty() {
        return 0.0;
    }
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() < 5 {
        return 0.1;
    }
    let alpha = words
        .iter()
        .filter(|w| w.chars().any(|c| c.is_alphabetic()))
        .count();
    let ratio = alpha as f64 / words.len() as f64;
    ((ratio * 100.0).round() / 100.0).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Acme Traders Pvt Ltd
GSTIN: 27AAPFU0939F1ZV
Invoice No: INV-2024-042
Date: 15/03/2024
HSN: 9983
Taxable Value: \u{20b9} 1,000.00
CGST @ 9%: \u{20b9} 90.00
SGST @ 9%: \u{20b9} 90.00
Grand Total: \u{20b9} 1,180.00";

    #[test]
    fn parses_all_labelled_fields() {
        let f = parse_fields(SAMPLE);
        assert_eq!(f.vendor_name.as_deref(), Some("Acme Traders Pvt Ltd"));
        assert_eq!(f.gstin.as_deref(), Some("27AAPFU0939F1ZV"));
        assert_eq!(f.invoice_number.as_deref(), Some("INV-2024-042"));
        assert_eq!(f.invoice_date.as_deref(), Some("15/03/2024"));
        assert_eq!(f.taxable_amount, Some(1000.0));
        assert_eq!(f.cgst, Some(90.0));
        assert_eq!(f.sgst, Some(90.0));
        assert_eq!(f.igst, None);
        assert_eq!(f.total_amount, Some(1180.0));
        assert!(f.hsn_codes.contains(&"9983".to_string()));
        assert!(f.confidence > 0.0);
    }

    #[test]
    fn comma_separated_amounts_are_parsed() {
        let f = parse_fields("Amount Payable: \u{20b9} 12,34,567.89");
        assert_eq!(f.total_amount, Some(1234567.89));
    }

    #[test]
    fn missing_labels_leave_fields_absent() {
        let f = parse_fields("just some unrelated words here today");
        assert!(f.invoice_number.is_none());
        assert!(f.total_amount.is_none());
        assert!(f.gstin.is_none());
        assert!(f.hsn_codes.is_empty());
    }

    #[test]
    fn hsn_candidates_are_filtered_and_deduplicated() {
        let f = parse_fields("codes 9983 9983 0423 12345 847130 1");
        assert_eq!(f.hsn_codes, vec!["847130".to_string(), "9983".to_string()]);
    }

    #[test]
    fn short_text_has_low_confidence() {
        let f = parse_fields("two words");
        assert_eq!(f.confidence, 0.1);
    }

    #[test]
    fn numeric_heavy_text_lowers_confidence() {
        let f = parse_fields("1 2 3 4 5 6 7 8 ok ok");
        assert!(f.confidence < 0.5);
    }
}
