//! Invoice number format, history duplicate and sequence pattern checks.

use invoiceguard_types::{InvoiceNumberValidation, InvoiceRecord};

/// Maximum invoice number length under GST rules.
const MAX_LENGTH: usize = 16;

/// Minimum history needed before pattern deviation is meaningful.
const PATTERN_MIN_HISTORY: usize = 3;

/// Validate an invoice number against GST format rules and this vendor's
/// historical numbering.
///
/// Flags: length over 16 characters, exact duplicate of a historical
/// number, and deviation from the established pattern (average length and
/// common non-digit prefix) once at least three priors exist.
pub fn validate_invoice_number(
    invoice_number: Option<&str>,
    history: &[InvoiceRecord],
) -> InvoiceNumberValidation {
    let number = match invoice_number.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => s,
        None => {
            return InvoiceNumberValidation {
                valid: false,
                data_missing: true,
                alerts: vec!["Data Missing: Invoice number not extracted.".to_string()],
                ..InvoiceNumberValidation::default()
            };
        }
    };

    let mut alerts = Vec::new();

    if number.len() > MAX_LENGTH {
        alerts.push(format!(
            "Invoice number exceeds {MAX_LENGTH} characters ({} chars).",
            number.len()
        ));
    }

    let past: Vec<&str> = history
        .iter()
        .filter_map(|r| r.invoice_number.as_deref())
        .collect();

    let duplicate_in_history = past.iter().any(|p| p.eq_ignore_ascii_case(number));
    if duplicate_in_history {
        alerts.push(format!(
            "Invoice number '{number}' already used by this vendor."
        ));
    }

    if past.len() >= PATTERN_MIN_HISTORY {
        let avg_len = past.iter().map(|p| p.len()).sum::<usize>() as f64 / past.len() as f64;
        if (number.len() as f64 - avg_len).abs() > 4.0 {
            alerts.push(format!(
                "Invoice number length ({}) deviates from this vendor's usual length (~{:.0}).",
                number.len(),
                avg_len
            ));
        }

        if let Some(prefix) = common_prefix(&past) {
            if !number.to_uppercase().starts_with(&prefix) {
                alerts.push(format!(
                    "Invoice number does not start with the vendor's usual prefix '{prefix}'."
                ));
            }
        }
    }

    InvoiceNumberValidation {
        valid: alerts.is_empty(),
        data_missing: false,
        invoice_number: Some(number.to_string()),
        length: number.len() as u32,
        historical_count: past.len() as u32,
        duplicate_in_history,
        alerts,
    }
}

/// Non-digit leading prefix shared by every historical number, if any.
fn common_prefix(numbers: &[&str]) -> Option<String> {
    let prefixes: Vec<String> = numbers
        .iter()
        .map(|n| {
            n.to_uppercase()
                .chars()
                .take_while(|c| !c.is_ascii_digit())
                .collect()
        })
        .collect();

    let first = prefixes.first()?;
    if first.is_empty() || !prefixes.iter().all(|p| p == first) {
        return None;
    }
    Some(first.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn record(number: &str) -> InvoiceRecord {
        InvoiceRecord {
            invoice_number: Some(number.to_string()),
            date: None,
            amount: None,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn plain_number_with_no_history_is_valid() {
        let v = validate_invoice_number(Some("INV-2024-001"), &[]);
        assert!(v.valid, "alerts: {:?}", v.alerts);
        assert_eq!(v.length, 12);
        assert_eq!(v.historical_count, 0);
    }

    #[test]
    fn missing_number_is_data_missing() {
        let v = validate_invoice_number(None, &[]);
        assert!(v.data_missing);
        assert!(!v.valid);
    }

    #[test]
    fn over_sixteen_characters_flagged() {
        let v = validate_invoice_number(Some("INV-2024-000000000001"), &[]);
        assert!(!v.valid);
        assert!(v.alerts[0].contains("exceeds 16"));
    }

    #[test]
    fn duplicate_in_history_flagged_case_insensitively() {
        let history = vec![record("INV-100"), record("INV-101")];
        let v = validate_invoice_number(Some("inv-100"), &history);
        assert!(v.duplicate_in_history);
        assert!(!v.valid);
    }

    #[test]
    fn prefix_deviation_flagged_with_enough_history() {
        let history = vec![record("INV-100"), record("INV-101"), record("INV-102")];
        let v = validate_invoice_number(Some("BILL-103"), &history);
        assert!(!v.valid);
        assert!(v.alerts.iter().any(|a| a.contains("usual prefix")));
    }

    #[test]
    fn length_deviation_flagged_with_enough_history() {
        let history = vec![record("INV-100"), record("INV-101"), record("INV-102")];
        let v = validate_invoice_number(Some("INV-1000000000"), &history);
        assert!(v.alerts.iter().any(|a| a.contains("usual length")));
    }

    #[test]
    fn short_history_skips_pattern_checks() {
        let history = vec![record("INV-100"), record("INV-101")];
        let v = validate_invoice_number(Some("BILL-1"), &history);
        assert!(v.valid);
    }
}
