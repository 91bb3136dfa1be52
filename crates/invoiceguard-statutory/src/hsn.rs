//! HSN/SAC classification-code validation against the rate master.

use std::sync::LazyLock;

use regex::Regex;

use invoiceguard_types::HsnValidation;

use crate::masters;

static CODE_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{4,8}$").unwrap());

/// Validate a classification code and, when a claimed tax rate is present,
/// verify it against the notified rate for that code.
///
/// HSN codes are 4/6/8 digits; SAC codes are 6 digits starting with 99.
pub fn validate_hsn_sac(code: Option<&str>, claimed_tax_rate: Option<f64>) -> HsnValidation {
    let raw = match code.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => s,
        None => {
            return HsnValidation {
                is_valid: false,
                data_missing: true,
                alert: Some("Data Missing: HSN/SAC code not provided.".to_string()),
                ..HsnValidation::default()
            };
        }
    };

    if !CODE_PATTERN.is_match(raw) {
        return HsnValidation {
            is_valid: false,
            code: Some(raw.to_string()),
            alert: Some("Invalid HSN/SAC format (expected 4-8 digits).".to_string()),
            ..HsnValidation::default()
        };
    }

    let code_type = if raw.starts_with("99") { "SAC" } else { "HSN" };

    let entry = match masters::lookup_hsn(raw) {
        Some(e) => e,
        None => {
            return HsnValidation {
                is_valid: false,
                code: Some(raw.to_string()),
                code_type: Some(code_type.to_string()),
                alert: Some(format!("{code_type} code not found in master.")),
                ..HsnValidation::default()
            };
        }
    };

    let claimed = match claimed_tax_rate {
        Some(r) => r,
        None => {
            return HsnValidation {
                is_valid: false,
                data_missing: true,
                code: Some(raw.to_string()),
                code_type: Some(code_type.to_string()),
                expected_tax_rate: Some(entry.rate),
                alert: Some("Data Missing: Claimed tax rate not provided.".to_string()),
                ..HsnValidation::default()
            };
        }
    };

    let rate_match = (entry.rate - claimed).abs() < 0.01;
    HsnValidation {
        is_valid: rate_match,
        data_missing: false,
        code: Some(raw.to_string()),
        code_type: Some(code_type.to_string()),
        expected_tax_rate: Some(entry.rate),
        claimed_tax_rate: Some(claimed),
        rate_match,
        alert: if rate_match {
            None
        } else {
            Some(format!(
                "Tax rate mismatch: expected {}%, claimed {}%.",
                entry.rate, claimed
            ))
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_rate_is_valid() {
        let v = validate_hsn_sac(Some("9983"), Some(18.0));
        assert!(v.is_valid);
        assert!(v.rate_match);
        assert_eq!(v.code_type.as_deref(), Some("SAC"));
        assert!(v.alert.is_none());
    }

    #[test]
    fn rate_mismatch_names_both_rates() {
        let v = validate_hsn_sac(Some("9983"), Some(12.0));
        assert!(!v.is_valid);
        assert!(!v.rate_match);
        let alert = v.alert.unwrap();
        assert!(alert.contains("18"));
        assert!(alert.contains("12"));
    }

    #[test]
    fn missing_code_is_data_missing() {
        let v = validate_hsn_sac(None, Some(18.0));
        assert!(v.data_missing);
        assert!(!v.is_valid);
    }

    #[test]
    fn missing_rate_is_data_missing_with_expected_rate() {
        let v = validate_hsn_sac(Some("9983"), None);
        assert!(v.data_missing);
        assert_eq!(v.expected_tax_rate, Some(18.0));
    }

    #[test]
    fn non_numeric_code_is_format_error() {
        let v = validate_hsn_sac(Some("99X3"), Some(18.0));
        assert!(!v.is_valid);
        assert!(!v.data_missing);
        assert!(v.alert.unwrap().contains("format"));
    }

    #[test]
    fn unknown_code_reports_master_miss() {
        let v = validate_hsn_sac(Some("1234"), Some(18.0));
        assert!(!v.is_valid);
        assert!(v.alert.unwrap().contains("not found"));
    }
}
