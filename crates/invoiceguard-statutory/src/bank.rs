//! Bank detail (IFSC / account number) and e-invoice IRN checks.

use std::sync::LazyLock;

use regex::Regex;

use invoiceguard_types::{BankValidation, EInvoiceValidation};

static IFSC_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{4}0[A-Z0-9]{6}$").unwrap());

/// IRN is a SHA-256 hex digest, always 64 characters.
const IRN_LENGTH: usize = 64;

/// Validate bank details: IFSC format (4 letters, a zero, 6 alphanumerics)
/// and account number length (9 to 18 digits).
pub fn validate_bank_details(
    ifsc: Option<&str>,
    account_number: Option<&str>,
) -> BankValidation {
    let ifsc = ifsc.map(str::trim).filter(|s| !s.is_empty());
    let account = account_number.map(str::trim).filter(|s| !s.is_empty());

    if ifsc.is_none() && account.is_none() {
        return BankValidation {
            valid: false,
            data_missing: true,
            alerts: vec!["Data Missing: No bank details found on invoice.".to_string()],
            ..BankValidation::default()
        };
    }

    let mut alerts = Vec::new();

    let ifsc = ifsc.map(|s| s.to_uppercase());
    if let Some(code) = &ifsc {
        if !IFSC_PATTERN.is_match(code) {
            alerts.push(format!("Invalid IFSC code format: {code}."));
        }
    }

    if let Some(acct) = account {
        let digits_only = acct.chars().all(|c| c.is_ascii_digit());
        if !digits_only || !(9..=18).contains(&acct.len()) {
            alerts.push("Account number should be 9-18 digits.".to_string());
        }
    }

    BankValidation {
        valid: alerts.is_empty(),
        data_missing: false,
        ifsc,
        account_number: account.map(str::to_string),
        alerts,
    }
}

/// Check e-invoice applicability: when an IRN (invoice reference number)
/// is expected, verify presence and the 64-character hash length.
pub fn validate_einvoice(irn: Option<&str>) -> EInvoiceValidation {
    let irn = match irn.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => s,
        None => {
            return EInvoiceValidation {
                applicable: true,
                irn_present: false,
                data_missing: true,
                alert: Some(
                    "Data Missing: IRN not found - cannot verify e-invoice registration."
                        .to_string(),
                ),
                ..EInvoiceValidation::default()
            };
        }
    };

    let length_valid = irn.len() == IRN_LENGTH;
    EInvoiceValidation {
        applicable: true,
        irn_present: true,
        data_missing: false,
        irn: Some(irn.to_string()),
        irn_length_valid: length_valid,
        alert: if length_valid {
            None
        } else {
            Some(format!(
                "IRN length is {} characters; expected {IRN_LENGTH}.",
                irn.len()
            ))
        },
        alerts: Vec::new(),
    }
}
