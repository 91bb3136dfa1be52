//! GSTIN and PAN validation.
//!
//! A GSTIN is 15 characters: 2-digit state code, 10-character embedded
//! PAN, entity count digit, the literal 'Z', and a Mod-36 check digit.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use invoiceguard_types::{GstinValidation, PanValidation};

use crate::masters;

static GSTIN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{2}[A-Z]{5}[0-9]{4}[A-Z][1-9A-Z]Z[0-9A-Z]$").unwrap());

static PAN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{3}[PCHABGJLFT][A-Z][0-9]{4}[A-Z]$").unwrap());

const MOD36_ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Validate a GSTIN: format, state code, embedded PAN entity type and
/// Mod-36 check digit.
///
/// `None` or empty input reports `data_missing`, not a format failure.
pub fn validate_gstin(gstin: Option<&str>) -> GstinValidation {
    let raw = match gstin.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => s,
        None => {
            return GstinValidation {
                is_valid: false,
                data_missing: true,
                alerts: vec!["Data Missing: GSTIN not provided.".to_string()],
                ..GstinValidation::default()
            };
        }
    };

    let cleaned = raw.to_uppercase();
    if !GSTIN_PATTERN.is_match(&cleaned) {
        return GstinValidation {
            is_valid: false,
            alerts: vec!["Invalid GSTIN format.".to_string()],
            ..GstinValidation::default()
        };
    }

    let mut alerts = Vec::new();

    let state_code = &cleaned[..2];
    let state_name = masters::state_name(state_code);
    if state_name.is_none() {
        alerts.push(format!("Invalid state code: {state_code}."));
    }

    let pan = &cleaned[2..12];
    let entity_code = pan.as_bytes()[3] as char;
    let entity_type = masters::entity_type(entity_code);

    if !verify_check_digit(&cleaned) {
        alerts.push("GSTIN check digit (Mod 36) verification failed.".to_string());
    }

    if entity_type.is_none() {
        alerts.push(format!("Unknown PAN entity type code: {entity_code}."));
    }

    let is_valid = alerts.is_empty();
    debug!(gstin = %cleaned, is_valid, "GSTIN validated");

    GstinValidation {
        is_valid,
        data_missing: false,
        pan: Some(pan.to_string()),
        entity_type: entity_type.map(str::to_string),
        state_code: Some(state_code.to_string()),
        state_name: state_name.map(str::to_string),
        registration_status: Some("Format Valid".to_string()),
        alerts,
    }
}

/// Mod-36 check digit over the first 14 characters.
fn verify_check_digit(gstin: &str) -> bool {
    let bytes = gstin.as_bytes();
    let base = MOD36_ALPHABET.len() as u32;
    let mut factor = 1u32;
    let mut total = 0u32;

    for &b in &bytes[..bytes.len() - 1] {
        let cp = match MOD36_ALPHABET.iter().position(|&c| c == b) {
            Some(i) => i as u32,
            None => return false,
        };
        let product = factor * cp;
        factor = if factor == 1 { 2 } else { 1 };
        total += product / base + product % base;
    }

    let remainder = total % base;
    let check = MOD36_ALPHABET[((base - remainder) % base) as usize];
    bytes[bytes.len() - 1] == check
}

/// Validate a PAN: format and entity-type linkage.
pub fn validate_pan(pan: Option<&str>) -> PanValidation {
    let raw = match pan.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => s,
        None => {
            return PanValidation {
                is_valid: false,
                data_missing: true,
                alerts: vec!["Data Missing: PAN not provided.".to_string()],
                ..PanValidation::default()
            };
        }
    };

    let cleaned = raw.to_uppercase();
    if !PAN_PATTERN.is_match(&cleaned) {
        return PanValidation {
            is_valid: false,
            pan: Some(cleaned),
            alerts: vec!["Invalid PAN format.".to_string()],
            ..PanValidation::default()
        };
    }

    let entity_code = cleaned.as_bytes()[3] as char;
    let entity_type = masters::entity_type(entity_code);
    let mut alerts = Vec::new();
    if entity_type.is_none() {
        alerts.push(format!("Unknown entity type code: {entity_code}."));
    }

    PanValidation {
        is_valid: true,
        data_missing: false,
        pan: Some(cleaned),
        entity_type: entity_type.map(str::to_string),
        entity_code: Some(entity_code.to_string()),
        alerts,
    }
}
