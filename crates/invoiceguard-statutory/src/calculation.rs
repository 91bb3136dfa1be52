//! GST arithmetic verification over extracted invoice amounts.

use tracing::debug;

use invoiceguard_types::{CalcVerification, OcrFields};

/// Verify that taxable amount + tax components equals the stated total and
/// that each line item's quantity x rate equals its amount.
///
/// Intra-state invoices carry CGST+SGST (which must be equal); inter-state
/// invoices carry IGST. Absent amounts report `data_missing`.
pub fn verify_gst_calculations(ocr: &OcrFields) -> CalcVerification {
    let (taxable, total) = match (ocr.taxable_amount, ocr.total_amount) {
        (Some(t), Some(tot)) => (t, tot),
        _ => {
            return CalcVerification {
                verified: false,
                data_missing: true,
                reason: Some(
                    "Data Missing: Cannot verify GST - taxable amount or total not extracted."
                        .to_string(),
                ),
                ..CalcVerification::default()
            };
        }
    };

    let mut alerts = Vec::new();
    let (computed_tax, gst_type) = match (ocr.cgst, ocr.sgst, ocr.igst) {
        (Some(cgst), Some(sgst), _) => {
            if (cgst - sgst).abs() > 0.5 {
                alerts.push(format!(
                    "CGST ({cgst}) and SGST ({sgst}) should be equal for intra-state."
                ));
            }
            (cgst + sgst, "intra-state (CGST+SGST)")
        }
        (_, _, Some(igst)) => (igst, "inter-state (IGST)"),
        _ => {
            return CalcVerification {
                verified: false,
                data_missing: true,
                taxable_amount: Some(taxable),
                invoice_total: Some(total),
                reason: Some(
                    "Data Missing: No tax components (CGST/SGST/IGST) extracted.".to_string(),
                ),
                ..CalcVerification::default()
            };
        }
    };

    let expected_total = taxable + computed_tax;
    let variance = (expected_total - total).abs();
    if variance > 1.0 {
        alerts.push(format!(
            "Total mismatch: Taxable({taxable}) + Tax({computed_tax}) = {expected_total}, \
             but invoice shows {total}. Variance: {variance:.2}"
        ));
    }

    for (i, item) in ocr.line_items.iter().enumerate() {
        if let (Some(qty), Some(rate), Some(amount)) = (item.quantity, item.rate, item.amount) {
            let expected = qty * rate;
            if (expected - amount).abs() > 0.5 {
                alerts.push(format!(
                    "Row {}: {qty} x {rate} = {expected}, but shows {amount}",
                    i + 1
                ));
            }
        }
    }

    let verified = alerts.is_empty();
    debug!(verified, variance, gst_type, "GST calculation verified");

    CalcVerification {
        verified,
        data_missing: false,
        gst_type: Some(gst_type.to_string()),
        taxable_amount: Some(taxable),
        computed_tax: Some(computed_tax),
        expected_total: Some(expected_total),
        invoice_total: Some(total),
        variance: Some((variance * 100.0).round() / 100.0),
        reason: None,
        alerts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use invoiceguard_types::LineItem;

    fn base_ocr() -> OcrFields {
        OcrFields {
            taxable_amount: Some(1000.0),
            total_amount: Some(1180.0),
            cgst: Some(90.0),
            sgst: Some(90.0),
            ..OcrFields::default()
        }
    }

    #[test]
    fn correct_intra_state_invoice_verifies() {
        let v = verify_gst_calculations(&base_ocr());
        assert!(v.verified, "alerts: {:?}", v.alerts);
        assert_eq!(v.gst_type.as_deref(), Some("intra-state (CGST+SGST)"));
        assert_eq!(v.computed_tax, Some(180.0));
    }

    #[test]
    fn total_mismatch_fails() {
        let mut ocr = base_ocr();
        ocr.total_amount = Some(1250.0);
        let v = verify_gst_calculations(&ocr);
        assert!(!v.verified);
        assert!(v.alerts[0].contains("Total mismatch"));
    }

    #[test]
    fn unequal_cgst_sgst_flagged() {
        let mut ocr = base_ocr();
        ocr.cgst = Some(100.0);
        ocr.sgst = Some(80.0);
        let v = verify_gst_calculations(&ocr);
        assert!(!v.verified);
        assert!(v.alerts.iter().any(|a| a.contains("should be equal")));
    }

    #[test]
    fn igst_invoice_verifies() {
        let ocr = OcrFields {
            taxable_amount: Some(1000.0),
            total_amount: Some(1180.0),
            igst: Some(180.0),
            ..OcrFields::default()
        };
        let v = verify_gst_calculations(&ocr);
        assert!(v.verified);
        assert_eq!(v.gst_type.as_deref(), Some("inter-state (IGST)"));
    }

    #[test]
    fn missing_amounts_are_data_missing() {
        let v = verify_gst_calculations(&OcrFields::default());
        assert!(v.data_missing);
        assert!(!v.verified);
    }

    #[test]
    fn missing_tax_components_are_data_missing() {
        let ocr = OcrFields {
            taxable_amount: Some(1000.0),
            total_amount: Some(1180.0),
            ..OcrFields::default()
        };
        let v = verify_gst_calculations(&ocr);
        assert!(v.data_missing);
    }

    #[test]
    fn bad_line_item_math_fails() {
        let mut ocr = base_ocr();
        ocr.line_items = vec![LineItem {
            description: "widget".into(),
            quantity: Some(3.0),
            rate: Some(100.0),
            amount: Some(350.0),
        }];
        let v = verify_gst_calculations(&ocr);
        assert!(!v.verified);
        assert!(v.alerts.iter().any(|a| a.starts_with("Row 1")));
    }
}
