//! Expense-to-activity correlation (check 5.3) and the PO/GRN three-way
//! match (check 4.3).

use invoiceguard_types::{ExpenseCorrelation, PoGrnMatch};

/// Expected spending context for an expense category, sourced from the
/// buyer's activity systems.
#[derive(Clone, Debug)]
pub struct ActivityContext {
    pub expected_min: f64,
    pub expected_max: f64,
    pub has_supporting_activity: bool,
}

/// Correlate the invoice amount with recorded business activity for its
/// expense category.
pub fn expense_correlation(
    category: &str,
    amount: f64,
    activity: Option<&ActivityContext>,
) -> ExpenseCorrelation {
    let activity = match activity {
        Some(a) => a,
        None => {
            return ExpenseCorrelation {
                correlated: false,
                data_missing: true,
                reason: Some(
                    "Data Missing: No activity data for expense correlation.".to_string(),
                ),
                ..ExpenseCorrelation::default()
            };
        }
    };

    let mut alerts = Vec::new();
    if amount < activity.expected_min || amount > activity.expected_max {
        alerts.push(format!(
            "Invoice amount ({amount}) outside expected range ({}-{}) for category \
             '{category}'.",
            activity.expected_min, activity.expected_max
        ));
    }
    if !activity.has_supporting_activity {
        alerts.push(format!(
            "No supporting business activity found for '{category}' expense."
        ));
    }

    ExpenseCorrelation {
        correlated: alerts.is_empty(),
        data_missing: false,
        category: Some(category.to_string()),
        amount: Some(amount),
        reason: None,
        alerts,
    }
}

/// Three-way match: the invoice must not exceed either the purchase order
/// or the goods receipt note. A missing document is data-missing, not a
/// failure.
pub fn po_grn_match(
    po_total: Option<f64>,
    grn_total: Option<f64>,
    invoice_total: Option<f64>,
) -> PoGrnMatch {
    let missing = |what: &str| PoGrnMatch {
        matched: false,
        data_missing: true,
        reason: Some(format!("Data Missing: No {what} data for 3-way match.")),
        ..PoGrnMatch::default()
    };

    let po = match po_total {
        Some(v) => v,
        None => return missing("PO"),
    };
    let grn = match grn_total {
        Some(v) => v,
        None => return missing("GRN"),
    };
    let invoice = match invoice_total {
        Some(v) => v,
        None => return missing("invoice line"),
    };

    let mut alerts = Vec::new();
    if invoice > grn {
        alerts.push(format!(
            "Invoice total ({invoice}) exceeds GRN total ({grn})."
        ));
    }
    if invoice > po {
        alerts.push(format!("Invoice total ({invoice}) exceeds PO total ({po})."));
    }

    PoGrnMatch {
        matched: alerts.is_empty(),
        data_missing: false,
        po_total: Some(po),
        grn_total: Some(grn),
        invoice_total: Some(invoice),
        reason: None,
        alerts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_activity_data_is_data_missing() {
        let r = expense_correlation("general", 5000.0, None);
        assert!(r.data_missing);
        assert!(!r.correlated);
    }

    #[test]
    fn amount_in_range_with_activity_correlates() {
        let ctx = ActivityContext {
            expected_min: 1000.0,
            expected_max: 10000.0,
            has_supporting_activity: true,
        };
        let r = expense_correlation("travel", 5000.0, Some(&ctx));
        assert!(r.correlated);
        assert!(r.alerts.is_empty());
    }

    #[test]
    fn out_of_range_amount_alerts() {
        let ctx = ActivityContext {
            expected_min: 1000.0,
            expected_max: 10000.0,
            has_supporting_activity: true,
        };
        let r = expense_correlation("travel", 50000.0, Some(&ctx));
        assert!(!r.correlated);
        assert!(r.alerts[0].contains("outside expected range"));
    }

    #[test]
    fn missing_supporting_activity_alerts() {
        let ctx = ActivityContext {
            expected_min: 0.0,
            expected_max: f64::INFINITY,
            has_supporting_activity: false,
        };
        let r = expense_correlation("consulting", 5000.0, Some(&ctx));
        assert!(!r.correlated);
        assert!(r.alerts[0].contains("No supporting business activity"));
    }

    #[test]
    fn missing_po_is_data_missing() {
        let r = po_grn_match(None, Some(100.0), Some(100.0));
        assert!(r.data_missing);
        assert!(r.reason.unwrap().contains("No PO data"));
    }

    #[test]
    fn matching_totals_pass() {
        let r = po_grn_match(Some(1000.0), Some(1000.0), Some(1000.0));
        assert!(r.matched);
    }

    #[test]
    fn invoice_above_po_and_grn_fails_with_both_alerts() {
        let r = po_grn_match(Some(1000.0), Some(900.0), Some(1200.0));
        assert!(!r.matched);
        assert_eq!(r.alerts.len(), 2);
    }
}
