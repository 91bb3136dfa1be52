//! Approval-threshold circumvention detection (check 5.5).

use invoiceguard_types::{ThresholdProximity, ThresholdReport};

/// Standard approval thresholds in rupees.
pub const DEFAULT_THRESHOLDS: [f64; 5] = [10_000.0, 50_000.0, 100_000.0, 500_000.0, 1_000_000.0];

/// Detect invoices engineered to stay under an approval threshold:
/// amounts sitting in the [90%, 100%) proximity band, groups of recent
/// invoices whose sum lands just around a threshold, and a high ratio of
/// round-number amounts.
pub fn detect_threshold_circumvention(
    invoice_amount: f64,
    thresholds: &[f64],
    recent_amounts: &[f64],
) -> ThresholdReport {
    let mut alerts = Vec::new();
    let mut threshold_proximity = Vec::new();

    for &t in thresholds {
        if t > 0.0 {
            let pct = invoice_amount / t * 100.0;
            if (90.0..100.0).contains(&pct) {
                threshold_proximity.push(ThresholdProximity {
                    threshold: t,
                    percentage: (pct * 10.0).round() / 10.0,
                });
                alerts.push(format!(
                    "Invoice at {pct:.1}% of approval threshold {t:.0}."
                ));
            }
        }
    }

    let mut split_detected = false;
    let mut split_invoice_count = 0u32;
    let mut round_number_flag = false;

    if recent_amounts.len() >= 2 {
        let mut recent: Vec<f64> = recent_amounts.to_vec();
        recent.sort_by(|a, b| b.total_cmp(a));

        for &t in thresholds {
            let mut running_sum = invoice_amount;
            let mut related = 0u32;
            for amt in recent.iter().take(5) {
                running_sum += amt;
                related += 1;
                if t * 0.95 <= running_sum && running_sum <= t * 1.10 {
                    split_detected = true;
                    split_invoice_count = related + 1;
                    alerts.push(format!(
                        "Possible split: {} recent invoices sum to {running_sum:.0} (near \
                         threshold {t:.0}).",
                        related + 1
                    ));
                    break;
                }
            }
        }

        let round_count = recent_amounts
            .iter()
            .filter(|a| a.fract() == 0.0 && (**a as i64) % 1000 == 0)
            .count();
        if round_count as f64 > recent_amounts.len() as f64 * 0.5 {
            round_number_flag = true;
            alerts.push("High frequency of round-number invoices detected.".to_string());
        }
    }

    let pattern_score = (alerts.len() as u32 * 20).min(100);
    ThresholdReport {
        threshold_proximity,
        split_detected,
        split_invoice_count,
        round_number_flag,
        alerts,
        pattern_score,
    }
}
