//! Weighted vendor risk composite (check 5.1).

use tracing::debug;

use invoiceguard_types::{RiskFactors, RiskLevel, VendorRiskReport};

/// Compose the vendor risk score from the boolean factor set. Each
/// triggered factor contributes its fixed weight; the sum is clamped to
/// 100 and banded into a recommended action.
pub fn compute_vendor_risk_score(factors: &RiskFactors) -> VendorRiskReport {
    let weighted: [(&str, bool, f64); 10] = [
        ("gstin_invalid", factors.gstin_invalid, 15.0),
        ("metadata_tampering", factors.metadata_tampering, 12.0),
        ("image_manipulation", factors.image_manipulation, 12.0),
        ("font_inconsistency", factors.font_inconsistency, 8.0),
        ("low_document_quality", factors.low_document_quality, 5.0),
        ("hsn_mismatch", factors.hsn_mismatch, 10.0),
        ("calculation_error", factors.calculation_error, 10.0),
        ("duplicate_detected", factors.duplicate_detected, 20.0),
        ("price_variance", factors.price_variance, 8.0),
        ("statistical_anomaly", factors.statistical_anomaly, 10.0),
    ];

    let mut score = 0.0;
    let mut triggered = Vec::new();
    for (name, hit, weight) in weighted {
        if hit {
            score += weight;
            triggered.push(format!("{name}: +{weight:.1}"));
        }
    }
    let score = score.min(100.0);
    let level = RiskLevel::from_score(score);

    debug!(score, ?level, factor_count = triggered.len(), "vendor risk composite");

    let factor_count = triggered.len() as u32;
    triggered.truncate(5);

    VendorRiskReport {
        risk_score: score,
        risk_level: level,
        recommended_action: level.recommended_action().to_string(),
        top_risk_factors: triggered,
        factor_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_invoice_scores_zero() {
        let r = compute_vendor_risk_score(&RiskFactors::default());
        assert_eq!(r.risk_score, 0.0);
        assert_eq!(r.risk_level, RiskLevel::Low);
        assert_eq!(r.recommended_action, "Auto-approve");
        assert!(r.top_risk_factors.is_empty());
    }

    #[test]
    fn duplicate_alone_stays_low() {
        let r = compute_vendor_risk_score(&RiskFactors {
            duplicate_detected: true,
            ..RiskFactors::default()
        });
        assert_eq!(r.risk_score, 20.0);
        assert_eq!(r.risk_level, RiskLevel::Low);
    }

    #[test]
    fn multiple_factors_escalate_the_band() {
        let r = compute_vendor_risk_score(&RiskFactors {
            gstin_invalid: true,
            metadata_tampering: true,
            duplicate_detected: true,
            calculation_error: true,
            hsn_mismatch: true,
            ..RiskFactors::default()
        });
        assert_eq!(r.risk_score, 67.0);
        assert_eq!(r.risk_level, RiskLevel::High);
        assert_eq!(r.factor_count, 5);
    }

    #[test]
    fn all_factors_clamp_to_one_hundred() {
        let r = compute_vendor_risk_score(&RiskFactors {
            gstin_invalid: true,
            metadata_tampering: true,
            image_manipulation: true,
            font_inconsistency: true,
            low_document_quality: true,
            hsn_mismatch: true,
            calculation_error: true,
            duplicate_detected: true,
            price_variance: true,
            statistical_anomaly: true,
        });
        assert_eq!(r.risk_score, 100.0);
        assert_eq!(r.risk_level, RiskLevel::Critical);
        assert_eq!(r.top_risk_factors.len(), 5);
        assert_eq!(r.factor_count, 10);
    }
}
