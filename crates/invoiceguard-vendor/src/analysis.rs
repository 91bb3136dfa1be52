//! Drift analysis over a vendor profile snapshot, plus the single
//! profile-mutation step.

use chrono::{DateTime, NaiveDate, Utc};
use strsim::normalized_levenshtein;
use tracing::debug;

use invoiceguard_duplicate::hashing::hex_hamming;
use invoiceguard_types::{
    AddressConsistency, FrequencyPattern, InvoiceRecord, LineItem, PriceTrend, PricedItem,
    PricingVariance, TemplateConsistency, TermsSnapshot, TermsVariance, VendorProfile,
};

/// Template hamming distance translates to a 0-100 score at 3 points per
/// bit; below this score the layout has drifted.
const TEMPLATE_MATCH_THRESHOLD: u32 = 85;

/// Fuzzy description similarity needed to link a line item to history.
const ITEM_MATCH_THRESHOLD: f64 = 0.70;

/// Price deviation from the historical average worth alerting on.
const PRICE_VARIANCE_PCT: f64 = 25.0;

const ADDRESS_MATCH_THRESHOLD: f64 = 80.0;

const TEMPLATE_HASH_CAP: usize = 20;

/// Everything one audited invoice contributes to the vendor profile.
#[derive(Clone, Debug, Default)]
pub struct InvoiceObservation {
    pub invoice_number: Option<String>,
    pub invoice_date: Option<String>,
    pub total_amount: Option<f64>,
    pub line_items: Vec<LineItem>,
    pub template_phash: Option<String>,
    pub address: Option<String>,
    pub terms: Option<TermsSnapshot>,
}

/// Check 3.1: perceptual-hash distance between this layout and the
/// vendor's known templates.
pub fn template_consistency(
    profile: &VendorProfile,
    current_phash: Option<&str>,
) -> TemplateConsistency {
    let phash = match current_phash {
        Some(h) => h,
        None => return TemplateConsistency::unavailable("Cannot compute template hash."),
    };

    if profile.template_hashes.is_empty() {
        return TemplateConsistency {
            is_baseline: true,
            reason: Some("First invoice from vendor - establishing baseline.".to_string()),
            ..TemplateConsistency::default()
        };
    }

    let min_distance = profile
        .template_hashes
        .iter()
        .filter_map(|stored| hex_hamming(phash, stored))
        .min();

    let distance = match min_distance {
        Some(d) => d,
        None => return TemplateConsistency::unavailable("No comparable template hashes."),
    };

    let match_score = 100u32.saturating_sub(distance * 3);
    let template_match = match_score >= TEMPLATE_MATCH_THRESHOLD;
    let mut alerts = Vec::new();
    if !template_match {
        alerts.push(format!(
            "Template match score: {match_score}%. Significant layout deviation from vendor \
             baseline."
        ));
    }

    TemplateConsistency {
        template_match,
        match_score,
        hamming_distance: Some(distance),
        baseline_count: profile.template_hashes.len() as u32,
        alerts,
        ..TemplateConsistency::default()
    }
}

/// Check 3.2: unit prices against the vendor's per-item price history,
/// linked by fuzzy description match.
pub fn pricing_variance(profile: &VendorProfile, line_items: &[LineItem]) -> PricingVariance {
    if profile.prices.is_empty() {
        return PricingVariance {
            reason: Some("No historical pricing data for this vendor.".to_string()),
            ..PricingVariance::default()
        };
    }

    let mut alerts = Vec::new();
    let mut item_details = Vec::new();

    for item in line_items {
        let desc = item.description.trim().to_lowercase();
        let current_price = match item.rate {
            Some(p) => p,
            None => continue,
        };
        if desc.is_empty() {
            continue;
        }

        let best_key = profile
            .prices
            .keys()
            .map(|key| (key, normalized_levenshtein(&desc, key)))
            .filter(|(_, score)| *score > ITEM_MATCH_THRESHOLD)
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(key, _)| key);

        let history = match best_key.and_then(|k| profile.prices.get(k)) {
            Some(h) if !h.is_empty() => h,
            _ => continue,
        };

        let avg = history.iter().sum::<f64>() / history.len() as f64;
        let std = if history.len() > 1 {
            (history.iter().map(|p| (p - avg).powi(2)).sum::<f64>() / history.len() as f64)
                .sqrt()
        } else {
            0.0
        };
        let variance_pct = if avg > 0.0 {
            (current_price - avg).abs() / avg * 100.0
        } else {
            0.0
        };

        let trend = if history.len() >= 3 {
            let recent = &history[history.len() - 3..];
            if recent.windows(2).all(|w| w[0] <= w[1]) {
                PriceTrend::Increasing
            } else if recent.windows(2).all(|w| w[0] >= w[1]) {
                PriceTrend::Decreasing
            } else {
                PriceTrend::Stable
            }
        } else {
            PriceTrend::Stable
        };

        if variance_pct > PRICE_VARIANCE_PCT {
            alerts.push(format!(
                "Price spike for '{desc}': current {current_price} vs avg {avg:.2} \
                 ({variance_pct:.0}% variance)."
            ));
        }

        item_details.push(PricedItem {
            description: desc,
            current_price,
            historical_avg: (avg * 100.0).round() / 100.0,
            variance_pct: (variance_pct * 10.0).round() / 10.0,
            last_price: history[history.len() - 1],
            trend,
            outlier: std > 0.0 && (current_price - avg).abs() > 2.0 * std,
        });
    }

    PricingVariance {
        variance_detected: !alerts.is_empty(),
        items_checked: item_details.len() as u32,
        reason: None,
        item_details,
        alerts,
    }
}

/// Check 3.3: amount spikes, round-number ratios and submission cadence.
pub fn frequency_patterns(profile: &VendorProfile) -> FrequencyPattern {
    let invoices = &profile.invoices;
    if invoices.len() < 3 {
        return FrequencyPattern {
            reason: Some("Insufficient history (need 3+ invoices).".to_string()),
            invoice_count: invoices.len() as u32,
            ..FrequencyPattern::default()
        };
    }

    let amounts: Vec<f64> = invoices
        .iter()
        .filter_map(|inv| inv.amount)
        .filter(|a| *a != 0.0)
        .collect();
    let mut alerts = Vec::new();
    let mut avg_amount = 0.0;

    if !amounts.is_empty() {
        avg_amount = amounts.iter().sum::<f64>() / amounts.len() as f64;
        let latest = amounts[amounts.len() - 1];

        if avg_amount > 0.0 && latest > avg_amount * 2.0 {
            alerts.push(format!(
                "Latest invoice amount ({latest:.2}) is {:.1}x the average ({avg_amount:.2}).",
                latest / avg_amount
            ));
        }

        let round_count = amounts
            .iter()
            .filter(|a| a.fract() == 0.0 && (**a as i64) % 1000 == 0)
            .count();
        if amounts.len() >= 5 && round_count as f64 > amounts.len() as f64 * 0.6 {
            alerts.push(format!(
                "High frequency of round numbers: {round_count}/{} invoices.",
                amounts.len()
            ));
        }
    }

    let mut dates: Vec<NaiveDate> = invoices.iter().filter_map(observation_date).collect();
    if dates.len() >= 3 {
        dates.sort();
        let gaps: Vec<i64> = dates
            .windows(2)
            .map(|w| (w[1] - w[0]).num_days())
            .collect();
        let avg_gap = gaps.iter().sum::<i64>() as f64 / gaps.len() as f64;
        let last_gap = gaps[gaps.len() - 1];
        if (last_gap as f64) < avg_gap * 0.3 && avg_gap > 5.0 {
            alerts.push(format!(
                "Unusual frequency spike: latest gap {last_gap} days vs average {avg_gap:.0} \
                 days."
            ));
        }
    }

    debug!(
        vendor_id = %profile.vendor_id,
        invoice_count = invoices.len(),
        alert_count = alerts.len(),
        "frequency pattern analysis"
    );

    FrequencyPattern {
        pattern_normal: alerts.is_empty(),
        invoice_count: invoices.len() as u32,
        avg_amount: (avg_amount * 100.0).round() / 100.0,
        reason: None,
        alerts,
    }
}

/// The invoice's own date when parseable, otherwise its processing time.
fn observation_date(record: &InvoiceRecord) -> Option<NaiveDate> {
    match record.date.as_deref() {
        Some(raw) => parse_date(raw),
        None => Some(record.timestamp.date_naive()),
    }
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    for format in ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y"] {
        if let Ok(d) = NaiveDate::parse_from_str(raw, format) {
            return Some(d);
        }
    }
    None
}

/// Check 3.4: fuzzy match of the extracted address against every address
/// previously seen for this vendor.
pub fn address_consistency(
    profile: &VendorProfile,
    current_address: Option<&str>,
) -> AddressConsistency {
    let address = match current_address.map(str::trim).filter(|a| !a.is_empty()) {
        Some(a) => a,
        None => {
            return AddressConsistency {
                data_missing: true,
                reason: Some("Data Missing: No address extracted.".to_string()),
                ..AddressConsistency::default()
            };
        }
    };

    if profile.addresses.is_empty() {
        return AddressConsistency {
            reason: Some("First address recorded for vendor.".to_string()),
            ..AddressConsistency::default()
        };
    }

    let best = profile
        .addresses
        .iter()
        .map(|stored| normalized_levenshtein(&address.to_lowercase(), &stored.to_lowercase()))
        .fold(0.0f64, f64::max)
        * 100.0;

    let consistent = best >= ADDRESS_MATCH_THRESHOLD;
    let mut alerts = Vec::new();
    if !consistent {
        alerts.push(format!(
            "Address change detected (match score: {best:.0}%). Current address differs from \
             master."
        ));
    }

    AddressConsistency {
        consistent,
        data_missing: false,
        match_score: best.round() as u32,
        stored_addresses: profile.addresses.len() as u32,
        reason: None,
        alerts,
    }
}

/// Check 3.5: payment/warranty terms against the last recorded snapshot.
pub fn terms_variance(
    profile: &VendorProfile,
    current: Option<&TermsSnapshot>,
) -> TermsVariance {
    let current = match current {
        Some(t) => t,
        None => {
            return TermsVariance {
                data_missing: true,
                reason: Some("Data Missing: No terms data extracted.".to_string()),
                ..TermsVariance::default()
            };
        }
    };

    let last = match profile.terms.last() {
        Some(t) => t,
        None => {
            return TermsVariance {
                reason: Some("First terms recorded for vendor.".to_string()),
                ..TermsVariance::default()
            };
        }
    };

    let mut alerts = Vec::new();

    if let (Some(cur), Some(prev)) = (current.payment_days, last.payment_days) {
        if cur != prev {
            if cur < prev {
                alerts.push(format!(
                    "Payment terms shortened: {prev} days -> {cur} days (vendor benefit)."
                ));
            } else {
                alerts.push(format!("Payment terms changed: {prev} days -> {cur} days."));
            }
        }
    }

    if let (Some(cur), Some(prev)) = (current.warranty_months, last.warranty_months) {
        if cur < prev {
            alerts.push(format!("Warranty reduced: {prev} months -> {cur} months."));
        }
    }

    TermsVariance {
        variance_detected: !alerts.is_empty(),
        data_missing: false,
        reason: None,
        alerts,
    }
}

/// Apply everything the audited invoice contributes to the profile. This
/// is the only mutation point; every analysis above reads the profile as
/// it stood before this invoice.
pub fn record_invoice(profile: &mut VendorProfile, obs: &InvoiceObservation) {
    profile.invoices.push(InvoiceRecord {
        invoice_number: obs.invoice_number.clone(),
        date: obs.invoice_date.clone(),
        amount: obs.total_amount,
        timestamp: Utc::now(),
    });

    for item in &obs.line_items {
        let desc = item.description.trim().to_lowercase();
        if let Some(rate) = item.rate.filter(|r| *r != 0.0) {
            if !desc.is_empty() {
                profile.prices.entry(desc).or_default().push(rate);
            }
        }
    }

    if let Some(phash) = obs.template_phash.as_deref().filter(|h| !h.is_empty()) {
        if !profile.template_hashes.iter().any(|h| h == phash) {
            profile.template_hashes.push(phash.to_string());
            if profile.template_hashes.len() > TEMPLATE_HASH_CAP {
                let excess = profile.template_hashes.len() - TEMPLATE_HASH_CAP;
                profile.template_hashes.drain(..excess);
            }
        }
    }

    if let Some(address) = obs.address.as_deref().map(str::trim).filter(|a| !a.is_empty()) {
        if !profile.addresses.iter().any(|a| a == address) {
            profile.addresses.push(address.to_string());
        }
    }

    if let Some(terms) = &obs.terms {
        profile.terms.push(terms.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile_with_invoices(amounts: &[f64], dates: &[&str]) -> VendorProfile {
        let mut p = VendorProfile::empty("v1");
        for (i, amount) in amounts.iter().enumerate() {
            p.invoices.push(InvoiceRecord {
                invoice_number: Some(format!("INV-{i}")),
                date: dates.get(i).map(|d| d.to_string()),
                amount: Some(*amount),
                timestamp: Utc::now(),
            });
        }
        p
    }

    #[test]
    fn first_template_is_baseline() {
        let p = VendorProfile::empty("v1");
        let t = template_consistency(&p, Some("aa00"));
        assert!(t.is_baseline);
        assert!(t.template_match);
        assert_eq!(t.match_score, 100);
    }

    #[test]
    fn close_template_matches() {
        let mut p = VendorProfile::empty("v1");
        p.template_hashes.push("aa00".to_string());
        let t = template_consistency(&p, Some("aa01"));
        assert!(t.template_match);
        assert_eq!(t.hamming_distance, Some(1));
        assert_eq!(t.match_score, 97);
    }

    #[test]
    fn distant_template_alerts() {
        let mut p = VendorProfile::empty("v1");
        p.template_hashes.push("0000".to_string());
        let t = template_consistency(&p, Some("ffff"));
        assert!(!t.template_match);
        assert_eq!(t.match_score, 100u32.saturating_sub(16 * 3));
        assert!(!t.alerts.is_empty());
    }

    #[test]
    fn missing_hash_is_unavailable() {
        let p = VendorProfile::empty("v1");
        let t = template_consistency(&p, None);
        assert!(!t.available);
    }

    fn item(desc: &str, rate: f64) -> LineItem {
        LineItem {
            description: desc.to_string(),
            quantity: Some(1.0),
            rate: Some(rate),
            amount: Some(rate),
        }
    }

    #[test]
    fn no_price_history_reports_reason() {
        let p = VendorProfile::empty("v1");
        let v = pricing_variance(&p, &[item("widget", 10.0)]);
        assert!(!v.variance_detected);
        assert_eq!(v.items_checked, 0);
        assert!(v.reason.unwrap().contains("No historical pricing"));
    }

    #[test]
    fn price_spike_detected_via_fuzzy_description() {
        let mut p = VendorProfile::empty("v1");
        p.prices
            .insert("steel bolts 10mm".to_string(), vec![100.0, 102.0, 98.0]);
        let v = pricing_variance(&p, &[item("Steel Bolts 10mm", 150.0)]);
        assert!(v.variance_detected);
        assert_eq!(v.items_checked, 1);
        assert!(v.item_details[0].variance_pct > 25.0);
    }

    #[test]
    fn stable_price_passes_with_trend() {
        let mut p = VendorProfile::empty("v1");
        p.prices
            .insert("widget".to_string(), vec![10.0, 11.0, 12.0]);
        let v = pricing_variance(&p, &[item("widget", 12.0)]);
        assert!(!v.variance_detected);
        assert_eq!(v.item_details[0].trend, PriceTrend::Increasing);
    }

    #[test]
    fn unmatched_description_is_skipped() {
        let mut p = VendorProfile::empty("v1");
        p.prices.insert("widget".to_string(), vec![10.0]);
        let v = pricing_variance(&p, &[item("completely different thing", 99.0)]);
        assert_eq!(v.items_checked, 0);
    }

    #[test]
    fn short_history_skips_frequency_analysis() {
        let p = profile_with_invoices(&[100.0, 200.0], &[]);
        let f = frequency_patterns(&p);
        assert!(f.pattern_normal);
        assert!(f.reason.unwrap().contains("Insufficient history"));
    }

    #[test]
    fn amount_spike_flagged() {
        let p = profile_with_invoices(&[100.0, 110.0, 105.0, 500.0], &[]);
        let f = frequency_patterns(&p);
        assert!(!f.pattern_normal);
        assert!(f.alerts.iter().any(|a| a.contains("x the average")));
    }

    #[test]
    fn round_number_ratio_flagged() {
        let p = profile_with_invoices(&[5000.0, 10000.0, 2000.0, 7000.0, 3000.0], &[]);
        let f = frequency_patterns(&p);
        assert!(f.alerts.iter().any(|a| a.contains("round numbers")));
    }

    #[test]
    fn cadence_spike_flagged() {
        let p = profile_with_invoices(
            &[100.0, 100.0, 100.0, 100.0],
            &["2024-01-01", "2024-02-01", "2024-03-01", "2024-03-02"],
        );
        let f = frequency_patterns(&p);
        assert!(f.alerts.iter().any(|a| a.contains("frequency spike")));
    }

    #[test]
    fn missing_address_is_data_missing() {
        let p = VendorProfile::empty("v1");
        let a = address_consistency(&p, None);
        assert!(a.data_missing);
        assert!(a.consistent);
    }

    #[test]
    fn first_address_is_baseline() {
        let p = VendorProfile::empty("v1");
        let a = address_consistency(&p, Some("12 MG Road, Pune"));
        assert!(a.consistent);
        assert!(a.reason.unwrap().contains("First address"));
    }

    #[test]
    fn changed_address_alerts() {
        let mut p = VendorProfile::empty("v1");
        p.addresses.push("12 MG Road, Pune 411001".to_string());
        let a = address_consistency(&p, Some("99 Industrial Estate, Mumbai 400001"));
        assert!(!a.consistent);
        assert!(!a.alerts.is_empty());
    }

    #[test]
    fn near_identical_address_passes() {
        let mut p = VendorProfile::empty("v1");
        p.addresses.push("12 MG Road, Pune 411001".to_string());
        let a = address_consistency(&p, Some("12 M.G. Road, Pune 411001"));
        assert!(a.consistent, "score was {}", a.match_score);
    }

    #[test]
    fn shortened_payment_terms_alert_names_vendor_benefit() {
        let mut p = VendorProfile::empty("v1");
        p.terms.push(TermsSnapshot {
            payment_days: Some(45),
            warranty_months: Some(12),
        });
        let t = terms_variance(
            &p,
            Some(&TermsSnapshot {
                payment_days: Some(15),
                warranty_months: Some(12),
            }),
        );
        assert!(t.variance_detected);
        assert!(t.alerts[0].contains("vendor benefit"));
    }

    #[test]
    fn warranty_reduction_alerts() {
        let mut p = VendorProfile::empty("v1");
        p.terms.push(TermsSnapshot {
            payment_days: Some(30),
            warranty_months: Some(24),
        });
        let t = terms_variance(
            &p,
            Some(&TermsSnapshot {
                payment_days: Some(30),
                warranty_months: Some(6),
            }),
        );
        assert!(t.variance_detected);
        assert!(t.alerts[0].contains("Warranty reduced"));
    }

    #[test]
    fn record_invoice_applies_every_update() {
        let mut p = VendorProfile::empty("v1");
        record_invoice(
            &mut p,
            &InvoiceObservation {
                invoice_number: Some("INV-1".to_string()),
                invoice_date: Some("2024-03-15".to_string()),
                total_amount: Some(1180.0),
                line_items: vec![item("widget", 10.0)],
                template_phash: Some("aa00".to_string()),
                address: Some("12 MG Road".to_string()),
                terms: Some(TermsSnapshot {
                    payment_days: Some(30),
                    warranty_months: None,
                }),
            },
        );
        assert_eq!(p.invoices.len(), 1);
        assert_eq!(p.prices["widget"], vec![10.0]);
        assert_eq!(p.template_hashes, vec!["aa00".to_string()]);
        assert_eq!(p.addresses, vec!["12 MG Road".to_string()]);
        assert_eq!(p.terms.len(), 1);
    }

    #[test]
    fn template_hashes_are_capped() {
        let mut p = VendorProfile::empty("v1");
        for i in 0..25 {
            record_invoice(
                &mut p,
                &InvoiceObservation {
                    template_phash: Some(format!("{i:04x}")),
                    ..InvoiceObservation::default()
                },
            );
        }
        assert_eq!(p.template_hashes.len(), 20);
        assert_eq!(p.template_hashes[0], "0005");
    }
}
