//! Statistical anomaly detection over accumulated invoice features
//! (check 5.2).

use std::collections::BTreeMap;
use std::sync::Mutex;

use tracing::debug;

use invoiceguard_types::{
    AnomalyReport, BenfordReport, InvoiceFeatures, OutlierModelReport, ZScoreReport,
};

/// Per-feature z-score above this marks the feature as an outlier.
const Z_SCORE_THRESHOLD: f64 = 2.5;

/// Minimum accumulated samples before the outlier model runs.
const MIN_MODEL_SAMPLES: usize = 10;

/// Minimum positive amounts before the Benford test runs.
const MIN_BENFORD_SAMPLES: usize = 20;

/// Chi-squared critical value, 8 degrees of freedom, 0.05 significance.
const BENFORD_CHI_SQUARED_LIMIT: f64 = 15.507;

/// Multivariate outlier detection over the feature history.
///
/// The built-in [`DistanceOutlierModel`] is a deterministic
/// nearest-neighbour distance test; a deployment can plug in anything
/// that implements this trait.
pub trait OutlierModel: Send + Sync {
    fn name(&self) -> &str;

    /// `training` includes the current row as its last element.
    fn evaluate(&self, training: &[[f64; 4]], current: &[f64; 4]) -> OutlierModelReport;
}

/// Mean k-nearest-neighbour distance in z-normalized feature space. The
/// current row is an anomaly when its neighbour distance exceeds the
/// population's mean by two standard deviations.
#[derive(Clone, Copy, Debug, Default)]
pub struct DistanceOutlierModel {
    k: usize,
}

impl DistanceOutlierModel {
    pub fn new() -> Self {
        Self { k: 5 }
    }
}

impl OutlierModel for DistanceOutlierModel {
    fn name(&self) -> &str {
        "knn-distance"
    }

    fn evaluate(&self, training: &[[f64; 4]], current: &[f64; 4]) -> OutlierModelReport {
        let k = self.k.max(1);
        if training.len() <= k {
            return OutlierModelReport::default();
        }

        let normalized = normalize(training);
        let current_n = normalized[normalized.len() - 1];
        debug_assert_eq!(training[training.len() - 1], *current);

        let scores: Vec<f64> = normalized
            .iter()
            .enumerate()
            .map(|(i, row)| knn_distance(&normalized, i, row, k))
            .collect();

        let current_score = knn_distance(&normalized, normalized.len() - 1, &current_n, k);
        let mean = scores.iter().sum::<f64>() / scores.len() as f64;
        let std = (scores.iter().map(|s| (s - mean).powi(2)).sum::<f64>()
            / scores.len() as f64)
            .sqrt();

        OutlierModelReport {
            available: true,
            is_anomaly: std > 0.0 && current_score > mean + 2.0 * std,
            score: ((current_score) * 1000.0).round() / 1000.0,
        }
    }
}

fn normalize(rows: &[[f64; 4]]) -> Vec<[f64; 4]> {
    let n = rows.len() as f64;
    let mut means = [0.0f64; 4];
    let mut stds = [0.0f64; 4];
    for f in 0..4 {
        means[f] = rows.iter().map(|r| r[f]).sum::<f64>() / n;
        stds[f] = (rows.iter().map(|r| (r[f] - means[f]).powi(2)).sum::<f64>() / n).sqrt();
    }
    rows.iter()
        .map(|r| {
            let mut out = [0.0f64; 4];
            for f in 0..4 {
                out[f] = if stds[f] > 0.0 {
                    (r[f] - means[f]) / stds[f]
                } else {
                    0.0
                };
            }
            out
        })
        .collect()
}

fn knn_distance(rows: &[[f64; 4]], skip: usize, from: &[f64; 4], k: usize) -> f64 {
    let mut distances: Vec<f64> = rows
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != skip)
        .map(|(_, other)| {
            from.iter()
                .zip(other.iter())
                .map(|(a, b)| (a - b).powi(2))
                .sum::<f64>()
                .sqrt()
        })
        .collect();
    distances.sort_by(f64::total_cmp);
    let k = k.min(distances.len());
    distances[..k].iter().sum::<f64>() / k as f64
}

/// Accumulates invoice feature vectors and evaluates each new invoice
/// against the population seen so far.
#[derive(Debug, Default)]
pub struct AnomalyEngine {
    training: Mutex<Vec<InvoiceFeatures>>,
}

impl AnomalyEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the invoice's features and score it. The feature vector is
    /// appended before analysis; the z-score test therefore compares
    /// against every sample except the current one.
    pub fn detect(
        &self,
        features: InvoiceFeatures,
        model: Option<&dyn OutlierModel>,
    ) -> AnomalyReport {
        let mut training = self
            .training
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        training.push(features);

        let current = features.as_array();
        let z_score = z_score_analysis(&training, &current);

        let rows: Vec<[f64; 4]> = training.iter().map(InvoiceFeatures::as_array).collect();
        let outlier_model = match model {
            Some(m) if training.len() >= MIN_MODEL_SAMPLES => m.evaluate(&rows, &current),
            _ => OutlierModelReport::default(),
        };

        let benford = benford_analysis(&training);

        let mut factors = z_score.outlier_features.clone();
        if outlier_model.is_anomaly {
            factors.push("Outlier model flagged".to_string());
        }
        if !benford.benford_pass {
            factors.push("Benford's Law violation".to_string());
        }

        let mut confidence: f64 = 0.0;
        if z_score.is_outlier {
            confidence += 0.4;
        }
        if outlier_model.is_anomaly {
            confidence += 0.4;
        }
        if !benford.benford_pass {
            confidence += 0.2;
        }

        let is_anomaly = z_score.is_outlier || outlier_model.is_anomaly;
        debug!(
            is_anomaly,
            confidence,
            training_samples = training.len(),
            "anomaly detection"
        );

        AnomalyReport {
            is_anomaly,
            anomaly_score: (confidence * 1000.0).round() / 10.0,
            confidence: (confidence * 100.0).round() / 100.0,
            anomaly_factors: factors,
            z_score,
            outlier_model,
            benford,
            training_samples: training.len() as u32,
        }
    }
}

fn z_score_analysis(training: &[InvoiceFeatures], current: &[f64; 4]) -> ZScoreReport {
    if training.len() < 3 {
        return ZScoreReport::default();
    }

    let prior = &training[..training.len() - 1];
    let mut z_scores = BTreeMap::new();
    let mut outlier_features = Vec::new();

    for (i, name) in InvoiceFeatures::NAMES.iter().enumerate() {
        let values: Vec<f64> = prior.iter().map(|f| f.as_array()[i]).collect();
        let mean = values.iter().sum::<f64>() / values.len() as f64;
        let std =
            (values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64).sqrt();
        if std > 0.0 {
            let z = (current[i] - mean).abs() / std;
            z_scores.insert((*name).to_string(), (z * 100.0).round() / 100.0);
            if z > Z_SCORE_THRESHOLD {
                outlier_features.push(format!("{name} (z={z:.1})"));
            }
        }
    }

    ZScoreReport {
        available: true,
        is_outlier: !outlier_features.is_empty(),
        z_scores,
        outlier_features,
    }
}

fn benford_analysis(training: &[InvoiceFeatures]) -> BenfordReport {
    let amounts: Vec<f64> = training
        .iter()
        .map(|f| f.amount)
        .filter(|a| *a > 0.0)
        .collect();
    if amounts.len() < MIN_BENFORD_SAMPLES {
        return BenfordReport {
            reason: Some("Need 20+ invoices".to_string()),
            ..BenfordReport::default()
        };
    }

    let first_digits: Vec<u32> = amounts.iter().filter_map(|a| first_digit(*a)).collect();
    if first_digits.is_empty() {
        return BenfordReport::default();
    }

    let total = first_digits.len() as f64;
    let mut chi_squared = 0.0;
    let mut observed_distribution = BTreeMap::new();
    for d in 1u32..10 {
        let observed = first_digits.iter().filter(|x| **x == d).count() as f64 / total;
        observed_distribution.insert(d.to_string(), (observed * 1000.0).round() / 1000.0);
        let expected = (1.0 + 1.0 / d as f64).log10();
        chi_squared += (observed - expected).powi(2) / expected;
    }

    BenfordReport {
        available: true,
        benford_pass: chi_squared < BENFORD_CHI_SQUARED_LIMIT,
        chi_squared: Some((chi_squared * 1000.0).round() / 1000.0),
        observed_distribution,
        sample_size: first_digits.len() as u32,
        reason: None,
    }
}

fn first_digit(amount: f64) -> Option<u32> {
    let mut a = amount.abs();
    if a == 0.0 || !a.is_finite() {
        return None;
    }
    while a >= 10.0 {
        a /= 10.0;
    }
    while a < 1.0 {
        a *= 10.0;
    }
    Some(a.trunc() as u32)
}
