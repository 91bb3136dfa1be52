//! Text similarity helpers for the content duplicate check.

use std::collections::BTreeMap;

/// Lowercased alphanumeric term frequencies.
pub fn term_frequencies(text: &str) -> BTreeMap<String, f64> {
    let mut counts: BTreeMap<String, f64> = BTreeMap::new();
    for token in text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.len() > 1)
    {
        *counts.entry(token.to_lowercase()).or_insert(0.0) += 1.0;
    }
    counts
}

/// Cosine similarity between two term-frequency vectors.
pub fn cosine_similarity(a: &BTreeMap<String, f64>, b: &BTreeMap<String, f64>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let dot: f64 = a
        .iter()
        .filter_map(|(term, wa)| b.get(term).map(|wb| wa * wb))
        .sum();
    let norm_a: f64 = a.values().map(|w| w * w).sum::<f64>().sqrt();
    let norm_b: f64 = b.values().map(|w| w * w).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_text_has_unit_similarity() {
        let tf = term_frequencies("invoice total amount due");
        let sim = cosine_similarity(&tf, &tf);
        assert!((sim - 1.0).abs() < 1e-9);
    }

    #[test]
    fn disjoint_text_has_zero_similarity() {
        let a = term_frequencies("alpha beta gamma");
        let b = term_frequencies("delta epsilon zeta");
        assert_eq!(cosine_similarity(&a, &b), 0.0);
    }

    #[test]
    fn overlapping_text_is_between_zero_and_one() {
        let a = term_frequencies("invoice total due march");
        let b = term_frequencies("invoice total due april");
        let sim = cosine_similarity(&a, &b);
        assert!(sim > 0.5 && sim < 1.0);
    }

    #[test]
    fn single_character_tokens_are_ignored() {
        let tf = term_frequencies("a b c total");
        assert_eq!(tf.len(), 1);
        assert!(tf.contains_key("total"));
    }
}
