//! In-memory duplicate registries and the four duplicate checks.

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use strsim::normalized_levenshtein;
use tracing::{debug, warn};

use invoiceguard_types::{ContentDuplicate, ExactDuplicate, ImageDuplicate, NearDuplicate};

use crate::content::{cosine_similarity, term_frequencies};
use crate::hashing::{hex_hamming, ImageHasher};

/// Weighted similarity at or above this is a near-duplicate.
const NEAR_DUPLICATE_THRESHOLD: f64 = 0.85;

/// Perceptual hash hamming distance below this is a re-submission.
const PHASH_DISTANCE_THRESHOLD: u32 = 5;

/// Content cosine similarity at or above this is a duplicate.
const CONTENT_SIMILARITY_THRESHOLD: f64 = 0.90;

/// Identity fields kept per registered invoice.
#[derive(Clone, Debug)]
struct InvoiceIdentity {
    vendor_id: Option<String>,
    invoice_number: String,
    date: Option<String>,
    amount: Option<f64>,
}

#[derive(Clone, Debug)]
struct StoredImage {
    phash: String,
    dhash: String,
    file_name: String,
}

#[derive(Clone, Debug)]
struct CorpusEntry {
    terms: BTreeMap<String, f64>,
    text_hash: String,
    invoice_number: Option<String>,
}

/// Duplicate registries shared across audits.
///
/// The near check must run before the exact check registers the current
/// invoice, so that an invoice never matches itself.
#[derive(Debug, Default)]
pub struct DuplicateDetector {
    invoices: Mutex<HashMap<String, InvoiceIdentity>>,
    images: Mutex<Vec<StoredImage>>,
    corpus: Mutex<Vec<CorpusEntry>>,
}

impl DuplicateDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exact duplicate via composite identity hash. On a miss the
    /// identity is registered so the next submission of the same invoice
    /// is caught.
    pub fn check_exact(
        &self,
        vendor_id: Option<&str>,
        invoice_number: Option<&str>,
        invoice_date: Option<&str>,
        total_amount: Option<f64>,
    ) -> ExactDuplicate {
        let number = match invoice_number.filter(|n| !n.is_empty()) {
            Some(n) => n,
            None => {
                return ExactDuplicate {
                    data_missing: true,
                    alert: Some(
                        "Data Missing: No invoice number for duplicate check.".to_string(),
                    ),
                    ..ExactDuplicate::default()
                };
            }
        };

        let key = identity_hash(vendor_id, number, invoice_date, total_amount);
        let mut registry = lock(&self.invoices);

        if let Some(original) = registry.get(&key) {
            warn!(invoice_number = number, "exact duplicate submission");
            return ExactDuplicate {
                is_duplicate: true,
                similarity_score: 1.0,
                matching_invoice: Some(original.invoice_number.clone()),
                original_date: original.date.clone(),
                hash: Some(key),
                alert: Some(format!(
                    "CRITICAL: Exact duplicate of invoice {} processed on {}.",
                    original.invoice_number,
                    original.date.as_deref().unwrap_or("unknown date")
                )),
                ..ExactDuplicate::default()
            };
        }

        registry.insert(
            key.clone(),
            InvoiceIdentity {
                vendor_id: vendor_id.map(str::to_string),
                invoice_number: number.to_string(),
                date: invoice_date.map(str::to_string),
                amount: total_amount,
            },
        );
        ExactDuplicate {
            hash: Some(key),
            ..ExactDuplicate::default()
        }
    }

    /// Near-duplicate via weighted similarity over the registered
    /// identities: invoice number 30%, amount 30%, date 20%, vendor 20%.
    pub fn check_near(
        &self,
        vendor_id: Option<&str>,
        invoice_number: Option<&str>,
        invoice_date: Option<&str>,
        total_amount: Option<f64>,
    ) -> NearDuplicate {
        if invoice_number.filter(|n| !n.is_empty()).is_none() && total_amount.is_none() {
            return NearDuplicate {
                data_missing: true,
                alert: Some("Data Missing: Insufficient data for fuzzy matching.".to_string()),
                ..NearDuplicate::default()
            };
        }

        let registry = lock(&self.invoices);
        let mut best_score = 0.0f64;
        let mut best: Option<(InvoiceIdentity, BTreeMap<String, f64>)> = None;

        for record in registry.values() {
            let mut score = 0.0;
            let mut components = BTreeMap::new();

            if let Some(number) = invoice_number.filter(|n| !n.is_empty()) {
                let sim = normalized_levenshtein(number, &record.invoice_number);
                components.insert("invoice_number".to_string(), sim);
                score += sim * 0.30;
            }

            if let (Some(amount), Some(rec_amount)) = (total_amount, record.amount) {
                if rec_amount > 0.0 {
                    let sim = (1.0 - (amount - rec_amount).abs() / rec_amount).max(0.0);
                    components.insert("amount".to_string(), sim);
                    score += sim * 0.30;
                }
            }

            if let (Some(date), Some(rec_date)) = (invoice_date, record.date.as_deref()) {
                let sim = if date == rec_date { 1.0 } else { 0.5 };
                components.insert("date".to_string(), sim);
                score += sim * 0.20;
            }

            if let (Some(vendor), Some(rec_vendor)) = (vendor_id, record.vendor_id.as_deref()) {
                let sim = if vendor == rec_vendor { 1.0 } else { 0.0 };
                components.insert("vendor".to_string(), sim);
                score += sim * 0.20;
            }

            if score > best_score {
                best_score = score;
                best = Some((record.clone(), components));
            }
        }

        let best_score = (best_score * 1000.0).round() / 1000.0;
        match best {
            Some((record, components)) if best_score >= NEAR_DUPLICATE_THRESHOLD => {
                NearDuplicate {
                    is_duplicate: true,
                    best_similarity: best_score,
                    matching_invoice: Some(record.invoice_number.clone()),
                    components,
                    alert: Some(format!(
                        "Near-duplicate detected (similarity: {:.0}%). Matches invoice {}.",
                        best_score * 100.0,
                        record.invoice_number
                    )),
                    ..NearDuplicate::default()
                }
            }
            Some((_, components)) => NearDuplicate {
                best_similarity: best_score,
                components,
                ..NearDuplicate::default()
            },
            None => NearDuplicate::default(),
        }
    }

    /// Perceptual image duplicate: compare the upload's phash against all
    /// previously seen images, store first-seen hashes.
    pub fn check_image(
        &self,
        hasher: &dyn ImageHasher,
        file_name: &str,
        bytes: &[u8],
    ) -> ImageDuplicate {
        let hashes = match hasher.hashes(bytes) {
            Some(h) => h,
            None => {
                return ImageDuplicate::unavailable(format!(
                    "Image hashing not available ({}).",
                    hasher.name()
                ));
            }
        };

        let mut images = lock(&self.images);
        for stored in images.iter() {
            let p_distance = match hex_hamming(&hashes.phash, &stored.phash) {
                Some(d) => d,
                None => continue,
            };
            if p_distance < PHASH_DISTANCE_THRESHOLD {
                let d_distance = hex_hamming(&hashes.dhash, &stored.dhash);
                let modification = if p_distance == 0 {
                    "exact same image"
                } else if d_distance.is_some_and(|d| d < 3) {
                    "minor edits (brightness/crop)"
                } else {
                    "identical"
                };
                debug!(p_distance, file_name, "image duplicate");
                return ImageDuplicate {
                    is_duplicate: true,
                    hamming_distance: Some(p_distance),
                    modification: Some(modification.to_string()),
                    matching_file: Some(stored.file_name.clone()),
                    alert: Some(format!(
                        "Image matches previously processed file '{}' (hamming distance: \
                         {p_distance}). Possible re-submission.",
                        stored.file_name
                    )),
                    ..ImageDuplicate::default()
                };
            }
        }

        images.push(StoredImage {
            phash: hashes.phash.clone(),
            dhash: hashes.dhash.clone(),
            file_name: file_name.to_string(),
        });
        ImageDuplicate {
            phash: Some(hashes.phash),
            dhash: Some(hashes.dhash),
            ..ImageDuplicate::default()
        }
    }

    /// Content duplicate over extracted text. The corpus is appended
    /// after comparison whether or not a duplicate was found.
    pub fn check_content(&self, raw_text: &str, invoice_number: Option<&str>) -> ContentDuplicate {
        let trimmed = raw_text.trim();
        if trimmed.is_empty() {
            return ContentDuplicate::unavailable("No extracted text for content comparison.");
        }

        let terms = term_frequencies(trimmed);
        let text_hash = blake3::hash(trimmed.as_bytes()).to_hex().to_string();
        let mut corpus = lock(&self.corpus);

        let mut verdict = ContentDuplicate::default();
        let mut best_sim = 0.0f64;
        let mut best_match: Option<&CorpusEntry> = None;

        for entry in corpus.iter() {
            if entry.text_hash == text_hash {
                verdict = ContentDuplicate {
                    is_duplicate: true,
                    duplicate_type: Some("content-exact".to_string()),
                    best_similarity: 1.0,
                    matching_invoice: entry.invoice_number.clone(),
                    alert: Some("Exact text content match found.".to_string()),
                    ..ContentDuplicate::default()
                };
                best_match = None;
                break;
            }
            let sim = cosine_similarity(&terms, &entry.terms);
            if sim > best_sim {
                best_sim = sim;
                best_match = Some(entry);
            }
        }

        if let Some(matched) = best_match {
            let best_sim = (best_sim * 1000.0).round() / 1000.0;
            if best_sim >= CONTENT_SIMILARITY_THRESHOLD {
                verdict = ContentDuplicate {
                    is_duplicate: true,
                    duplicate_type: Some("content".to_string()),
                    best_similarity: best_sim,
                    matching_invoice: matched.invoice_number.clone(),
                    alert: Some(format!(
                        "Extracted content {:.0}% similar to invoice {}.",
                        best_sim * 100.0,
                        matched.invoice_number.as_deref().unwrap_or("unknown")
                    )),
                    ..ContentDuplicate::default()
                };
            } else {
                verdict.best_similarity = best_sim;
            }
        }

        corpus.push(CorpusEntry {
            terms,
            text_hash,
            invoice_number: invoice_number.map(str::to_string),
        });
        verdict.corpus_size = corpus.len() as u32;
        verdict
    }
}

/// Composite identity over the fields that define "the same invoice".
fn identity_hash(
    vendor_id: Option<&str>,
    invoice_number: &str,
    date: Option<&str>,
    amount: Option<f64>,
) -> String {
    let amount_part = amount
        .filter(|a| *a != 0.0)
        .map(|a| a.to_string())
        .unwrap_or_default();
    let composite = format!(
        "{}|{invoice_number}|{}|{amount_part}",
        vendor_id.unwrap_or(""),
        date.unwrap_or("")
    );
    blake3::hash(composite.as_bytes()).to_hex().to_string()
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hashing::{ImageHashes, UnavailableHasher};

    struct FixedHasher(ImageHashes);

    impl ImageHasher for FixedHasher {
        fn name(&self) -> &str {
            "fixed"
        }

        fn hashes(&self, _bytes: &[u8]) -> Option<ImageHashes> {
            Some(self.0.clone())
        }
    }

    fn hashes(phash: &str, dhash: &str) -> ImageHashes {
        ImageHashes {
            phash: phash.to_string(),
            dhash: dhash.to_string(),
            ahash: "00".to_string(),
        }
    }

    #[test]
    fn first_submission_is_not_exact_duplicate() {
        let d = DuplicateDetector::new();
        let r = d.check_exact(Some("v1"), Some("INV-1"), Some("2024-03-15"), Some(1180.0));
        assert!(!r.is_duplicate);
        assert!(r.hash.is_some());
    }

    #[test]
    fn resubmission_is_exact_duplicate() {
        let d = DuplicateDetector::new();
        d.check_exact(Some("v1"), Some("INV-1"), Some("2024-03-15"), Some(1180.0));
        let r = d.check_exact(Some("v1"), Some("INV-1"), Some("2024-03-15"), Some(1180.0));
        assert!(r.is_duplicate);
        assert_eq!(r.similarity_score, 1.0);
        assert!(r.alert.unwrap().contains("CRITICAL"));
    }

    #[test]
    fn changed_amount_is_not_exact_duplicate() {
        let d = DuplicateDetector::new();
        d.check_exact(Some("v1"), Some("INV-1"), Some("2024-03-15"), Some(1180.0));
        let r = d.check_exact(Some("v1"), Some("INV-1"), Some("2024-03-15"), Some(1181.0));
        assert!(!r.is_duplicate);
    }

    #[test]
    fn missing_invoice_number_is_data_missing() {
        let d = DuplicateDetector::new();
        let r = d.check_exact(Some("v1"), None, None, Some(100.0));
        assert!(r.data_missing);
        assert!(!r.is_duplicate);
    }

    #[test]
    fn near_duplicate_catches_tweaked_invoice_number() {
        let d = DuplicateDetector::new();
        d.check_exact(Some("v1"), Some("INV-2024-001"), Some("2024-03-15"), Some(5000.0));
        let r = d.check_near(Some("v1"), Some("INV-2024-002"), Some("2024-03-15"), Some(5000.0));
        assert!(r.is_duplicate, "similarity was {}", r.best_similarity);
        assert_eq!(r.matching_invoice.as_deref(), Some("INV-2024-001"));
        assert!(r.components["invoice_number"] > 0.9);
    }

    #[test]
    fn unrelated_invoice_is_not_near_duplicate() {
        let d = DuplicateDetector::new();
        d.check_exact(Some("v1"), Some("INV-2024-001"), Some("2024-03-15"), Some(5000.0));
        let r = d.check_near(Some("v2"), Some("BILL-77"), Some("2024-06-01"), Some(120.0));
        assert!(!r.is_duplicate);
        assert!(r.best_similarity < NEAR_DUPLICATE_THRESHOLD);
    }

    #[test]
    fn near_check_with_no_usable_fields_is_data_missing() {
        let d = DuplicateDetector::new();
        let r = d.check_near(Some("v1"), None, Some("2024-03-15"), None);
        assert!(r.data_missing);
    }

    #[test]
    fn image_duplicate_distances() {
        let d = DuplicateDetector::new();
        let first = d.check_image(&FixedHasher(hashes("aa00", "bb00")), "one.png", b"x");
        assert!(!first.is_duplicate);

        // Same phash: exact same image.
        let r = d.check_image(&FixedHasher(hashes("aa00", "bb00")), "two.png", b"y");
        assert!(r.is_duplicate);
        assert_eq!(r.modification.as_deref(), Some("exact same image"));
        assert_eq!(r.matching_file.as_deref(), Some("one.png"));

        // One bit off in phash, dhash close: minor edits.
        let r = d.check_image(&FixedHasher(hashes("aa01", "bb01")), "three.png", b"z");
        assert!(r.is_duplicate);
        assert_eq!(r.modification.as_deref(), Some("minor edits (brightness/crop)"));
    }

    #[test]
    fn distant_image_is_not_duplicate() {
        let d = DuplicateDetector::new();
        d.check_image(&FixedHasher(hashes("0000", "0000")), "one.png", b"x");
        let r = d.check_image(&FixedHasher(hashes("ffff", "ffff")), "two.png", b"y");
        assert!(!r.is_duplicate);
        assert!(r.phash.is_some());
    }

    #[test]
    fn unavailable_hasher_reports_unavailable() {
        let d = DuplicateDetector::new();
        let r = d.check_image(&UnavailableHasher, "one.png", b"x");
        assert!(!r.available);
        assert!(!r.is_duplicate);
    }

    #[test]
    fn identical_text_is_content_exact() {
        let d = DuplicateDetector::new();
        let text = "Invoice INV-1 total 1180 from Acme Traders for services rendered";
        let first = d.check_content(text, Some("INV-1"));
        assert!(!first.is_duplicate);
        assert_eq!(first.corpus_size, 1);

        let r = d.check_content(text, Some("INV-2"));
        assert!(r.is_duplicate);
        assert_eq!(r.duplicate_type.as_deref(), Some("content-exact"));
        assert_eq!(r.corpus_size, 2);
    }

    #[test]
    fn highly_similar_text_is_content_duplicate() {
        let d = DuplicateDetector::new();
        let base = "Acme Traders invoice number INV-1 taxable 1000 cgst 90 sgst 90 \
                    grand total 1180 payment due thirty days bank HDFC account";
        d.check_content(base, Some("INV-1"));
        let tweaked = "Acme Traders invoice number INV-2 taxable 1000 cgst 90 sgst 90 \
                       grand total 1180 payment due thirty days bank HDFC account";
        let r = d.check_content(tweaked, Some("INV-2"));
        assert!(r.is_duplicate, "similarity was {}", r.best_similarity);
        assert_eq!(r.duplicate_type.as_deref(), Some("content"));
    }

    #[test]
    fn different_text_is_not_content_duplicate() {
        let d = DuplicateDetector::new();
        d.check_content("completely unrelated quarterly report text", Some("A"));
        let r = d.check_content("Acme invoice for office chairs and desks", Some("B"));
        assert!(!r.is_duplicate);
        assert_eq!(r.corpus_size, 2);
    }

    #[test]
    fn empty_text_is_unavailable() {
        let d = DuplicateDetector::new();
        let r = d.check_content("   ", Some("A"));
        assert!(!r.available);
    }
}
