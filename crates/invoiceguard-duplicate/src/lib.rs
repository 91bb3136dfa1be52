//! # invoiceguard-duplicate
//!
//! Duplicate invoice detection across four signals:
//!
//! - **Exact**: composite identity hash (vendor | number | date | amount)
//! - **Near**: weighted fuzzy similarity over number, amount, date, vendor
//! - **Image**: perceptual hash hamming distance (via [`ImageHasher`])
//! - **Content**: extracted-text cosine similarity
//!
//! Registries live in a [`DuplicateDetector`] and are append-on-miss for
//! the exact check and append-always for the content corpus, so a
//! re-submission is caught on its second appearance.

pub mod content;
pub mod detector;
pub mod hashing;

pub use detector::DuplicateDetector;
pub use hashing::{ImageHasher, ImageHashes, UnavailableHasher};
