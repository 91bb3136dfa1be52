//! Perceptual image hashing capability interface.

/// Perceptual hashes of one image, all hex-encoded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageHashes {
    /// DCT-based perceptual hash. Primary duplicate signal.
    pub phash: String,
    /// Gradient hash. Distinguishes crops/brightness edits from re-uploads.
    pub dhash: String,
    /// Mean hash. Stored for diagnostics only.
    pub ahash: String,
}

/// Produces perceptual hashes from raw image bytes.
///
/// `None` means the image could not be hashed (no backend, or the bytes
/// do not decode); the image duplicate check then reports unavailable.
pub trait ImageHasher: Send + Sync {
    fn name(&self) -> &str;

    fn hashes(&self, bytes: &[u8]) -> Option<ImageHashes>;
}

/// Hasher used when no imaging backend is configured.
#[derive(Clone, Copy, Debug, Default)]
pub struct UnavailableHasher;

impl ImageHasher for UnavailableHasher {
    fn name(&self) -> &str {
        "unavailable"
    }

    fn hashes(&self, _bytes: &[u8]) -> Option<ImageHashes> {
        None
    }
}

/// Hamming distance between two hex-encoded hashes of equal length.
pub fn hex_hamming(a: &str, b: &str) -> Option<u32> {
    if a.len() != b.len() {
        return None;
    }
    let mut distance = 0u32;
    for (ca, cb) in a.chars().zip(b.chars()) {
        let na = ca.to_digit(16)?;
        let nb = cb.to_digit(16)?;
        distance += (na ^ nb).count_ones();
    }
    Some(distance)
}
