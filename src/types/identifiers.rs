use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest as _, Sha256};

/// Number of hex characters kept from the SHA-256 output (64 bits).
pub const DIGEST_LENGTH: usize = 16;

/// Truncated content hash used as a cache key.
///
/// Identical input bytes always yield the identical digest. Truncation to
/// 64 bits is acceptable for the number of slides and decks a cache holds;
/// this is a deduplication key, not a security boundary.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Digest(String);

impl Digest {
    /// Digest of raw encoded bytes (an uploaded deck).
    pub fn of_bytes(content: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(content);

        let hash = hasher.finalize();
        let mut hex = hex::encode(hash);
        hex.truncate(DIGEST_LENGTH);

        Digest(hex)
    }

    /// Digest of a decoded pixel buffer.
    ///
    /// Hashing pixels rather than a file encoding means two decks that render
    /// the same slide share one cache entry, however each was encoded.
    pub fn of_pixels(pixels: &[u8]) -> Self {
        Self::of_bytes(pixels)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Addresses one question: slide ordinal (1-based) and index within that
/// slide's list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CandidateRef {
    pub slide: u32,
    pub index: usize,
}

impl CandidateRef {
    pub fn new(slide: u32, index: usize) -> Self {
        Self { slide, index }
    }
}
