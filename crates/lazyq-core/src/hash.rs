//! Stable hashing helpers for grouping, joining and set keys.
//!
//! Hashes come from blake3 so bucket placement is identical across runs and
//! platforms; nothing here depends on `RandomState`.

use std::hash::{Hash, Hasher};

/// `std::hash::Hasher` adapter over a blake3 stream.
pub struct StableHasher {
    inner: blake3::Hasher,
}

impl StableHasher {
    pub fn new() -> Self {
        Self {
            inner: blake3::Hasher::new(),
        }
    }
}

impl Default for StableHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher for StableHasher {
    fn finish(&self) -> u64 {
        let out = self.inner.finalize();
        let mut first = [0u8; 8];
        first.copy_from_slice(&out.as_bytes()[0..8]);
        u64::from_le_bytes(first)
    }

    fn write(&mut self, bytes: &[u8]) {
        self.inner.update(bytes);
    }
}

/// Hash any `Hash` value with the stable hasher.
pub fn stable_hash<K: Hash + ?Sized>(key: &K) -> u64 {
    let mut h = StableHasher::new();
    key.hash(&mut h);
    h.finish()
}

/// Hash a string after lowercasing it, so case variants land in one bucket.
///
/// Folds the whole string with `str::to_lowercase`, which is context
/// sensitive (final sigma). Folding char by char would hash differently.
pub fn hash_str_folded(s: &str) -> u64 {
    stable_hash(s.to_lowercase().as_str())
}
