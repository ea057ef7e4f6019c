//! Stable hashing helpers for pipelines, inputs and outputs.

use blake3::Hasher;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Hash256(pub [u8; 32]);

impl Hash256 {
    pub fn to_hex(&self) -> String {
        // blake3 hex(32b) is 64 hex chars
        let mut s = String::with_capacity(64);
        for b in &self.0 {
            use std::fmt::Write as _;
            let _ = write!(&mut s, "{:02x}", b);
        }
        s
    }
}

impl std::fmt::Display for Hash256 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

pub fn hash_bytes(bytes: &[u8]) -> Hash256 {
    let mut h = Hasher::new();
    h.update(bytes);
    let out = h.finalize();
    Hash256(out.into())
}

/// Hash any serde-serializable value deterministically (via JSON).
pub fn hash_serde<T: Serialize>(v: &T) -> Result<Hash256, crate::error::Error> {
    let bytes = serde_json::to_vec(v)?;
    Ok(hash_bytes(&bytes))
}

/// Incremental digest over a sequence of serializable items.
///
/// Items are fed one at a time so the engine can digest its input without
/// keeping a copy of it. Each item is newline-terminated JSON, which keeps
/// `[1] [2]` and `[1, 2]` distinct.
pub struct StreamDigest {
    hasher: Hasher,
    count: u64,
}

impl StreamDigest {
    pub fn new() -> Self {
        Self {
            hasher: Hasher::new(),
            count: 0,
        }
    }

    pub fn update<T: Serialize>(&mut self, item: &T) -> Result<(), crate::error::Error> {
        let bytes = serde_json::to_vec(item)?;
        self.hasher.update(&bytes);
        self.hasher.update(b"\n");
        self.count += 1;
        Ok(())
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn finalize(&self) -> Hash256 {
        Hash256(self.hasher.finalize().into())
    }
}

impl Default for StreamDigest {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_is_64_chars() {
        assert_eq!(hash_bytes(b"gather").to_hex().len(), 64);
    }

    #[test]
    fn serde_hash_is_stable() {
        let a = hash_serde(&vec![1, 2, 3]).unwrap();
        let b = hash_serde(&vec![1, 2, 3]).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, hash_serde(&vec![3, 2, 1]).unwrap());
    }

    #[test]
    fn stream_digest_separates_items() {
        let mut split = StreamDigest::new();
        split.update(&vec![1]).unwrap();
        split.update(&vec![2]).unwrap();

        let mut joined = StreamDigest::new();
        joined.update(&vec![1, 2]).unwrap();

        assert_eq!(split.count(), 2);
        assert_ne!(split.finalize(), joined.finalize());
    }
}
