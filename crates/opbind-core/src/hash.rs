//! Stable hashing for registry fingerprints.

use blake3::Hasher;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Hash256(pub [u8; 32]);

impl Hash256 {
    pub fn to_hex(&self) -> String {
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

/// Incremental hasher over a sequence of serde values, in order.
pub struct SerdeHasher {
    inner: Hasher,
}

impl SerdeHasher {
    pub fn new() -> Self {
        Self {
            inner: Hasher::new(),
        }
    }

    /// Feed one value (JSON-encoded, length-prefixed so boundaries can't blur).
    pub fn update<T: Serialize>(&mut self, v: &T) -> Result<(), crate::error::Error> {
        let bytes = serde_json::to_vec(v).map_err(|e| crate::error::Error::Hash(e.to_string()))?;
        self.inner.update(&(bytes.len() as u64).to_le_bytes());
        self.inner.update(&bytes);
        Ok(())
    }

    pub fn finish(&self) -> Hash256 {
        Hash256(self.inner.finalize().into())
    }
}

impl Default for SerdeHasher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_matters() {
        let mut a = SerdeHasher::new();
        a.update(&"x").unwrap();
        a.update(&"y").unwrap();
        let mut b = SerdeHasher::new();
        b.update(&"y").unwrap();
        b.update(&"x").unwrap();
        assert_ne!(a.finish(), b.finish());
        assert_eq!(a.finish().to_hex().len(), 64);
    }

    #[test]
    fn unserializable_value_is_a_hash_error() {
        use std::collections::BTreeMap;

        let mut by_pair = BTreeMap::new();
        by_pair.insert((1, 2), "non-string keys have no JSON form");
        let err = SerdeHasher::new().update(&by_pair).unwrap_err();
        assert!(matches!(err, crate::error::Error::Hash(_)));
        assert!(err.to_string().starts_with("hashing error"));
    }
}
