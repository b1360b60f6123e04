//! Canonical serialization for deterministic manifest output.
//!
//! Manifest targets are compared and fingerprinted byte-for-byte, so every
//! hashed structure must serialize the same way on every run.
//!
//! ## Determinism Guarantees
//!
//! - Stable field order: struct fields serialize in declaration order
//! - Stable Vec order: library entries and asset lists are pre-sorted
//! - No HashMap allowed: use BTreeMap for maps in hashed data

use serde::Serialize;
use xxhash_rust::xxh64::xxh64;

/// Serialize a value to canonical JSON bytes.
pub fn to_canonical_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec(value)
}

/// Compute the canonical xxh64 hash of a serializable value.
pub fn canonical_hash<T: Serialize>(value: &T) -> Result<u64, serde_json::Error> {
    let bytes = to_canonical_bytes(value)?;
    Ok(xxh64(&bytes, 0))
}

/// Compute the canonical hash and return it as a hex string.
pub fn canonical_hash_hex<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    Ok(format!("{:016x}", canonical_hash(value)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[derive(Serialize)]
    struct Entry {
        name: String,
        paths: Vec<String>,
    }

    #[test]
    fn test_determinism() {
        let e = Entry {
            name: "A".to_string(),
            paths: vec!["lib/net6.0/A.dll".to_string()],
        };

        assert_eq!(canonical_hash(&e).unwrap(), canonical_hash(&e).unwrap());
        assert_eq!(canonical_hash_hex(&e).unwrap().len(), 16);
    }

    #[test]
    fn test_btreemap_order_is_insertion_independent() {
        let mut a = BTreeMap::new();
        a.insert("b", 1);
        a.insert("a", 2);

        let mut b = BTreeMap::new();
        b.insert("a", 2);
        b.insert("b", 1);

        assert_eq!(to_canonical_bytes(&a).unwrap(), to_canonical_bytes(&b).unwrap());
    }
}
