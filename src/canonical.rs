//! Canonical serialization and content hashing.
//!
//! Two kinds of fingerprints are used in provenance records:
//!
//! - **Parameter hashes** (xxHash64 of canonical JSON) identify a drift
//!   policy configuration.
//! - **Content hashes** (SHA-256 of normalized text) identify the narrative
//!   a rewrite was made from, without storing it.
//!
//! ## Determinism Guarantees
//!
//! - Stable field order: struct fields serialize in declaration order
//! - No HashMap in hashed data: use BTreeMap / BTreeSet
//! - Content is normalized before hashing: CRLF and CR become LF, then trim

use serde::Serialize;
use sha2::{Digest, Sha256};
use xxhash_rust::xxh64::xxh64;

/// Serialize a value to canonical JSON bytes for hashing.
pub fn to_canonical_bytes<T: Serialize>(value: &T) -> Vec<u8> {
    serde_json::to_vec(value).expect("Canonical serialization failed")
}

/// Compute canonical hash of a serializable value.
pub fn canonical_hash<T: Serialize>(value: &T) -> u64 {
    let bytes = to_canonical_bytes(value);
    xxh64(&bytes, 0)
}

/// Compute canonical hash and return as hex string.
pub fn canonical_hash_hex<T: Serialize>(value: &T) -> String {
    format!("{:016x}", canonical_hash(value))
}

/// Normalize narrative text: CRLF / CR to LF, then trim.
pub fn normalize_text(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n").trim().to_string()
}

/// SHA-256 of the normalized text, as 64 lowercase hex characters.
pub fn compute_content_hash(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(normalize_text(text).as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct TestStruct {
        name: String,
        value: i32,
    }

    #[test]
    fn test_determinism() {
        let s = TestStruct {
            name: "test".to_string(),
            value: 42,
        };

        let h1 = canonical_hash(&s);
        let h2 = canonical_hash(&s);
        assert_eq!(h1, h2);
        assert_eq!(canonical_hash_hex(&s).len(), 16);
    }

    #[test]
    fn test_normalize_text() {
        assert_eq!(normalize_text("  Hello\r\nWorld\r  "), "Hello\nWorld");
        assert_eq!(normalize_text("   "), "");
    }

    #[test]
    fn test_content_hash_known_value() {
        assert_eq!(
            compute_content_hash("Hello World"),
            "a591a6d40bf420404a011733cfb7b190d62c65bf0bcda32b57b277d9ad9f146e"
        );
        assert_eq!(
            compute_content_hash("\n\n"),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_content_hash_newline_styles() {
        assert_eq!(
            compute_content_hash("a\r\nb"),
            compute_content_hash("a\nb")
        );
    }
}
