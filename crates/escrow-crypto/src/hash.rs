//! Hashing utilities

use sha2::{Digest, Sha256};

/// Compute SHA-256 hash of data
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Compute hash of multiple items
pub fn hash_all(items: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    for item in items {
        hasher.update(item);
    }
    hasher.finalize().into()
}

/// Typed hash: `sha256(sha256(typ) || key)`
///
/// Hashing the type name first keeps address families (plain modules,
/// module-derived accounts) in disjoint preimage domains.
pub fn typed_hash(typ: &str, key: &[u8]) -> [u8; 32] {
    let type_hash = sha256(typ.as_bytes());
    hash_all(&[&type_hash, key])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256() {
        let hash = sha256(b"");
        assert_eq!(hash[..4], [0xe3, 0xb0, 0xc4, 0x42]);
    }

    #[test]
    fn test_hash_all_matches_concatenation() {
        assert_eq!(hash_all(&[b"ab", b"cd"]), sha256(b"abcd"));
    }

    #[test]
    fn test_typed_hash_separates_domains() {
        assert_ne!(typed_hash("module", b"x"), typed_hash("account", b"x"));
        assert_ne!(typed_hash("module", b"x"), sha256(b"x"));
    }
}
