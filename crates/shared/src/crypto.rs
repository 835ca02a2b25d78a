//! Hashing helpers for values that must not be stored in the clear.

use sha2::{Digest, Sha256};

/// SHA-256 of `input`, hex encoded.
pub fn sha256_hex(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

/// Key under which a session is stored for a token's `jti`.
pub fn session_token_hash(jti: &str) -> String {
    sha256_hex(jti)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_hex_known_vector() {
        assert_eq!(
            sha256_hex("test"),
            "9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08"
        );
    }

    #[test]
    fn test_sha256_hex_empty() {
        assert_eq!(
            sha256_hex(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_session_hash_is_stable() {
        let jti = "3f1c8e0a-7d2b-4c55-9a51-0e2f7b9d1a44";
        assert_eq!(session_token_hash(jti), session_token_hash(jti));
        assert_ne!(session_token_hash(jti), jti);
        assert_eq!(session_token_hash(jti).len(), 64);
    }
}
