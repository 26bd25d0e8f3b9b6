//! Hothash calculation: SHA-256 over hotpreview bytes.
//!
//! The hothash is the image's primary content identity. It is computed
//! over the hotpreview's final encoded JPEG bytes only, never over the
//! source bytes or the cold preview, so the same pixels
//! re-encoded at a different quality get a different identity.

use sha2::{Digest, Sha256};

/// Compute the SHA-256 hex digest of the given bytes.
///
/// Returns 64 lowercase hex characters. Pure and stateless.
pub fn calculate(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    format!("{digest:x}")
}

/// Check whether `bytes` hash to `expected`.
pub fn verify(bytes: &[u8], expected: &str) -> bool {
    calculate(bytes) == expected
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_digest() {
        // SHA-256 of "hello"
        assert_eq!(
            calculate(b"hello"),
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
    }

    #[test]
    fn test_digest_shape() {
        let hash = calculate(b"");
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_determinism() {
        assert_eq!(calculate(b"same bytes"), calculate(b"same bytes"));
        assert_ne!(calculate(b"a"), calculate(b"b"));
    }

    #[test]
    fn test_verify() {
        let hash = calculate(b"payload");
        assert!(verify(b"payload", &hash));
        assert!(!verify(b"other", &hash));
    }
}
