//! Key derivation for SearchTerm
//!
//! A key is the SHA-256 digest of the UTF-8 input, truncated to its first
//! [`KEY_BYTES`] bytes and rendered as lowercase hex. No salt: equal inputs
//! always produce equal keys.

use sha2::{Digest, Sha256};

/// Number of digest bytes kept in a key.
pub const KEY_BYTES: usize = 24;

/// Length of a key in hex characters.
pub const KEY_HEX_LEN: usize = KEY_BYTES * 2;

/// 32-byte cryptographic hash primitive.
pub trait Hasher {
    fn digest(&self, data: &[u8]) -> [u8; 32];
}

/// SHA-256 via the `sha2` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Hasher;

impl Hasher for Sha256Hasher {
    #[inline]
    fn digest(&self, data: &[u8]) -> [u8; 32] {
        Sha256::digest(data).into()
    }
}

impl<H: Hasher + ?Sized> Hasher for &H {
    fn digest(&self, data: &[u8]) -> [u8; 32] {
        (**self).digest(data)
    }
}

/// Derive a key with an explicit hasher.
pub fn key_with<H: Hasher + ?Sized>(hasher: &H, input: &str) -> String {
    let digest = hasher.digest(input.as_bytes());
    hex::encode(&digest[..KEY_BYTES])
}

/// Derive a key with SHA-256.
#[inline]
pub fn key_for(input: &str) -> String {
    key_with(&Sha256Hasher, input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_length_and_charset() {
        for input in ["", "google.com", "hello world", "日本語"] {
            let key = key_for(input);
            assert_eq!(key.len(), KEY_HEX_LEN, "key_for({input:?}) has wrong length");
            assert!(key.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')));
        }
    }

    #[test]
    fn test_key_is_truncated_sha256() {
        // SHA-256("abc") = ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad
        assert_eq!(
            key_for("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9c"
        );
    }

    #[test]
    fn test_key_deterministic() {
        assert_eq!(key_for("example.com"), key_for("example.com"));
    }

    #[test]
    fn test_key_different_inputs() {
        assert_ne!(key_for("example.com"), key_for("example.org"));
    }

    #[test]
    fn test_key_with_custom_hasher() {
        struct Constant;
        impl Hasher for Constant {
            fn digest(&self, _data: &[u8]) -> [u8; 32] {
                [0xab; 32]
            }
        }
        assert_eq!(key_with(&Constant, "anything"), "ab".repeat(KEY_BYTES));
    }
}
