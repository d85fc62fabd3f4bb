//! Cryptographic operations for stegvault.
//!
//! This module provides:
//! - Password-based key derivation (PBKDF2-HMAC-SHA256, salted)
//! - Authenticated encryption with a freshness timestamp (ChaCha20Poly1305)
//! - Password-level helpers that keep the derived key scoped to one call

pub mod kdf;
pub mod symmetric;

use std::time::Duration;

pub use kdf::{derive_key, generate_salt, DerivedKey, KDF_ITERATIONS, KEY_LEN, SALT_LEN};
pub use symmetric::{decrypt, decrypt_with_ttl, encrypt, SymmetricError, TOKEN_OVERHEAD};

/// Encrypts `plaintext` under a key derived from `password` and `salt`.
///
/// The derived key is dropped (and zeroed) before this function returns.
pub fn encrypt_with_password(
    plaintext: &[u8],
    password: &str,
    salt: &[u8; SALT_LEN],
) -> Result<Vec<u8>, SymmetricError> {
    let key = derive_key(password, salt);
    encrypt(&key, plaintext)
}

/// Decrypts a token produced by [`encrypt_with_password`].
///
/// With `ttl` set, tokens issued longer ago than `ttl` are rejected.
pub fn decrypt_with_password(
    token: &[u8],
    password: &str,
    salt: &[u8; SALT_LEN],
    ttl: Option<Duration>,
) -> Result<Vec<u8>, SymmetricError> {
    let key = derive_key(password, salt);
    match ttl {
        Some(ttl) => decrypt_with_ttl(&key, token, ttl),
        None => decrypt(&key, token),
    }
}
