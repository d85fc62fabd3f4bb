//! Authenticated symmetric encryption for stegvault.
//!
//! Tokens are sealed with ChaCha20-Poly1305. The layout is:
//!
//! ```text
//! version (1) || issued_at (8, big-endian unix seconds) || nonce (12) || ciphertext || tag (16)
//! ```
//!
//! `version || issued_at` is bound as associated data, so the timestamp is
//! covered by the same tag as the ciphertext. Any failure to open a token is
//! reported as [`SymmetricError::AuthenticationFailed`].

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use chacha20poly1305::{
    aead::{Aead, KeyInit, Payload},
    ChaCha20Poly1305, Key, Nonce,
};
use rand::rngs::OsRng;
use rand::RngCore;
use thiserror::Error;

use super::kdf::KEY_LEN;

/// Token format version.
const TOKEN_VERSION: u8 = 0x01;

/// Version byte plus timestamp.
const HEADER_SIZE: usize = 1 + 8;

/// Nonce size for ChaCha20Poly1305.
const NONCE_SIZE: usize = 12;

/// Poly1305 tag size.
const TAG_SIZE: usize = 16;

/// Bytes a token adds on top of its plaintext.
pub const TOKEN_OVERHEAD: usize = HEADER_SIZE + NONCE_SIZE + TAG_SIZE;

/// Tolerated clock skew for tokens stamped in the future.
const MAX_CLOCK_SKEW_SECS: u64 = 60;

/// Errors that can occur during symmetric encryption.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SymmetricError {
    #[error("Encryption failed")]
    EncryptionFailed,

    #[error("Authentication failed: wrong password or corrupted data")]
    AuthenticationFailed,

    #[error("Token outside its validity window (issued at {issued_at}, now {now})")]
    TokenExpired { issued_at: u64, now: u64 },
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Encrypts `plaintext` into a self-contained token stamped with the current time.
pub fn encrypt(key: &[u8; KEY_LEN], plaintext: &[u8]) -> Result<Vec<u8>, SymmetricError> {
    encrypt_at(key, plaintext, unix_now())
}

fn encrypt_at(
    key: &[u8; KEY_LEN],
    plaintext: &[u8],
    issued_at: u64,
) -> Result<Vec<u8>, SymmetricError> {
    let mut header = [0u8; HEADER_SIZE];
    header[0] = TOKEN_VERSION;
    header[1..].copy_from_slice(&issued_at.to_be_bytes());

    let mut nonce_bytes = [0u8; NONCE_SIZE];
    OsRng.fill_bytes(&mut nonce_bytes);

    let cipher = ChaCha20Poly1305::new(Key::from_slice(key));
    let ciphertext = cipher
        .encrypt(
            Nonce::from_slice(&nonce_bytes),
            Payload {
                msg: plaintext,
                aad: &header,
            },
        )
        .map_err(|_| SymmetricError::EncryptionFailed)?;

    let mut token = Vec::with_capacity(HEADER_SIZE + NONCE_SIZE + ciphertext.len());
    token.extend_from_slice(&header);
    token.extend_from_slice(&nonce_bytes);
    token.extend_from_slice(&ciphertext);

    Ok(token)
}

/// Verifies and decrypts a token. Returns `(issued_at, plaintext)`.
fn open(key: &[u8; KEY_LEN], token: &[u8]) -> Result<(u64, Vec<u8>), SymmetricError> {
    if token.len() < TOKEN_OVERHEAD || token[0] != TOKEN_VERSION {
        return Err(SymmetricError::AuthenticationFailed);
    }

    let (header, rest) = token.split_at(HEADER_SIZE);
    let (nonce_bytes, ciphertext) = rest.split_at(NONCE_SIZE);

    let cipher = ChaCha20Poly1305::new(Key::from_slice(key));
    let plaintext = cipher
        .decrypt(
            Nonce::from_slice(nonce_bytes),
            Payload {
                msg: ciphertext,
                aad: header,
            },
        )
        .map_err(|_| SymmetricError::AuthenticationFailed)?;

    let issued_at = header[1..]
        .try_into()
        .map(u64::from_be_bytes)
        .map_err(|_| SymmetricError::AuthenticationFailed)?;

    Ok((issued_at, plaintext))
}

/// Decrypts a token, failing closed on any tampering or wrong key.
pub fn decrypt(key: &[u8; KEY_LEN], token: &[u8]) -> Result<Vec<u8>, SymmetricError> {
    open(key, token).map(|(_, plaintext)| plaintext)
}

/// Decrypts a token and additionally rejects it when older than `ttl`.
///
/// The age check runs only after authentication succeeds, so a forged
/// timestamp can never turn an authentication failure into an expiry.
pub fn decrypt_with_ttl(
    key: &[u8; KEY_LEN],
    token: &[u8],
    ttl: Duration,
) -> Result<Vec<u8>, SymmetricError> {
    let (issued_at, plaintext) = open(key, token)?;
    check_freshness(issued_at, unix_now(), ttl)?;
    Ok(plaintext)
}

fn check_freshness(issued_at: u64, now: u64, ttl: Duration) -> Result<(), SymmetricError> {
    let too_old = now.saturating_sub(issued_at) > ttl.as_secs();
    let from_future = issued_at > now.saturating_add(MAX_CLOCK_SKEW_SECS);
    if too_old || from_future {
        return Err(SymmetricError::TokenExpired { issued_at, now });
    }
    Ok(())
}
