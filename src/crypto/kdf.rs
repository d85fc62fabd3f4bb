//! Password-based key derivation.
//!
//! Keys are derived with PBKDF2-HMAC-SHA256 over a per-payload random salt.
//! The iteration count is part of the wire contract: frames do not carry it,
//! so changing it breaks every previously hidden payload.

use pbkdf2::pbkdf2_hmac;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::Sha256;
use zeroize::Zeroizing;

/// Salt length in bytes.
pub const SALT_LEN: usize = 16;

/// Derived key length in bytes.
pub const KEY_LEN: usize = 32;

/// PBKDF2 iteration count.
pub const KDF_ITERATIONS: u32 = 100_000;

/// Symmetric key material, wiped from memory on drop.
pub type DerivedKey = Zeroizing<[u8; KEY_LEN]>;

/// Derives a 256-bit key from a password and salt.
///
/// Deterministic in `(password, salt)`; every password and salt is accepted.
pub fn derive_key(password: &str, salt: &[u8; SALT_LEN]) -> DerivedKey {
    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, KDF_ITERATIONS, &mut *key);
    key
}

/// Generates a fresh random salt from the OS RNG.
pub fn generate_salt() -> [u8; SALT_LEN] {
    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);
    salt
}
