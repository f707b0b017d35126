//! Key derivation using PBKDF2-HMAC-SHA256.
//!
//! This module derives the vault's symmetric key from a passphrase. The
//! same (passphrase, salt) pair always re-derives the same key, so the
//! salt is persisted alongside the store while the key itself only ever
//! lives in process memory.

use pbkdf2::pbkdf2_hmac;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::Sha256;
use zeroize::ZeroizeOnDrop;

use crate::error::{OrbitError, Result};

/// PBKDF2 iteration count. High enough to make offline brute force
/// expensive on commodity hardware.
const PBKDF2_ITERATIONS: u32 = 100_000;

/// Length of the persisted salt in bytes.
pub const SALT_LENGTH: usize = 16;

/// Length of derived key in bytes (32 bytes = 256 bits for AES-256-GCM).
const KEY_LENGTH: usize = 32;

/// A symmetric key derived from a passphrase.
///
/// Key material is zeroized from memory when dropped, reducing the window
/// of exposure.
#[derive(Clone, ZeroizeOnDrop)]
pub struct DerivedKey {
    /// The raw key bytes (zeroized on drop)
    key: [u8; KEY_LENGTH],
}

impl DerivedKey {
    pub(crate) fn from_bytes(bytes: [u8; KEY_LENGTH]) -> Self {
        Self { key: bytes }
    }

    /// Get a reference to the raw key bytes.
    ///
    /// Avoid storing or logging this value. Use only for immediate
    /// encryption operations.
    pub fn as_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.key
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DerivedKey")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// Derive the vault key from a passphrase and a stored salt.
///
/// Deterministic: the same passphrase and salt always produce the same
/// key. A wrong passphrase does not fail here; it surfaces later as a
/// decryption failure on the records it cannot open.
///
/// # Errors
///
/// Returns `OrbitError::InvalidInput` for an empty passphrase or a salt
/// shorter than [`SALT_LENGTH`] bytes.
pub fn derive_key(passphrase: &str, salt: &[u8]) -> Result<DerivedKey> {
    if passphrase.is_empty() {
        return Err(OrbitError::InvalidInput(
            "Passphrase cannot be empty".to_string(),
        ));
    }

    if salt.len() < SALT_LENGTH {
        return Err(OrbitError::InvalidInput(format!(
            "Salt must be at least {} bytes",
            SALT_LENGTH
        )));
    }

    let mut key_bytes = [0u8; KEY_LENGTH];
    pbkdf2_hmac::<Sha256>(passphrase.as_bytes(), salt, PBKDF2_ITERATIONS, &mut key_bytes);

    Ok(DerivedKey::from_bytes(key_bytes))
}

/// Generate a fresh random salt for first-time key derivation.
///
/// # Errors
///
/// Returns `OrbitError::Crypto` if the OS random source is unavailable.
pub fn generate_salt() -> Result<[u8; SALT_LENGTH]> {
    let mut salt = [0u8; SALT_LENGTH];
    OsRng
        .try_fill_bytes(&mut salt)
        .map_err(|e| OrbitError::Crypto(format!("Salt generation failed: {}", e)))?;
    Ok(salt)
}
