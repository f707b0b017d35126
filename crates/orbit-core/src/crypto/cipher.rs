//! AES-256-GCM record encryption.
//!
//! Each record's stored form is self-contained: a fresh 12-byte nonce is
//! generated per call and travels with the ciphertext, so no record
//! depends on any other record's encryption state. The output is a single
//! transport-safe string: `base64(nonce || ciphertext || tag)`.

use aes_gcm::aead::Aead;
use aes_gcm::{Aes256Gcm, KeyInit, Nonce};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;

use crate::crypto::key::DerivedKey;
use crate::error::{OrbitError, Result};

/// AES-GCM nonce length in bytes.
const NONCE_LENGTH: usize = 12;

/// Encrypt a plaintext string under the given key.
///
/// # Errors
///
/// Returns `OrbitError::Crypto` if the cipher cannot be constructed, the
/// nonce cannot be generated, or encryption fails.
pub fn encrypt_string(key: &DerivedKey, plaintext: &str) -> Result<String> {
    let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| OrbitError::Crypto(format!("AES key init failed: {}", e)))?;

    let mut nonce = [0u8; NONCE_LENGTH];
    OsRng
        .try_fill_bytes(&mut nonce)
        .map_err(|e| OrbitError::Crypto(format!("Nonce generation failed: {}", e)))?;

    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce), plaintext.as_bytes())
        .map_err(|e| OrbitError::Crypto(format!("AES-GCM encrypt failed: {}", e)))?;

    let mut out = Vec::with_capacity(NONCE_LENGTH + ciphertext.len());
    out.extend_from_slice(&nonce);
    out.extend_from_slice(&ciphertext);
    Ok(BASE64.encode(out))
}

/// Decrypt a string produced by [`encrypt_string`].
///
/// # Errors
///
/// Returns `OrbitError::Crypto` if the input is not valid base64, is too
/// short to carry a nonce, fails authentication (wrong key or tampered
/// data), or does not decode to UTF-8.
pub fn decrypt_string(key: &DerivedKey, encoded: &str) -> Result<String> {
    let raw = BASE64
        .decode(encoded)
        .map_err(|e| OrbitError::Crypto(format!("Ciphertext is not valid base64: {}", e)))?;

    if raw.len() <= NONCE_LENGTH {
        return Err(OrbitError::Crypto(
            "Encrypted payload too short".to_string(),
        ));
    }

    let (nonce, ciphertext) = raw.split_at(NONCE_LENGTH);
    let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| OrbitError::Crypto(format!("AES key init failed: {}", e)))?;

    let plaintext = cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|e| OrbitError::Crypto(format!("AES-GCM decrypt failed: {}", e)))?;

    String::from_utf8(plaintext)
        .map_err(|e| OrbitError::Crypto(format!("Decrypted payload is not UTF-8: {}", e)))
}
