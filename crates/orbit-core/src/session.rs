//! Vault lock state.
//!
//! A [`VaultSession`] carries the currently active encryption key, if any.
//! It is an explicit value passed to every codec and store call rather
//! than ambient process state, so tests construct a fresh session each and
//! there is no hidden cross-test contamination.
//!
//! Encryption is opportunistic: with no key set, both directions pass
//! input through unchanged. A vault can therefore be relocked without
//! re-migrating already-stored plaintext records; they stay readable until
//! the next write re-wraps them.

use crate::crypto::{self, DerivedKey};
use crate::error::Result;

/// Lock state for one vault: either holds the unlocked key or nothing.
///
/// The key is never persisted. Its lifecycle is explicit unlock (a
/// successful derivation sets it) and explicit lock (logout or restart
/// clears it).
#[derive(Debug, Default)]
pub struct VaultSession {
    key: Option<DerivedKey>,
}

impl VaultSession {
    /// A locked session with no active key.
    pub fn locked() -> Self {
        Self::default()
    }

    /// A session unlocked with the given key.
    pub fn unlocked(key: DerivedKey) -> Self {
        Self { key: Some(key) }
    }

    /// Replace the active key. `None` locks the session.
    pub fn set_key(&mut self, key: Option<DerivedKey>) {
        self.key = key;
    }

    pub fn is_unlocked(&self) -> bool {
        self.key.is_some()
    }

    /// Encrypt a plaintext string, or return it unchanged when locked.
    pub fn encrypt(&self, plaintext: &str) -> Result<String> {
        match &self.key {
            Some(key) => crypto::encrypt_string(key, plaintext),
            None => Ok(plaintext.to_string()),
        }
    }

    /// Decrypt a stored string, or return it unchanged when locked.
    ///
    /// Decryption failures (wrong key, corrupt data, bad auth tag) do not
    /// propagate: the raw input is returned so a damaged record degrades
    /// to unreadable content instead of aborting the caller.
    pub fn decrypt(&self, stored: &str) -> String {
        match &self.key {
            Some(key) => match crypto::decrypt_string(key, stored) {
                Ok(plaintext) => plaintext,
                Err(e) => {
                    log::warn!("Record decryption failed, passing through raw payload: {}", e);
                    stored.to_string()
                }
            },
            None => stored.to_string(),
        }
    }
}
