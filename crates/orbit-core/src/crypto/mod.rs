//! Cryptographic operations for the vault.
//!
//! - **PBKDF2-HMAC-SHA256** for passphrase key derivation (100k iterations,
//!   persisted random salt)
//! - **AES-256-GCM** for per-record authenticated encryption
//! - Key material zeroized from memory on drop
//!
//! ## Threat Model
//!
//! We defend against:
//! - Theft of the on-device store
//! - Offline brute-force attacks on the passphrase
//!
//! We do NOT defend against:
//! - Compromised OS / keylogger
//! - Access to an unlocked session / memory

pub mod cipher;
pub mod key;

pub use cipher::{decrypt_string, encrypt_string};
pub use key::{derive_key, generate_salt, DerivedKey, SALT_LENGTH};
