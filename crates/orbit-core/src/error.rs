//! Error types for Orbit core operations.
//!
//! This module defines the error hierarchy for all core operations.
//! Errors are descriptive at the core level; the application shell maps
//! these to user-facing messages.

use thiserror::Error;

/// Result type alias for Orbit operations.
pub type Result<T> = std::result::Result<T, OrbitError>;

/// Core error type for Orbit operations.
#[derive(Debug, Error)]
pub enum OrbitError {
    /// Vault unlock failed. Every derivation-path failure collapses into
    /// this variant; callers cannot distinguish a wrong passphrase from a
    /// corrupt salt.
    #[error("Invalid vault password")]
    InvalidVaultPassword,

    /// Encryption or decryption error
    #[error("Encryption error: {0}")]
    Crypto(String),

    /// Storage backend error (generic)
    #[error("Storage error: {0}")]
    Storage(String),

    /// SQLite-specific storage error
    #[error("SQLite error: {source}")]
    Sqlite {
        #[from]
        source: rusqlite::Error,
    },

    /// Remote backend rejected a request
    #[error("Remote backend error: {0}")]
    Remote(String),

    /// HTTP transport failure on the remote path
    #[error("HTTP request failed: {source}")]
    Http {
        #[from]
        source: reqwest::Error,
    },

    /// Generic resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid caller input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// I/O error
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization error
    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },
}
