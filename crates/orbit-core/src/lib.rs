//! # Orbit Core
//!
//! Core persistence and encryption layer for Orbit - a local-first
//! project tracker with folders, projects, and activity logs.
//!
//! This crate provides the data model, the encrypted on-device store, the
//! remote row-CRUD client, and the persistence facade, independent of any
//! UI shell.
//!
//! ## Architecture
//!
//! - **model**: domain types and derived status bands
//! - **crypto**: passphrase key derivation and per-record AES-GCM
//! - **session**: explicit vault lock state
//! - **codec**: plaintext-or-envelope at-rest record form
//! - **store**: durable three-collection SQLite store
//! - **backend**: storage strategy (local store or remote rows)
//! - **vault**: the facade the application consumes
//! - **export**: plaintext backup document
//! - **seed**: first-run onboarding content

pub mod backend;
pub mod codec;
pub mod crypto;
pub mod error;
pub mod export;
pub mod id;
pub mod model;
pub mod seed;
pub mod session;
pub mod store;
pub mod vault;

pub use backend::{LocalBackend, RecordBackend, RemoteBackend, RemoteConfig};
pub use error::{OrbitError, Result};
pub use export::{ImportSummary, VaultSnapshot};
pub use model::{
    Folder, LogEntry, LogKind, Project, ProjectDraft, ProjectPatch, Status, VisualType,
};
pub use session::VaultSession;
pub use store::{Collection, LocalStore};
pub use vault::Vault;

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
