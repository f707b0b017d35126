//! Record backend strategy.
//!
//! The facade talks to exactly one [`RecordBackend`], injected at
//! construction: either the on-device store or a remote row-CRUD client.
//! Callers pick the backend once per facade instance; there is no ambient
//! configuration re-read on every call.
//!
//! All implementations must ensure:
//! - Inserts are idempotent upserts by record id (import reuses them)
//! - Deletes of absent ids are no-ops
//! - Bulk deletes are sequences of independent single-record operations
//!   with no cross-record atomicity

mod local;
mod remote;

pub use local::LocalBackend;
pub use remote::{RemoteBackend, RemoteConfig};

use crate::crypto::SALT_LENGTH;
use crate::error::Result;
use crate::model::{Folder, LogEntry, Project, ProjectPatch};
use crate::session::VaultSession;

/// Storage strategy behind the persistence facade.
///
/// Every data operation receives the caller's [`VaultSession`] so the
/// local path can wrap and unwrap records under the current lock state;
/// the remote path ignores it (rows are protected server-side).
pub trait RecordBackend: Send + Sync {
    /// The persisted key-derivation salt, created on first use.
    ///
    /// Returns `None` when this backend has no at-rest encryption (the
    /// remote path); unlocking is then not meaningful.
    fn vault_salt(&self) -> Result<Option<[u8; SALT_LENGTH]>>;

    // --- Folder operations ---

    /// All folders, in no guaranteed order.
    fn folders(&self, session: &VaultSession, user_id: &str) -> Result<Vec<Folder>>;

    /// Insert-or-replace a folder by id.
    fn upsert_folder(&self, session: &VaultSession, user_id: &str, folder: &Folder) -> Result<()>;

    /// Remove a folder. Does NOT cascade to its projects.
    fn delete_folder(&self, user_id: &str, folder_id: &str) -> Result<()>;

    // --- Project operations ---

    /// All projects, in no guaranteed order.
    fn projects(&self, session: &VaultSession, user_id: &str) -> Result<Vec<Project>>;

    /// Insert-or-replace a project by id.
    fn upsert_project(&self, session: &VaultSession, user_id: &str, project: &Project)
        -> Result<()>;

    /// Apply a partial patch to a project and stamp `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns `OrbitError::NotFound` if the project does not exist.
    fn update_project(
        &self,
        session: &VaultSession,
        user_id: &str,
        project_id: &str,
        patch: &ProjectPatch,
        updated_at: i64,
    ) -> Result<()>;

    /// Remove projects one by one; absent ids are skipped silently.
    fn delete_projects(&self, user_id: &str, project_ids: &[String]) -> Result<()>;

    // --- Log operations ---

    /// All logs, in no guaranteed order.
    fn logs(&self, session: &VaultSession, user_id: &str) -> Result<Vec<LogEntry>>;

    /// Insert-or-replace a log entry by id.
    fn upsert_log(&self, session: &VaultSession, user_id: &str, log: &LogEntry) -> Result<()>;

    /// Replace a log entry's content in place. `created_at` is never
    /// touched.
    ///
    /// # Errors
    ///
    /// Returns `OrbitError::NotFound` if the log does not exist.
    fn update_log_content(
        &self,
        session: &VaultSession,
        user_id: &str,
        log_id: &str,
        content: &str,
    ) -> Result<()>;

    /// Remove a log entry.
    fn delete_log(&self, user_id: &str, log_id: &str) -> Result<()>;
}
