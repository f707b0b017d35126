//! Persistence facade.
//!
//! [`Vault`] is the single entry point the rest of the application
//! consumes: typed CRUD over folders, projects, and logs, lock state
//! transitions, and the bulk export/import operations. It orchestrates the
//! injected [`RecordBackend`] and owns the rules the storage layer
//! deliberately does not enforce: sort orders, the log-bumps-project rule,
//! and input validation.
//!
//! What it does NOT enforce, by design:
//! - cascade deletes (callers delete children first, keeping the cascade
//!   policy visible at the call site)
//! - the <=3 pinned projects per folder cap (a caller invariant)

use std::path::Path;

use crate::backend::{LocalBackend, RecordBackend, RemoteBackend, RemoteConfig};
use crate::crypto;
use crate::error::{OrbitError, Result};
use crate::export::{ImportSummary, VaultSnapshot};
use crate::id;
use crate::model::{Folder, LogEntry, LogKind, Project, ProjectDraft, ProjectPatch};
use crate::seed;
use crate::session::VaultSession;

fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// The user's vault: one backend plus the current lock state.
pub struct Vault {
    backend: Box<dyn RecordBackend>,
    session: VaultSession,
}

impl Vault {
    /// A vault over the on-device store at `path`.
    pub fn local<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::with_backend(Box::new(LocalBackend::open(path)?)))
    }

    /// A vault over a throwaway in-memory store (tests and demos).
    pub fn local_in_memory() -> Result<Self> {
        Ok(Self::with_backend(Box::new(LocalBackend::open_in_memory()?)))
    }

    /// A vault over the remote row-CRUD backend.
    pub fn remote(config: RemoteConfig) -> Self {
        Self::with_backend(Box::new(RemoteBackend::new(config)))
    }

    /// A vault over any backend. The strategy is fixed for the life of
    /// this instance; switching modes means constructing a new vault.
    pub fn with_backend(backend: Box<dyn RecordBackend>) -> Self {
        Self {
            backend,
            session: VaultSession::locked(),
        }
    }

    // --- Lock state ---

    /// Unlock the vault: derive the key from the passphrase and the
    /// persisted salt, and hold it in memory until [`Vault::lock`].
    ///
    /// # Errors
    ///
    /// Any failure along the derivation path surfaces as
    /// `OrbitError::InvalidVaultPassword`; callers cannot distinguish a
    /// wrong passphrase from a corrupt salt. Unlocking a vault whose
    /// backend has no at-rest encryption is `OrbitError::InvalidInput`.
    pub fn unlock(&mut self, passphrase: &str) -> Result<()> {
        let salt = match self.backend.vault_salt() {
            Ok(Some(salt)) => salt,
            Ok(None) => {
                return Err(OrbitError::InvalidInput(
                    "This backend has no at-rest encryption to unlock".to_string(),
                ))
            }
            Err(e) => {
                log::warn!("Salt load failed during unlock: {}", e);
                return Err(OrbitError::InvalidVaultPassword);
            }
        };

        let key =
            crypto::derive_key(passphrase, &salt).map_err(|_| OrbitError::InvalidVaultPassword)?;
        self.session.set_key(Some(key));
        Ok(())
    }

    /// Lock the vault, clearing the in-memory key. Already-stored
    /// plaintext records stay readable; envelopes stop decrypting.
    pub fn lock(&mut self) {
        self.session.set_key(None);
    }

    pub fn is_unlocked(&self) -> bool {
        self.session.is_unlocked()
    }

    // --- Folders ---

    /// All folders, sorted by their user-controlled `order_index`.
    pub fn folders(&self, user_id: &str) -> Result<Vec<Folder>> {
        let mut folders = self.backend.folders(&self.session, user_id)?;
        folders.sort_by_key(|f| f.order_index);
        Ok(folders)
    }

    pub fn create_folder(&self, user_id: &str, name: &str, order_index: i64) -> Result<Folder> {
        if name.trim().is_empty() {
            return Err(OrbitError::InvalidInput(
                "Folder name cannot be empty".to_string(),
            ));
        }

        let folder = Folder {
            id: id::generate(),
            name: name.to_string(),
            order_index,
            created_at: now_millis(),
        };
        self.backend.upsert_folder(&self.session, user_id, &folder)?;
        Ok(folder)
    }

    /// Delete a folder. Projects under it are left orphaned; callers
    /// wanting a cascade delete the projects (and their logs) first.
    pub fn delete_folder(&self, user_id: &str, folder_id: &str) -> Result<()> {
        self.backend.delete_folder(user_id, folder_id)
    }

    // --- Projects ---

    /// All projects, most recently updated first.
    pub fn projects(&self, user_id: &str) -> Result<Vec<Project>> {
        let mut projects = self.backend.projects(&self.session, user_id)?;
        projects.sort_by_key(|p| std::cmp::Reverse(p.updated_at));
        Ok(projects)
    }

    pub fn create_project(
        &self,
        user_id: &str,
        folder_id: &str,
        draft: ProjectDraft,
    ) -> Result<Project> {
        if draft.title.trim().is_empty() {
            return Err(OrbitError::InvalidInput(
                "Project title cannot be empty".to_string(),
            ));
        }

        let now = now_millis();
        let project = Project {
            id: id::generate(),
            group_id: folder_id.to_string(),
            title: draft.title,
            link: draft.link,
            visual_type: draft.visual_type,
            visual_data: draft.visual_data,
            progress: 0,
            is_pinned: false,
            created_at: now,
            updated_at: now,
        };
        self.backend
            .upsert_project(&self.session, user_id, &project)?;
        Ok(project)
    }

    /// Apply a partial patch; only provided fields change and
    /// `updated_at` is refreshed.
    pub fn update_project(
        &self,
        user_id: &str,
        project_id: &str,
        patch: ProjectPatch,
    ) -> Result<()> {
        if let Some(progress) = patch.progress {
            if progress > 100 {
                return Err(OrbitError::InvalidInput(format!(
                    "Progress must be 0-100 (got {})",
                    progress
                )));
            }
        }
        self.backend
            .update_project(&self.session, user_id, project_id, &patch, now_millis())
    }

    /// Delete projects by id, one independent operation per record.
    pub fn delete_projects(&self, user_id: &str, project_ids: &[String]) -> Result<()> {
        self.backend.delete_projects(user_id, project_ids)
    }

    // --- Logs ---

    /// All logs, newest first.
    pub fn logs(&self, user_id: &str) -> Result<Vec<LogEntry>> {
        let mut logs = self.backend.logs(&self.session, user_id)?;
        logs.sort_by_key(|l| std::cmp::Reverse(l.created_at));
        Ok(logs)
    }

    /// Record activity against a project. Adding a log also bumps the
    /// parent project's `updated_at`; a dangling project reference is
    /// logged rather than treated as an error, since the log itself is
    /// already durable.
    pub fn create_log(
        &self,
        user_id: &str,
        project_id: &str,
        content: &str,
        kind: LogKind,
    ) -> Result<LogEntry> {
        let log_entry = LogEntry {
            id: id::generate(),
            item_id: project_id.to_string(),
            kind,
            content: content.to_string(),
            created_at: now_millis(),
        };
        self.backend.upsert_log(&self.session, user_id, &log_entry)?;

        match self.backend.update_project(
            &self.session,
            user_id,
            project_id,
            &ProjectPatch::new(),
            now_millis(),
        ) {
            Ok(()) => {}
            Err(OrbitError::NotFound(_)) => {
                log::warn!(
                    "Log {} references missing project {}",
                    log_entry.id,
                    project_id
                );
            }
            Err(e) => return Err(e),
        }

        Ok(log_entry)
    }

    /// Edit a log's content in place. `created_at` never changes, and the
    /// parent project is not bumped.
    pub fn update_log(&self, user_id: &str, log_id: &str, content: &str) -> Result<()> {
        self.backend
            .update_log_content(&self.session, user_id, log_id, content)
    }

    /// Delete a log. The parent project's `updated_at` is left unchanged.
    pub fn delete_log(&self, user_id: &str, log_id: &str) -> Result<()> {
        self.backend.delete_log(user_id, log_id)
    }

    // --- Bulk operations ---

    /// Serialize the whole vault to a plaintext backup document.
    ///
    /// The export is plaintext regardless of lock state; the
    /// encryption-at-rest guarantee does not extend to backup files, and
    /// users must be told so before they write one to disk.
    pub fn export_vault(&self, user_id: &str) -> Result<String> {
        let snapshot = VaultSnapshot {
            folders: self.folders(user_id)?,
            projects: self.projects(user_id)?,
            logs: self.logs(user_id)?,
            exported_at: now_millis(),
        };
        Ok(serde_json::to_string_pretty(&snapshot)?)
    }

    /// Upsert every record of a backup document into the vault,
    /// re-wrapping each through the current encryption state.
    ///
    /// Missing collections are treated as empty. The import is a sequence
    /// of independent upserts, not a transaction: a failure partway
    /// leaves earlier records imported.
    pub fn import_vault(&self, user_id: &str, document: &str) -> Result<ImportSummary> {
        let snapshot: VaultSnapshot = serde_json::from_str(document)?;

        let mut summary = ImportSummary::default();
        for folder in &snapshot.folders {
            self.backend.upsert_folder(&self.session, user_id, folder)?;
            summary.folders += 1;
        }
        for project in &snapshot.projects {
            self.backend
                .upsert_project(&self.session, user_id, project)?;
            summary.projects += 1;
        }
        for log_entry in &snapshot.logs {
            self.backend.upsert_log(&self.session, user_id, log_entry)?;
            summary.logs += 1;
        }

        log::debug!("Imported {} record(s)", summary.total());
        Ok(summary)
    }

    /// Populate an empty vault with onboarding content. Returns `false`
    /// without touching anything when folders already exist.
    pub fn seed_demo_data(&self, user_id: &str) -> Result<bool> {
        seed::seed_demo_data(self, user_id)
    }
}
