//! Local backend over the on-device store.
//!
//! Records pass through the codec inside [`LocalStore`], so the current
//! lock state decides whether rows land as plaintext or envelopes. The
//! store is single-user: the caller's user id does not partition anything
//! here.

use std::path::Path;

use crate::codec::Decoded;
use crate::crypto::SALT_LENGTH;
use crate::error::{OrbitError, Result};
use crate::model::{Folder, LogEntry, Project, ProjectPatch};
use crate::session::VaultSession;
use crate::store::{Collection, LocalStore};

use super::RecordBackend;

/// [`RecordBackend`] over a [`LocalStore`].
pub struct LocalBackend {
    store: LocalStore,
}

impl LocalBackend {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self {
            store: LocalStore::open(path)?,
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        Ok(Self {
            store: LocalStore::open_in_memory()?,
        })
    }

    pub fn new(store: LocalStore) -> Self {
        Self { store }
    }

    /// Enumerate a collection, keeping intact records and logging the
    /// rest. An unreadable record degrades to absence here; it stays in
    /// the store untouched.
    fn intact<T: serde::de::DeserializeOwned>(
        &self,
        session: &VaultSession,
        collection: Collection,
    ) -> Result<Vec<T>> {
        let decoded = self.store.get_all::<T>(session, collection)?;
        let total = decoded.len();
        let intact: Vec<T> = decoded.into_iter().filter_map(Decoded::into_intact).collect();
        if intact.len() < total {
            log::warn!(
                "{} unreadable record(s) skipped while listing {:?}",
                total - intact.len(),
                collection
            );
        }
        Ok(intact)
    }
}

impl RecordBackend for LocalBackend {
    fn vault_salt(&self) -> Result<Option<[u8; SALT_LENGTH]>> {
        self.store.vault_salt().map(Some)
    }

    fn folders(&self, session: &VaultSession, _user_id: &str) -> Result<Vec<Folder>> {
        self.intact(session, Collection::Folders)
    }

    fn upsert_folder(&self, session: &VaultSession, _user_id: &str, folder: &Folder) -> Result<()> {
        self.store.put(session, Collection::Folders, folder)
    }

    fn delete_folder(&self, _user_id: &str, folder_id: &str) -> Result<()> {
        self.store.delete(Collection::Folders, folder_id)
    }

    fn projects(&self, session: &VaultSession, _user_id: &str) -> Result<Vec<Project>> {
        self.intact(session, Collection::Projects)
    }

    fn upsert_project(
        &self,
        session: &VaultSession,
        _user_id: &str,
        project: &Project,
    ) -> Result<()> {
        self.store.put(session, Collection::Projects, project)
    }

    fn update_project(
        &self,
        session: &VaultSession,
        _user_id: &str,
        project_id: &str,
        patch: &ProjectPatch,
        updated_at: i64,
    ) -> Result<()> {
        let decoded = self
            .store
            .get::<Project>(session, Collection::Projects, project_id)?
            .ok_or_else(|| OrbitError::NotFound(format!("Project {}", project_id)))?;

        let mut project = decoded.into_intact().ok_or_else(|| {
            OrbitError::Storage(format!("Project {} is unreadable", project_id))
        })?;

        project.apply(patch);
        project.updated_at = updated_at;
        self.store.put(session, Collection::Projects, &project)
    }

    fn delete_projects(&self, _user_id: &str, project_ids: &[String]) -> Result<()> {
        // Independent single-record deletes; a failure partway leaves the
        // earlier deletions in place.
        for id in project_ids {
            self.store.delete(Collection::Projects, id)?;
        }
        Ok(())
    }

    fn logs(&self, session: &VaultSession, _user_id: &str) -> Result<Vec<LogEntry>> {
        self.intact(session, Collection::Logs)
    }

    fn upsert_log(&self, session: &VaultSession, _user_id: &str, log: &LogEntry) -> Result<()> {
        self.store.put(session, Collection::Logs, log)
    }

    fn update_log_content(
        &self,
        session: &VaultSession,
        _user_id: &str,
        log_id: &str,
        content: &str,
    ) -> Result<()> {
        let decoded = self
            .store
            .get::<LogEntry>(session, Collection::Logs, log_id)?
            .ok_or_else(|| OrbitError::NotFound(format!("Log {}", log_id)))?;

        let mut log_entry = decoded
            .into_intact()
            .ok_or_else(|| OrbitError::Storage(format!("Log {} is unreadable", log_id)))?;

        log_entry.content = content.to_string();
        self.store.put(session, Collection::Logs, &log_entry)
    }

    fn delete_log(&self, _user_id: &str, log_id: &str) -> Result<()> {
        self.store.delete(Collection::Logs, log_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::VisualType;

    const USER: &str = "local-user";

    fn backend() -> LocalBackend {
        LocalBackend::open_in_memory().unwrap()
    }

    fn project(id: &str) -> Project {
        Project {
            id: id.to_string(),
            group_id: "f1".to_string(),
            title: "Soccer".to_string(),
            link: None,
            visual_type: VisualType::Icon,
            visual_data: "Box".to_string(),
            progress: 0,
            is_pinned: false,
            created_at: 1_700_000_000_000,
            updated_at: 1_700_000_000_000,
        }
    }

    #[test]
    fn test_update_project_patches_and_stamps() {
        let backend = backend();
        let session = VaultSession::locked();

        backend.upsert_project(&session, USER, &project("p1")).unwrap();
        backend
            .update_project(
                &session,
                USER,
                "p1",
                &ProjectPatch::new().progress(55),
                1_700_000_001_000,
            )
            .unwrap();

        let projects = backend.projects(&session, USER).unwrap();
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].progress, 55);
        assert_eq!(projects[0].updated_at, 1_700_000_001_000);
        assert_eq!(projects[0].title, "Soccer");
    }

    #[test]
    fn test_update_missing_project_is_not_found() {
        let backend = backend();
        let session = VaultSession::locked();

        let result = backend.update_project(
            &session,
            USER,
            "ghost",
            &ProjectPatch::new().progress(10),
            0,
        );
        assert!(matches!(result, Err(OrbitError::NotFound(_))));
    }

    #[test]
    fn test_delete_projects_is_sequential_and_tolerant() {
        let backend = backend();
        let session = VaultSession::locked();

        backend.upsert_project(&session, USER, &project("p1")).unwrap();
        backend.upsert_project(&session, USER, &project("p2")).unwrap();

        backend
            .delete_projects(
                USER,
                &["p1".to_string(), "missing".to_string(), "p2".to_string()],
            )
            .unwrap();

        assert!(backend.projects(&session, USER).unwrap().is_empty());
    }

    #[test]
    fn test_update_log_content_preserves_created_at() {
        let backend = backend();
        let session = VaultSession::locked();

        let log = LogEntry {
            id: "l1".to_string(),
            item_id: "p1".to_string(),
            kind: crate::model::LogKind::Note,
            content: "first draft".to_string(),
            created_at: 1_700_000_000_000,
        };
        backend.upsert_log(&session, USER, &log).unwrap();

        backend
            .update_log_content(&session, USER, "l1", "edited")
            .unwrap();

        let logs = backend.logs(&session, USER).unwrap();
        assert_eq!(logs[0].content, "edited");
        assert_eq!(logs[0].created_at, 1_700_000_000_000);
    }

    #[test]
    fn test_salt_available_on_local_path() {
        let backend = backend();
        assert!(backend.vault_salt().unwrap().is_some());
    }
}
