//! Backup document format.
//!
//! A vault snapshot is a UTF-8 JSON document with three arrays of
//! plaintext domain records plus an export timestamp. Missing arrays
//! deserialize as empty and unknown top-level keys are ignored, so a
//! document from an earlier compatible version still imports.

use serde::{Deserialize, Serialize};

use crate::model::{Folder, LogEntry, Project};

/// A full plaintext snapshot of the vault.
///
/// Exports are plaintext regardless of lock state: the encryption-at-rest
/// guarantee deliberately does not extend to backup files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VaultSnapshot {
    pub folders: Vec<Folder>,
    pub projects: Vec<Project>,
    pub logs: Vec<LogEntry>,
    /// When the snapshot was taken (epoch ms)
    pub exported_at: i64,
}

/// Per-collection record counts from an import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub folders: usize,
    pub projects: usize,
    pub logs: usize,
}

impl ImportSummary {
    pub fn total(&self) -> usize {
        self.folders + self.projects + self.logs
    }
}
