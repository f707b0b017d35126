//! Remote backend: row CRUD against a hosted Postgres REST gateway.
//!
//! The remote schema is three tables (`folders`, `projects`, `logs`)
//! whose column names differ from the domain model (`folder_id`,
//! `project_id`, `is_pinned`, `visual_type`, `visual_data`, RFC 3339
//! timestamps). The bidirectional mapping lives entirely in this module;
//! nothing above it ever sees a row shape.
//!
//! Rows are scoped by `user_id` on every request and protected
//! server-side; this path has no at-rest encryption of its own, so
//! `vault_salt` reports none.

use chrono::{DateTime, SecondsFormat};
use reqwest::blocking::{Client, Response};
use serde::{Deserialize, Serialize};

use crate::crypto::SALT_LENGTH;
use crate::error::{OrbitError, Result};
use crate::model::{Folder, LogEntry, LogKind, Project, ProjectPatch, VisualType};
use crate::session::VaultSession;

use super::RecordBackend;

/// Connection settings for the remote backend.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// Base URL of the gateway, e.g. `https://xyz.supabase.co`.
    pub base_url: String,
    /// API key, sent both as the `apikey` header and as a bearer token.
    pub api_key: String,
}

/// [`RecordBackend`] speaking PostgREST-style row CRUD.
pub struct RemoteBackend {
    client: Client,
    config: RemoteConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct FolderRow {
    id: String,
    user_id: String,
    name: String,
    order_index: i64,
    created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct ProjectRow {
    id: String,
    user_id: String,
    folder_id: String,
    title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    link: Option<String>,
    visual_type: VisualType,
    visual_data: String,
    progress: u8,
    is_pinned: bool,
    created_at: String,
    updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct LogRow {
    id: String,
    user_id: String,
    project_id: String,
    #[serde(rename = "type")]
    kind: LogKind,
    content: String,
    created_at: String,
}

fn ms_to_rfc3339(ms: i64) -> Result<String> {
    DateTime::from_timestamp_millis(ms)
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
        .ok_or_else(|| OrbitError::InvalidInput(format!("Timestamp out of range: {}", ms)))
}

fn rfc3339_to_ms(value: &str) -> Result<i64> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.timestamp_millis())
        .map_err(|e| OrbitError::Remote(format!("Invalid timestamp '{}': {}", value, e)))
}

fn folder_row(user_id: &str, folder: &Folder) -> Result<FolderRow> {
    Ok(FolderRow {
        id: folder.id.clone(),
        user_id: user_id.to_string(),
        name: folder.name.clone(),
        order_index: folder.order_index,
        created_at: ms_to_rfc3339(folder.created_at)?,
    })
}

fn folder_from_row(row: FolderRow) -> Result<Folder> {
    Ok(Folder {
        id: row.id,
        name: row.name,
        order_index: row.order_index,
        created_at: rfc3339_to_ms(&row.created_at)?,
    })
}

fn project_row(user_id: &str, project: &Project) -> Result<ProjectRow> {
    Ok(ProjectRow {
        id: project.id.clone(),
        user_id: user_id.to_string(),
        folder_id: project.group_id.clone(),
        title: project.title.clone(),
        link: project.link.clone(),
        visual_type: project.visual_type,
        visual_data: project.visual_data.clone(),
        progress: project.progress,
        is_pinned: project.is_pinned,
        created_at: ms_to_rfc3339(project.created_at)?,
        updated_at: ms_to_rfc3339(project.updated_at)?,
    })
}

fn project_from_row(row: ProjectRow) -> Result<Project> {
    Ok(Project {
        id: row.id,
        group_id: row.folder_id,
        title: row.title,
        link: row.link,
        visual_type: row.visual_type,
        visual_data: row.visual_data,
        progress: row.progress,
        is_pinned: row.is_pinned,
        created_at: rfc3339_to_ms(&row.created_at)?,
        updated_at: rfc3339_to_ms(&row.updated_at)?,
    })
}

fn log_row(user_id: &str, log: &LogEntry) -> Result<LogRow> {
    Ok(LogRow {
        id: log.id.clone(),
        user_id: user_id.to_string(),
        project_id: log.item_id.clone(),
        kind: log.kind,
        content: log.content.clone(),
        created_at: ms_to_rfc3339(log.created_at)?,
    })
}

fn log_from_row(row: LogRow) -> Result<LogEntry> {
    Ok(LogEntry {
        id: row.id,
        item_id: row.project_id,
        kind: row.kind,
        content: row.content,
        created_at: rfc3339_to_ms(&row.created_at)?,
    })
}

/// Translate a patch into the column assignments the gateway expects.
fn patch_columns(patch: &ProjectPatch, updated_at: i64) -> Result<serde_json::Value> {
    let mut columns = serde_json::Map::new();
    if let Some(title) = &patch.title {
        columns.insert("title".to_string(), title.clone().into());
    }
    if let Some(link) = &patch.link {
        columns.insert("link".to_string(), link.clone().into());
    }
    if let Some(visual_type) = patch.visual_type {
        columns.insert("visual_type".to_string(), serde_json::to_value(visual_type)?);
    }
    if let Some(visual_data) = &patch.visual_data {
        columns.insert("visual_data".to_string(), visual_data.clone().into());
    }
    if let Some(progress) = patch.progress {
        columns.insert("progress".to_string(), progress.into());
    }
    if let Some(is_pinned) = patch.is_pinned {
        columns.insert("is_pinned".to_string(), is_pinned.into());
    }
    columns.insert("updated_at".to_string(), ms_to_rfc3339(updated_at)?.into());
    Ok(serde_json::Value::Object(columns))
}

impl RemoteBackend {
    pub fn new(config: RemoteConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn table_url(&self, table: &str) -> String {
        format!(
            "{}/rest/v1/{}",
            self.config.base_url.trim_end_matches('/'),
            table
        )
    }

    fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().unwrap_or_default();
        Err(OrbitError::Remote(format!(
            "HTTP {}: {}",
            status.as_u16(),
            body
        )))
    }

    fn select<R: serde::de::DeserializeOwned>(
        &self,
        table: &str,
        user_id: &str,
        order: &str,
    ) -> Result<Vec<R>> {
        let user_filter = format!("eq.{}", user_id);
        let response = self
            .client
            .get(self.table_url(table))
            .header("apikey", &self.config.api_key)
            .bearer_auth(&self.config.api_key)
            .query(&[
                ("select", "*"),
                ("user_id", user_filter.as_str()),
                ("order", order),
            ])
            .send()?;
        Ok(Self::check(response)?.json()?)
    }

    fn upsert<R: Serialize>(&self, table: &str, row: &R) -> Result<()> {
        let response = self
            .client
            .post(self.table_url(table))
            .header("apikey", &self.config.api_key)
            .bearer_auth(&self.config.api_key)
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(row)
            .send()?;
        Self::check(response)?;
        Ok(())
    }

    fn patch_rows(&self, table: &str, user_id: &str, id: &str, body: &serde_json::Value) -> Result<()> {
        let response = self
            .client
            .patch(self.table_url(table))
            .header("apikey", &self.config.api_key)
            .bearer_auth(&self.config.api_key)
            .header("Prefer", "return=minimal")
            .query(&[
                ("id", &format!("eq.{}", id)),
                ("user_id", &format!("eq.{}", user_id)),
            ])
            .json(body)
            .send()?;
        Self::check(response)?;
        Ok(())
    }

    fn delete_rows(&self, table: &str, user_id: &str, id_filter: &str) -> Result<()> {
        let user_filter = format!("eq.{}", user_id);
        let response = self
            .client
            .delete(self.table_url(table))
            .header("apikey", &self.config.api_key)
            .bearer_auth(&self.config.api_key)
            .query(&[("id", id_filter), ("user_id", user_filter.as_str())])
            .send()?;
        Self::check(response)?;
        Ok(())
    }
}

impl RecordBackend for RemoteBackend {
    fn vault_salt(&self) -> Result<Option<[u8; SALT_LENGTH]>> {
        // At-rest encryption is a device-local concern; remote rows are
        // protected server-side.
        Ok(None)
    }

    fn folders(&self, _session: &VaultSession, user_id: &str) -> Result<Vec<Folder>> {
        self.select::<FolderRow>("folders", user_id, "order_index")?
            .into_iter()
            .map(folder_from_row)
            .collect()
    }

    fn upsert_folder(&self, _session: &VaultSession, user_id: &str, folder: &Folder) -> Result<()> {
        self.upsert("folders", &folder_row(user_id, folder)?)
    }

    fn delete_folder(&self, user_id: &str, folder_id: &str) -> Result<()> {
        self.delete_rows("folders", user_id, &format!("eq.{}", folder_id))
    }

    fn projects(&self, _session: &VaultSession, user_id: &str) -> Result<Vec<Project>> {
        self.select::<ProjectRow>("projects", user_id, "updated_at.desc")?
            .into_iter()
            .map(project_from_row)
            .collect()
    }

    fn upsert_project(
        &self,
        _session: &VaultSession,
        user_id: &str,
        project: &Project,
    ) -> Result<()> {
        self.upsert("projects", &project_row(user_id, project)?)
    }

    fn update_project(
        &self,
        _session: &VaultSession,
        user_id: &str,
        project_id: &str,
        patch: &ProjectPatch,
        updated_at: i64,
    ) -> Result<()> {
        let columns = patch_columns(patch, updated_at)?;
        self.patch_rows("projects", user_id, project_id, &columns)
    }

    fn delete_projects(&self, user_id: &str, project_ids: &[String]) -> Result<()> {
        if project_ids.is_empty() {
            return Ok(());
        }
        self.delete_rows(
            "projects",
            user_id,
            &format!("in.({})", project_ids.join(",")),
        )
    }

    fn logs(&self, _session: &VaultSession, user_id: &str) -> Result<Vec<LogEntry>> {
        self.select::<LogRow>("logs", user_id, "created_at.desc")?
            .into_iter()
            .map(log_from_row)
            .collect()
    }

    fn upsert_log(&self, _session: &VaultSession, user_id: &str, log: &LogEntry) -> Result<()> {
        self.upsert("logs", &log_row(user_id, log)?)
    }

    fn update_log_content(
        &self,
        _session: &VaultSession,
        user_id: &str,
        log_id: &str,
        content: &str,
    ) -> Result<()> {
        self.patch_rows(
            "logs",
            user_id,
            log_id,
            &serde_json::json!({ "content": content }),
        )
    }

    fn delete_log(&self, user_id: &str, log_id: &str) -> Result<()> {
        self.delete_rows("logs", user_id, &format!("eq.{}", log_id))
    }
}
