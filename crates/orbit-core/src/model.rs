//! Core data types for the vault.
//!
//! These types are the plaintext domain shape: what callers work with,
//! what the backup document contains, and what the codec wraps for
//! storage. All timestamps are epoch milliseconds. Serialized field names
//! are camelCase, the backup wire format.

use serde::{Deserialize, Serialize};

/// A folder grouping projects. Deleting a folder does not cascade at this
/// layer; the caller deletes children first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    /// Unique identifier for this folder
    pub id: String,

    /// User-facing name
    pub name: String,

    /// User-controlled sort key (not unique)
    pub order_index: i64,

    /// When this folder was created (epoch ms)
    pub created_at: i64,
}

/// How a project is rendered in the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisualType {
    Text,
    Icon,
    Image,
}

/// A tracked project inside a folder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Unique identifier for this project
    pub id: String,

    /// Folder this project belongs to
    pub group_id: String,

    /// User-facing title
    pub title: String,

    /// Optional external link
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,

    /// How the visual is interpreted
    pub visual_type: VisualType,

    /// Icon name, short text, or image URL depending on `visual_type`
    pub visual_data: String,

    /// Completion 0-100; drives the derived [`Status`] band
    pub progress: u8,

    /// At most 3 pinned projects per folder; the cap is enforced by the
    /// caller, not here
    pub is_pinned: bool,

    /// When this project was created (epoch ms)
    pub created_at: i64,

    /// Bumped on every mutation, including indirectly when a log is added
    pub updated_at: i64,
}

impl Project {
    /// The derived status band for the current progress.
    pub fn status(&self) -> Status {
        Status::from_progress(self.progress)
    }

    /// Apply a partial patch; only provided fields change. Timestamps are
    /// the caller's responsibility.
    pub fn apply(&mut self, patch: &ProjectPatch) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(link) = &patch.link {
            self.link = Some(link.clone());
        }
        if let Some(visual_type) = patch.visual_type {
            self.visual_type = visual_type;
        }
        if let Some(visual_data) = &patch.visual_data {
            self.visual_data = visual_data.clone();
        }
        if let Some(progress) = patch.progress {
            self.progress = progress;
        }
        if let Some(is_pinned) = patch.is_pinned {
            self.is_pinned = is_pinned;
        }
    }
}

/// Derived display classification from progress. Computed, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Discovered,
    Active,
    InProgress,
    Completed,
}

impl Status {
    pub fn from_progress(progress: u8) -> Self {
        match progress {
            0..=20 => Status::Discovered,
            21..=50 => Status::Active,
            51..=80 => Status::InProgress,
            _ => Status::Completed,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Status::Discovered => "Discovered",
            Status::Active => "Active",
            Status::InProgress => "In Progress",
            Status::Completed => "Completed",
        }
    }
}

/// Kind of activity recorded against a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogKind {
    Seen,
    Gained,
    Note,
}

/// An activity log entry under a project. Immutable except for `content`;
/// `created_at` never changes after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    /// Unique identifier for this log entry
    pub id: String,

    /// Project this log belongs to
    pub item_id: String,

    /// Kind of activity
    #[serde(rename = "type")]
    pub kind: LogKind,

    /// Rich-text-capable content
    pub content: String,

    /// When this log was created (epoch ms)
    pub created_at: i64,
}

/// Builder for creating new projects.
#[derive(Debug, Clone)]
pub struct ProjectDraft {
    /// User-facing title
    pub title: String,

    /// Optional external link
    pub link: Option<String>,

    /// How the visual is interpreted
    pub visual_type: VisualType,

    /// Icon name, short text, or image URL
    pub visual_data: String,
}

impl ProjectDraft {
    pub fn new(title: impl Into<String>, visual_type: VisualType, visual_data: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            link: None,
            visual_type,
            visual_data: visual_data.into(),
        }
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }
}

/// Partial-field patch for project updates. Only `Some` fields are
/// applied; everything else is left untouched.
#[derive(Debug, Clone, Default)]
pub struct ProjectPatch {
    pub title: Option<String>,
    pub link: Option<String>,
    pub visual_type: Option<VisualType>,
    pub visual_data: Option<String>,
    pub progress: Option<u8>,
    pub is_pinned: Option<bool>,
}

impl ProjectPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    pub fn visual(mut self, visual_type: VisualType, visual_data: impl Into<String>) -> Self {
        self.visual_type = Some(visual_type);
        self.visual_data = Some(visual_data.into());
        self
    }

    pub fn progress(mut self, progress: u8) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn pinned(mut self, is_pinned: bool) -> Self {
        self.is_pinned = Some(is_pinned);
        self
    }

    /// True when no field is set; applying it changes nothing.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.link.is_none()
            && self.visual_type.is_none()
            && self.visual_data.is_none()
            && self.progress.is_none()
            && self.is_pinned.is_none()
    }
}
