//! Core data models used throughout Docshelf.
//!
//! These types represent the groups and documents held in the relational
//! store, and the lifecycle records flowing out of the upload pipeline.

use serde::{Deserialize, Serialize};

/// Top-level organizational entity owning zero or more documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: i64,
    pub name: String,
}

/// Input for creating a group; the store assigns the id.
#[derive(Debug, Clone)]
pub struct GroupInput {
    pub name: String,
}

/// Partial update for a group. `id` is required at call time; a missing id
/// is rejected with `InvalidArgument`.
#[derive(Debug, Clone, Default)]
pub struct GroupPatch {
    pub id: Option<i64>,
    pub name: Option<String>,
}

/// A titled artifact belonging to exactly one group.
///
/// The `group` snapshot is attached on every read (read-time join); it is
/// never persisted alongside the document row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub group_id: i64,
    pub title: String,
    pub group: Group,
}

/// Input for creating a document. The id is caller-supplied (UUID or
/// content-derived) and used verbatim.
#[derive(Debug, Clone)]
pub struct DocumentInput {
    pub id: String,
    pub group_id: i64,
    pub title: String,
}

/// Update for a document. The (possibly changed) `group_id` is re-validated
/// before any field is written.
#[derive(Debug, Clone)]
pub struct DocumentPatch {
    pub id: String,
    pub group_id: i64,
    pub title: Option<String>,
}

/// Stage of an upload lifecycle record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadStage {
    Pending,
    InProgress,
    Done,
}

/// Snapshot of upload/indexing progress at a point in time.
///
/// `progress` is a percentage in `[0, 100]`; `result` is populated exactly
/// once, on the final `done` record.
#[derive(Debug, Clone, Serialize)]
pub struct UploadState {
    pub state: UploadStage,
    pub progress: u8,
    pub result: Option<Document>,
}

impl UploadState {
    pub fn pending() -> Self {
        UploadState {
            state: UploadStage::Pending,
            progress: 0,
            result: None,
        }
    }

    pub fn in_progress(progress: u8) -> Self {
        UploadState {
            state: UploadStage::InProgress,
            progress,
            result: None,
        }
    }

    pub fn done(result: Document) -> Self {
        UploadState {
            state: UploadStage::Done,
            progress: 100,
            result: Some(result),
        }
    }
}

/// Server-side indexing status of an uploaded source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceStatus {
    Waiting,
    Aborted,
    Indexing,
    Indexed,
    #[serde(rename = "not found")]
    NotFound,
}

impl SourceStatus {
    /// Statuses that mean indexing has not finished yet.
    pub fn is_in_progress(&self) -> bool {
        matches!(self, SourceStatus::Waiting | SourceStatus::Indexing)
    }
}

impl std::fmt::Display for SourceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SourceStatus::Waiting => "waiting",
            SourceStatus::Aborted => "aborted",
            SourceStatus::Indexing => "indexing",
            SourceStatus::Indexed => "indexed",
            SourceStatus::NotFound => "not found",
        };
        f.write_str(s)
    }
}

/// Server-assigned reference to uploaded binary content, separate from the
/// document's own id and subject to asynchronous indexing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceReference {
    pub id: String,
    pub status: SourceStatus,
}
