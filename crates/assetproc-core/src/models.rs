//! Data model shared with the remote asset/job store.
//!
//! Field names follow the store's JSON API (camelCase).

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;

// =============================================================================
// JOB TYPES
// =============================================================================

/// Status of an asset processing job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Waiting to be picked up. The web application writes `created`.
    #[serde(alias = "created")]
    Pending,
    InProgress,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::InProgress => "in_progress",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }

    /// Whether this status ends a run.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A job converting one asset's raw file into text content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetProcessingJob {
    pub id: String,
    pub asset_id: String,
    pub status: JobStatus,
    /// Number of failed processing attempts so far.
    #[serde(default)]
    pub attempts: u32,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub last_heart_beat: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl AssetProcessingJob {
    /// Create a pending job for an asset with no prior attempts.
    pub fn new(id: impl Into<String>, asset_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            asset_id: asset_id.into(),
            status: JobStatus::Pending,
            attempts: 0,
            error_message: None,
            project_id: None,
            last_heart_beat: None,
            created_at: None,
            updated_at: None,
        }
    }

    pub fn with_attempts(mut self, attempts: u32) -> Self {
        self.attempts = attempts;
        self
    }
}

/// Partial update of a job record. Absent fields are left untouched remotely.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<JobStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attempts: Option<u32>,
}

impl JobUpdate {
    pub fn in_progress() -> Self {
        Self {
            status: Some(JobStatus::InProgress),
            ..Default::default()
        }
    }

    pub fn completed() -> Self {
        Self {
            status: Some(JobStatus::Completed),
            ..Default::default()
        }
    }

    /// Failure update carrying the error message and the new attempt count.
    pub fn failed(error_message: impl Into<String>, attempts: u32) -> Self {
        Self {
            status: Some(JobStatus::Failed),
            error_message: Some(error_message.into()),
            attempts: Some(attempts),
        }
    }

    /// Whether this update moves the job into a terminal status.
    pub fn is_terminal(&self) -> bool {
        self.status.is_some_and(|s| s.is_terminal())
    }
}

// =============================================================================
// ASSET TYPES
// =============================================================================

/// An uploaded file owned by a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: String,
    pub file_url: String,
    pub file_name: String,
    /// Declared type as stored remotely; see [`ContentKind`].
    pub file_type: String,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub size: Option<i64>,
    #[serde(default)]
    pub content: Option<String>,
}

impl Asset {
    /// Resolve the declared file type into a processing path.
    pub fn content_kind(&self) -> Result<ContentKind, Error> {
        self.file_type.parse()
    }

    /// Final path component of the file name, used to label derived chunks.
    pub fn base_name(&self) -> &str {
        self.file_name
            .rsplit(['/', '\\'])
            .next()
            .filter(|s| !s.is_empty())
            .unwrap_or(&self.file_name)
    }
}

/// Processing path for an asset's file type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Text,
    Markdown,
    Audio,
    Video,
}

impl ContentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Text => "text",
            ContentKind::Markdown => "markdown",
            ContentKind::Audio => "audio",
            ContentKind::Video => "video",
        }
    }

    /// Text-like content is used as-is; media content is transcribed.
    pub fn is_textual(&self) -> bool {
        matches!(self, ContentKind::Text | ContentKind::Markdown)
    }
}

impl FromStr for ContentKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(ContentKind::Text),
            "markdown" => Ok(ContentKind::Markdown),
            "audio" => Ok(ContentKind::Audio),
            "video" => Ok(ContentKind::Video),
            other => Err(Error::UnsupportedContentType(other.to_string())),
        }
    }
}

impl std::fmt::Display for ContentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// MEDIA TYPES
// =============================================================================

/// A bounded-size slice of audio produced for transcription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioChunk {
    /// Position in the original recording, starting at 0.
    pub index: usize,
    /// File name used when uploading the chunk.
    pub label: String,
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl AudioChunk {
    pub fn new(
        index: usize,
        label: impl Into<String>,
        mime_type: impl Into<String>,
        data: Vec<u8>,
    ) -> Self {
        Self {
            index,
            label: label.into(),
            mime_type: mime_type.into(),
            data,
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
