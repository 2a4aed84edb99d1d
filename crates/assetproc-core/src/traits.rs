//! Collaborator traits the job runner is written against.
//!
//! Concrete implementations live in `assetproc-store` (HTTP) and
//! `assetproc-media` (ffmpeg + Whisper); tests substitute in-memory fakes.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Asset, AudioChunk, JobUpdate};

// =============================================================================
// REMOTE STORE
// =============================================================================

/// Remote asset/job store.
///
/// Implementations must tolerate a heartbeat write racing a status write on
/// the same job record; the runner does not serialize them.
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Fetch an asset record. `Ok(None)` when the asset does not exist.
    async fn fetch_asset(&self, asset_id: &str) -> Result<Option<Asset>>;

    /// Download the raw bytes behind a file locator.
    async fn fetch_asset_file(&self, file_url: &str) -> Result<Vec<u8>>;

    /// Persist derived text content against an asset.
    async fn update_asset_content(&self, asset_id: &str, content: &str) -> Result<()>;

    /// Apply a partial update to a job record.
    async fn update_job_details(&self, job_id: &str, update: &JobUpdate) -> Result<()>;

    /// Record the current time as the job's liveness timestamp.
    async fn update_job_heartbeat(&self, job_id: &str) -> Result<()>;
}

// =============================================================================
// MEDIA PIPELINE
// =============================================================================

/// Turns audio/video bytes into ordered transcripts.
#[async_trait]
pub trait MediaPipeline: Send + Sync {
    /// Split an audio file into chunks of at most `max_chunk_bytes`.
    async fn split_audio_file(
        &self,
        data: &[u8],
        max_chunk_bytes: usize,
        name_hint: &str,
    ) -> Result<Vec<AudioChunk>>;

    /// Extract the audio track of a video and split it like
    /// [`split_audio_file`](Self::split_audio_file).
    async fn extract_audio_and_split(
        &self,
        data: &[u8],
        max_chunk_bytes: usize,
        name_hint: &str,
    ) -> Result<Vec<AudioChunk>>;

    /// Transcribe chunks in order. The output has one entry per input chunk.
    async fn transcribe_chunks(&self, chunks: &[AudioChunk]) -> Result<Vec<String>>;

    /// Check whether the pipeline's external tools are reachable.
    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }
}
