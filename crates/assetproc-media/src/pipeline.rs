//! ffmpeg + Whisper implementation of [`MediaPipeline`].

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use tempfile::TempDir;
use tracing::{debug, info, trace, warn};

use assetproc_core::defaults;
use assetproc_core::{AudioChunk, Error, MediaPipeline, Result};

use crate::ffmpeg;
use crate::transcription::{TranscriptionBackend, WhisperBackend};

/// Media pipeline that cuts audio with ffmpeg and transcribes chunks one at a
/// time through a [`TranscriptionBackend`].
///
/// Intermediate files live in a temporary directory removed when the call
/// returns.
pub struct FfmpegPipeline {
    transcriber: Arc<dyn TranscriptionBackend>,
    cmd_timeout_secs: u64,
}

impl FfmpegPipeline {
    pub fn new(transcriber: Arc<dyn TranscriptionBackend>) -> Self {
        Self {
            transcriber,
            cmd_timeout_secs: defaults::MEDIA_CMD_TIMEOUT_SECS,
        }
    }

    /// Create from environment variables using [`WhisperBackend::from_env`].
    ///
    /// `MEDIA_CMD_TIMEOUT_SECS` overrides the per-command timeout.
    pub fn from_env() -> Self {
        let cmd_timeout_secs = std::env::var(defaults::ENV_MEDIA_CMD_TIMEOUT_SECS)
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(defaults::MEDIA_CMD_TIMEOUT_SECS)
            .max(1);
        Self::new(Arc::new(WhisperBackend::from_env())).with_cmd_timeout_secs(cmd_timeout_secs)
    }

    pub fn with_cmd_timeout_secs(mut self, secs: u64) -> Self {
        self.cmd_timeout_secs = secs;
        self
    }

    /// Cut an audio file on disk into chunks under `max_chunk_bytes`.
    async fn split_file(
        &self,
        input: &Path,
        total_bytes: usize,
        max_chunk_bytes: usize,
        stem: &str,
        ext: &str,
        work_dir: &TempDir,
    ) -> Result<Vec<AudioChunk>> {
        let duration = ffmpeg::probe_duration(input, self.cmd_timeout_secs).await?;
        let segments = ffmpeg::plan_segments(duration, total_bytes, max_chunk_bytes);
        debug!(
            duration_secs = duration,
            byte_len = total_bytes,
            chunk_count = segments.len(),
            "Planned audio segments"
        );

        let mime_type = ffmpeg::mime_for_extension(ext);
        let mut chunks = Vec::with_capacity(segments.len());
        for (index, segment) in segments.into_iter().enumerate() {
            let label = ffmpeg::chunk_label(stem, index, ext);
            let output = work_dir.path().join(&label);
            ffmpeg::cut_segment(input, &output, segment, self.cmd_timeout_secs).await?;

            let data = tokio::fs::read(&output).await?;
            if data.len() > max_chunk_bytes {
                return Err(Error::Media(format!(
                    "Chunk {} is {} bytes, above the {} byte limit",
                    label,
                    data.len(),
                    max_chunk_bytes
                )));
            }
            trace!(%label, byte_len = data.len(), "Cut audio chunk");
            chunks.push(AudioChunk::new(index, label, mime_type, data));
        }

        Ok(chunks)
    }
}

fn ensure_input(data: &[u8]) -> Result<()> {
    if data.is_empty() {
        return Err(Error::Media("Empty media input".to_string()));
    }
    Ok(())
}

#[async_trait]
impl MediaPipeline for FfmpegPipeline {
    async fn split_audio_file(
        &self,
        data: &[u8],
        max_chunk_bytes: usize,
        name_hint: &str,
    ) -> Result<Vec<AudioChunk>> {
        ensure_input(data)?;
        let (stem, ext) = ffmpeg::split_name(name_hint);
        let ext = ext.unwrap_or_else(|| "mp3".to_string());

        if data.len() <= max_chunk_bytes {
            debug!(byte_len = data.len(), "Audio fits in a single chunk");
            let label = ffmpeg::chunk_label(stem, 0, &ext);
            let mime_type = ffmpeg::mime_for_extension(&ext);
            return Ok(vec![AudioChunk::new(0, label, mime_type, data.to_vec())]);
        }

        let work_dir = TempDir::new()?;
        let input = work_dir.path().join(format!("source.{}", ext));
        tokio::fs::write(&input, data).await?;

        self.split_file(&input, data.len(), max_chunk_bytes, stem, &ext, &work_dir)
            .await
    }

    async fn extract_audio_and_split(
        &self,
        data: &[u8],
        max_chunk_bytes: usize,
        name_hint: &str,
    ) -> Result<Vec<AudioChunk>> {
        ensure_input(data)?;
        let (stem, ext) = ffmpeg::split_name(name_hint);

        let work_dir = TempDir::new()?;
        let input = work_dir
            .path()
            .join(format!("source.{}", ext.as_deref().unwrap_or("mp4")));
        tokio::fs::write(&input, data).await?;

        let audio_path = work_dir.path().join("extracted.mp3");
        ffmpeg::extract_audio_track(&input, &audio_path, self.cmd_timeout_secs).await?;
        let audio_len = tokio::fs::metadata(&audio_path).await?.len() as usize;
        info!(byte_len = audio_len, "Extracted audio track from video");

        if audio_len <= max_chunk_bytes {
            let data = tokio::fs::read(&audio_path).await?;
            let label = ffmpeg::chunk_label(stem, 0, "mp3");
            return Ok(vec![AudioChunk::new(0, label, "audio/mpeg", data)]);
        }

        self.split_file(&audio_path, audio_len, max_chunk_bytes, stem, "mp3", &work_dir)
            .await
    }

    async fn transcribe_chunks(&self, chunks: &[AudioChunk]) -> Result<Vec<String>> {
        let mut transcripts = Vec::with_capacity(chunks.len());
        for chunk in chunks {
            let text = self
                .transcriber
                .transcribe(&chunk.data, &chunk.mime_type, &chunk.label)
                .await?;
            if text.trim().is_empty() {
                warn!(label = %chunk.label, "Chunk transcribed to empty text");
            }
            debug!(
                index = chunk.index,
                byte_len = chunk.len(),
                model = self.transcriber.model_name(),
                "Transcribed chunk"
            );
            transcripts.push(text);
        }
        Ok(transcripts)
    }

    async fn health_check(&self) -> Result<bool> {
        let ffmpeg_ok = ffmpeg::ffmpeg_available().await;
        if !ffmpeg_ok {
            warn!("ffmpeg is not available");
        }
        let transcriber_ok = self.transcriber.health_check().await?;
        Ok(ffmpeg_ok && transcriber_ok)
    }
}
