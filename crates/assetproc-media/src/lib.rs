//! # assetproc-media
//!
//! Media pipeline for assetproc: ffmpeg-based audio chunking and
//! Whisper-compatible transcription.
//!
//! Requires `ffmpeg` and `ffprobe` on `PATH` for inputs larger than the chunk
//! limit and for all video inputs.

pub mod ffmpeg;
pub mod pipeline;
pub mod transcription;

pub use pipeline::FfmpegPipeline;
pub use transcription::{TranscriptionBackend, WhisperBackend};
