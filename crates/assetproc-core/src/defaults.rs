//! Centralized default constants for assetproc.
//!
//! **This module is the single source of truth** for shared default values
//! and environment variable names. Crates reference these constants instead
//! of defining their own magic numbers.

// =============================================================================
// JOB RUNNER
// =============================================================================

/// Environment variable for the maximum audio chunk size in bytes.
pub const ENV_MAX_CHUNK_SIZE_BYTES: &str = "MAX_CHUNK_SIZE_BYTES";

/// Maximum audio chunk size in bytes (24 MiB).
///
/// Hosted Whisper endpoints reject uploads above 25 MB.
pub const MAX_CHUNK_SIZE_BYTES: usize = 24 * 1024 * 1024;

/// Environment variable for the heartbeat interval in seconds.
pub const ENV_HEARTBEAT_INTERVAL_SECONDS: &str = "HEARTBEAT_INTERVAL_SECONDS";

/// Interval between job heartbeats in seconds.
pub const HEARTBEAT_INTERVAL_SECS: u64 = 10;

/// Lower bound for the heartbeat interval in seconds.
pub const HEARTBEAT_MIN_INTERVAL_SECS: u64 = 1;

/// Consecutive heartbeat failures logged before further failures are
/// suppressed until the next success.
pub const HEARTBEAT_MAX_LOGGED_FAILURES: u32 = 5;

/// Separator placed between transcripts of consecutive chunks.
pub const TRANSCRIPT_SEPARATOR: &str = "\n\n";

// =============================================================================
// REMOTE STORE
// =============================================================================

/// Environment variable for the store API base URL.
pub const ENV_API_BASE_URL: &str = "API_BASE_URL";

/// Environment variable for the service bearer token.
pub const ENV_SERVER_API_KEY: &str = "SERVER_API_KEY";

/// Environment variable for the store request timeout.
pub const ENV_API_TIMEOUT_SECS: &str = "API_TIMEOUT_SECS";

/// Timeout for store API requests in seconds.
pub const API_TIMEOUT_SECS: u64 = 30;

/// Timeout for raw file downloads in seconds. Uploads go up to several GB.
pub const FILE_DOWNLOAD_TIMEOUT_SECS: u64 = 600;

/// Asset route, relative to the API base URL.
pub const ASSET_ROUTE: &str = "/api/asset";

/// Job route, relative to the API base URL.
pub const JOB_ROUTE: &str = "/api/asset-processing-job";

// =============================================================================
// MEDIA
// =============================================================================

/// Environment variable for the media command timeout.
pub const ENV_MEDIA_CMD_TIMEOUT_SECS: &str = "MEDIA_CMD_TIMEOUT_SECS";

/// Per-command timeout for ffmpeg/ffprobe invocations (seconds).
pub const MEDIA_CMD_TIMEOUT_SECS: u64 = 300;

/// Fraction of the byte budget targeted per chunk when cutting by duration.
///
/// Container overhead and variable bitrate push segments over a purely
/// proportional estimate.
pub const CHUNK_SIZE_SAFETY_FACTOR: f64 = 0.9;

/// Audio bitrate used when extracting audio from video.
pub const EXTRACTED_AUDIO_BITRATE: &str = "64k";

/// Environment variable for the Whisper transcription server URL.
pub const ENV_WHISPER_BASE_URL: &str = "WHISPER_BASE_URL";

/// Default Whisper transcription server URL.
pub const DEFAULT_WHISPER_BASE_URL: &str = "http://localhost:8000";

/// Environment variable for the Whisper model name.
pub const ENV_WHISPER_MODEL: &str = "WHISPER_MODEL";

/// Default Whisper model.
pub const DEFAULT_WHISPER_MODEL: &str = "Systran/faster-distil-whisper-large-v3";

/// Environment variable for the transcription API key (hosted endpoints).
pub const ENV_WHISPER_API_KEY: &str = "WHISPER_API_KEY";

/// Timeout for a single chunk transcription request in seconds.
pub const TRANSCRIPTION_TIMEOUT_SECS: u64 = 300;
