//! Runner configuration.

use std::time::Duration;

use assetproc_core::defaults;

/// Configuration for the job runner and its heartbeat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerConfig {
    /// Upper bound on the size of a single audio chunk sent for transcription.
    pub max_chunk_size_bytes: usize,
    /// Delay between consecutive heartbeats.
    pub heartbeat_interval: Duration,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            max_chunk_size_bytes: defaults::MAX_CHUNK_SIZE_BYTES,
            heartbeat_interval: Duration::from_secs(defaults::HEARTBEAT_INTERVAL_SECS),
        }
    }
}

impl RunnerConfig {
    /// Create config from environment variables (with defaults).
    ///
    /// | Variable | Default | Description |
    /// |----------|---------|-------------|
    /// | `MAX_CHUNK_SIZE_BYTES` | `25165824` | Max audio chunk size |
    /// | `HEARTBEAT_INTERVAL_SECONDS` | `10` | Heartbeat interval (min 1) |
    pub fn from_env() -> Self {
        let max_chunk_size_bytes = std::env::var(defaults::ENV_MAX_CHUNK_SIZE_BYTES)
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(defaults::MAX_CHUNK_SIZE_BYTES)
            .max(1);

        let heartbeat_secs = std::env::var(defaults::ENV_HEARTBEAT_INTERVAL_SECONDS)
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(defaults::HEARTBEAT_INTERVAL_SECS)
            .max(defaults::HEARTBEAT_MIN_INTERVAL_SECS);

        Self {
            max_chunk_size_bytes,
            heartbeat_interval: Duration::from_secs(heartbeat_secs),
        }
    }

    /// Set the maximum chunk size in bytes.
    pub fn with_max_chunk_size(mut self, bytes: usize) -> Self {
        self.max_chunk_size_bytes = bytes;
        self
    }

    /// Set the heartbeat interval.
    pub fn with_heartbeat_interval(mut self, interval: Duration) -> Self {
        self.heartbeat_interval = interval;
        self
    }
}
