//! # assetproc-core
//!
//! Core types, traits, and abstractions for the assetproc job runner.
//!
//! This crate provides the data model shared with the remote asset/job store,
//! the error taxonomy every other crate reports through, and the collaborator
//! traits ([`AssetStore`], [`MediaPipeline`]) the job runner is written against.
//!
//! ## Log Level Contract
//!
//! All crates log through `tracing` with structured fields (`job_id`,
//! `asset_id`, `content_type`, `chunk_count`, `duration_ms`, `error`).
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Job failed, or a status update could not be persisted |
//! | WARN  | Recoverable issue (heartbeat send failed) |
//! | INFO  | Lifecycle events (job start/finish, heartbeat start/stop) |
//! | DEBUG | Decision points, intermediate values, config choices |
//! | TRACE | Per-item data (individual chunks, final content) |

pub mod defaults;
pub mod error;
pub mod models;
pub mod traits;

// Re-export commonly used types at crate root
pub use error::{Error, ErrorKind, Result};
pub use models::*;
pub use traits::*;
