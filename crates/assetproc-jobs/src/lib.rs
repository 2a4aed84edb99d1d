//! # assetproc-jobs
//!
//! Runs a single asset processing job against the remote store.
//!
//! This crate provides:
//! - [`JobRunner`]: marks the job in progress, derives text content from the
//!   asset's file, persists it, and records exactly one terminal status
//! - [`Heartbeat`]: a liveness task that runs alongside the job and is always
//!   stopped and joined before the runner returns
//! - [`RunnerConfig`]: chunk size and heartbeat interval, passed explicitly
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use assetproc_jobs::{JobRunner, RunnerConfig};
//! use assetproc_media::FfmpegPipeline;
//! use assetproc_store::HttpAssetStore;
//!
//! let runner = JobRunner::new(
//!     Arc::new(HttpAssetStore::from_env()?),
//!     Arc::new(FfmpegPipeline::from_env()),
//!     RunnerConfig::from_env(),
//! );
//!
//! let outcome = runner.run(&job).await;
//! ```

pub mod config;
pub mod dispatch;
pub mod heartbeat;
pub mod runner;

// Re-export core types
pub use assetproc_core::*;

pub use config::RunnerConfig;
pub use dispatch::extract_content;
pub use heartbeat::{Heartbeat, HeartbeatState, HeartbeatStats};
pub use runner::{JobOutcome, JobRunner};
