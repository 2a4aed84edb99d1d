//! assetproc-worker: runs a single asset processing job.
//!
//! The job record is read as JSON from a file or stdin. Job selection and
//! polling happen elsewhere; this binary only drives the job it is given.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::io::AsyncReadExt;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use assetproc_core::{AssetProcessingJob, MediaPipeline};
use assetproc_jobs::{JobOutcome, JobRunner, RunnerConfig};
use assetproc_media::FfmpegPipeline;
use assetproc_store::HttpAssetStore;

#[derive(Parser)]
#[command(name = "assetproc-worker")]
#[command(author, version, about = "Asset processing job worker")]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process one job and record its outcome
    Run {
        /// Path to the job record as JSON (default: read stdin)
        #[arg(short, long)]
        job: Option<PathBuf>,

        /// Override the maximum audio chunk size in bytes
        #[arg(long)]
        max_chunk_size: Option<usize>,
    },

    /// Check that the store API, ffmpeg and the transcription server respond
    Check,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let _file_guard = init_tracing();
    let cli = Cli::parse();

    match execute(cli).await {
        Ok(code) => code,
        Err(e) => {
            error!(error = %format!("{:#}", e), "Worker failed");
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn execute(cli: Cli) -> anyhow::Result<ExitCode> {
    match cli.command {
        Commands::Run {
            job,
            max_chunk_size,
        } => {
            let job = read_job(job.as_deref()).await?;

            let store = HttpAssetStore::from_env().context("store configuration")?;
            let media = FfmpegPipeline::from_env();
            let mut config = RunnerConfig::from_env();
            if let Some(bytes) = max_chunk_size {
                config = config.with_max_chunk_size(bytes.max(1));
            }
            info!(
                max_chunk_size_bytes = config.max_chunk_size_bytes,
                heartbeat_interval_secs = config.heartbeat_interval.as_secs(),
                "Runner configured"
            );

            let runner = JobRunner::new(Arc::new(store), Arc::new(media), config);
            match runner.run(&job).await {
                JobOutcome::Completed => Ok(ExitCode::SUCCESS),
                JobOutcome::Failed { message } => {
                    eprintln!("Job {} failed: {}", job.id, message);
                    Ok(ExitCode::FAILURE)
                }
            }
        }
        Commands::Check => {
            let store = HttpAssetStore::from_env().context("store configuration")?;
            let media = FfmpegPipeline::from_env();

            let store_ok = report("store", store.health_check().await);
            let media_ok = report("media", media.health_check().await);

            if store_ok && media_ok {
                println!("All checks passed");
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::FAILURE)
            }
        }
    }
}

async fn read_job(path: Option<&Path>) -> anyhow::Result<AssetProcessingJob> {
    let raw = match path {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("reading job file {}", path.display()))?,
        None => {
            let mut buf = String::new();
            tokio::io::stdin()
                .read_to_string(&mut buf)
                .await
                .context("reading job from stdin")?;
            buf
        }
    };

    let job: AssetProcessingJob = serde_json::from_str(&raw).context("parsing job JSON")?;
    if job.status.is_terminal() {
        warn!(job_id = %job.id, status = %job.status, "Job is already terminal, running anyway");
    }
    Ok(job)
}

fn report(name: &str, result: assetproc_core::Result<bool>) -> bool {
    match result {
        Ok(true) => {
            println!("{}: ok", name);
            true
        }
        Ok(false) => {
            println!("{}: unavailable", name);
            false
        }
        Err(e) => {
            println!("{}: error: {}", name, e);
            false
        }
    }
}

/// Initialize tracing with configurable output.
///
/// Environment variables:
///   LOG_FORMAT  - "json" or "text" (default: "text")
///   LOG_FILE    - path to log file (optional, enables file logging)
///   LOG_ANSI    - "true"/"false" override ANSI colors (auto-detected by default)
///   RUST_LOG    - standard env filter (default: "assetproc=info")
///
/// The returned guard must be held until exit so buffered file output is flushed.
fn init_tracing() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let log_file = std::env::var("LOG_FILE").ok();
    let log_ansi = std::env::var("LOG_ANSI")
        .ok()
        .map(|v| v == "true" || v == "1");

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "assetproc=info".into());

    let registry = tracing_subscriber::registry().with(env_filter);

    let guard = if let Some(ref path) = log_file {
        let file_dir = Path::new(path).parent().unwrap_or(Path::new("."));
        let file_name = Path::new(path)
            .file_name()
            .and_then(|f| f.to_str())
            .unwrap_or("assetproc-worker.log");
        let file_appender = tracing_appender::rolling::daily(file_dir, file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        if log_format == "json" {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(non_blocking),
                )
                .init();
        } else {
            // no ANSI in files unless asked
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(log_ansi.unwrap_or(false));
            registry.with(layer).init();
        }
        Some(guard)
    } else {
        // Console output goes to stderr; stdout carries command results.
        if log_format == "json" {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .init();
        } else {
            let mut layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
            if let Some(ansi) = log_ansi {
                layer = layer.with_ansi(ansi);
            }
            registry.with(layer).init();
        }
        None
    };

    info!(
        log_format = %log_format,
        log_file = log_file.as_deref().unwrap_or("(stderr)"),
        "Logging initialized"
    );
    guard
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_run_defaults_to_stdin() {
        let cli = Cli::try_parse_from(["assetproc-worker", "run"]).unwrap();
        match cli.command {
            Commands::Run {
                job,
                max_chunk_size,
            } => {
                assert!(job.is_none());
                assert!(max_chunk_size.is_none());
            }
            Commands::Check => panic!("expected run"),
        }
    }

    #[test]
    fn test_run_accepts_job_path() {
        let cli = Cli::try_parse_from([
            "assetproc-worker",
            "run",
            "--job",
            "job.json",
            "--max-chunk-size",
            "1024",
        ])
        .unwrap();
        match cli.command {
            Commands::Run {
                job,
                max_chunk_size,
            } => {
                assert_eq!(job, Some(PathBuf::from("job.json")));
                assert_eq!(max_chunk_size, Some(1024));
            }
            Commands::Check => panic!("expected run"),
        }
    }

    #[tokio::test]
    async fn test_read_job_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("job.json");
        tokio::fs::write(
            &path,
            r#"{"id":"job-1","assetId":"asset-1","status":"created","attempts":2}"#,
        )
        .await
        .unwrap();

        let job = read_job(Some(&path)).await.unwrap();
        assert_eq!(job.id, "job-1");
        assert_eq!(job.asset_id, "asset-1");
        assert_eq!(job.attempts, 2);
    }

    #[tokio::test]
    async fn test_read_job_rejects_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("job.json");
        tokio::fs::write(&path, "not json").await.unwrap();

        let err = read_job(Some(&path)).await.unwrap_err();
        assert!(format!("{:#}", err).contains("parsing job JSON"));
    }
}
