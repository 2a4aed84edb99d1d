//! Job runner: drives one asset processing job to a terminal status.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, error, info, instrument, trace};

use assetproc_core::{AssetProcessingJob, AssetStore, Error, JobUpdate, MediaPipeline, Result};

use crate::config::RunnerConfig;
use crate::dispatch::extract_content;
use crate::heartbeat::Heartbeat;

/// How a run ended. The same outcome is persisted on the job record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    Completed,
    Failed { message: String },
}

impl JobOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, JobOutcome::Completed)
    }
}

/// Executes asset processing jobs, one per [`run`](JobRunner::run) call.
pub struct JobRunner {
    store: Arc<dyn AssetStore>,
    media: Arc<dyn MediaPipeline>,
    config: RunnerConfig,
}

impl JobRunner {
    pub fn new(
        store: Arc<dyn AssetStore>,
        media: Arc<dyn MediaPipeline>,
        config: RunnerConfig,
    ) -> Self {
        Self {
            store,
            media,
            config,
        }
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Run a job to completion or failure.
    ///
    /// A heartbeat runs for the whole call and has stopped by the time this
    /// returns. Exactly one terminal status update is sent. Errors never
    /// escape: failures are recorded on the job as `failed` with the error
    /// message and `attempts + 1`.
    #[instrument(skip(self, job), fields(job_id = %job.id, asset_id = %job.asset_id))]
    pub async fn run(&self, job: &AssetProcessingJob) -> JobOutcome {
        let start = Instant::now();
        info!("Processing job");

        let heartbeat = Heartbeat::spawn(
            self.store.clone(),
            job.id.clone(),
            self.config.heartbeat_interval,
        );

        let outcome = match self.process(job).await {
            Ok(()) => {
                if let Err(e) = self
                    .store
                    .update_job_details(&job.id, &JobUpdate::completed())
                    .await
                {
                    error!(error = %e, "Failed to mark job as completed");
                }
                info!(
                    duration_ms = start.elapsed().as_millis() as u64,
                    "Job completed successfully"
                );
                JobOutcome::Completed
            }
            Err(e) => {
                let message = e.to_string();
                error!(
                    error = %message,
                    error_kind = %e.kind(),
                    duration_ms = start.elapsed().as_millis() as u64,
                    "Error processing job"
                );
                // Counted from the value handed to us, not re-read from the store.
                let update = JobUpdate::failed(message.clone(), job.attempts.saturating_add(1));
                if let Err(e) = self.store.update_job_details(&job.id, &update).await {
                    error!(error = %e, "Failed to mark job as failed");
                }
                JobOutcome::Failed { message }
            }
        };

        heartbeat.stop().await;
        outcome
    }

    /// Steps up to and including persisting the derived content.
    async fn process(&self, job: &AssetProcessingJob) -> Result<()> {
        self.store
            .update_job_details(&job.id, &JobUpdate::in_progress())
            .await?;

        let asset = self
            .store
            .fetch_asset(&job.asset_id)
            .await?
            .ok_or_else(|| Error::AssetNotFound(job.asset_id.clone()))?;

        // Resolved before downloading so unsupported types fetch nothing.
        let kind = asset.content_kind()?;
        debug!(content_type = %kind, file_name = %asset.file_name, "Resolved content type");

        let data = self.store.fetch_asset_file(&asset.file_url).await?;
        debug!(byte_len = data.len(), "Fetched asset file");

        let content = extract_content(
            self.media.as_ref(),
            kind,
            data,
            asset.base_name(),
            self.config.max_chunk_size_bytes,
        )
        .await?;

        info!(content_len = content.len(), "Derived asset content");
        trace!(%content, "Final content");

        self.store.update_asset_content(&asset.id, &content).await?;
        Ok(())
    }
}
