//! Periodic liveness signal for a running job.
//!
//! A [`Heartbeat`] owns a spawned task that records a heartbeat for one job,
//! sleeps for the configured interval, and repeats until [`Heartbeat::stop`]
//! is called. Send failures are logged and never end the loop; the only exit
//! is the stop signal (or dropping the handle).

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use assetproc_core::defaults;
use assetproc_core::AssetStore;

/// Lifecycle of a heartbeat task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeartbeatState {
    Running,
    /// Stop requested; an in-flight send or sleep is being abandoned.
    Stopping,
    Stopped,
}

/// Counters reported when a heartbeat task stops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeartbeatStats {
    /// Heartbeats the store acknowledged.
    pub sent: u64,
    /// Heartbeat sends that returned an error.
    pub failed: u64,
}

/// Handle to a running heartbeat task.
pub struct Heartbeat {
    job_id: String,
    stop_tx: oneshot::Sender<()>,
    state_tx: Arc<watch::Sender<HeartbeatState>>,
    task: JoinHandle<HeartbeatStats>,
}

impl Heartbeat {
    /// Spawn a heartbeat task for `job_id` on the current runtime.
    ///
    /// The first heartbeat is sent as soon as the task is scheduled.
    pub fn spawn(store: Arc<dyn AssetStore>, job_id: impl Into<String>, interval: Duration) -> Self {
        let job_id = job_id.into();
        let (stop_tx, stop_rx) = oneshot::channel();
        let (state_tx, _) = watch::channel(HeartbeatState::Running);
        let state_tx = Arc::new(state_tx);

        debug!(%job_id, interval_ms = interval.as_millis() as u64, "Starting heartbeat");

        let task = tokio::spawn(heartbeat_loop(
            store,
            job_id.clone(),
            interval,
            stop_rx,
            state_tx.clone(),
        ));

        Self {
            job_id,
            stop_tx,
            state_tx,
            task,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> HeartbeatState {
        *self.state_tx.borrow()
    }

    /// Receiver that observes state transitions.
    pub fn subscribe(&self) -> watch::Receiver<HeartbeatState> {
        self.state_tx.subscribe()
    }

    /// Request the task to stop and wait until it has exited.
    ///
    /// Never fails: a panicked task is logged and reported with empty stats.
    pub async fn stop(self) -> HeartbeatStats {
        self.state_tx.send_replace(HeartbeatState::Stopping);
        // The task may already be gone if it panicked; the join below reports it.
        let _ = self.stop_tx.send(());

        let stats = match self.task.await {
            Ok(stats) => stats,
            Err(e) => {
                error!(job_id = %self.job_id, error = ?e, "Heartbeat task panicked");
                HeartbeatStats::default()
            }
        };

        self.state_tx.send_replace(HeartbeatState::Stopped);
        info!(
            job_id = %self.job_id,
            heartbeats_sent = stats.sent,
            heartbeats_failed = stats.failed,
            "Heartbeat stopped"
        );
        stats
    }
}

async fn heartbeat_loop(
    store: Arc<dyn AssetStore>,
    job_id: String,
    interval: Duration,
    mut stop_rx: oneshot::Receiver<()>,
    state_tx: Arc<watch::Sender<HeartbeatState>>,
) -> HeartbeatStats {
    let mut stats = HeartbeatStats::default();
    let mut failures = FailureTracker::new(defaults::HEARTBEAT_MAX_LOGGED_FAILURES);

    // A dropped sender resolves `stop_rx` with an error, which also stops the loop.
    loop {
        tokio::select! {
            biased;
            _ = &mut stop_rx => break,
            result = store.update_job_heartbeat(&job_id) => match result {
                Ok(()) => {
                    stats.sent += 1;
                    failures.record_success();
                }
                Err(e) => {
                    stats.failed += 1;
                    if failures.record_failure() {
                        warn!(%job_id, error = %e, "Failed to update job heartbeat");
                    } else {
                        debug!(
                            %job_id,
                            error = %e,
                            consecutive_failures = failures.consecutive,
                            "Failed to update job heartbeat"
                        );
                    }
                }
            }
        }

        tokio::select! {
            biased;
            _ = &mut stop_rx => break,
            _ = sleep(interval) => {}
        }
    }

    state_tx.send_replace(HeartbeatState::Stopped);
    stats
}

/// Consecutive heartbeat failures. Past `limit`, failures drop to DEBUG
/// until the next success.
#[derive(Debug)]
struct FailureTracker {
    consecutive: u32,
    limit: u32,
}

impl FailureTracker {
    fn new(limit: u32) -> Self {
        Self {
            consecutive: 0,
            limit,
        }
    }

    fn is_suppressed(&self) -> bool {
        self.consecutive > self.limit
    }

    fn record_success(&mut self) {
        if self.is_suppressed() {
            info!(
                consecutive_failures = self.consecutive,
                "Heartbeat recovered"
            );
        }
        self.consecutive = 0;
    }

    /// Returns whether this failure should be logged at WARN.
    fn record_failure(&mut self) -> bool {
        self.consecutive = self.consecutive.saturating_add(1);
        if self.consecutive == self.limit + 1 {
            warn!(
                limit = self.limit,
                "Heartbeat keeps failing, logging further failures at debug"
            );
        }
        !self.is_suppressed()
    }
}
