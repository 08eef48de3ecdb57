//! Polling loop that keeps a live wait-time prediction fresh.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use super::{OccupancySnapshot, WaitTimePrediction, WaitTimePredictor, DEFAULT_POLL_INTERVAL_SECS};
use crate::errors::ApplicationError;
use crate::random::RandomSource;

/// Source of live occupancy readings
#[async_trait]
pub trait OccupancyFeed: Send + Sync {
    async fn snapshot(&self, venue_id: &str) -> Result<OccupancySnapshot, ApplicationError>;
}

#[derive(Debug, Clone)]
pub struct WaitTimeMonitor {
    predictor: WaitTimePredictor,
    poll_interval: Duration,
}

impl WaitTimeMonitor {
    pub fn new(predictor: WaitTimePredictor) -> Self {
        Self { predictor, poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS) }
    }

    /// Zero intervals are raised to one millisecond.
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval.max(Duration::from_millis(1));
        self
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Start polling `venue_id`. The first poll runs immediately.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<F, R>(&self, venue_id: impl Into<String>, feed: Arc<F>, mut rng: R) -> MonitorHandle
    where
        F: OccupancyFeed + ?Sized + 'static,
        R: RandomSource + Send + 'static,
    {
        let venue_id = venue_id.into();
        let predictor = self.predictor.clone();
        let poll_interval = self.poll_interval;
        let (updates_tx, updates_rx) = watch::channel(None);
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(poll_interval);
            // A slow feed read pushes the schedule back instead of bursting missed ticks.
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut polls: u64 = 0;

            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => break,
                    _ = ticker.tick() => {
                        polls += 1;
                        let snapshot = match feed.snapshot(&venue_id).await {
                            Ok(snapshot) => snapshot,
                            Err(error) => {
                                warn!(
                                    event_name = "wait_time.monitor.feed_failed",
                                    venue_id = %venue_id,
                                    error = %error,
                                    "occupancy feed failed; keeping previous prediction"
                                );
                                continue;
                            }
                        };

                        match predictor.predict(&snapshot, &mut rng) {
                            Ok(prediction) => {
                                if updates_tx.send(Some(prediction)).is_err() {
                                    debug!(
                                        event_name = "wait_time.monitor.detached",
                                        venue_id = %venue_id,
                                        "no subscribers left; discarding prediction"
                                    );
                                    break;
                                }
                            }
                            Err(error) => {
                                warn!(
                                    event_name = "wait_time.monitor.invalid_snapshot",
                                    venue_id = %venue_id,
                                    error = %error,
                                    "rejected occupancy snapshot"
                                );
                            }
                        }
                    }
                }
            }

            debug!(
                event_name = "wait_time.monitor.stopped",
                venue_id = %venue_id,
                polls,
                "wait-time monitor stopped"
            );
        });

        MonitorHandle { updates: updates_rx, shutdown: Some(shutdown_tx), task: Some(task) }
    }
}

impl Default for WaitTimeMonitor {
    fn default() -> Self {
        Self::new(WaitTimePredictor::new())
    }
}

/// Handle to a running monitor. Dropping it stops the polling loop.
#[derive(Debug)]
pub struct MonitorHandle {
    updates: watch::Receiver<Option<WaitTimePrediction>>,
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl MonitorHandle {
    /// Most recent prediction, if any poll has succeeded yet
    pub fn latest(&self) -> Option<WaitTimePrediction> {
        self.updates.borrow().clone()
    }

    /// Additional receiver for the prediction stream
    pub fn subscribe(&self) -> watch::Receiver<Option<WaitTimePrediction>> {
        self.updates.clone()
    }

    /// Wait for the next published prediction.
    ///
    /// Returns `None` once the polling loop has ended.
    pub async fn next(&mut self) -> Option<WaitTimePrediction> {
        self.updates.changed().await.ok()?;
        self.updates.borrow_and_update().clone()
    }

    /// Signal shutdown and wait for any in-flight poll to finish.
    pub async fn stop(mut self) -> Result<(), ApplicationError> {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(task) = self.task.take() {
            task.await.map_err(|error| {
                ApplicationError::Integration(format!("wait-time monitor task failed: {error}"))
            })?;
        }
        Ok(())
    }
}
