//! Positioning provider abstraction
//!
//! The pipeline never talks to platform positioning directly; it goes
//! through `PositionProvider`, which yields one-off reads and watch
//! subscriptions. A watch is an explicit object holding the latest
//! sample (newer samples unconditionally replace older ones) and a
//! cancelable task handle.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::config::PositionOptions;
use crate::error::Result;
use crate::gps::CoordinateReading;

/// Latest state of a watch subscription
#[derive(Debug, Clone)]
pub enum PositionUpdate {
    /// No sample delivered yet
    Pending,
    /// Most recent sample; replaces any previous one
    Sample(CoordinateReading),
    /// The stream errored; the last good sample stays in effect upstream
    Failed(String),
}

/// A running positioning subscription.
///
/// Dropping the watch (or calling [`PositionWatch::stop`]) cancels the
/// underlying stream task. Watches have no timeout of their own.
pub struct PositionWatch {
    updates: watch::Receiver<PositionUpdate>,
    task: JoinHandle<()>,
}

impl PositionWatch {
    pub fn new(updates: watch::Receiver<PositionUpdate>, task: JoinHandle<()>) -> Self {
        Self { updates, task }
    }

    /// The most recent update; earlier samples are already discarded
    pub fn latest(&self) -> PositionUpdate {
        self.updates.borrow().clone()
    }

    /// Cancel the subscription
    pub fn stop(self) {
        self.task.abort();
    }
}

impl Drop for PositionWatch {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Platform positioning capability
#[async_trait]
pub trait PositionProvider: Send + Sync {
    /// Ask the platform for positioning access
    async fn request_permission(&self) -> Result<bool>;

    /// One-off read. Fails (rather than hangs) once `options.timeout`
    /// elapses.
    async fn current_position(&self, options: &PositionOptions) -> Result<CoordinateReading>;

    /// Start a continuous subscription
    async fn watch_position(&self, options: &PositionOptions) -> Result<PositionWatch>;
}

/// Provider that replays a fixed reading. Deterministic stand-in for
/// platform positioning in tests and headless runs.
pub struct StaticPositionProvider {
    reading: Arc<CoordinateReading>,
}

impl StaticPositionProvider {
    pub fn new(reading: CoordinateReading) -> Self {
        Self {
            reading: Arc::new(reading),
        }
    }
}

#[async_trait]
impl PositionProvider for StaticPositionProvider {
    async fn request_permission(&self) -> Result<bool> {
        Ok(true)
    }

    async fn current_position(&self, _options: &PositionOptions) -> Result<CoordinateReading> {
        Ok((*self.reading).clone())
    }

    async fn watch_position(&self, _options: &PositionOptions) -> Result<PositionWatch> {
        let (tx, rx) = watch::channel(PositionUpdate::Pending);
        let reading = Arc::clone(&self.reading);

        let task = tokio::spawn(async move {
            // A single sample, held for the life of the subscription
            let _ = tx.send(PositionUpdate::Sample((*reading).clone()));
            tx.closed().await;
        });

        Ok(PositionWatch::new(rx, task))
    }
}
