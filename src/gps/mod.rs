//! Coordinate source
//!
//! This module handles:
//! - The coordinate and saved-location data model
//! - The positioning provider seam and watch subscriptions (provider.rs)
//! - `GpsSource`, the real/manual mode state machine feeding captures

pub mod provider;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::PositionOptions;
use self::provider::{PositionProvider, PositionUpdate, PositionWatch};

/// A single positioning sample. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoordinateReading {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: Option<f64>,
    pub accuracy: Option<f64>,
    pub captured_at: DateTime<Utc>,
}

/// A named, persisted coordinate record usable as a manual source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedLocation {
    pub id: String,
    pub name: String,
    pub coordinates: CoordinateReading,
    pub address: Option<String>,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Where readings come from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GpsMode {
    /// Continuous platform positioning stream
    Real,
    /// Operator-selected saved location
    Manual,
}

/// The pipeline's coordinate source.
///
/// In real mode the source tracks a watch subscription and the newest
/// sample wins; in manual mode the reading is whatever saved location
/// the operator last selected. Permission and stream failures keep the
/// last known reading and surface a human-readable error instead of
/// propagating; there is no automatic retry.
pub struct GpsSource {
    provider: Arc<dyn PositionProvider>,
    options: PositionOptions,
    mode: GpsMode,
    watch: Option<PositionWatch>,
    current: Option<CoordinateReading>,
    selected: Option<SavedLocation>,
    has_permission: bool,
    last_error: Option<String>,
}

impl GpsSource {
    pub fn new(provider: Arc<dyn PositionProvider>, options: PositionOptions) -> Self {
        Self {
            provider,
            options,
            mode: GpsMode::Real,
            watch: None,
            current: None,
            selected: None,
            has_permission: false,
            last_error: None,
        }
    }

    pub fn mode(&self) -> GpsMode {
        self.mode
    }

    pub fn is_tracking(&self) -> bool {
        self.watch.is_some()
    }

    pub fn has_permission(&self) -> bool {
        self.has_permission
    }

    /// The last failure message, if any
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Ask the platform for positioning access
    pub async fn request_permission(&mut self) -> bool {
        match self.provider.request_permission().await {
            Ok(granted) => {
                self.has_permission = granted;
                if !granted {
                    self.last_error = Some("Positioning permission denied".into());
                }
                granted
            }
            Err(e) => {
                self.last_error = Some(e.to_string());
                false
            }
        }
    }

    /// One-off position read. On failure the previous reading stays in
    /// place and the error message is kept on the source.
    pub async fn acquire(&mut self) -> Option<CoordinateReading> {
        match self.provider.current_position(&self.options).await {
            Ok(reading) => {
                self.current = Some(reading.clone());
                Some(reading)
            }
            Err(e) => {
                self.last_error = Some(e.to_string());
                None
            }
        }
    }

    /// Switch operating mode. Entering real mode starts the watch
    /// subscription if not already active; entering manual mode stops it.
    pub async fn set_mode(&mut self, mode: GpsMode) {
        self.mode = mode;
        match mode {
            GpsMode::Real => {
                if self.watch.is_none() {
                    self.start_tracking().await;
                }
            }
            GpsMode::Manual => self.stop_tracking(),
        }
    }

    /// Start the continuous subscription, requesting permission first
    /// if it has not been granted yet
    pub async fn start_tracking(&mut self) {
        if !self.has_permission && !self.request_permission().await {
            return;
        }

        match self.provider.watch_position(&self.options).await {
            Ok(watch) => self.watch = Some(watch),
            Err(e) => {
                warn!(error = %e, "failed to start positioning watch");
                self.last_error = Some(e.to_string());
            }
        }
    }

    /// Stop the continuous subscription, if one is active
    pub fn stop_tracking(&mut self) {
        if let Some(watch) = self.watch.take() {
            watch.stop();
        }
    }

    /// Select the saved location used in manual mode. Takes effect
    /// immediately.
    pub fn select_location(&mut self, location: Option<SavedLocation>) {
        self.selected = location;
    }

    pub fn selected_location(&self) -> Option<&SavedLocation> {
        self.selected.as_ref()
    }

    /// The reading a capture should use right now, or `None` if no
    /// sample or selection exists yet
    pub fn current_reading(&mut self) -> Option<CoordinateReading> {
        match self.mode {
            GpsMode::Real => {
                if let Some(watch) = &self.watch {
                    match watch.latest() {
                        PositionUpdate::Sample(reading) => self.current = Some(reading),
                        PositionUpdate::Failed(message) => self.last_error = Some(message),
                        PositionUpdate::Pending => {}
                    }
                }
                self.current.clone()
            }
            GpsMode::Manual => self.selected.as_ref().map(|l| l.coordinates.clone()),
        }
    }
}
