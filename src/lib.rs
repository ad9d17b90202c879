//! GPS Cam - coordinate-overlay photo capture pipeline
//!
//! This crate implements the pipeline behind a GPS camera application:
//! take a raw frame from a capture source, a coordinate reading from a
//! positioning source (live or a saved location), burn an overlay band
//! described by an operator-editable template onto the frame, and
//! persist the raw/processed pair with shared metadata.
//!
//! # Components
//!
//! - [`gps`] - coordinate readings, saved locations, the real/manual
//!   source state machine and the positioning provider seam
//! - [`camera`] - the capture source owning the live preview stream
//! - [`overlay`] - the template model and the compositor that renders
//!   the text band
//! - [`storage`] - the dual-artifact file store (raw + processed pairs)
//! - [`db`] - the saved-location / template store with its sqlite and
//!   document-blob backends
//! - [`pipeline`] - the capture flow tying the stages together
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use gps_cam::camera::{CameraService, StaticFrameProvider};
//! use gps_cam::config::{CameraSettings, StorageConfig};
//! use gps_cam::overlay::OverlayTemplate;
//! use gps_cam::pipeline::CapturePipeline;
//! use gps_cam::storage::FileStore;
//!
//! # async fn example() -> gps_cam::Result<()> {
//! let provider = Arc::new(StaticFrameProvider::solid(1920, 1080, [0, 0, 0, 255]));
//! let mut camera = CameraService::new(provider, CameraSettings::default());
//! camera.initialize().await;
//!
//! let files = FileStore::new("/tmp/gps-cam", StorageConfig::default());
//! files.initialize().await;
//! let mut pipeline = CapturePipeline::new(files);
//!
//! let frame = camera.capture()?;
//! let template = OverlayTemplate::default_template();
//! let result = pipeline
//!     .capture_with_overlay(&frame, None, &template, None)
//!     .await?;
//! println!("captured {} bytes", result.metadata.size);
//! # Ok(())
//! # }
//! ```

pub mod camera;
pub mod config;
pub mod db;
pub mod error;
pub mod format;
pub mod gps;
pub mod overlay;
pub mod pipeline;
pub mod storage;

// Re-export main types for convenience
pub use config::{CameraSettings, ImageFormat, PositionOptions, StorageConfig};
pub use db::{Database, NewLocation};
pub use error::{GpsCamError, Result};
pub use gps::{CoordinateReading, GpsMode, GpsSource, SavedLocation};
pub use overlay::{OverlayField, OverlayTemplate};
pub use pipeline::{CapturePipeline, CaptureResult};
pub use storage::{FileStore, StoredFile};
