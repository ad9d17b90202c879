//! Capture pipeline
//!
//! Glues the stages together for one capture action: composite the
//! overlay onto the frame, encode both images, persist the pair. The
//! compositor always completes before either write begins; the two
//! writes then run concurrently. `is_capturing` is reset on success and
//! failure alike, and a failed persist surfaces no partial record.

use std::collections::HashMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::json;
use tracing::{error, info};

use crate::config::ImageFormat;
use crate::error::Result;
use crate::gps::CoordinateReading;
use crate::overlay::{self, OverlayTemplate};
use crate::storage::FileStore;
use image::RgbaImage;

/// Descriptive metadata for one capture
#[derive(Debug, Clone, PartialEq)]
pub struct ImageMetadata {
    pub width: u32,
    pub height: u32,
    pub format: ImageFormat,
    /// Combined size of the persisted pair in bytes
    pub size: u64,
}

/// The outcome of one capture action. Immutable; only its two encoded
/// images are persisted.
#[derive(Debug, Clone)]
pub struct CaptureResult {
    pub raw_image: Vec<u8>,
    pub processed_image: Vec<u8>,
    pub timestamp: DateTime<Utc>,
    pub metadata: ImageMetadata,
}

pub struct CapturePipeline {
    files: FileStore,
    is_capturing: bool,
    last_capture: Option<CaptureResult>,
}

impl CapturePipeline {
    pub fn new(files: FileStore) -> Self {
        Self {
            files,
            is_capturing: false,
            last_capture: None,
        }
    }

    pub fn files(&self) -> &FileStore {
        &self.files
    }

    pub fn is_capturing(&self) -> bool {
        self.is_capturing
    }

    pub fn last_capture(&self) -> Option<&CaptureResult> {
        self.last_capture.as_ref()
    }

    pub fn clear_last_capture(&mut self) {
        self.last_capture = None;
    }

    /// Run one capture: composite, encode, persist the pair.
    ///
    /// Taking `&mut self` means a second capture cannot start on this
    /// pipeline while one is in flight.
    pub async fn capture_with_overlay(
        &mut self,
        raw: &RgbaImage,
        reading: Option<&CoordinateReading>,
        template: &OverlayTemplate,
        custom: Option<&HashMap<String, String>>,
    ) -> Result<CaptureResult> {
        self.is_capturing = true;
        let result = self.run_capture(raw, reading, template, custom).await;
        self.is_capturing = false;

        match &result {
            Ok(capture) => {
                info!(
                    width = capture.metadata.width,
                    height = capture.metadata.height,
                    bytes = capture.metadata.size,
                    "capture complete"
                );
                self.last_capture = Some(capture.clone());
            }
            Err(e) => error!(error = %e, "capture failed"),
        }

        result
    }

    async fn run_capture(
        &self,
        raw: &RgbaImage,
        reading: Option<&CoordinateReading>,
        template: &OverlayTemplate,
        custom: Option<&HashMap<String, String>>,
    ) -> Result<CaptureResult> {
        let config = self.files.config().clone();

        // Compositing finishes before any write starts
        let surface = overlay::render(raw, reading, template, custom)?;
        let processed_image = overlay::encode(&surface, config.format, config.quality)?;
        let raw_image = overlay::encode(raw, config.format, config.quality)?;

        let timestamp = Utc::now();
        let base_name = format!("photo_{}", timestamp.timestamp_millis());
        let metadata = json!({
            "gps": reading,
            "template": template,
            "custom": custom,
            "timestamp": timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
        });

        let pair = self
            .files
            .save_pair(&raw_image, &processed_image, &base_name, Some(metadata))
            .await?;

        Ok(CaptureResult {
            raw_image,
            processed_image,
            timestamp,
            metadata: ImageMetadata {
                width: surface.width(),
                height: surface.height(),
                format: config.format,
                size: pair.raw.size + pair.processed.size,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StorageConfig;
    use image::Rgba;
    use tempfile::TempDir;

    fn frame() -> RgbaImage {
        RgbaImage::from_pixel(96, 160, Rgba([40, 80, 120, 255]))
    }

    fn reading() -> CoordinateReading {
        CoordinateReading {
            latitude: 37.7749,
            longitude: -122.4194,
            altitude: None,
            accuracy: Some(4.0),
            captured_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn capture_reports_real_dimensions_and_combined_size() {
        let dir = TempDir::new().unwrap();
        let files = FileStore::new(dir.path(), StorageConfig::default());
        files.initialize().await;
        let mut pipeline = CapturePipeline::new(files);

        let template = OverlayTemplate::default_template();
        let result = pipeline
            .capture_with_overlay(&frame(), Some(&reading()), &template, None)
            .await
            .unwrap();

        assert_eq!(result.metadata.width, 96);
        assert_eq!(result.metadata.height, 160);
        assert_eq!(
            result.metadata.size,
            (result.raw_image.len() + result.processed_image.len()) as u64
        );
        assert!(!pipeline.is_capturing());
        assert!(pipeline.last_capture().is_some());
    }

    #[tokio::test]
    async fn failed_persist_resets_state_and_leaves_no_record() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("store");
        let files = FileStore::new(&root, StorageConfig::default());
        let mut pipeline = CapturePipeline::new(files);

        // Make the raw folder path unwritable by occupying it with a file
        std::fs::create_dir_all(&root).unwrap();
        std::fs::write(root.join("raw"), b"not a directory").unwrap();

        let template = OverlayTemplate::default_template();
        let result = pipeline
            .capture_with_overlay(&frame(), Some(&reading()), &template, None)
            .await;

        assert!(result.is_err());
        assert!(!pipeline.is_capturing());
        assert!(pipeline.last_capture().is_none());
        assert!(pipeline.files().list_files(Some("processed")).is_empty());
    }
}
