//! Capture source
//!
//! The camera is an exclusive resource: at most one preview stream is
//! open at a time, and switching front/back tears the stream down and
//! reinitializes it. `capture()` reads exactly the frame present at
//! call time, at the stream's native resolution, with no buffering.

use std::sync::Arc;

use async_trait::async_trait;
use image::RgbaImage;
use tracing::info;

use crate::config::CameraSettings;
use crate::error::{GpsCamError, Result};

/// An open live preview
pub trait PreviewStream: Send {
    /// Native resolution of the stream
    fn dimensions(&self) -> (u32, u32);

    /// Rasterize the frame present right now
    fn grab_frame(&mut self) -> Result<RgbaImage>;
}

/// Platform camera capability
#[async_trait]
pub trait FrameProvider: Send + Sync {
    /// Ask the platform for camera access
    async fn request_permission(&self) -> Result<bool>;

    /// Open a preview stream with the given settings
    async fn open(&self, settings: &CameraSettings) -> Result<Box<dyn PreviewStream>>;
}

/// Observable camera component state
#[derive(Debug, Clone, Default)]
pub struct CameraState {
    pub is_initialized: bool,
    pub has_permission: bool,
    pub is_capturing: bool,
    pub error: Option<String>,
}

/// Owns the active preview stream and mediates captures
pub struct CameraService {
    provider: Arc<dyn FrameProvider>,
    settings: CameraSettings,
    stream: Option<Box<dyn PreviewStream>>,
    state: CameraState,
}

impl CameraService {
    pub fn new(provider: Arc<dyn FrameProvider>, settings: CameraSettings) -> Self {
        Self {
            provider,
            settings,
            stream: None,
            state: CameraState::default(),
        }
    }

    pub fn state(&self) -> &CameraState {
        &self.state
    }

    pub fn settings(&self) -> &CameraSettings {
        &self.settings
    }

    /// Ask the platform for camera access
    pub async fn request_permission(&mut self) -> bool {
        match self.provider.request_permission().await {
            Ok(granted) => {
                self.state.has_permission = granted;
                if !granted {
                    self.state.error = Some("Camera permission denied".into());
                }
                granted
            }
            Err(e) => {
                self.state.error = Some(e.to_string());
                false
            }
        }
    }

    /// Open the preview stream, tearing down any existing one first.
    /// Failures land in the returned state rather than propagating.
    pub async fn initialize(&mut self) -> CameraState {
        self.stop();

        match self.provider.open(&self.settings).await {
            Ok(stream) => {
                let (width, height) = stream.dimensions();
                info!(width, height, "camera preview initialized");
                self.stream = Some(stream);
                self.state = CameraState {
                    is_initialized: true,
                    has_permission: true,
                    is_capturing: false,
                    error: None,
                };
            }
            Err(e) => {
                self.state = CameraState {
                    is_initialized: false,
                    has_permission: self.state.has_permission,
                    is_capturing: false,
                    error: Some(e.to_string()),
                };
            }
        }

        self.state.clone()
    }

    /// Capture the current frame. Requires an initialized stream.
    pub fn capture(&mut self) -> Result<RgbaImage> {
        match self.stream.as_mut() {
            Some(stream) => stream.grab_frame(),
            None => Err(GpsCamError::Uninitialized("camera preview")),
        }
    }

    /// Flip between front and back camera. The old stream is released
    /// before the new one opens; the two never coexist.
    pub async fn switch_camera(&mut self) -> CameraState {
        self.settings.facing_mode = self.settings.facing_mode.flipped();
        self.initialize().await
    }

    /// Release the preview stream
    pub fn stop(&mut self) {
        if self.stream.take().is_some() {
            self.state.is_initialized = false;
        }
    }
}

/// Frame provider that serves a fixed frame. Deterministic stand-in for
/// platform cameras in tests and headless runs.
pub struct StaticFrameProvider {
    frame: RgbaImage,
}

impl StaticFrameProvider {
    pub fn new(frame: RgbaImage) -> Self {
        Self { frame }
    }

    /// A uniform single-color frame
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        Self::new(RgbaImage::from_pixel(width, height, image::Rgba(rgba)))
    }
}

struct StaticPreviewStream {
    frame: RgbaImage,
}

impl PreviewStream for StaticPreviewStream {
    fn dimensions(&self) -> (u32, u32) {
        self.frame.dimensions()
    }

    fn grab_frame(&mut self) -> Result<RgbaImage> {
        Ok(self.frame.clone())
    }
}

#[async_trait]
impl FrameProvider for StaticFrameProvider {
    async fn request_permission(&self) -> Result<bool> {
        Ok(true)
    }

    async fn open(&self, _settings: &CameraSettings) -> Result<Box<dyn PreviewStream>> {
        Ok(Box::new(StaticPreviewStream {
            frame: self.frame.clone(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FacingMode;

    #[tokio::test]
    async fn capture_before_initialize_fails() {
        let provider = Arc::new(StaticFrameProvider::solid(8, 8, [0, 0, 0, 255]));
        let mut camera = CameraService::new(provider, CameraSettings::default());

        match camera.capture() {
            Err(GpsCamError::Uninitialized(_)) => {}
            other => panic!("expected Uninitialized, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn initialize_then_capture_native_resolution() {
        let provider = Arc::new(StaticFrameProvider::solid(640, 480, [10, 20, 30, 255]));
        let mut camera = CameraService::new(provider, CameraSettings::default());

        let state = camera.initialize().await;
        assert!(state.is_initialized);
        assert!(state.error.is_none());

        let frame = camera.capture().unwrap();
        assert_eq!(frame.dimensions(), (640, 480));
        assert_eq!(frame.get_pixel(0, 0).0, [10, 20, 30, 255]);
    }

    #[tokio::test]
    async fn switching_flips_facing_mode_and_reinitializes() {
        let provider = Arc::new(StaticFrameProvider::solid(8, 8, [0, 0, 0, 255]));
        let mut camera = CameraService::new(provider, CameraSettings::default());
        camera.initialize().await;

        assert_eq!(camera.settings().facing_mode, FacingMode::Environment);
        let state = camera.switch_camera().await;
        assert_eq!(camera.settings().facing_mode, FacingMode::User);
        assert!(state.is_initialized);
    }

    #[tokio::test]
    async fn stop_releases_the_stream() {
        let provider = Arc::new(StaticFrameProvider::solid(8, 8, [0, 0, 0, 255]));
        let mut camera = CameraService::new(provider, CameraSettings::default());
        camera.initialize().await;

        camera.stop();
        assert!(!camera.state().is_initialized);
        assert!(camera.capture().is_err());
    }
}
