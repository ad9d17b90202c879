//! Option structs for storage, positioning and camera components
//!
//! These are plain data carriers with sensible defaults. Callers
//! construct them once at startup and hand them to the components that
//! need them.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Encoded output format for persisted artifacts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Jpeg,
    Png,
}

impl ImageFormat {
    /// File extension used in artifact names
    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "jpeg",
            ImageFormat::Png => "png",
        }
    }
}

/// Layout of the artifact store: folder names, output format, encode quality
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub raw_folder: String,
    pub processed_folder: String,
    pub format: ImageFormat,
    /// Encode quality in `0.0..=1.0`
    pub quality: f32,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            raw_folder: "raw".into(),
            processed_folder: "processed".into(),
            format: ImageFormat::Jpeg,
            quality: 0.8,
        }
    }
}

/// Options for one-off position reads and watch subscriptions
#[derive(Debug, Clone)]
pub struct PositionOptions {
    pub high_accuracy: bool,
    /// Acquisition deadline; a read past this fails instead of hanging
    pub timeout: Duration,
    /// Oldest acceptable cached sample
    pub maximum_age: Duration,
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout: Duration::from_secs(10),
            maximum_age: Duration::from_secs(5),
        }
    }
}

/// Which way the active camera faces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FacingMode {
    User,
    Environment,
}

impl FacingMode {
    /// The opposite camera, used when switching front/back
    pub fn flipped(self) -> Self {
        match self {
            FacingMode::User => FacingMode::Environment,
            FacingMode::Environment => FacingMode::User,
        }
    }
}

/// Preview aspect ratio selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AspectRatio {
    #[serde(rename = "1:1")]
    Square,
    #[serde(rename = "4:3")]
    FourThree,
    #[serde(rename = "16:9")]
    SixteenNine,
    #[serde(rename = "3:4")]
    ThreeFour,
    #[serde(rename = "full")]
    Full,
}

impl AspectRatio {
    /// Width/height ratio pair; `None` means the sensor's native frame
    pub fn ratio(self) -> Option<(u32, u32)> {
        match self {
            AspectRatio::Square => Some((1, 1)),
            AspectRatio::FourThree => Some((4, 3)),
            AspectRatio::SixteenNine => Some((16, 9)),
            AspectRatio::ThreeFour => Some((3, 4)),
            AspectRatio::Full => None,
        }
    }
}

/// Camera preview settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraSettings {
    pub aspect_ratio: AspectRatio,
    /// Encode quality for captured frames in `0.0..=1.0`
    pub quality: f32,
    pub facing_mode: FacingMode,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            aspect_ratio: AspectRatio::SixteenNine,
            quality: 0.8,
            facing_mode: FacingMode::Environment,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_storage_config() {
        let config = StorageConfig::default();
        assert_eq!(config.raw_folder, "raw");
        assert_eq!(config.processed_folder, "processed");
        assert_eq!(config.format, ImageFormat::Jpeg);
        assert!((config.quality - 0.8).abs() < f32::EPSILON);
    }

    #[test]
    fn facing_mode_flips() {
        assert_eq!(FacingMode::User.flipped(), FacingMode::Environment);
        assert_eq!(FacingMode::Environment.flipped(), FacingMode::User);
    }

    #[test]
    fn aspect_ratio_pairs() {
        assert_eq!(AspectRatio::SixteenNine.ratio(), Some((16, 9)));
        assert_eq!(AspectRatio::Full.ratio(), None);
    }
}
