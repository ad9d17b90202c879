//! Errors for the capture pipeline

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GpsCamError {
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("device capability unavailable: {0}")]
    DeviceUnsupported(String),

    #[error("{0} not initialized")]
    Uninitialized(&'static str),

    #[error("record not found: {0}")]
    NotFound(String),

    #[error("position unavailable: {0}")]
    PositionUnavailable(String),

    #[error("invalid color literal: {0}")]
    InvalidColor(String),

    #[error("I/O failure")]
    Io(#[from] std::io::Error),

    #[error("database failure")]
    Database(#[from] rusqlite::Error),

    #[error("timestamp parse failed")]
    TimestampParse(#[from] chrono::ParseError),

    #[error("image encoding failed")]
    Encoding(#[from] image::ImageError),

    #[error("serialization failed")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GpsCamError>;
