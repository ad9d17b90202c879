//! Artifact storage
//!
//! This module handles:
//! - The stored-file record model
//! - `FileStore`, the raw/processed artifact store (files.rs)

pub mod files;

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use files::{ArtifactPair, FileStore};

/// Which half of a capture an artifact holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    Raw,
    Processed,
}

impl ArtifactKind {
    /// Filename suffix distinguishing the pair members
    pub fn suffix(self) -> &'static str {
        match self {
            ArtifactKind::Raw => "raw",
            ArtifactKind::Processed => "processed",
        }
    }
}

/// A persisted artifact record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredFile {
    pub id: String,
    pub filename: String,
    pub path: PathBuf,
    pub kind: ArtifactKind,
    pub size: u64,
    pub created_at: DateTime<Utc>,
    pub metadata: Option<serde_json::Value>,
}
