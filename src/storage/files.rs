//! Dual-artifact file store
//!
//! Every capture yields two artifacts, raw and processed, written
//! together under an application-private root. The pair shares one
//! filesystem-safe timestamp token and carries identical metadata;
//! each record gets its own id. If one write fails the surviving
//! sibling is removed, so the store never holds an orphan half.

use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;
use walkdir::WalkDir;

use crate::config::StorageConfig;
use crate::error::Result;
use crate::format::timestamp_token;
use crate::storage::{ArtifactKind, StoredFile};

pub struct FileStore {
    root: PathBuf,
    config: StorageConfig,
}

/// The two records produced by one capture
#[derive(Debug, Clone)]
pub struct ArtifactPair {
    pub raw: StoredFile,
    pub processed: StoredFile,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>, config: StorageConfig) -> Self {
        Self {
            root: root.into(),
            config,
        }
    }

    /// Store rooted in the user's data directory:
    /// - Linux: ~/.local/share/gps-cam
    /// - macOS: ~/Library/Application Support/gps-cam
    /// - Windows: %APPDATA%\gps-cam
    pub fn open_default(config: StorageConfig) -> Result<Self> {
        let mut root = dirs::data_dir().or_else(dirs::home_dir).ok_or_else(|| {
            crate::error::GpsCamError::DeviceUnsupported("no user data directory".into())
        })?;
        root.push("gps-cam");
        Ok(Self::new(root, config))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    pub fn update_config(&mut self, config: StorageConfig) {
        self.config = config;
    }

    fn folder_for(&self, kind: ArtifactKind) -> &str {
        match kind {
            ArtifactKind::Raw => &self.config.raw_folder,
            ArtifactKind::Processed => &self.config.processed_folder,
        }
    }

    /// Create the raw/processed folders. Idempotent; failures are
    /// logged and retried on first use instead of aborting startup.
    pub async fn initialize(&self) {
        for folder in [&self.config.raw_folder, &self.config.processed_folder] {
            let path = self.root.join(folder);
            if let Err(e) = tokio::fs::create_dir_all(&path).await {
                warn!(path = %path.display(), error = %e, "storage folder creation failed");
            }
        }
    }

    /// Write one artifact and return its record
    pub async fn save_file(
        &self,
        data: &[u8],
        filename: &str,
        kind: ArtifactKind,
        metadata: Option<serde_json::Value>,
    ) -> Result<StoredFile> {
        let folder = self.root.join(self.folder_for(kind));
        if let Err(e) = tokio::fs::create_dir_all(&folder).await {
            warn!(path = %folder.display(), error = %e, "storage folder creation failed");
        }

        let path = folder.join(filename);
        tokio::fs::write(&path, data).await?;
        let size = tokio::fs::metadata(&path).await?.len();

        Ok(StoredFile {
            id: Uuid::new_v4().to_string(),
            filename: filename.to_string(),
            path,
            kind,
            size,
            created_at: Utc::now(),
            metadata,
        })
    }

    /// Persist a raw/processed pair under one timestamp token.
    ///
    /// Both writes run concurrently. The call succeeds only if both
    /// succeed; on a partial failure the written half is removed.
    pub async fn save_pair(
        &self,
        raw: &[u8],
        processed: &[u8],
        base_name: &str,
        metadata: Option<serde_json::Value>,
    ) -> Result<ArtifactPair> {
        let token = timestamp_token(Utc::now());
        let extension = self.config.format.extension();
        let name_for = |kind: ArtifactKind| {
            format!("{base_name}_{token}_{}.{extension}", kind.suffix())
        };
        let raw_name = name_for(ArtifactKind::Raw);
        let processed_name = name_for(ArtifactKind::Processed);

        let (raw_result, processed_result) = tokio::join!(
            self.save_file(raw, &raw_name, ArtifactKind::Raw, metadata.clone()),
            self.save_file(processed, &processed_name, ArtifactKind::Processed, metadata),
        );

        match (raw_result, processed_result) {
            (Ok(raw), Ok(processed)) => {
                info!(
                    raw = %raw.filename,
                    processed = %processed.filename,
                    "capture pair persisted"
                );
                Ok(ArtifactPair { raw, processed })
            }
            (Ok(orphan), Err(e)) | (Err(e), Ok(orphan)) => {
                // Keep the together-or-not-at-all invariant
                if let Err(cleanup) = tokio::fs::remove_file(&orphan.path).await {
                    warn!(path = %orphan.path.display(), error = %cleanup, "orphan cleanup failed");
                }
                Err(e)
            }
            (Err(e), Err(_)) => Err(e),
        }
    }

    /// Read an artifact back by its store-relative path
    pub async fn read_file(&self, relative: impl AsRef<Path>) -> Result<Vec<u8>> {
        Ok(tokio::fs::read(self.root.join(relative)).await?)
    }

    /// Delete an artifact by its store-relative path
    pub async fn delete_file(&self, relative: impl AsRef<Path>) -> Result<()> {
        tokio::fs::remove_file(self.root.join(relative)).await?;
        Ok(())
    }

    /// Names of the files in one storage folder (raw by default).
    /// Listing failures yield an empty result rather than an error.
    pub fn list_files(&self, folder: Option<&str>) -> Vec<String> {
        let target = self.root.join(folder.unwrap_or(&self.config.raw_folder));

        WalkDir::new(target)
            .max_depth(1)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect()
    }

    /// Degraded mode: hand the bytes to a caller-visible directory
    /// without creating a store record. Used when the private store is
    /// unavailable and the operator opts to save/download instead.
    pub async fn export(
        &self,
        data: &[u8],
        directory: &Path,
        filename: &str,
    ) -> Result<PathBuf> {
        tokio::fs::create_dir_all(directory).await?;
        let path = directory.join(filename);
        tokio::fs::write(&path, data).await?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store() -> (TempDir, FileStore) {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path(), StorageConfig::default());
        (dir, store)
    }

    /// Pull the shared timestamp token out of `<base>_<token>_<kind>.<ext>`
    fn token_of(filename: &str) -> &str {
        filename
            .strip_prefix("photo_")
            .unwrap()
            .rsplit_once('_')
            .unwrap()
            .0
    }

    #[tokio::test]
    async fn pair_filenames_share_one_token() {
        let (_dir, store) = store();
        store.initialize().await;

        let pair = store
            .save_pair(b"raw-bytes", b"processed-bytes", "photo", None)
            .await
            .unwrap();

        assert!(pair.raw.filename.ends_with("_raw.jpeg"));
        assert!(pair.processed.filename.ends_with("_processed.jpeg"));
        assert_eq!(token_of(&pair.raw.filename), token_of(&pair.processed.filename));
        assert_ne!(pair.raw.id, pair.processed.id);
    }

    #[tokio::test]
    async fn pair_lands_in_separate_folders() {
        let (dir, store) = store();
        store.initialize().await;

        let pair = store
            .save_pair(b"raw", b"processed", "photo", None)
            .await
            .unwrap();

        assert!(pair.raw.path.starts_with(dir.path().join("raw")));
        assert!(pair.processed.path.starts_with(dir.path().join("processed")));
        assert!(pair.raw.path.exists());
        assert!(pair.processed.path.exists());
        assert_eq!(pair.raw.size, 3);
        assert_eq!(pair.processed.size, 9);
    }

    #[tokio::test]
    async fn metadata_is_attached_to_both_records() {
        let (_dir, store) = store();
        let metadata = serde_json::json!({ "template": "default" });

        let pair = store
            .save_pair(b"a", b"b", "photo", Some(metadata.clone()))
            .await
            .unwrap();

        assert_eq!(pair.raw.metadata.as_ref(), Some(&metadata));
        assert_eq!(pair.processed.metadata.as_ref(), Some(&metadata));
    }

    #[tokio::test]
    async fn read_delete_and_list() {
        let (_dir, store) = store();
        store.initialize().await;

        let file = store
            .save_file(b"bytes", "shot.jpeg", ArtifactKind::Raw, None)
            .await
            .unwrap();

        assert_eq!(store.read_file("raw/shot.jpeg").await.unwrap(), b"bytes");
        assert_eq!(store.list_files(None), vec!["shot.jpeg".to_string()]);
        assert!(store.list_files(Some("processed")).is_empty());

        store.delete_file("raw/shot.jpeg").await.unwrap();
        assert!(store.list_files(None).is_empty());
        assert!(!file.path.exists());
    }

    #[tokio::test]
    async fn export_writes_without_a_record() {
        let (_dir, store) = store();
        let out = TempDir::new().unwrap();

        let path = store
            .export(b"bytes", out.path(), "download.jpeg")
            .await
            .unwrap();
        assert_eq!(std::fs::read(path).unwrap(), b"bytes");

        // Nothing landed in the store itself
        assert!(store.list_files(None).is_empty());
        assert!(store.list_files(Some("processed")).is_empty());
    }
}
