//! Local-disk photo storage under a fixed directory.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use blog_core::error::StorageError;
use blog_core::ports::PhotoStore;

/// Writes photos as flat files inside `root`.
///
/// Names come from `PhotoName::generate`, never from the client.
pub struct LocalPhotoStore {
    root: PathBuf,
}

impl LocalPhotoStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create the directory if needed and return a store rooted there.
    pub async fn init(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        tokio::fs::create_dir_all(&root)
            .await
            .map_err(|source| StorageError::Io {
                name: root.display().to_string(),
                source,
            })?;
        tracing::info!(dir = %root.display(), "Photo storage ready");
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_of(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }
}

#[async_trait]
impl PhotoStore for LocalPhotoStore {
    async fn save(&self, name: &str, bytes: &[u8]) -> Result<(), StorageError> {
        tokio::fs::write(self.path_of(name), bytes)
            .await
            .map_err(|source| StorageError::Io {
                name: name.to_string(),
                source,
            })?;
        tracing::debug!(file = name, size = bytes.len(), "Photo written");
        Ok(())
    }

    async fn remove(&self, name: &str) -> Result<(), StorageError> {
        tokio::fs::remove_file(self.path_of(name))
            .await
            .map_err(|source| StorageError::Io {
                name: name.to_string(),
                source,
            })?;
        tracing::debug!(file = name, "Photo removed");
        Ok(())
    }
}
