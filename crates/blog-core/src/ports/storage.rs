use async_trait::async_trait;

use crate::error::StorageError;

/// Storage for uploaded photo files, addressed by generated file name.
#[async_trait]
pub trait PhotoStore: Send + Sync {
    /// Persist `bytes` under `name`.
    async fn save(&self, name: &str, bytes: &[u8]) -> Result<(), StorageError>;

    /// Remove a previously saved file.
    async fn remove(&self, name: &str) -> Result<(), StorageError>;
}
