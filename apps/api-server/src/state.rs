//! Application state - shared across all handlers.

use std::io;
use std::sync::Arc;

use blog_core::domain::UploadPolicy;
use blog_core::ports::{BlogRepository, PhotoStore};
use blog_infra::{InMemoryBlogRepository, LocalPhotoStore};

use crate::config::AppConfig;

#[cfg(feature = "mongo")]
use blog_infra::{DatabaseConnections, MongoBlogRepository};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub blogs: Arc<dyn BlogRepository>,
    pub photos: Arc<dyn PhotoStore>,
    pub upload_policy: UploadPolicy,
}

impl AppState {
    /// Assemble state from already-built adapters.
    pub fn from_parts(
        blogs: Arc<dyn BlogRepository>,
        photos: Arc<dyn PhotoStore>,
        upload_policy: UploadPolicy,
    ) -> Self {
        Self {
            blogs,
            photos,
            upload_policy,
        }
    }

    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> io::Result<Self> {
        let photos: Arc<dyn PhotoStore> = Arc::new(
            LocalPhotoStore::init(config.uploads_dir())
                .await
                .map_err(io::Error::other)?,
        );

        #[cfg(feature = "mongo")]
        let blogs: Arc<dyn BlogRepository> = match &config.database {
            Some(db_config) => {
                let connections = DatabaseConnections::init(db_config).await.map_err(|e| {
                    tracing::error!(error = %e, "Failed to connect to database");
                    io::Error::other(e)
                })?;
                Arc::new(MongoBlogRepository::new(
                    &connections.database,
                    &db_config.collection,
                ))
            }
            None => {
                tracing::warn!("MONGODB_URI not set. Running without database (in-memory mode).");
                Arc::new(InMemoryBlogRepository::new())
            }
        };

        #[cfg(not(feature = "mongo"))]
        let blogs: Arc<dyn BlogRepository> = {
            tracing::info!("Running without mongo feature - using in-memory repository");
            Arc::new(InMemoryBlogRepository::new())
        };

        tracing::info!("Application state initialized");

        Ok(Self::from_parts(
            blogs,
            photos,
            UploadPolicy::new(config.max_upload_bytes),
        ))
    }
}
