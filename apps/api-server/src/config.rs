//! Application configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;

use blog_core::domain::MAX_PHOTO_BYTES;
use blog_infra::database::MongoConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: Option<MongoConfig>,
    /// Directory served as static files at `/`.
    pub public_dir: PathBuf,
    pub max_upload_bytes: usize,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let database = env::var("MONGODB_URI").ok().map(|uri| MongoConfig {
            uri,
            database: env::var("MONGODB_DATABASE").unwrap_or_else(|_| "blog".to_string()),
            collection: env::var("MONGODB_COLLECTION").unwrap_or_else(|_| "blogs".to_string()),
            max_pool_size: env::var("MONGODB_MAX_POOL_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(100),
            app_name: env::var("SERVICE_NAME").unwrap_or_else(|_| "blog-api".to_string()),
        });

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            database,
            public_dir: env::var("PUBLIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("public")),
            max_upload_bytes: MAX_PHOTO_BYTES,
        }
    }

    /// Uploaded photos live under `<public_dir>/uploads` so the static file
    /// service exposes them at `/uploads/<name>`.
    pub fn uploads_dir(&self) -> PathBuf {
        self.public_dir.join("uploads")
    }
}
