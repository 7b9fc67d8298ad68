//! Domain-level error types.

use thiserror::Error;

/// Domain errors - business rule violations in client input.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Document could not be converted: {0}")]
    Serialization(String),
}

/// Photo storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O failure on {name}: {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

/// Reasons an uploaded photo is refused before anything touches disk.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UploadError {
    #[error("No file was provided in the `{0}` field")]
    MissingFile(&'static str),

    #[error("Unsupported file extension: {0:?}")]
    UnsupportedExtension(String),

    #[error("Unsupported media type: {0:?}")]
    UnsupportedMediaType(String),

    #[error("File exceeds the {limit} byte limit")]
    TooLarge { limit: usize },

    #[error("Malformed upload: {0}")]
    Malformed(String),
}

impl UploadError {
    /// Stable, machine-readable code for the wire envelope.
    pub fn code(&self) -> &'static str {
        match self {
            UploadError::MissingFile(_) => "missing_file",
            UploadError::UnsupportedExtension(_) => "unsupported_extension",
            UploadError::UnsupportedMediaType(_) => "unsupported_media_type",
            UploadError::TooLarge { .. } => "file_too_large",
            UploadError::Malformed(_) => "malformed_upload",
        }
    }
}
