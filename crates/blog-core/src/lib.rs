//! # Blog Core
//!
//! The domain layer of the blog service.
//! Entities, validation rules, the upload policy and the port traits that
//! infrastructure adapters implement. No I/O happens in this crate.

pub mod domain;
pub mod error;
pub mod ports;

pub use error::{DomainError, RepoError, StorageError, UploadError};
