//! # Blog Infrastructure
//!
//! Concrete implementations of the ports defined in `blog-core`.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external dependencies, in-memory only
//! - `mongo` - MongoDB document store via the official driver

pub mod database;
pub mod repository;
pub mod storage;

// Re-exports - In-Memory / local disk
pub use repository::InMemoryBlogRepository;
pub use storage::LocalPhotoStore;

// Re-exports - MongoDB
#[cfg(feature = "mongo")]
pub use database::DatabaseConnections;
#[cfg(feature = "mongo")]
pub use repository::MongoBlogRepository;
