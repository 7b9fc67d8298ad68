//! Photo storage implementations.

mod local;

pub use local::LocalPhotoStore;
