//! Blog repository implementations - MongoDB and in-memory fallback.

mod memory;

#[cfg(feature = "mongo")]
mod mongo;

pub use memory::InMemoryBlogRepository;

#[cfg(feature = "mongo")]
pub use mongo::MongoBlogRepository;
