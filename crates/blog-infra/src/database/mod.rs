//! Database connection management.

mod connections;

pub use connections::MongoConfig;

#[cfg(feature = "mongo")]
pub use connections::DatabaseConnections;
