#[cfg(feature = "mongo")]
use std::time::Duration;

#[cfg(feature = "mongo")]
use mongodb::{Client, Database, bson::doc, options::ClientOptions};

/// Configuration for the document database.
#[derive(Debug, Clone)]
pub struct MongoConfig {
    pub uri: String,
    pub database: String,
    pub collection: String,
    pub max_pool_size: u32,
    pub app_name: String,
}

/// Handle to the document database.
///
/// `Database` holds the driver's pooled client and is safe to share across
/// requests.
#[cfg(feature = "mongo")]
pub struct DatabaseConnections {
    pub database: Database,
}

#[cfg(feature = "mongo")]
impl DatabaseConnections {
    /// Connect and ping the server so that a bad target fails at startup.
    pub async fn init(config: &MongoConfig) -> Result<Self, mongodb::error::Error> {
        tracing::info!("Initializing database connection...");

        let mut options = ClientOptions::parse(&config.uri).await?;
        options.max_pool_size = Some(config.max_pool_size);
        options.connect_timeout = Some(Duration::from_secs(10));
        options.server_selection_timeout = Some(Duration::from_secs(10));
        options.app_name = Some(config.app_name.clone());

        let client = Client::with_options(options)?;
        let database = client.database(&config.database);
        database.run_command(doc! { "ping": 1 }).await?;

        tracing::info!(
            database = %config.database,
            pool = config.max_pool_size,
            "Database connected"
        );

        Ok(Self { database })
    }
}
