pub mod indexes;
pub mod models;

use acciofocus_config::DatabaseSettings;
use mongodb::{Client, Database};
use tracing::info;

pub async fn connect(settings: &DatabaseSettings) -> mongodb::error::Result<Database> {
    let client = Client::with_uri_str(&settings.uri).await?;
    let db = client.database(&settings.name);
    info!(database = %settings.name, "Connected to MongoDB");
    Ok(db)
}
