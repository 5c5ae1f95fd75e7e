use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use acciofocus_api::{build_router, state::AppState};
use acciofocus_config::Settings;
use acciofocus_services::identity::IdentityVerifier;
use acciofocus_services::store::MongoUserStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = Settings::load().context("Failed to load settings")?;

    let db = acciofocus_db::connect(&settings.database).await?;
    acciofocus_db::indexes::ensure_indexes(&db).await?;

    let store: Arc<dyn acciofocus_services::store::UserStore> =
        Arc::new(MongoUserStore::new(&db));
    let identity = IdentityVerifier::from_settings(&settings.identity)?;
    let state = AppState::new(store, identity);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!(%addr, "AccioFocus API listening");

    axum::serve(listener, build_router(state)).await?;
    Ok(())
}
