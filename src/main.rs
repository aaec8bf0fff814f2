//! Storefront server binary

use std::sync::Arc;

use anyhow::Context;

use storefront::api::create_store_router;
use storefront::config::AppConfig;
use storefront::store::{MySqlStore, Store};
use storefront::{lifecycle, logging};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("failed to load configuration")?;

    logging::init_tracing(&config.logging)?;

    tracing::info!(
        host = %config.database.host,
        database = %config.database.name,
        max_connections = config.database.max_connections,
        "Connecting to MySQL"
    );

    let store = MySqlStore::connect(
        config.database.connect_options(),
        config.database.pool_settings(),
    )
    .await
    .context("failed to connect to MySQL")?;
    let store: Arc<dyn Store> = Arc::new(store);

    let router = create_store_router(store.clone());

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind to {}", addr))?;

    lifecycle::serve(listener, router, store).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
