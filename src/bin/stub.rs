//! Route-less companion service
//!
//! Holds a store connection and the shared middleware stack on the stub
//! port, answering every path with 404, and releases the store on shutdown.

use std::sync::Arc;

use anyhow::Context;

use storefront::api::create_bare_router;
use storefront::config::AppConfig;
use storefront::store::{MySqlStore, Store};
use storefront::{lifecycle, logging};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("failed to load configuration")?;

    logging::init_tracing(&config.logging)?;

    let store = MySqlStore::connect(
        config.database.connect_options(),
        config.database.pool_settings(),
    )
    .await
    .context("failed to connect to MySQL")?;
    let store: Arc<dyn Store> = Arc::new(store);

    let addr = format!("{}:{}", config.server.host, config.server.stub_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind to {}", addr))?;

    lifecycle::serve(listener, create_bare_router(), store).await?;

    Ok(())
}
