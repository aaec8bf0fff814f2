//! Process lifecycle: serve until a shutdown signal, then release the store.

use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::store::Store;

/// Resolves on Ctrl+C, or SIGTERM on unix.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

/// Run `router` on `listener` until `shutdown` resolves, then close the store.
///
/// In-flight requests are drained by the server before the store is closed.
pub async fn serve_until<F>(
    listener: TcpListener,
    router: Router,
    store: Arc<dyn Store>,
    shutdown: F,
) -> anyhow::Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    tracing::info!(%addr, "Listening for HTTP traffic");

    let served = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await;

    close_store(store.as_ref()).await;

    served?;
    tracing::info!("HTTP server stopped");
    Ok(())
}

/// [`serve_until`] driven by the process signals
pub async fn serve(
    listener: TcpListener,
    router: Router,
    store: Arc<dyn Store>,
) -> anyhow::Result<()> {
    serve_until(listener, router, store, shutdown_signal()).await
}

/// Close the store, logging the outcome either way.
pub async fn close_store(store: &dyn Store) {
    match store.close().await {
        Ok(()) => tracing::info!("Store connection closed"),
        Err(e) => tracing::error!(error = %e, "Failed to close store connection"),
    }
}
