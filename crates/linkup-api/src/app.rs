//! Application builder: wires router + middleware + state into an Axum app.

use std::future::{Future, IntoFuture};
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::Notify;
use tracing::{info, warn};

use linkup_core::config::AppConfig;
use linkup_core::error::AppError;
use linkup_service::account::{AccountDirectory, MemoryAccountDirectory};

use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    build_router(state)
}

/// Builds the account directory, seeded from `accounts.seed_file` when set.
pub async fn load_directory(config: &AppConfig) -> Result<Arc<dyn AccountDirectory>, AppError> {
    let directory = match &config.accounts.seed_file {
        Some(path) => MemoryAccountDirectory::load_seed(path).await?,
        None => {
            warn!("No account seed configured, starting with an empty directory");
            MemoryAccountDirectory::new()
        }
    };

    Ok(Arc::new(directory))
}

/// Runs the Linkup server with the given configuration.
pub async fn run_server(config: AppConfig) -> Result<(), AppError> {
    info!("Starting Linkup server...");

    let directory = load_directory(&config).await?;
    let addr = config.bind_address();
    let state = AppState::new(config, directory);

    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {}: {}", addr, e)))?;

    info!("Linkup server listening on {}", addr);

    serve(listener, state, shutdown_signal()).await
}

/// Serves `state` on an already bound listener until `shutdown` resolves.
///
/// On shutdown every live WebSocket is closed through its normal disconnect
/// path, then in-flight requests get `shutdown_grace_seconds` to drain.
pub async fn serve(
    listener: TcpListener,
    state: AppState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), AppError> {
    let grace = Duration::from_secs(state.config.server.shutdown_grace_seconds);
    let engine = state.realtime.clone();
    let draining = Arc::new(Notify::new());

    let app = build_app(state);
    let server = axum::serve(listener, app).with_graceful_shutdown({
        let draining = draining.clone();
        async move {
            shutdown.await;
            info!("Shutdown signal received, closing realtime connections");
            if let Err(e) = engine.shutdown().await {
                warn!(error = %e, "Realtime engine shutdown failed");
            }
            draining.notify_one();
        }
    });

    tokio::select! {
        result = server.into_future() => {
            result.map_err(|e| AppError::internal(format!("Server error: {}", e)))?;
        }
        _ = async {
            draining.notified().await;
            tokio::time::sleep(grace).await;
        } => {
            warn!(grace_seconds = grace.as_secs(), "Graceful shutdown timed out");
        }
    }

    info!("Linkup server stopped");
    Ok(())
}

/// Resolves on Ctrl+C or, on unix, SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
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
                warn!(error = %e, "Failed to install SIGTERM handler");
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
}
