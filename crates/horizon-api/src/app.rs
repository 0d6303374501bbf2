//! Application builder: wires state into the router and runs the server.

use axum::Router;
use tracing::{error, info, warn};

use horizon_core::config::AppConfig;
use horizon_core::error::AppError;
use horizon_database::{DatabasePool, StoreSet};

use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    build_router(state)
}

/// Runs the Event Horizon server against a PostgreSQL pool.
pub async fn run_server(config: AppConfig, db_pool: DatabasePool) -> Result<(), AppError> {
    info!("Starting Event Horizon server...");

    if config.auth.uses_default_secret() {
        warn!("auth.jwt_secret is the shipped placeholder; set HORIZON__AUTH__JWT_SECRET");
    }

    let stores = StoreSet::postgres(&db_pool);
    let addr = config.server.bind_address();
    let state = AppState::new(config, stores, Some(db_pool.clone()))?;
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    info!("Event Horizon server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    db_pool.close().await;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
