//! Application builder and server runner.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::middleware as axum_middleware;
use tokio::sync::watch;
use tower_http::trace::TraceLayer;

use taskgate_core::config::AppConfig;
use taskgate_core::error::AppError;
use taskgate_governor::spawn_sweeper;

use crate::middleware::{build_cors_layer, edge_gate, error_boundary};
use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
///
/// Layer order, outermost first: trace, CORS, error boundary, edge gate
/// (when enabled), then the per-group pipelines inside the router.
pub fn build_app(state: AppState) -> Router {
    let posture = state.config.server.posture;
    let cors = build_cors_layer(&state.config.server.cors);
    let edge = state.edge.clone();

    let mut app = build_router(state);
    if let Some(gate) = edge {
        app = app.layer(axum_middleware::from_fn_with_state(gate, edge_gate));
    }

    app.layer(axum_middleware::from_fn_with_state(posture, error_boundary))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Runs the TaskGate server until `shutdown` resolves.
///
/// Starts the governor sweeper, serves until the signal, then stops the
/// sweeper and waits for it for at most `server.shutdown_grace_seconds`.
pub async fn run_server<F>(config: AppConfig, shutdown: F) -> Result<(), AppError>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let sweep_every = Duration::from_secs(config.rate_limit.sweep_interval_seconds);
    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);

    let state = AppState::in_memory(config);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let sweeper = spawn_sweeper(Arc::clone(&state.governors), sweep_every, shutdown_rx);

    let app = build_app(state);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!(%addr, "TaskGate server listening");

    let served = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async move {
        shutdown.await;
        tracing::info!("Shutdown signal received, starting graceful shutdown...");
    })
    .await
    .map_err(|e| AppError::internal(format!("Server error: {e}")));

    let _ = shutdown_tx.send(true);
    if tokio::time::timeout(grace, sweeper).await.is_err() {
        tracing::warn!("Rate governor sweeper did not stop within the grace period");
    }

    served
}
