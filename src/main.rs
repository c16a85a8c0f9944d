//! TaskGate Server: request authentication and governance in front of a task API.
//!
//! Main entry point that loads configuration, initialises logging, and
//! hands over to the API crate's server runner.

use tracing_subscriber::{EnvFilter, fmt};

use taskgate_core::config::AppConfig;
use taskgate_core::error::AppError;

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        posture = ?config.server.posture,
        edge = config.edge.enabled,
        "Starting TaskGate"
    );

    if let Err(e) = taskgate_api::run_server(config, shutdown_signal()).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }

    tracing::info!("TaskGate server shut down gracefully");
}

/// Load `config/default.toml`, the `TASKGATE_ENV` overlay, and env overrides.
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("TASKGATE_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load(&env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
