//! Event Horizon server.
//!
//! Main entry point that loads configuration, connects to PostgreSQL and
//! starts the HTTP API.

use tracing_subscriber::{EnvFilter, fmt};

use horizon_core::config::AppConfig;
use horizon_core::error::AppError;
use horizon_database::DatabasePool;

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

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Load configuration from file and environment
fn load_configuration() -> Result<AppConfig, AppError> {
    let config_path =
        std::env::var("HORIZON_CONFIG").unwrap_or_else(|_| "config/default".to_string());
    let env = std::env::var("HORIZON_ENV").unwrap_or_else(|_| "development".to_string());

    let config = AppConfig::load_from(&config_path, &env)?;
    if env == "production" && config.auth.uses_default_secret() {
        return Err(AppError::configuration(
            "auth.jwt_secret must be set in production",
        ));
    }
    Ok(config)
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

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting Event Horizon v{}", env!("CARGO_PKG_VERSION"));

    tracing::info!("Connecting to database...");
    let db_pool = DatabasePool::connect(&config.database).await?;

    horizon_api::run_server(config, db_pool).await
}
