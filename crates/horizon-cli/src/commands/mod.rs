//! CLI command definitions and dispatch.

pub mod seed;
pub mod user;

use clap::{Parser, Subcommand};

use horizon_api::AppState;
use horizon_core::config::AppConfig;
use horizon_core::error::AppError;
use horizon_database::{DatabasePool, StoreSet};

use crate::output::OutputFormat;

/// Event Horizon administration
#[derive(Debug, Parser)]
#[command(name = "horizon-cli", version, about, long_about = None)]
pub struct Cli {
    /// Path to the base configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create the admin account and demo users
    Seed(seed::SeedArgs),
    /// User management
    User(user::UserArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        let state = connect(&self.config).await?;
        let result = match &self.command {
            Commands::Seed(args) => seed::execute(args, &state).await,
            Commands::User(args) => user::execute(args, &state, self.format).await,
        };
        if let Some(db) = &state.database {
            db.close().await;
        }
        result
    }
}

/// Loads configuration and wires application state over PostgreSQL.
async fn connect(config_path: &str) -> Result<AppState, AppError> {
    let env = std::env::var("HORIZON_ENV").unwrap_or_else(|_| "development".to_string());
    tracing::debug!(config_path, env = %env, "Loading configuration");
    let config = AppConfig::load_from(config_path, &env)?;
    let pool = DatabasePool::connect(&config.database).await?;
    let stores = StoreSet::postgres(&pool);
    AppState::new(config, stores, Some(pool))
}
