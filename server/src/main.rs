use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use server::api::run_api_server;
use server::config::ServerConfig;
use server::repository::{InMemoryScoreRepository, ScoreRepository};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if exists
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ServerConfig::from_env().context("Failed to load server configuration")?;
    info!("Environment: {:?}", config.environment);

    // Scores live for the lifetime of the process
    let repository = Arc::new(InMemoryScoreRepository::new()) as Arc<dyn ScoreRepository>;

    run_api_server(&config, repository).await?;

    info!("Server shut down successfully");
    Ok(())
}
