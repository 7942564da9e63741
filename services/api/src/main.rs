use anyhow::Result;
use axum::{ServiceExt, extract::Request};
use tokio::{net::TcpListener, signal};
use tracing::info;
use tracing_subscriber::EnvFilter;

use api::{ApiConfig, AppState, create_app};
use common::storage::{self, StorageConfig};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting API service");

    let api_config = ApiConfig::from_env();
    let storage_config = StorageConfig::from_env();

    let storage = storage::connect(&storage_config).await?;
    info!("Storage initialized with {} objects", storage.count(None).await?);

    let app = create_app(AppState::new(storage.clone()));

    let address = api_config.address();
    let listener = TcpListener::bind(&address).await?;
    info!("API service listening on {}", address);

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    storage.close().await?;
    info!("API service stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutdown signal received");
}
