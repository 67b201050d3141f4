//! Startup: train the model, open the database, serve until ctrl+c.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use tracing::{error, info};

use crate::app::{self, AppState};
use crate::config::Config;
use crate::db;
use crate::ml::{Dataset, ForestParams, YieldModel};

/// Load the dataset and fit the yield model on a blocking thread.
pub async fn train_model(dataset_path: &Path) -> anyhow::Result<YieldModel> {
    let path: PathBuf = dataset_path.to_path_buf();

    tokio::task::spawn_blocking(move || -> anyhow::Result<YieldModel> {
        let dataset = Dataset::from_csv(&path)
            .with_context(|| format!("failed to load dataset {}", path.display()))?;
        info!(path = %path.display(), rows = dataset.len(), "Dataset loaded");

        YieldModel::train(&dataset, &ForestParams::default()).context("failed to train yield model")
    })
    .await
    .context("training task panicked")?
}

pub async fn build_state(config: &Config) -> anyhow::Result<AppState> {
    let model = train_model(&config.dataset_path).await?;

    let pool = db::create_pool(&config.database_url, config.max_connections)
        .await
        .with_context(|| format!("failed to connect to {}", config.database_url))?;
    db::migrate(&pool).await.context("failed to create tables")?;
    info!(database_url = %config.database_url, "Database ready");

    Ok(AppState::new(pool, Arc::new(model), config.require_login))
}

pub async fn run(config: Config) -> anyhow::Result<()> {
    let addr = config.bind_address()?;
    let state = build_state(&config).await?;
    let router = app::create_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(
        address = %addr,
        require_login = config.require_login,
        pid = std::process::id(),
        "Server listening"
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down cleanly");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received, stopping server gracefully"),
        Err(e) => error!(error = %e, "Failed to listen for ctrl+c"),
    }
}
