//! Turbofan RUL Predictor - Main Entry Point

use anyhow::Context;
use api::{init_logging, run_server, telemetry, AppState, ServiceConfig};
use artifact_store::ArtifactStore;
use predictor::Pipeline;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServiceConfig::load().context("loading configuration")?;
    init_logging(&config.logging);

    info!("=== Turbofan RUL Predictor v{} ===", env!("CARGO_PKG_VERSION"));

    let paths = config.artifact_paths();
    let store = ArtifactStore::load(&paths)
        .with_context(|| format!("loading artifacts from {}", config.artifacts.dir.display()))?;
    let pipeline = Pipeline::new(store, config.pipeline.length_policy, config.formatter())
        .context("building prediction pipeline")?;

    let metrics = if config.metrics.enabled {
        telemetry::install_recorder()
    } else {
        None
    };

    let state = Arc::new(AppState::new(pipeline, config.health.mae, metrics));
    run_server(config.bind_addr()?, state).await?;

    Ok(())
}
