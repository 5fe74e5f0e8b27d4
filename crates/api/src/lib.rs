//! Turbofan RUL API Server
//!
//! Serves remaining-useful-life predictions over HTTP from artifacts loaded
//! once at startup.

use axum::{
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod error;
mod routes;
mod settings;
pub mod telemetry;

pub use error::ApiError;
pub use routes::health::HealthResponse;
pub use routes::predict::PredictRequest;
pub use settings::{
    ArtifactConfig, ConfigError, HealthConfig, LoggingConfig, MetricsConfig, PipelineConfig,
    ServerConfig, ServiceConfig,
};

use predictor::Pipeline;

/// Immutable application state shared across handlers
pub struct AppState {
    /// Request pipeline over the loaded artifacts
    pub pipeline: Pipeline,
    /// Training-time mean absolute error reported by the health route
    pub mae: f64,
    /// Version string
    pub version: String,
    /// Start time
    pub start_time: std::time::Instant,
    /// Prometheus handle, when the exporter is installed
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create new application state. The metadata's MAE takes precedence
    /// over `fallback_mae`.
    pub fn new(pipeline: Pipeline, fallback_mae: f64, metrics: Option<PrometheusHandle>) -> Self {
        let mae = pipeline.metadata().mae.unwrap_or(fallback_mae);
        Self {
            pipeline,
            mae,
            version: env!("CARGO_PKG_VERSION").to_string(),
            start_time: std::time::Instant::now(),
            metrics,
        }
    }
}

/// Create the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(routes::health::health))
        .route("/health", get(routes::health::health))
        .route("/predict", post(routes::predict::predict))
        .route("/metrics", get(routes::metrics::render))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Initialize logging. `RUST_LOG` overrides the configured level.
pub fn init_logging(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    let result = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    if let Err(e) = result {
        eprintln!("Tracing subscriber already set: {}", e);
    }
}

/// Run the server until Ctrl-C
pub async fn run_server(addr: SocketAddr, state: Arc<AppState>) -> std::io::Result<()> {
    let app = create_router(state);

    info!("Starting API server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("API server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
