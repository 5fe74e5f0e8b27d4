//! Health Route

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::AppState;

/// Health response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    /// Mean absolute error recorded at training time, in cycles
    #[serde(rename = "MAE")]
    pub mae: f64,
    pub version: String,
    pub uptime_seconds: u64,
    pub sequence_length: usize,
    pub sensor_count: usize,
}

/// Liveness check with static model quality figures
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let metadata = state.pipeline.metadata();

    Json(HealthResponse {
        status: "Model is Live".to_string(),
        mae: state.mae,
        version: state.version.clone(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        sequence_length: metadata.sequence_length,
        sensor_count: metadata.sensor_names.len(),
    })
}
