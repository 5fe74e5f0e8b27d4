//! Prediction Route

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use data_validator::Window;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use crate::error::ApiError;
use crate::telemetry::{record_failure, record_prediction};
use crate::AppState;
use predictor::RulPrediction;

/// Body of `POST /predict`
#[derive(Debug, Serialize, Deserialize)]
pub struct PredictRequest {
    /// Consecutive cycle readings, oldest first
    pub data_window: Window,
}

/// Predict remaining useful life for one window.
///
/// The pipeline is CPU-bound, so it runs on the blocking pool.
pub async fn predict(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> Result<Json<RulPrediction>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        record_failure("schema");
        ApiError::BadRequest(rejection.body_text())
    })?;

    debug!("Received window of {} cycles", request.data_window.len());

    let result = tokio::task::spawn_blocking(move || state.pipeline.predict(&request.data_window))
        .await
        .map_err(|e| {
            record_failure("internal");
            ApiError::Internal(format!("Prediction task failed: {}", e))
        })?;

    match result {
        Ok(output) => {
            record_prediction(output.inference_latency);
            Ok(Json(output.prediction))
        }
        Err(e) => {
            record_failure(e.kind());
            Err(e.into())
        }
    }
}
