//! HTTP Error Mapping

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use predictor::PredictError;
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

/// Errors returned from request handlers.
///
/// Client-caused failures map to 400, everything else to 500. The body is
/// always `{"detail": "<message>"}`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request body could not be parsed
    #[error("{0}")]
    BadRequest(String),
    /// Pipeline rejected or failed the request
    #[error(transparent)]
    Predict(#[from] PredictError),
    /// Failure outside the pipeline (e.g. a panicked worker)
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Predict(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            ApiError::Predict(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let detail = self.to_string();

        if status.is_client_error() {
            warn!(status = status.as_u16(), "Rejected request: {}", detail);
        } else {
            error!(status = status.as_u16(), "Prediction error: {}", detail);
        }

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}
