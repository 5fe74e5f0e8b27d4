//! RUL Prediction Pipeline
//!
//! Runs one request window through validation, alignment, scaling,
//! sequence normalization, inference and response formatting.

mod formatter;
mod pipeline;

pub use formatter::{FormatterConfig, ResponseFormatter, RulPrediction, RulStatus};
pub use pipeline::{Pipeline, PipelineOutput};

use data_validator::SchemaError;
use feature_engine::FeatureError;
use inference_engine::InferenceError;
use thiserror::Error;

/// A failed prediction request
#[derive(Debug, Error)]
pub enum PredictError {
    /// Caller's window does not fit the schema
    #[error(transparent)]
    Schema(#[from] SchemaError),
    /// Loaded scaler disagrees with the request's feature layout
    #[error(transparent)]
    ScalerMismatch(#[from] FeatureError),
    /// Model invocation failed or returned an unusable value
    #[error(transparent)]
    Inference(#[from] InferenceError),
}

impl PredictError {
    /// Whether the caller caused this failure
    pub fn is_client_error(&self) -> bool {
        matches!(self, PredictError::Schema(_))
    }

    /// Stable label for logs and metrics
    pub fn kind(&self) -> &'static str {
        match self {
            PredictError::Schema(_) => "schema",
            PredictError::ScalerMismatch(_) => "scaler_mismatch",
            PredictError::Inference(_) => "inference",
        }
    }
}
