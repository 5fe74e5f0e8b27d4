//! ONNX Inference Engine
//!
//! Runs the trained RUL sequence model on a normalized `(L, F)` tensor and
//! extracts a single scalar prediction.

mod engine;
mod model;

pub use engine::{InferenceEngine, InferenceResult};
pub use model::{FnModel, OnnxModel, RulModel};

use thiserror::Error;

/// Errors during inference
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("Model load failed: {0}")]
    ModelLoadError(String),
    #[error("Inference failed: {0}")]
    InferenceFailed(String),
    #[error("Invalid input shape: expected {expected}, got {actual}")]
    InvalidInputShape { expected: String, actual: String },
    #[error("Model returned an invalid prediction: {0}")]
    InvalidOutput(String),
}
