//! Feature Engineering Engine
//!
//! Turns an aligned `(n, F)` window into the fixed `(L, F)` tensor the
//! sequence model expects: fitted per-feature scaling, then left-padding or
//! truncation to the model's sequence length.

mod scaler;
mod sequence;

pub use scaler::{FittedScaler, ScalingMethod};
pub use sequence::{NormalizedTensor, SequenceNormalizer};

use thiserror::Error;

/// Errors during feature transformation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FeatureError {
    /// Input column count differs from the fitted parameter count
    #[error("Scaler mismatch: scaler fitted on {expected} features, input has {actual}")]
    ScalerMismatch { expected: usize, actual: usize },
    /// Scaler was fitted on differently named or ordered features
    #[error("Scaler mismatch at feature {position}: scaler expects '{expected}', schema has '{actual}'")]
    FeatureNameMismatch {
        position: usize,
        expected: String,
        actual: String,
    },
    /// Fitted parameters are internally inconsistent
    #[error("Invalid scaler parameters: {0}")]
    InvalidParameters(String),
    /// Sequence length must be at least one cycle
    #[error("Invalid sequence length: {0}")]
    InvalidSequenceLength(usize),
}
