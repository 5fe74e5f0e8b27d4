//! Artifact Store
//!
//! Loads the trained model, fitted scaler and metadata once at startup and
//! checks them against each other. There is no lazy or partial load: any
//! missing or malformed artifact fails the whole load.

mod metadata;
mod store;

pub use metadata::ModelMetadata;
pub use store::{ArtifactPaths, ArtifactStore};

use feature_engine::FeatureError;
use inference_engine::InferenceError;
use std::path::PathBuf;
use thiserror::Error;

/// Artifact loading errors
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("Artifact not found: {}", .0.display())]
    Missing(PathBuf),
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed artifact {}: {reason}", .path.display())]
    Malformed { path: PathBuf, reason: String },
    #[error("Invalid metadata: {0}")]
    InvalidMetadata(String),
    #[error("Scaler does not match metadata: {0}")]
    ScalerMismatch(#[from] FeatureError),
    #[error(transparent)]
    Model(#[from] InferenceError),
}
