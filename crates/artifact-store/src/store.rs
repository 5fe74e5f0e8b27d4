//! Artifact Loading

use crate::metadata::ModelMetadata;
use crate::ArtifactError;
use data_validator::SensorSchema;
use feature_engine::FittedScaler;
use inference_engine::{OnnxModel, RulModel};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// Locations of the three startup artifacts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub model: PathBuf,
    pub scaler: PathBuf,
    pub metadata: PathBuf,
}

impl ArtifactPaths {
    /// Resolve artifact file names against a directory
    pub fn in_dir(dir: impl AsRef<Path>, model: &str, scaler: &str, metadata: &str) -> Self {
        let dir = dir.as_ref();
        Self {
            model: dir.join(model),
            scaler: dir.join(scaler),
            metadata: dir.join(metadata),
        }
    }
}

/// Immutable, cross-checked set of loaded artifacts
pub struct ArtifactStore {
    metadata: ModelMetadata,
    schema: Arc<SensorSchema>,
    scaler: FittedScaler,
    model: Box<dyn RulModel>,
}

impl ArtifactStore {
    /// Load metadata, scaler and ONNX model from disk
    pub fn load(paths: &ArtifactPaths) -> Result<Self, ArtifactError> {
        for path in [&paths.metadata, &paths.scaler, &paths.model] {
            if !path.is_file() {
                warn!("Missing artifact {}", path.display());
                return Err(ArtifactError::Missing(path.clone()));
            }
        }

        let metadata: ModelMetadata = read_json(&paths.metadata)?;
        let scaler: FittedScaler = read_json(&paths.scaler)?;
        check_parts(&metadata, &scaler)?;

        let model = OnnxModel::load(
            &paths.model,
            metadata.sequence_length,
            metadata.sensor_names.len(),
        )?;

        Ok(Self::assemble(metadata, scaler, Box::new(model)))
    }

    /// Assemble a store from already-loaded parts, applying the same
    /// consistency checks as [`ArtifactStore::load`]
    pub fn from_parts(
        metadata: ModelMetadata,
        scaler: FittedScaler,
        model: Box<dyn RulModel>,
    ) -> Result<Self, ArtifactError> {
        check_parts(&metadata, &scaler)?;
        Ok(Self::assemble(metadata, scaler, model))
    }

    fn assemble(metadata: ModelMetadata, scaler: FittedScaler, model: Box<dyn RulModel>) -> Self {
        info!(
            "Artifacts ready: model={}, sensors={}, sequence_length={}",
            model.name(),
            metadata.sensor_names.len(),
            metadata.sequence_length
        );

        let schema = Arc::new(metadata.sensor_names.clone());
        Self {
            metadata,
            schema,
            scaler,
            model,
        }
    }

    pub fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }

    pub fn schema(&self) -> &Arc<SensorSchema> {
        &self.schema
    }

    /// Split into parts for the request pipeline
    pub fn into_parts(
        self,
    ) -> (
        ModelMetadata,
        Arc<SensorSchema>,
        FittedScaler,
        Box<dyn RulModel>,
    ) {
        (self.metadata, self.schema, self.scaler, self.model)
    }
}

/// Cross-check metadata and scaler before any model is built on them
fn check_parts(metadata: &ModelMetadata, scaler: &FittedScaler) -> Result<(), ArtifactError> {
    check_metadata(metadata)?;
    scaler.check_schema(metadata.sensor_names.names())?;
    Ok(())
}

fn check_metadata(metadata: &ModelMetadata) -> Result<(), ArtifactError> {
    if metadata.sequence_length == 0 {
        return Err(ArtifactError::InvalidMetadata(
            "sequence_length must be at least 1".to_string(),
        ));
    }
    if let Some(mae) = metadata.mae {
        if !mae.is_finite() || mae < 0.0 {
            return Err(ArtifactError::InvalidMetadata(format!(
                "mae must be a non-negative number, got {}",
                mae
            )));
        }
    }
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    let raw = std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            ArtifactError::Missing(path.to_path_buf())
        } else {
            ArtifactError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    serde_json::from_str(&raw).map_err(|e| ArtifactError::Malformed {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}
