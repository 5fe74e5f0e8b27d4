//! Training Metadata

use data_validator::SensorSchema;
use serde::{Deserialize, Serialize};

/// Contents of `metadata.json`, written alongside the model at training time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    /// Sensors in the exact order the scaler was fitted on
    pub sensor_names: SensorSchema,
    /// Sequence length (L) the model was trained with
    pub sequence_length: usize,
    /// Mean absolute error on the held-out set, in cycles
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mae: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_version: Option<String>,
}
