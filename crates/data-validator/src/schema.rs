//! Sensor Schema and Window Types

use crate::error::SchemaError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;

/// One engine cycle: sensor name to value.
///
/// Values stay as raw JSON so that unlisted keys of any type are ignored
/// instead of rejecting the whole request.
pub type CycleReading = Map<String, Value>;

/// Ordered sequence of consecutive cycle readings submitted for one prediction
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Window {
    readings: Vec<CycleReading>,
}

impl Window {
    /// Create a window from readings, oldest first
    pub fn new(readings: Vec<CycleReading>) -> Self {
        Self { readings }
    }

    /// Number of cycles in the window
    pub fn len(&self) -> usize {
        self.readings.len()
    }

    /// Whether the window has no cycles
    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    /// Readings, oldest first
    pub fn readings(&self) -> &[CycleReading] {
        &self.readings
    }
}

impl From<Vec<CycleReading>> for Window {
    fn from(readings: Vec<CycleReading>) -> Self {
        Self::new(readings)
    }
}

/// Authoritative, ordered list of sensor names the scaler and model were trained on
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SensorSchema {
    names: Vec<String>,
}

impl SensorSchema {
    /// Build a schema, rejecting empty, blank or duplicated names
    pub fn new(names: Vec<String>) -> Result<Self, SchemaError> {
        if names.is_empty() {
            return Err(SchemaError::InvalidSchema(
                "sensor list is empty".to_string(),
            ));
        }

        let mut seen = HashSet::with_capacity(names.len());
        for name in &names {
            if name.trim().is_empty() {
                return Err(SchemaError::InvalidSchema(
                    "sensor names must not be blank".to_string(),
                ));
            }
            if !seen.insert(name.as_str()) {
                return Err(SchemaError::InvalidSchema(format!(
                    "duplicate sensor '{}'",
                    name
                )));
            }
        }

        Ok(Self { names })
    }

    /// Sensor names in training order
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Number of features (F)
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Always false for a constructed schema
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<'de> Deserialize<'de> for SensorSchema {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let names = Vec::<String>::deserialize(deserializer)?;
        SensorSchema::new(names).map_err(serde::de::Error::custom)
    }
}
