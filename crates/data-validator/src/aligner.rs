//! Feature Alignment
//!
//! The scaler is a positional transform, so columns must be in exactly the
//! order it was fitted on. Feeding it the right values in the wrong order
//! corrupts every scaled value without any error.

use crate::error::SchemaError;
use crate::schema::{CycleReading, SensorSchema, Window};
use ndarray::Array2;
use std::sync::Arc;
use tracing::debug;

/// Look up one schema sensor in a reading as a finite `f64`
pub(crate) fn sensor_value(
    reading: &CycleReading,
    cycle: usize,
    field: &str,
) -> Result<f64, SchemaError> {
    let value = reading.get(field).ok_or_else(|| SchemaError::MissingField {
        cycle,
        field: field.to_string(),
    })?;

    value
        .as_f64()
        .filter(|v| v.is_finite())
        .ok_or_else(|| SchemaError::NonNumericValue {
            cycle,
            field: field.to_string(),
        })
}

/// Reorders readings into schema column order
pub struct FeatureAligner {
    schema: Arc<SensorSchema>,
}

impl FeatureAligner {
    /// Create a new aligner for the given schema
    pub fn new(schema: Arc<SensorSchema>) -> Self {
        Self { schema }
    }

    /// Build an `(n, F)` matrix with one row per cycle and columns in schema
    /// order. Keys not in the schema are dropped.
    pub fn align(&self, window: &Window) -> Result<Array2<f64>, SchemaError> {
        let rows = window.len();
        let cols = self.schema.len();
        let mut aligned = Array2::<f64>::zeros((rows, cols));

        for (cycle, reading) in window.readings().iter().enumerate() {
            for (col, field) in self.schema.names().iter().enumerate() {
                aligned[[cycle, col]] = sensor_value(reading, cycle, field)?;
            }
        }

        debug!("Aligned window to shape ({}, {})", rows, cols);
        Ok(aligned)
    }
}
