//! Request Window Validator

use crate::aligner::sensor_value;
use crate::error::SchemaError;
use crate::schema::{SensorSchema, Window};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// How windows whose length differs from the model's sequence length are treated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LengthPolicy {
    /// Accept any non-empty window; the sequence normalizer pads or truncates
    #[default]
    Flexible,
    /// Reject any window that is not exactly the sequence length
    Strict,
}

/// Validates request windows against the sensor schema
pub struct Validator {
    schema: Arc<SensorSchema>,
    policy: LengthPolicy,
    sequence_length: usize,
}

impl Validator {
    /// Create a new validator
    pub fn new(schema: Arc<SensorSchema>, policy: LengthPolicy, sequence_length: usize) -> Self {
        Self {
            schema,
            policy,
            sequence_length,
        }
    }

    /// Configured length policy
    pub fn policy(&self) -> LengthPolicy {
        self.policy
    }

    /// Check that the window is non-empty, satisfies the length policy, and
    /// that every reading carries a numeric value for every schema sensor
    pub fn validate(&self, window: &Window) -> Result<(), SchemaError> {
        if window.is_empty() {
            return Err(SchemaError::EmptyWindow);
        }

        if self.policy == LengthPolicy::Strict && window.len() != self.sequence_length {
            return Err(SchemaError::WrongLength {
                expected: self.sequence_length,
                actual: window.len(),
            });
        }

        for (cycle, reading) in window.readings().iter().enumerate() {
            for field in self.schema.names() {
                sensor_value(reading, cycle, field)?;
            }
        }

        debug!(
            "Validated window: cycles={}, sensors={}, policy={:?}",
            window.len(),
            self.schema.len(),
            self.policy
        );
        Ok(())
    }
}
