//! Schema Error Types

use thiserror::Error;

/// Errors raised when a request window does not fit the sensor schema.
///
/// Every variant is caused by the caller's payload (or, for `InvalidSchema`,
/// by a malformed metadata document at startup).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaError {
    /// Window contained no cycles
    #[error("Window must contain at least one cycle")]
    EmptyWindow,

    /// Window length differs from the model's sequence length (strict mode only)
    #[error("Window must be exactly {expected} cycles, got {actual}")]
    WrongLength { expected: usize, actual: usize },

    /// A reading lacks a sensor named in the schema
    #[error("Cycle {cycle} is missing required sensor '{field}'")]
    MissingField { cycle: usize, field: String },

    /// A schema sensor carries something other than a finite number
    #[error("Cycle {cycle} has a non-numeric value for sensor '{field}'")]
    NonNumericValue { cycle: usize, field: String },

    /// Sensor schema itself is unusable
    #[error("Invalid sensor schema: {0}")]
    InvalidSchema(String),
}
