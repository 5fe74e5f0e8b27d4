//! Request Validation and Feature Alignment
//!
//! Checks incoming sensor windows against the training-time schema and
//! reorders their columns into the exact order the scaler was fitted on.

mod aligner;
mod error;
mod schema;
mod validator;

pub use aligner::FeatureAligner;
pub use error::SchemaError;
pub use schema::{CycleReading, SensorSchema, Window};
pub use validator::{LengthPolicy, Validator};
