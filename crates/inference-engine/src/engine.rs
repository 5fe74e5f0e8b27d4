//! Inference Engine Implementation

use crate::model::RulModel;
use crate::InferenceError;
use feature_engine::NormalizedTensor;
use std::time::Instant;
use tracing::{debug, info};

/// Result of inference operation
#[derive(Debug, Clone, Copy)]
pub struct InferenceResult {
    /// Raw model output, in cycles
    pub remaining_cycles: f64,
    /// Inference latency in microseconds
    pub latency_us: u64,
}

/// Invokes the loaded model on normalized tensors.
///
/// No retries and no fallback: any model failure or non-finite output is
/// returned to the caller as an error.
pub struct InferenceEngine {
    model: Box<dyn RulModel>,
    sequence_length: usize,
    feature_count: usize,
}

impl InferenceEngine {
    /// Create a new inference engine around a loaded model
    pub fn new(model: Box<dyn RulModel>, sequence_length: usize, feature_count: usize) -> Self {
        info!(
            "Creating inference engine with model {} (input {}x{})",
            model.name(),
            sequence_length,
            feature_count
        );

        Self {
            model,
            sequence_length,
            feature_count,
        }
    }

    /// Run inference on one normalized tensor
    pub fn predict(&self, tensor: &NormalizedTensor) -> Result<InferenceResult, InferenceError> {
        let expected = (self.sequence_length, self.feature_count);
        if tensor.shape() != expected {
            return Err(InferenceError::InvalidInputShape {
                expected: format!("{:?}", expected),
                actual: format!("{:?}", tensor.shape()),
            });
        }

        let start = Instant::now();
        let remaining_cycles = self.model.predict(tensor.view())?;
        let latency_us = start.elapsed().as_micros() as u64;

        if !remaining_cycles.is_finite() {
            return Err(InferenceError::InvalidOutput(format!(
                "non-finite prediction {}",
                remaining_cycles
            )));
        }

        debug!(
            "Inference completed in {}us: {:.3} cycles",
            latency_us, remaining_cycles
        );

        Ok(InferenceResult {
            remaining_cycles,
            latency_us,
        })
    }

    /// Name of the loaded model
    pub fn model_name(&self) -> &str {
        self.model.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FnModel;
    use feature_engine::SequenceNormalizer;
    use ndarray::{array, ArrayView2};

    fn tensor() -> NormalizedTensor {
        SequenceNormalizer::new(3)
            .unwrap()
            .normalize(array![[1.0, 2.0], [3.0, 4.0]])
    }

    #[test]
    fn test_prediction() {
        let engine = InferenceEngine::new(
            Box::new(FnModel::new("sum", |input: ArrayView2<'_, f64>| {
                Ok(input.sum())
            })),
            3,
            2,
        );

        let result = engine.predict(&tensor()).unwrap();
        assert_eq!(result.remaining_cycles, 10.0);
    }

    #[test]
    fn test_shape_mismatch() {
        let engine = InferenceEngine::new(
            Box::new(FnModel::new("constant", |_: ArrayView2<'_, f64>| Ok(1.0))),
            50,
            2,
        );

        assert!(matches!(
            engine.predict(&tensor()),
            Err(InferenceError::InvalidInputShape { .. })
        ));
    }

    #[test]
    fn test_non_finite_output_rejected() {
        let engine = InferenceEngine::new(
            Box::new(FnModel::new("nan", |_: ArrayView2<'_, f64>| Ok(f64::NAN))),
            3,
            2,
        );

        assert!(matches!(
            engine.predict(&tensor()),
            Err(InferenceError::InvalidOutput(_))
        ));
    }

    #[test]
    fn test_model_error_propagates() {
        let engine = InferenceEngine::new(
            Box::new(FnModel::new("broken", |_: ArrayView2<'_, f64>| {
                Err(InferenceError::InferenceFailed("kernel panic".to_string()))
            })),
            3,
            2,
        );

        assert!(matches!(
            engine.predict(&tensor()),
            Err(InferenceError::InferenceFailed(_))
        ));
    }
}
