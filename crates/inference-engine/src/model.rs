//! Sequence Model Backends

use crate::InferenceError;
use ndarray::ArrayView2;
use std::path::Path;
use tracing::{debug, info};
use tract_onnx::prelude::*;

/// A loaded model mapping one `(L, F)` sequence to a scalar RUL estimate.
///
/// Implementations must be safe to call from several requests at once.
pub trait RulModel: Send + Sync {
    /// Run the model on one normalized sequence
    fn predict(&self, input: ArrayView2<'_, f64>) -> Result<f64, InferenceError>;

    /// Short description for logs
    fn name(&self) -> &str;
}

type Plan = TypedRunnableModel<TypedModel>;

/// ONNX model executed with tract
pub struct OnnxModel {
    plan: Plan,
    name: String,
    sequence_length: usize,
    feature_count: usize,
}

impl OnnxModel {
    /// Load and optimize an ONNX graph taking a `(1, L, F)` f32 input
    pub fn load(
        path: impl AsRef<Path>,
        sequence_length: usize,
        feature_count: usize,
    ) -> Result<Self, InferenceError> {
        let path = path.as_ref();
        info!(
            "Loading ONNX model {} with input (1, {}, {})",
            path.display(),
            sequence_length,
            feature_count
        );

        let plan = tract_onnx::onnx()
            .model_for_path(path)
            .and_then(|model| {
                model.with_input_fact(0, f32::fact([1, sequence_length, feature_count]).into())
            })
            .and_then(|model| model.into_optimized())
            .and_then(|model| model.into_runnable())
            .map_err(|e| InferenceError::ModelLoadError(format!("{}: {}", path.display(), e)))?;

        info!("Model loaded successfully");
        Ok(Self {
            plan,
            name: path.display().to_string(),
            sequence_length,
            feature_count,
        })
    }
}

impl RulModel for OnnxModel {
    fn predict(&self, input: ArrayView2<'_, f64>) -> Result<f64, InferenceError> {
        let (rows, cols) = input.dim();
        if (rows, cols) != (self.sequence_length, self.feature_count) {
            return Err(InferenceError::InvalidInputShape {
                expected: format!("({}, {})", self.sequence_length, self.feature_count),
                actual: format!("({}, {})", rows, cols),
            });
        }

        let data: Vec<f32> = input.iter().map(|v| *v as f32).collect();
        let tensor = Tensor::from_shape(&[1, rows, cols], &data)
            .map_err(|e| InferenceError::InferenceFailed(e.to_string()))?;

        let outputs = self
            .plan
            .run(tvec!(tensor.into()))
            .map_err(|e| InferenceError::InferenceFailed(e.to_string()))?;

        let output = outputs
            .first()
            .ok_or_else(|| InferenceError::InvalidOutput("model produced no outputs".to_string()))?;
        let values = output
            .to_array_view::<f32>()
            .map_err(|e| InferenceError::InvalidOutput(e.to_string()))?;
        let value = values
            .iter()
            .next()
            .copied()
            .ok_or_else(|| InferenceError::InvalidOutput("output tensor is empty".to_string()))?;

        debug!("ONNX output shape {:?}, first value {}", values.shape(), value);
        Ok(f64::from(value))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Model backed by a plain function, for tests and offline tooling
pub struct FnModel<F> {
    name: String,
    f: F,
}

impl<F> FnModel<F>
where
    F: Fn(ArrayView2<'_, f64>) -> Result<f64, InferenceError> + Send + Sync,
{
    /// Wrap a function as a model
    pub fn new(name: &str, f: F) -> Self {
        Self {
            name: name.to_string(),
            f,
        }
    }
}

impl<F> RulModel for FnModel<F>
where
    F: Fn(ArrayView2<'_, f64>) -> Result<f64, InferenceError> + Send + Sync,
{
    fn predict(&self, input: ArrayView2<'_, f64>) -> Result<f64, InferenceError> {
        (self.f)(input)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use std::io::Write;

    fn sum_window_path() -> std::path::PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("testdata/sum_window.onnx")
    }

    #[test]
    fn test_missing_model_file() {
        let result = OnnxModel::load("/nonexistent/lstm_model_v1.onnx", 50, 14);
        assert!(matches!(result, Err(InferenceError::ModelLoadError(_))));
    }

    #[test]
    fn test_malformed_model_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"definitely not protobuf").unwrap();

        let result = OnnxModel::load(file.path(), 50, 14);
        assert!(matches!(result, Err(InferenceError::ModelLoadError(_))));
    }

    #[test]
    fn test_onnx_model_runs_graph() {
        let model = OnnxModel::load(sum_window_path(), 3, 2).unwrap();

        let input = array![[0.0, 0.0], [0.25, 0.5], [1.0, 1.25]];
        let value = model.predict(input.view()).unwrap();
        assert!((value - 3.0).abs() < 1e-6, "got {value}");
        assert!(model.name().ends_with("sum_window.onnx"));
    }

    #[test]
    fn test_onnx_model_checks_input_shape() {
        let model = OnnxModel::load(sum_window_path(), 3, 2).unwrap();

        let result = model.predict(array![[1.0, 2.0]].view());
        assert!(matches!(result, Err(InferenceError::InvalidInputShape { .. })));
    }

    #[test]
    fn test_fn_model() {
        let model = FnModel::new("last-row-sum", |input: ArrayView2<'_, f64>| {
            Ok(input.row(input.nrows() - 1).sum())
        });

        let value = model.predict(array![[0.0, 0.0], [1.5, 2.5]].view()).unwrap();
        assert_eq!(value, 4.0);
        assert_eq!(model.name(), "last-row-sum");
    }
}
