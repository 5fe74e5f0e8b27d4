//! Sequence Length Normalization
//!
//! The model reads the final time step as "now". Short windows are padded
//! at the start with all-zero cycles so real history stays at the end; long
//! windows keep only the most recent cycles.

use crate::FeatureError;
use ndarray::{s, Array2, ArrayView2};
use tracing::debug;

/// Fixed-shape `(L, F)` model input plus bookkeeping about synthetic rows
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedTensor {
    data: Array2<f64>,
    input_cycles: usize,
    padded_cycles: usize,
    truncated_cycles: usize,
}

impl NormalizedTensor {
    /// Tensor values, oldest cycle first
    pub fn view(&self) -> ArrayView2<'_, f64> {
        self.data.view()
    }

    /// `(sequence_length, feature_count)`
    pub fn shape(&self) -> (usize, usize) {
        self.data.dim()
    }

    /// Cycles the caller submitted
    pub fn input_cycles(&self) -> usize {
        self.input_cycles
    }

    /// Rows of the tensor holding caller data
    pub fn real_cycles(&self) -> usize {
        self.input_cycles - self.truncated_cycles
    }

    /// Zero rows inserted at the start
    pub fn padded_cycles(&self) -> usize {
        self.padded_cycles
    }

    /// Oldest caller cycles dropped to fit the sequence length
    pub fn truncated_cycles(&self) -> usize {
        self.truncated_cycles
    }

    /// Whether any synthetic rows were added
    pub fn was_padded(&self) -> bool {
        self.padded_cycles > 0
    }

    /// Consume the tensor, returning the raw array
    pub fn into_inner(self) -> Array2<f64> {
        self.data
    }
}

/// Pads or truncates scaled windows to the model's sequence length
#[derive(Debug, Clone, Copy)]
pub struct SequenceNormalizer {
    sequence_length: usize,
}

impl SequenceNormalizer {
    /// Create a normalizer for sequence length `L`
    pub fn new(sequence_length: usize) -> Result<Self, FeatureError> {
        if sequence_length == 0 {
            return Err(FeatureError::InvalidSequenceLength(sequence_length));
        }
        Ok(Self { sequence_length })
    }

    /// Produce the `(L, F)` tensor from a scaled `(n, F)` window
    pub fn normalize(&self, scaled: Array2<f64>) -> NormalizedTensor {
        let (rows, cols) = scaled.dim();
        let target = self.sequence_length;

        let (data, padded_cycles, truncated_cycles) = if rows == target {
            (scaled, 0, 0)
        } else if rows > target {
            let recent = scaled.slice(s![rows - target.., ..]).to_owned();
            (recent, 0, rows - target)
        } else {
            let pad = target - rows;
            let mut padded = Array2::<f64>::zeros((target, cols));
            padded.slice_mut(s![pad.., ..]).assign(&scaled);
            (padded, pad, 0)
        };

        debug!(
            "Normalized sequence: input={}, padded={}, truncated={}, length={}",
            rows, padded_cycles, truncated_cycles, target
        );

        NormalizedTensor {
            data,
            input_cycles: rows,
            padded_cycles,
            truncated_cycles,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use proptest::prelude::*;

    fn window(rows: usize, cols: usize) -> Array2<f64> {
        Array2::from_shape_fn((rows, cols), |(r, c)| (r * 10 + c + 1) as f64)
    }

    #[test]
    fn test_zero_length_rejected() {
        assert_eq!(
            SequenceNormalizer::new(0).unwrap_err(),
            FeatureError::InvalidSequenceLength(0)
        );
    }

    #[test]
    fn test_short_window_left_padded() {
        let normalizer = SequenceNormalizer::new(3).unwrap();
        let tensor = normalizer.normalize(array![[1.0, 1.0], [2.0, 2.0]]);

        assert_eq!(
            tensor.view(),
            array![[0.0, 0.0], [1.0, 1.0], [2.0, 2.0]].view()
        );
        assert!(tensor.was_padded());
        assert_eq!(tensor.real_cycles(), 2);
        assert_eq!(tensor.padded_cycles(), 1);
        assert_eq!(tensor.truncated_cycles(), 0);
    }

    #[test]
    fn test_long_window_keeps_most_recent() {
        let normalizer = SequenceNormalizer::new(3).unwrap();
        let tensor = normalizer.normalize(window(5, 2));

        assert_eq!(tensor.view(), window(5, 2).slice(s![2.., ..]));
        assert!(!tensor.was_padded());
        assert_eq!(tensor.input_cycles(), 5);
        assert_eq!(tensor.real_cycles(), 3);
        assert_eq!(tensor.truncated_cycles(), 2);
    }

    #[test]
    fn test_exact_window_unchanged() {
        let normalizer = SequenceNormalizer::new(4).unwrap();
        let tensor = normalizer.normalize(window(4, 3));

        assert_eq!(tensor.clone().into_inner(), window(4, 3));
        assert_eq!(tensor.shape(), (4, 3));
        assert!(!tensor.was_padded());
    }

    proptest! {
        #[test]
        fn prop_shape_is_always_fixed(rows in 1usize..120, cols in 1usize..16, target in 1usize..80) {
            let normalizer = SequenceNormalizer::new(target).unwrap();
            let tensor = normalizer.normalize(window(rows, cols));
            prop_assert_eq!(tensor.shape(), (target, cols));
            prop_assert_eq!(tensor.real_cycles() + tensor.padded_cycles(), target);
        }

        #[test]
        fn prop_real_rows_at_end_in_order(rows in 1usize..120, cols in 1usize..8, target in 1usize..80) {
            let input = window(rows, cols);
            let tensor = SequenceNormalizer::new(target).unwrap().normalize(input.clone());
            let view = tensor.view();
            let kept = rows.min(target);

            prop_assert_eq!(view.slice(s![target - kept.., ..]), input.slice(s![rows - kept.., ..]));
            prop_assert!(view.slice(s![..target - kept, ..]).iter().all(|v| *v == 0.0));
        }
    }
}
