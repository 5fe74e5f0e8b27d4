//! Fitted Feature Scaler

use crate::FeatureError;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

fn default_feature_range() -> (f64, f64) {
    (0.0, 1.0)
}

/// Per-feature parameters learned at training time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScalingMethod {
    /// Min-max scaling into `feature_range`
    MinMax {
        data_min: Vec<f64>,
        data_max: Vec<f64>,
        #[serde(default = "default_feature_range")]
        feature_range: (f64, f64),
    },
    /// Z-score standardization
    Standard { mean: Vec<f64>, scale: Vec<f64> },
}

impl ScalingMethod {
    fn as_str(&self) -> &'static str {
        match self {
            ScalingMethod::MinMax { .. } => "min_max",
            ScalingMethod::Standard { .. } => "standard",
        }
    }
}

/// On-disk form of a fitted scaler
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScalerDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_names: Option<Vec<String>>,
    #[serde(flatten)]
    pub method: ScalingMethod,
}

/// Deterministic per-feature affine transform, `x' = x * multiplier + offset`.
///
/// Constant features (a range or scale below `10 * f64::EPSILON`, as in
/// scikit-learn) use a divisor of one, so they map to `lo` (min-max) or
/// zero (standard) instead of blowing up.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "ScalerDocument")]
pub struct FittedScaler {
    feature_names: Option<Vec<String>>,
    method: ScalingMethod,
    multipliers: Vec<f64>,
    offsets: Vec<f64>,
}

impl FittedScaler {
    /// Build a scaler from fitted parameters, rejecting inconsistent ones
    pub fn new(
        feature_names: Option<Vec<String>>,
        method: ScalingMethod,
    ) -> Result<Self, FeatureError> {
        let (multipliers, offsets): (Vec<f64>, Vec<f64>) = match &method {
            ScalingMethod::MinMax {
                data_min,
                data_max,
                feature_range,
            } => {
                if data_min.len() != data_max.len() {
                    return Err(FeatureError::InvalidParameters(format!(
                        "data_min has {} values, data_max has {}",
                        data_min.len(),
                        data_max.len()
                    )));
                }
                let (lo, hi) = *feature_range;
                if !lo.is_finite() || !hi.is_finite() || lo >= hi {
                    return Err(FeatureError::InvalidParameters(format!(
                        "feature_range ({}, {}) is not increasing",
                        lo, hi
                    )));
                }
                data_min
                    .iter()
                    .zip(data_max)
                    .map(|(&min, &max)| {
                        let range = non_zero(max - min);
                        let multiplier = (hi - lo) / range;
                        (multiplier, lo - min * multiplier)
                    })
                    .unzip()
            }
            ScalingMethod::Standard { mean, scale } => {
                if mean.len() != scale.len() {
                    return Err(FeatureError::InvalidParameters(format!(
                        "mean has {} values, scale has {}",
                        mean.len(),
                        scale.len()
                    )));
                }
                mean.iter()
                    .zip(scale)
                    .map(|(&mean, &scale)| {
                        let multiplier = 1.0 / non_zero(scale);
                        (multiplier, -mean * multiplier)
                    })
                    .unzip()
            }
        };

        if multipliers.is_empty() {
            return Err(FeatureError::InvalidParameters(
                "scaler has no features".to_string(),
            ));
        }
        if multipliers
            .iter()
            .chain(offsets.iter())
            .any(|v| !v.is_finite())
        {
            return Err(FeatureError::InvalidParameters(
                "scaler parameters must be finite".to_string(),
            ));
        }
        if let Some(names) = &feature_names {
            if names.len() != multipliers.len() {
                return Err(FeatureError::InvalidParameters(format!(
                    "{} feature names for {} fitted features",
                    names.len(),
                    multipliers.len()
                )));
            }
        }

        info!(
            "Loaded {} scaler with {} features",
            method.as_str(),
            multipliers.len()
        );

        Ok(Self {
            feature_names,
            method,
            multipliers,
            offsets,
        })
    }

    /// Number of features the scaler was fitted on
    pub fn feature_count(&self) -> usize {
        self.multipliers.len()
    }

    /// Confirm the scaler was fitted on exactly these features, in this order
    pub fn check_schema(&self, names: &[String]) -> Result<(), FeatureError> {
        if names.len() != self.feature_count() {
            return Err(FeatureError::ScalerMismatch {
                expected: self.feature_count(),
                actual: names.len(),
            });
        }

        if let Some(fitted) = &self.feature_names {
            for (position, (expected, actual)) in fitted.iter().zip(names).enumerate() {
                if expected != actual {
                    return Err(FeatureError::FeatureNameMismatch {
                        position,
                        expected: expected.clone(),
                        actual: actual.clone(),
                    });
                }
            }
        }

        Ok(())
    }

    /// Scale every column of an aligned `(n, F)` matrix
    pub fn transform(&self, aligned: &Array2<f64>) -> Result<Array2<f64>, FeatureError> {
        if aligned.ncols() != self.feature_count() {
            return Err(FeatureError::ScalerMismatch {
                expected: self.feature_count(),
                actual: aligned.ncols(),
            });
        }

        let mut scaled = aligned.to_owned();
        for mut row in scaled.rows_mut() {
            for (x, (m, o)) in row
                .iter_mut()
                .zip(self.multipliers.iter().zip(&self.offsets))
            {
                *x = *x * m + o;
            }
        }

        debug!("Scaled {} cycles", scaled.nrows());
        Ok(scaled)
    }
}

impl TryFrom<ScalerDocument> for FittedScaler {
    type Error = FeatureError;

    fn try_from(doc: ScalerDocument) -> Result<Self, Self::Error> {
        FittedScaler::new(doc.feature_names, doc.method)
    }
}

impl Serialize for FittedScaler {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        ScalerDocument {
            feature_names: self.feature_names.clone(),
            method: self.method.clone(),
        }
        .serialize(serializer)
    }
}

fn non_zero(divisor: f64) -> f64 {
    if divisor.abs() < 10.0 * f64::EPSILON {
        1.0
    } else {
        divisor
    }
}
