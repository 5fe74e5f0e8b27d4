//! Response Formatting

use feature_engine::NormalizedTensor;
use serde::{Deserialize, Serialize};

/// Coarse health classification of a prediction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RulStatus {
    #[serde(rename = "Healthy")]
    Healthy,
    #[serde(rename = "Maintenance Required")]
    MaintenanceRequired,
}

impl RulStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RulStatus::Healthy => "Healthy",
            RulStatus::MaintenanceRequired => "Maintenance Required",
        }
    }
}

/// Formatter configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatterConfig {
    /// Predictions strictly above this many cycles are healthy (default: 30)
    pub healthy_threshold: f64,
    /// Decimal places kept in the reported prediction (default: 2)
    pub decimals: u32,
    /// Attach a status classification to responses
    pub classify_status: bool,
}

impl Default for FormatterConfig {
    fn default() -> Self {
        Self {
            healthy_threshold: 30.0,
            decimals: 2,
            classify_status: true,
        }
    }
}

/// Successful prediction as returned to the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RulPrediction {
    pub predicted_remaining_cycles: f64,
    pub unit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<RulStatus>,
    /// Cycles the caller submitted
    pub input_cycles: usize,
    /// Zero cycles prepended to reach the sequence length
    pub padded_cycles: usize,
    /// Oldest cycles dropped to fit the sequence length
    pub truncated_cycles: usize,
    pub padding_applied: bool,
}

/// Rounds and classifies raw model output
#[derive(Debug, Clone, Default)]
pub struct ResponseFormatter {
    config: FormatterConfig,
}

impl ResponseFormatter {
    pub fn new(config: FormatterConfig) -> Self {
        Self { config }
    }

    /// Round to the configured number of decimal places, ties to even
    pub fn round(&self, raw: f64) -> f64 {
        let factor = 10f64.powi(self.config.decimals as i32);
        (raw * factor).round_ties_even() / factor
    }

    /// Classify a raw prediction
    pub fn classify(&self, cycles: f64) -> RulStatus {
        if cycles > self.config.healthy_threshold {
            RulStatus::Healthy
        } else {
            RulStatus::MaintenanceRequired
        }
    }

    /// Build the response for a raw prediction made on `tensor`
    pub fn format(&self, raw: f64, tensor: &NormalizedTensor) -> RulPrediction {
        let status = self.config.classify_status.then(|| self.classify(raw));

        RulPrediction {
            predicted_remaining_cycles: self.round(raw),
            unit: "cycles".to_string(),
            status,
            input_cycles: tensor.input_cycles(),
            padded_cycles: tensor.padded_cycles(),
            truncated_cycles: tensor.truncated_cycles(),
            padding_applied: tensor.was_padded(),
        }
    }
}
