//! Prediction Pipeline

use crate::formatter::{FormatterConfig, ResponseFormatter, RulPrediction};
use crate::PredictError;
use artifact_store::{ArtifactStore, ModelMetadata};
use data_validator::{FeatureAligner, LengthPolicy, Validator, Window};
use feature_engine::{FeatureError, FittedScaler, SequenceNormalizer};
use inference_engine::InferenceEngine;
use std::time::Duration;
use tracing::{debug, info};

/// A formatted prediction and the time spent inside the model call
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutput {
    pub prediction: RulPrediction,
    pub inference_latency: Duration,
}

/// Immutable request pipeline built once from the loaded artifacts.
///
/// Every stage is a pure function of the request and the artifacts, so a
/// single `Pipeline` can serve concurrent requests without locking.
pub struct Pipeline {
    metadata: ModelMetadata,
    validator: Validator,
    aligner: FeatureAligner,
    scaler: FittedScaler,
    normalizer: SequenceNormalizer,
    engine: InferenceEngine,
    formatter: ResponseFormatter,
}

impl Pipeline {
    /// Assemble the pipeline from loaded artifacts
    pub fn new(
        store: ArtifactStore,
        length_policy: LengthPolicy,
        formatter: FormatterConfig,
    ) -> Result<Self, FeatureError> {
        let (metadata, schema, scaler, model) = store.into_parts();
        let sequence_length = metadata.sequence_length;
        let engine = InferenceEngine::new(model, sequence_length, schema.len());

        info!(
            "Building prediction pipeline: model={}, sensors={}, sequence_length={}, policy={:?}",
            engine.model_name(),
            schema.len(),
            sequence_length,
            length_policy
        );

        Ok(Self {
            validator: Validator::new(schema.clone(), length_policy, sequence_length),
            aligner: FeatureAligner::new(schema.clone()),
            normalizer: SequenceNormalizer::new(sequence_length)?,
            engine,
            formatter: ResponseFormatter::new(formatter),
            scaler,
            metadata,
        })
    }

    /// Predict remaining useful life for one window
    pub fn predict(&self, window: &Window) -> Result<PipelineOutput, PredictError> {
        self.validator.validate(window)?;
        let aligned = self.aligner.align(window)?;
        let scaled = self.scaler.transform(&aligned)?;
        let tensor = self.normalizer.normalize(scaled);
        let result = self.engine.predict(&tensor)?;

        let prediction = self.formatter.format(result.remaining_cycles, &tensor);
        debug!(
            "Predicted {} cycles from {} input cycles ({} padded, {} truncated) in {}us",
            prediction.predicted_remaining_cycles,
            prediction.input_cycles,
            prediction.padded_cycles,
            prediction.truncated_cycles,
            result.latency_us
        );
        Ok(PipelineOutput {
            prediction,
            inference_latency: Duration::from_micros(result.latency_us),
        })
    }

    pub fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }

    pub fn length_policy(&self) -> LengthPolicy {
        self.validator.policy()
    }
}
