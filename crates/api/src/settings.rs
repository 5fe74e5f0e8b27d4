//! Service Configuration
//!
//! Layered from `config/default.toml`, then `config/{RUL_ENV}.toml`, then
//! `RUL__`-prefixed environment variables (e.g. `RUL__SERVER__BIND_ADDR`).

use artifact_store::ArtifactPaths;
use data_validator::LengthPolicy;
use predictor::FormatterConfig;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Top-level service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub server: ServerConfig,
    pub artifacts: ArtifactConfig,
    pub pipeline: PipelineConfig,
    pub health: HealthConfig,
    pub logging: LoggingConfig,
    pub metrics: MetricsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:7860".to_string(),
        }
    }
}

/// Where the startup artifacts live
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactConfig {
    pub dir: PathBuf,
    pub model_file: String,
    pub scaler_file: String,
    pub metadata_file: String,
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("artifacts"),
            model_file: "lstm_model_v1.onnx".to_string(),
            scaler_file: "scaler.json".to_string(),
            metadata_file: "metadata.json".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// `flexible` pads or truncates, `strict` rejects other lengths
    pub length_policy: LengthPolicy,
    pub healthy_threshold: f64,
    pub decimals: u32,
    pub classify_status: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        let formatter = FormatterConfig::default();
        Self {
            length_policy: LengthPolicy::Flexible,
            healthy_threshold: formatter.healthy_threshold,
            decimals: formatter.decimals,
            classify_status: formatter.classify_status,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthConfig {
    /// Reported when the metadata document carries no MAE
    pub mae: f64,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self { mae: 9.38 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter used when `RUST_LOG` is unset
    pub level: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    pub enabled: bool,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl ServiceConfig {
    /// Load configuration from files and environment
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("RUL_ENV").unwrap_or_else(|_| "development".to_string());

        let builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{}", env)).required(false))
            .add_source(
                config::Environment::with_prefix("RUL")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            );

        let config: ServiceConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would only fail later at runtime
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.bind_addr()?;

        if !self.pipeline.healthy_threshold.is_finite() {
            return Err(ConfigError::Invalid(
                "pipeline.healthy_threshold must be finite".to_string(),
            ));
        }
        if self.pipeline.decimals > 10 {
            return Err(ConfigError::Invalid(format!(
                "pipeline.decimals must be at most 10, got {}",
                self.pipeline.decimals
            )));
        }
        if !self.health.mae.is_finite() || self.health.mae < 0.0 {
            return Err(ConfigError::Invalid(
                "health.mae must be a non-negative number".to_string(),
            ));
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.server.bind_addr.parse().map_err(|e| {
            ConfigError::Invalid(format!(
                "server.bind_addr '{}': {}",
                self.server.bind_addr, e
            ))
        })
    }

    pub fn artifact_paths(&self) -> ArtifactPaths {
        ArtifactPaths::in_dir(
            &self.artifacts.dir,
            &self.artifacts.model_file,
            &self.artifacts.scaler_file,
            &self.artifacts.metadata_file,
        )
    }

    pub fn formatter(&self) -> FormatterConfig {
        FormatterConfig {
            healthy_threshold: self.pipeline.healthy_threshold,
            decimals: self.pipeline.decimals,
            classify_status: self.pipeline.classify_status,
        }
    }
}
