//! Prometheus Metrics

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::time::Duration;
use tracing::{info, warn};

/// Install the global Prometheus recorder. Returns `None` if a recorder is
/// already installed.
pub fn install_recorder() -> Option<PrometheusHandle> {
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            info!("Prometheus metrics recorder installed");
            Some(handle)
        }
        Err(e) => {
            warn!("Metrics disabled: {}", e);
            None
        }
    }
}

/// Count a served prediction and record the time spent inside the model
pub fn record_prediction(latency: Duration) {
    metrics::counter!("rul_predictions_total").increment(1);
    metrics::histogram!("rul_inference_latency_seconds").record(latency.as_secs_f64());
}

pub fn record_failure(kind: &'static str) {
    metrics::counter!("rul_prediction_errors_total", "kind" => kind).increment(1);
}
