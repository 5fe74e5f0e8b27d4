//! API Regression Tests
//!
//! Build the router in-process and exercise every route with
//! `tower::ServiceExt::oneshot()`. The ONNX model is replaced by a
//! deterministic function so no artifacts are needed on disk.

use api::{create_router, AppState, HealthResponse};
use artifact_store::{ArtifactStore, ModelMetadata};
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use data_validator::LengthPolicy;
use feature_engine::{FittedScaler, ScalingMethod};
use inference_engine::{FnModel, InferenceError, RulModel};
use ndarray::ArrayView2;
use predictor::{FormatterConfig, Pipeline, RulPrediction, RulStatus};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

const SENSORS: [&str; 3] = ["s_2", "s_3", "s_4"];

/// Model output: 100 times the first feature of the most recent cycle.
fn last_cycle_model() -> Box<dyn RulModel> {
    Box::new(FnModel::new("last-cycle", |input: ArrayView2<'_, f64>| {
        Ok(input[[input.nrows() - 1, 0]] * 100.0)
    }))
}

fn app_with(model: Box<dyn RulModel>, policy: LengthPolicy, mae: Option<f64>) -> Router {
    let metadata = ModelMetadata {
        sensor_names: serde_json::from_value(json!(SENSORS)).unwrap(),
        sequence_length: 4,
        mae,
        model_version: None,
    };
    let scaler = FittedScaler::new(
        Some(SENSORS.iter().map(|s| s.to_string()).collect()),
        ScalingMethod::MinMax {
            data_min: vec![0.0, 0.0, 0.0],
            data_max: vec![1.0, 10.0, 100.0],
            feature_range: (0.0, 1.0),
        },
    )
    .unwrap();

    let store = ArtifactStore::from_parts(metadata, scaler, model).unwrap();
    let pipeline = Pipeline::new(store, policy, FormatterConfig::default()).unwrap();
    create_router(Arc::new(AppState::new(pipeline, 9.38, None)))
}

fn app() -> Router {
    app_with(last_cycle_model(), LengthPolicy::Flexible, None)
}

fn cycle(s2: f64) -> Value {
    json!({"s_4": 50.0, "s_2": s2, "s_3": 5.0, "unit_id": 7})
}

async fn post_predict(app: Router, body: String) -> (StatusCode, Value) {
    let resp = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/predict")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_health_reports_live_and_mae() {
    for uri in ["/", "/health"] {
        let resp = app()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK, "GET {uri}");

        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let health: HealthResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(health.status, "Model is Live");
        assert_eq!(health.mae, 9.38);
        assert_eq!(health.sequence_length, 4);
        assert_eq!(health.sensor_count, 3);
    }
}

#[tokio::test]
async fn test_health_prefers_metadata_mae() {
    let app = app_with(last_cycle_model(), LengthPolicy::Flexible, Some(11.5));
    let resp = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["MAE"], json!(11.5));
}

#[tokio::test]
async fn test_predict_short_window_is_padded() {
    let body = json!({"data_window": [cycle(0.1), cycle(0.42567)]}).to_string();
    let (status, json) = post_predict(app(), body).await;

    assert_eq!(status, StatusCode::OK);
    let prediction: RulPrediction = serde_json::from_value(json).unwrap();
    assert_eq!(prediction.predicted_remaining_cycles, 42.57);
    assert_eq!(prediction.unit, "cycles");
    assert_eq!(prediction.status, Some(RulStatus::Healthy));
    assert_eq!(prediction.input_cycles, 2);
    assert_eq!(prediction.padded_cycles, 2);
    assert!(prediction.padding_applied);
}

#[tokio::test]
async fn test_predict_long_window_uses_latest_cycle() {
    let window: Vec<Value> = (0..10).map(|i| cycle(0.9 - i as f64 * 0.07)).collect();
    let body = json!({ "data_window": window }).to_string();
    let (status, json) = post_predict(app(), body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["predicted_remaining_cycles"], json!(27.0));
    assert_eq!(json["status"], json!("Maintenance Required"));
    assert_eq!(json["padding_applied"], json!(false));
    assert_eq!(json["truncated_cycles"], json!(6));
}

#[tokio::test]
async fn test_empty_window_is_bad_request() {
    let (status, json) = post_predict(app(), json!({"data_window": []}).to_string()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["detail"].as_str().unwrap().contains("at least one cycle"));
}

#[tokio::test]
async fn test_missing_sensor_is_bad_request() {
    let body = json!({"data_window": [{"s_2": 0.5, "s_3": 1.0}]}).to_string();
    let (status, json) = post_predict(app(), body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["detail"].as_str().unwrap().contains("s_4"));
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let (status, json) = post_predict(app(), "{\"data_window\": 12".to_string()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["detail"].is_string());

    let (status, _) = post_predict(app(), json!({"window": []}).to_string()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_strict_policy_rejects_wrong_length() {
    let app = app_with(last_cycle_model(), LengthPolicy::Strict, None);
    let body = json!({"data_window": [cycle(0.5)]}).to_string();
    let (status, json) = post_predict(app, body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["detail"], json!("Window must be exactly 4 cycles, got 1"));
}

#[tokio::test]
async fn test_inference_failure_is_server_error() {
    let broken = Box::new(FnModel::new("broken", |_: ArrayView2<'_, f64>| {
        Err(InferenceError::InferenceFailed("graph execution failed".to_string()))
    }));
    let app = app_with(broken, LengthPolicy::Flexible, None);
    let body = json!({"data_window": [cycle(0.5)]}).to_string();
    let (status, json) = post_predict(app, body).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(json["detail"]
        .as_str()
        .unwrap()
        .contains("graph execution failed"));
}

#[tokio::test]
async fn test_metrics_disabled_without_recorder() {
    let resp = app()
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
