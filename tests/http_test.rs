//! Tests for the HTTP front end, driven through `tower::ServiceExt::oneshot`.

#![cfg(feature = "server")]

mod common;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use common::{BrokenEncoder, FixedClassifier, flu_service, labels, table};
use eir::PredictionService;
use eir::config::{LimitsConfig, ServerConfig};
use eir::server::build_router;
use eir::server::routes::HealthResponse;

fn router() -> axum::Router {
    let service = flu_service(Arc::new(FixedClassifier::new(15, vec![0.1, 0.8, 0.06, 0.04])));
    build_router(service, &ServerConfig::default())
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ============================================================================
// /predict
// ============================================================================

#[tokio::test]
async fn predict_returns_result_json() {
    let response = router()
        .oneshot(post_json("/predict", r#"{"symptoms": "cough and fever"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({
            "Predicted Disease": "Flu",
            "Confidence": 0.8,
            "Top Predictions": [["Flu", 0.8], ["Common Cold", 0.1], ["Malaria", 0.06]],
            "Precautions": ["Rest", "Hydrate"],
        })
    );
}

#[tokio::test]
async fn blank_symptoms_is_bad_request() {
    let response = router()
        .oneshot(post_json("/predict", r#"{"symptoms": "  "}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "ENCODING_ERROR");
    assert!(body["error"]["message"].as_str().unwrap().contains("empty"));
}

#[tokio::test]
async fn model_runtime_failure_is_server_error() {
    let service = PredictionService::builder()
        .encoder(Arc::new(BrokenEncoder))
        .classifier(Arc::new(FixedClassifier::new(15, vec![0.2, 0.8])))
        .labels(labels(&["Flu", "Malaria"]))
        .precautions(table())
        .build()
        .unwrap();
    let router = build_router(service, &ServerConfig::default());

    let response = router
        .oneshot(post_json("/predict", r#"{"symptoms": "cough and fever"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "INFERENCE_ERROR");
}

#[tokio::test]
async fn missing_field_is_bad_request() {
    let response = router()
        .oneshot(post_json("/predict", r#"{"text": "cough"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn malformed_json_is_bad_request() {
    let response = router()
        .oneshot(post_json("/predict", "{not json"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let service = flu_service(Arc::new(FixedClassifier::new(15, vec![0.25; 4])));
    let config = ServerConfig {
        limits: LimitsConfig {
            max_body_bytes: 64,
            ..LimitsConfig::default()
        },
        ..ServerConfig::default()
    };
    let symptoms = "fever ".repeat(50);
    let body = json!({ "symptoms": symptoms }).to_string();

    let response = build_router(service, &config)
        .oneshot(post_json("/predict", &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn cors_allows_any_origin() {
    let request = Request::builder()
        .method("POST")
        .uri("/predict")
        .header(header::ORIGIN, "http://localhost:3000")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"symptoms": "cough"}"#))
        .unwrap();

    let response = router().oneshot(request).await.unwrap();
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );
}

// ============================================================================
// /health and fallback
// ============================================================================

#[tokio::test]
async fn health_reports_loaded_models() {
    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let response = router().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let health: HealthResponse = serde_json::from_value(body_json(response).await).unwrap();
    assert_eq!(health.status, "ok");
    assert!(health.version.starts_with(eir::PKG_VERSION));
    assert_eq!(health.encoder, "fixed-encoder");
    assert_eq!(health.input_width, 15);
    assert_eq!(health.classes, 4);
    assert_eq!(health.precaution_rows, 3);
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let request = Request::builder()
        .uri("/diagnose")
        .body(Body::empty())
        .unwrap();

    let response = router().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"]["code"], "NOT_FOUND");
}
