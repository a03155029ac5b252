//! Request handlers.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use serde::{Deserialize, Serialize};

use super::ApiError;
use crate::service::PredictionService;
use crate::types::PredictionResult;

/// `POST /predict` body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictRequest {
    pub symptoms: String,
}

/// `GET /health` body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub encoder: String,
    pub classifier: String,
    pub input_width: usize,
    pub classes: usize,
    pub precaution_rows: usize,
}

pub async fn predict(
    State(service): State<PredictionService>,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> Result<Json<PredictionResult>, ApiError> {
    let Json(request) = payload?;

    let result = tokio::task::spawn_blocking(move || service.predict(&request.symptoms))
        .await
        .map_err(|e| ApiError::Internal(format!("prediction task failed: {e}")))??;

    Ok(Json(result))
}

pub async fn health(State(service): State<PredictionService>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: crate::version_string(),
        encoder: service.encoder().name().to_string(),
        classifier: service.classifier().name().to_string(),
        input_width: service.classifier().expected_width(),
        classes: service.labels().len(),
        precaution_rows: service.precautions().len(),
    })
}

pub async fn not_found() -> ApiError {
    ApiError::NotFound
}
