//! HTTP error responses.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::EirError;

/// Errors returned by the HTTP handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Prediction(#[from] EirError),

    /// Malformed JSON, missing `symptoms` field or oversized body.
    #[error("invalid request body: {message}")]
    InvalidBody { status: StatusCode, message: String },

    #[error("not found")]
    NotFound,

    /// The blocking inference task panicked or was cancelled.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Body of every error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Prediction(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            ApiError::Prediction(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::InvalidBody { status, .. } => *status,
            ApiError::NotFound => StatusCode::NOT_FOUND,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::Prediction(e) => match e {
                EirError::Encoding(_) => "ENCODING_ERROR",
                EirError::Inference(_) => "INFERENCE_ERROR",
                EirError::Classification(_) => "CLASSIFICATION_ERROR",
                EirError::Configuration(_) => "CONFIGURATION_ERROR",
                EirError::ResourceLoad { .. } => "RESOURCE_LOAD_ERROR",
                EirError::Json(_) | EirError::Csv(_) | EirError::Io(_) => "INTERNAL_ERROR",
            },
            ApiError::InvalidBody { status, .. } if *status == StatusCode::PAYLOAD_TOO_LARGE => {
                "PAYLOAD_TOO_LARGE"
            }
            ApiError::InvalidBody { .. } => "BAD_REQUEST",
            ApiError::NotFound => "NOT_FOUND",
            ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<JsonRejection> for ApiError {
    /// Oversized bodies keep their 413; every other rejection is a 400.
    fn from(rejection: JsonRejection) -> Self {
        let status = match rejection.status() {
            StatusCode::PAYLOAD_TOO_LARGE => StatusCode::PAYLOAD_TOO_LARGE,
            _ => StatusCode::BAD_REQUEST,
        };
        ApiError::InvalidBody {
            status,
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }

        let body = ErrorResponse {
            error: ErrorDetail {
                code: self.error_code().to_string(),
                message: self.to_string(),
            },
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encoding_errors_are_bad_requests() {
        let err = ApiError::from(EirError::Encoding("symptom text is empty".to_string()));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.error_code(), "ENCODING_ERROR");
    }

    #[test]
    fn inference_errors_are_server_errors() {
        let err = ApiError::from(EirError::Inference("ONNX inference failed".to_string()));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.error_code(), "INFERENCE_ERROR");
    }

    #[test]
    fn configuration_errors_are_server_errors() {
        let err = ApiError::from(EirError::Configuration("width mismatch".to_string()));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.error_code(), "CONFIGURATION_ERROR");
    }

    #[test]
    fn message_is_the_underlying_error() {
        let err = ApiError::from(EirError::Classification("boom".to_string()));
        assert_eq!(err.to_string(), "classification error: boom");
    }
}
