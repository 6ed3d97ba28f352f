//! Error handling for the disaster forecast service
//!
//! Per-coordinate failures (`ModelError`, `ForecastInvocationError`,
//! `ExtractionError`) never leave the pipeline; they are converted into
//! error-flagged records. `AppError` covers the service boundary.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shared::Coordinate;
use thiserror::Error;

// ============================================================================
// Pipeline Errors
// ============================================================================

/// Failure talking to the generative model provider
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("request failed: {0}")]
    Request(String),

    #[error("request timed out")]
    Timeout,

    #[error("provider returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to decode provider response: {0}")]
    Decode(String),

    #[error("provider returned no completion")]
    EmptyCompletion,
}

impl From<reqwest::Error> for ModelError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ModelError::Timeout
        } else if e.is_decode() {
            ModelError::Decode(e.to_string())
        } else {
            ModelError::Request(e.to_string())
        }
    }
}

/// Failure talking to the reverse geocoder; always absorbed by the resolver
#[derive(Error, Debug)]
pub enum GeocodeError {
    #[error("geocoding request failed: {0}")]
    Request(String),

    #[error("geocoding request timed out")]
    Timeout,

    #[error("geocoder returned {0}")]
    Status(u16),

    #[error("failed to decode geocoder response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for GeocodeError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            GeocodeError::Timeout
        } else if e.is_decode() {
            GeocodeError::Decode(e.to_string())
        } else {
            GeocodeError::Request(e.to_string())
        }
    }
}

/// Model call failure for one coordinate
#[derive(Error, Debug)]
#[error("forecast model call failed for {coordinate}: {cause}")]
pub struct ForecastInvocationError {
    pub coordinate: Coordinate,
    #[source]
    pub cause: ModelError,
}

/// Raw model text that yielded no schema-conforming JSON object
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("no JSON object found in model response")]
    NoJsonObject,

    #[error("model response did not match the forecast schema: {0}")]
    Schema(String),
}

// ============================================================================
// Service Errors
// ============================================================================

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {message}")]
    Validation { field: String, message: String },

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Prediction processing failed: {0}")]
    ProcessingFailed(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl AppError {
    fn status_and_detail(&self) -> (StatusCode, ErrorDetail) {
        match self {
            AppError::Validation { field, message } => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "VALIDATION_ERROR".to_string(),
                    message: message.clone(),
                    field: Some(field.clone()),
                },
            ),
            AppError::NotFound(message) => (
                StatusCode::NOT_FOUND,
                ErrorDetail {
                    code: "NOT_FOUND".to_string(),
                    message: message.clone(),
                    field: None,
                },
            ),
            AppError::ProcessingFailed(detail) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "PROCESSING_FAILED".to_string(),
                    message: format!("Prediction processing failed: {}", detail),
                    field: None,
                },
            ),
            AppError::Configuration(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "CONFIGURATION_ERROR".to_string(),
                    message: format!("Configuration error: {}", msg),
                    field: None,
                },
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_detail) = self.status_and_detail();

        if status.is_server_error() {
            tracing::error!("Error: {:?}", self);
        } else {
            tracing::debug!("Request rejected: {}", self);
        }

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

/// Result type alias for handlers and services
pub type AppResult<T> = Result<T, AppError>;
