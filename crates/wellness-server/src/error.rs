//! Application error types and Axum response conversion.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;
use uuid::Uuid;
use wellness_core::WellnessError;

const INTERNAL_MESSAGE: &str = "An internal error occurred while processing the request";

/// Application-level errors with HTTP status code mapping.
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    BadRequest(String),
    /// Detail is logged under a generated error code and never returned.
    Internal(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_code: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, ErrorResponse { error: msg, error_code: None }),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, ErrorResponse { error: msg, error_code: None }),
            AppError::Internal(detail) => {
                let code = Uuid::new_v4().to_string();
                error!(error_code = %code, "internal error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse { error: INTERNAL_MESSAGE.into(), error_code: Some(code) },
                )
            }
        };
        (status, Json(body)).into_response()
    }
}

impl From<WellnessError> for AppError {
    fn from(e: WellnessError) -> Self {
        match e {
            WellnessError::Validation(msg) => AppError::BadRequest(msg),
            other @ WellnessError::AllGeneratorsFailed { .. } => AppError::Internal(other.to_string()),
        }
    }
}
