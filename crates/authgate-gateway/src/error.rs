//! Error handling for the gateway.
//!
//! Denied requests carry either a strategy's exact response override
//! or the generic unauthorized body. Internal failures never leak
//! store or token detail into a denial body; they only surface on the
//! registration path, where the underlying error is the contract.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

use authgate_core::{Denial, ResponseOverride};

/// Application error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Request denied by the authentication pipeline.
    #[error("unauthorized")]
    Unauthorized(Option<ResponseOverride>),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Error response body for non-denial failures.
#[derive(Serialize)]
pub struct ErrorResponse {
    /// Error flag.
    pub error: bool,
    /// Error message.
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Unauthorized(Some(reply)) => {
                let status = StatusCode::from_u16(reply.status)
                    .unwrap_or(StatusCode::UNAUTHORIZED);
                (status, Json(reply.body)).into_response()
            }
            AppError::Unauthorized(None) => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "Unauthorized" })),
            )
                .into_response(),
            AppError::Internal(message) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: true,
                    message,
                }),
            )
                .into_response(),
        }
    }
}

impl From<authgate_core::Error> for AppError {
    fn from(err: authgate_core::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<Denial> for AppError {
    fn from(denial: Denial) -> Self {
        AppError::Unauthorized(denial.response_override().cloned())
    }
}
