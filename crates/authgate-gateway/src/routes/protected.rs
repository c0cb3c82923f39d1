//! Protected endpoints.
//!
//! Each protected handler evaluates its configured strategy list
//! before running; on denial, the strategy's response override is
//! emitted if present, otherwise the generic unauthorized response.

use axum::{
    extract::State,
    http::HeaderMap,
    routing::{get, post},
    Json, Router,
};
use serde_json::Value;
use tracing::info;

use authgate_core::{AuthRequest, Decision};

use crate::error::AppError;
use crate::json::HelloResponse;
use crate::AppState;

/// Protected routes plus the auth-free probe route.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth", get(handle_auth))
        .route("/auth-multiple", post(handle_auth_multiple))
        .route("/no-auth", get(handle_no_auth))
}

/// Build the strategy-facing request view from the HTTP parts.
fn auth_request(headers: &HeaderMap, body: Option<Value>) -> AuthRequest {
    let mut request = AuthRequest::new();

    for (name, value) in headers {
        if let Ok(value) = value.to_str() {
            request = request.with_header(name.as_str(), value);
        }
    }

    if let Some(body) = body {
        request = request.with_body(body);
    }

    request
}

/// Token-protected handler.
async fn handle_auth(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<HelloResponse>, AppError> {
    match state.token_auth.evaluate(&auth_request(&headers, None)).await {
        Decision::Authorized => {
            info!("auth route");
            Ok(Json(HelloResponse::default()))
        }
        Decision::Denied(denial) => Err(denial.into()),
    }
}

/// Handler protected by token OR password credentials.
async fn handle_auth_multiple(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Option<Json<Value>>,
) -> Result<Json<HelloResponse>, AppError> {
    let request = auth_request(&headers, body.map(|Json(body)| body));

    match state.multi_auth.evaluate(&request).await {
        Decision::Authorized => {
            info!("auth route");
            Ok(Json(HelloResponse::default()))
        }
        Decision::Denied(denial) => Err(denial.into()),
    }
}

/// Auth-free handler.
async fn handle_no_auth() -> Json<HelloResponse> {
    info!("auth free route");
    Json(HelloResponse::default())
}
