//! Registration endpoint.

use axum::{extract::State, routing::post, Json, Router};
use tracing::info;

use authgate_core::TokenClaims;

use crate::error::AppError;
use crate::json::{RegisterRequest, RegisterResponse};
use crate::AppState;

/// Registration routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/register", post(handle_register))
}

/// Store the credentials, then hand back a token embedding them.
///
/// Store and signing errors surface to the caller, not swallowed.
async fn handle_register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<Json<RegisterResponse>, AppError> {
    info!(user = %body.user, "creating new user");

    state.store.put(&body.user, &body.password).await?;

    let claims = TokenClaims::new(body.user.as_str(), body.password.as_str());
    let token = state.tokens.sign(&claims).await?;

    info!(user = %body.user, "user created");
    Ok(Json(RegisterResponse { token }))
}
