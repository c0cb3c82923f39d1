//! Authgate HTTP/JSON gateway.
//!
//! Binds the composed authentication pipeline to HTTP endpoints:
//! registration, token-protected routes, and an unauthenticated probe
//! route. All wiring happens here and in `main`; the strategies and
//! the composer come from `authgate-core`.

pub mod config;
pub mod error;
pub mod json;
pub mod routes;

pub use config::{Args, GatewayConfig};
pub use error::AppError;

use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use authgate_core::{
    AuthComposer, CredentialStore, PasswordStrategy, TokenService, TokenStrategy,
};

/// Application state shared across all routes.
#[derive(Clone)]
pub struct AppState {
    /// Credential store handle.
    pub store: Arc<CredentialStore>,
    /// Token service holding the signing keys.
    pub tokens: Arc<TokenService>,
    /// Composer for token-only protected routes.
    pub token_auth: Arc<AuthComposer>,
    /// Composer for routes accepting token or password credentials.
    pub multi_auth: Arc<AuthComposer>,
}

impl AppState {
    /// Wire the strategy sets over the given store and token service.
    pub fn new(store: Arc<CredentialStore>, tokens: Arc<TokenService>) -> Self {
        let token_auth = Arc::new(AuthComposer::new().with_strategy(Arc::new(
            TokenStrategy::new(tokens.clone(), store.clone()),
        )));

        // Only one of these has to pass.
        let multi_auth = Arc::new(
            AuthComposer::new()
                .with_strategy(Arc::new(TokenStrategy::new(tokens.clone(), store.clone())))
                .with_strategy(Arc::new(PasswordStrategy::new(store.clone()))),
        );

        Self {
            store,
            tokens,
            token_auth,
            multi_auth,
        }
    }
}

/// Create the router with all routes.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(routes::health::routes())
        .merge(routes::register::routes())
        .merge(routes::protected::routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
