//! JSON request and response bodies.

use serde::{Deserialize, Serialize};

/// Registration request body.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    /// User identifier.
    pub user: String,
    /// Password to store.
    pub password: String,
}

/// Registration response body.
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    /// Signed token embedding the registered credentials.
    pub token: String,
}

/// Body returned by the demo handlers.
#[derive(Debug, Serialize)]
pub struct HelloResponse {
    /// Fixed greeting.
    pub hello: String,
}

impl Default for HelloResponse {
    fn default() -> Self {
        Self {
            hello: "world".to_string(),
        }
    }
}

/// Health check response body.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Crate version.
    pub version: String,
}
