//! Bearer token verification strategy.
//!
//! Verifies the signed token carried in the request's `auth` header,
//! then cross-checks the embedded credentials against the store. A
//! token referencing an unknown user fails exactly like a token with a
//! stale secret, so callers cannot probe which tokens reference real
//! accounts.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use crate::store::CredentialStore;
use crate::token::TokenService;

use super::{AuthRequest, FailureReason, ResponseOverride, StrategyOutcome, VerifyStrategy};

/// Request header carrying the raw token string.
pub const TOKEN_HEADER: &str = "auth";

/// Body flag that forces a deterministic denial with an exact reply.
/// Kept as an explicit test/debug hook.
pub const FORCED_FAILURE_FIELD: &str = "failureWithReply";

/// Strategy verifying a signed bearer token against the credential store.
pub struct TokenStrategy {
    tokens: Arc<TokenService>,
    store: Arc<CredentialStore>,
}

impl TokenStrategy {
    /// Create a token strategy over the given services.
    pub fn new(tokens: Arc<TokenService>, store: Arc<CredentialStore>) -> Self {
        Self { tokens, store }
    }
}

#[async_trait]
impl VerifyStrategy for TokenStrategy {
    fn name(&self) -> &'static str {
        "token"
    }

    async fn verify(&self, request: &AuthRequest) -> StrategyOutcome {
        if request.body_flag(FORCED_FAILURE_FIELD) {
            return StrategyOutcome::failure_with_response(
                FailureReason::Forced,
                ResponseOverride {
                    status: 401,
                    body: json!({ "error": "Unauthorized" }),
                },
            );
        }

        let token = match request.header(TOKEN_HEADER) {
            Some(token) => token,
            None => return StrategyOutcome::failure(FailureReason::MissingHeader),
        };

        let claims = match self.tokens.verify(token).await {
            Ok(claims) => claims,
            Err(err) => {
                tracing::debug!(error = %err, "token verification failed");
                return StrategyOutcome::failure(FailureReason::InvalidToken);
            }
        };

        let (user, password) = match claims.credentials() {
            Some(credentials) => credentials,
            None => return StrategyOutcome::failure(FailureReason::InvalidToken),
        };

        let stored = match self.store.get(user).await {
            Ok(Some(stored)) => stored,
            Ok(None) => return StrategyOutcome::failure(FailureReason::InvalidToken),
            Err(err) => return StrategyOutcome::failure(FailureReason::Store(err)),
        };

        if stored != password {
            return StrategyOutcome::failure(FailureReason::InvalidToken);
        }

        StrategyOutcome::Success
    }
}
