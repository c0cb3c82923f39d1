//! Direct credential verification strategy.
//!
//! Reads `user` and `password` from the request body and compares them
//! against the credential store. An unknown user and a wrong password
//! fail with the same reason so callers cannot enumerate accounts.

use std::sync::Arc;

use async_trait::async_trait;

use crate::store::CredentialStore;

use super::{AuthRequest, FailureReason, StrategyOutcome, VerifyStrategy};

/// Body field carrying the user identifier.
pub const USER_FIELD: &str = "user";

/// Body field carrying the password.
pub const PASSWORD_FIELD: &str = "password";

/// Strategy verifying body credentials against the credential store.
pub struct PasswordStrategy {
    store: Arc<CredentialStore>,
}

impl PasswordStrategy {
    /// Create a password strategy over the given store.
    pub fn new(store: Arc<CredentialStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl VerifyStrategy for PasswordStrategy {
    fn name(&self) -> &'static str {
        "password"
    }

    async fn verify(&self, request: &AuthRequest) -> StrategyOutcome {
        let user = match request.body_str(USER_FIELD) {
            Some(user) => user,
            None => return StrategyOutcome::failure(FailureReason::MissingUser),
        };

        let stored = match self.store.get(user).await {
            Ok(Some(stored)) => stored,
            Ok(None) => return StrategyOutcome::failure(FailureReason::InvalidCredentials),
            Err(err) => return StrategyOutcome::failure(FailureReason::Store(err)),
        };

        match request.body_str(PASSWORD_FIELD) {
            Some(password) if stored == password => StrategyOutcome::Success,
            _ => StrategyOutcome::failure(FailureReason::InvalidCredentials),
        }
    }
}
