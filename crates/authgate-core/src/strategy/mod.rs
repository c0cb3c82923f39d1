//! Verification strategies.
//!
//! A strategy is one self-contained asynchronous check that can
//! authorize a request. Each strategy reads from an [`AuthRequest`]
//! view and either succeeds, fails with a specific reason, or fails
//! with a reason plus an explicit response override that must be sent
//! verbatim instead of the generic denial.
//!
//! # Built-in strategies
//!
//! - [`TokenStrategy`]: signed bearer token checked against the
//!   credential store.
//! - [`PasswordStrategy`]: user/password from the request body checked
//!   against the credential store.

mod password;
mod token;

pub use password::{PasswordStrategy, PASSWORD_FIELD, USER_FIELD};
pub use token::{TokenStrategy, FORCED_FAILURE_FIELD, TOKEN_HEADER};

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Error;

/// Read-only projection of an inbound request.
///
/// Header names are lowercased on insertion and lookup. Strategies
/// only ever read from this view.
#[derive(Debug, Clone, Default)]
pub struct AuthRequest {
    headers: HashMap<String, String>,
    body: Option<Value>,
}

impl AuthRequest {
    /// Create an empty request view.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a header.
    pub fn with_header(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.headers
            .insert(name.as_ref().to_ascii_lowercase(), value.into());
        self
    }

    /// Attach a structured body.
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Look up a header value, case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// The structured body, if any.
    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    /// A string field from the body, if present.
    pub fn body_str(&self, field: &str) -> Option<&str> {
        self.body.as_ref()?.get(field)?.as_str()
    }

    /// A boolean flag from the body; absent fields read as false.
    pub fn body_flag(&self, field: &str) -> bool {
        self.body
            .as_ref()
            .and_then(|body| body.get(field))
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }
}

/// Why a strategy declined a request.
#[derive(Debug)]
pub enum FailureReason {
    /// The designated token header was absent.
    MissingHeader,
    /// The request body was absent or carried no user identifier.
    MissingUser,
    /// The token failed verification, referenced an unknown user, or
    /// embedded a stale secret. Deliberately indistinguishable so a
    /// caller cannot probe which tokens reference real accounts.
    InvalidToken,
    /// The supplied credentials did not match a stored record, or the
    /// user is unknown. Deliberately indistinguishable.
    InvalidCredentials,
    /// The request carried the explicit simulated-failure flag.
    Forced,
    /// The credential store itself failed; the underlying error is
    /// carried for observability, never for the outward response.
    Store(Error),
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureReason::MissingHeader => write!(f, "missing token header"),
            FailureReason::MissingUser => write!(f, "missing user in request body"),
            FailureReason::InvalidToken => write!(f, "token not valid"),
            FailureReason::InvalidCredentials => write!(f, "password not valid"),
            FailureReason::Forced => write!(f, "forced failure"),
            FailureReason::Store(err) => write!(f, "store failure: {}", err),
        }
    }
}

/// Exact status and body a strategy demands on failure.
#[derive(Debug, Clone)]
pub struct ResponseOverride {
    /// HTTP status code to send.
    pub status: u16,
    /// Body to send verbatim.
    pub body: Value,
}

/// A strategy's declined outcome.
#[derive(Debug)]
pub struct StrategyFailure {
    /// Why the strategy declined.
    pub reason: FailureReason,
    /// Response to send verbatim instead of the generic denial.
    pub response: Option<ResponseOverride>,
}

/// Result of running one strategy against a request.
#[derive(Debug)]
pub enum StrategyOutcome {
    /// The strategy authorizes the request.
    Success,
    /// The strategy declines the request.
    Failure(StrategyFailure),
}

impl StrategyOutcome {
    /// A plain failure with no response override.
    pub fn failure(reason: FailureReason) -> Self {
        StrategyOutcome::Failure(StrategyFailure {
            reason,
            response: None,
        })
    }

    /// A failure carrying an exact response to send.
    pub fn failure_with_response(reason: FailureReason, response: ResponseOverride) -> Self {
        StrategyOutcome::Failure(StrategyFailure {
            reason,
            response: Some(response),
        })
    }

    /// Check whether this outcome authorizes the request.
    pub fn is_success(&self) -> bool {
        matches!(self, StrategyOutcome::Success)
    }
}

/// One asynchronous check that can authorize a request.
#[async_trait]
pub trait VerifyStrategy: Send + Sync {
    /// Stable name used in logs and collected failures.
    fn name(&self) -> &'static str;

    /// Inspect the request and decide.
    async fn verify(&self, request: &AuthRequest) -> StrategyOutcome;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let request = AuthRequest::new().with_header("Auth", "tok");

        assert_eq!(request.header("auth"), Some("tok"));
        assert_eq!(request.header("AUTH"), Some("tok"));
        assert_eq!(request.header("other"), None);
    }

    #[test]
    fn test_body_accessors() {
        let request = AuthRequest::new().with_body(json!({
            "user": "alice",
            "failureWithReply": true,
        }));

        assert_eq!(request.body_str("user"), Some("alice"));
        assert_eq!(request.body_str("password"), None);
        assert!(request.body_flag("failureWithReply"));
        assert!(!request.body_flag("other"));
    }

    #[test]
    fn test_empty_request_reads_as_absent() {
        let request = AuthRequest::new();

        assert!(request.body().is_none());
        assert_eq!(request.body_str("user"), None);
        assert!(!request.body_flag("failureWithReply"));
    }
}
