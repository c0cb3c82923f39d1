//! Signed bearer tokens.
//!
//! Issues and verifies HS256 tokens whose claims embed the user
//! identifier and secret captured at signing time. The signing secret
//! is process-wide configuration: loaded once at startup, immutable
//! afterwards.
//!
//! Expiry is an optional extension point. By default no `exp` claim is
//! stamped or validated; [`TokenService::with_ttl`] enables both.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Leeway in seconds for expiration checks.
const DEFAULT_LEEWAY_SECS: u64 = 60;

/// Claims embedded in a signed token.
///
/// Both credential fields are optional at the serialization level; a
/// verified token missing either one is treated as invalid by the
/// strategies, never as "user not found".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// User identifier captured at signing time.
    #[serde(default)]
    pub user: Option<String>,

    /// Secret captured at signing time.
    #[serde(default)]
    pub password: Option<String>,

    /// Expiration time (Unix timestamp), present only when a TTL is
    /// configured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<u64>,
}

impl TokenClaims {
    /// Create claims for a user/secret pair.
    pub fn new(user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user: Some(user.into()),
            password: Some(password.into()),
            exp: None,
        }
    }

    /// Both credential fields, when present.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (&self.user, &self.password) {
            (Some(user), Some(password)) => Some((user.as_str(), password.as_str())),
            _ => None,
        }
    }
}

/// Token service holding the process-wide signing keys.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Option<Duration>,
}

impl TokenService {
    /// Create a token service with an HMAC signing secret.
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl: None,
        }
    }

    /// Enable token expiry with the given time to live.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    /// Sign a token embedding the given claims.
    ///
    /// When a TTL is configured and the claims carry no `exp`, one is
    /// stamped from the current time.
    pub async fn sign(&self, claims: &TokenClaims) -> Result<String> {
        let mut claims = claims.clone();
        if claims.exp.is_none() {
            if let Some(ttl) = self.ttl {
                claims.exp = Some(unix_now() + ttl.as_secs());
            }
        }

        Ok(encode(&Header::default(), &claims, &self.encoding_key)?)
    }

    /// Verify a token and extract its claims.
    ///
    /// Fails on a malformed token, a bad signature, or an expired
    /// token when a TTL is configured.
    pub async fn verify(&self, token: &str) -> Result<TokenClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = DEFAULT_LEEWAY_SECS;
        if self.ttl.is_some() {
            validation.validate_exp = true;
        } else {
            validation.validate_exp = false;
            validation.set_required_spec_claims::<&str>(&[]);
        }

        let data = decode::<TokenClaims>(token, &self.decoding_key, &validation)?;
        Ok(data.claims)
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
