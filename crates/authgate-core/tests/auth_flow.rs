//! End-to-end pipeline tests: register credentials, issue tokens, and
//! evaluate composed strategy lists the way the gateway wires them.

use std::sync::Arc;

use serde_json::json;

use authgate_core::{
    AuthComposer, AuthRequest, CredentialStore, PasswordStrategy, TokenClaims, TokenService,
    TokenStrategy,
};
use authgate_core::strategy::TOKEN_HEADER;

struct Pipeline {
    store: Arc<CredentialStore>,
    tokens: Arc<TokenService>,
    composer: AuthComposer,
    _db: sled::Db,
}

fn pipeline(secret: &str) -> Pipeline {
    let db = sled::Config::new().temporary(true).open().unwrap();
    let store = Arc::new(CredentialStore::open(&db).unwrap());
    let tokens = Arc::new(TokenService::new(secret));

    let composer = AuthComposer::new()
        .with_strategy(Arc::new(TokenStrategy::new(tokens.clone(), store.clone())))
        .with_strategy(Arc::new(PasswordStrategy::new(store.clone())));

    Pipeline {
        store,
        tokens,
        composer,
        _db: db,
    }
}

/// Register a user and hand back a signed token, mirroring the
/// gateway's registration endpoint.
async fn register(p: &Pipeline, user: &str, password: &str) -> String {
    p.store.put(user, password).await.unwrap();
    p.tokens.sign(&TokenClaims::new(user, password)).await.unwrap()
}

#[tokio::test]
async fn issued_token_authorizes() {
    let p = pipeline("supersecret");
    let token = register(&p, "alice", "pw1").await;

    let request = AuthRequest::new().with_header(TOKEN_HEADER, token);
    assert!(p.composer.evaluate(&request).await.is_authorized());
}

#[tokio::test]
async fn password_rescues_garbled_token() {
    let p = pipeline("supersecret");
    register(&p, "alice", "pw1").await;

    // Token strategy fails on the garbled header; the password
    // strategy still admits the request.
    let request = AuthRequest::new()
        .with_header(TOKEN_HEADER, "garbled")
        .with_body(json!({ "user": "alice", "password": "pw1" }));
    assert!(p.composer.evaluate(&request).await.is_authorized());
}

#[tokio::test]
async fn password_rescues_missing_token() {
    let p = pipeline("supersecret");
    register(&p, "alice", "pw1").await;

    let request =
        AuthRequest::new().with_body(json!({ "user": "alice", "password": "pw1" }));
    assert!(p.composer.evaluate(&request).await.is_authorized());
}

#[tokio::test]
async fn bare_request_collects_both_failures() {
    let p = pipeline("supersecret");
    register(&p, "alice", "pw1").await;

    match p.composer.evaluate(&AuthRequest::new()).await {
        authgate_core::Decision::Denied(denial) => {
            assert_eq!(denial.failures().len(), 2);
            assert!(denial.response_override().is_none());
        }
        authgate_core::Decision::Authorized => panic!("expected denial"),
    }
}

#[tokio::test]
async fn wrong_password_denied() {
    let p = pipeline("supersecret");
    register(&p, "alice", "pw1").await;

    let request =
        AuthRequest::new().with_body(json!({ "user": "alice", "password": "wrong" }));
    assert!(!p.composer.evaluate(&request).await.is_authorized());
}

#[tokio::test]
async fn unregistered_user_denied() {
    let p = pipeline("supersecret");
    register(&p, "alice", "pw1").await;

    let request =
        AuthRequest::new().with_body(json!({ "user": "bob", "password": "pw1" }));
    assert!(!p.composer.evaluate(&request).await.is_authorized());
}

#[tokio::test]
async fn tampered_token_denied() {
    let p = pipeline("supersecret");
    let token = register(&p, "alice", "pw1").await;

    let sig_start = token.rfind('.').unwrap() + 1;
    let mut bytes = token.into_bytes();
    bytes[sig_start] = if bytes[sig_start] == b'A' { b'B' } else { b'A' };
    let tampered = String::from_utf8(bytes).unwrap();

    let request = AuthRequest::new().with_header(TOKEN_HEADER, tampered);
    assert!(!p.composer.evaluate(&request).await.is_authorized());
}

#[tokio::test]
async fn forced_failure_beats_valid_credentials() {
    let p = pipeline("supersecret");
    let token = register(&p, "alice", "pw1").await;

    // Valid token and valid password, but the forced-failure flag must
    // still deny with the exact override.
    let request = AuthRequest::new()
        .with_header(TOKEN_HEADER, token)
        .with_body(json!({
            "user": "alice",
            "password": "pw1",
            "failureWithReply": true,
        }));

    match p.composer.evaluate(&request).await {
        authgate_core::Decision::Denied(denial) => {
            let response = denial.response_override().expect("override expected");
            assert_eq!(response.status, 401);
            assert_eq!(response.body, json!({ "error": "Unauthorized" }));
        }
        authgate_core::Decision::Authorized => panic!("expected denial"),
    }
}

#[tokio::test]
async fn reregistration_overwrites_secret() {
    let p = pipeline("supersecret");
    register(&p, "alice", "pw1").await;
    register(&p, "alice", "pw2").await;

    let old = AuthRequest::new()
        .with_body(json!({ "user": "alice", "password": "pw1" }));
    assert!(!p.composer.evaluate(&old).await.is_authorized());

    let new = AuthRequest::new()
        .with_body(json!({ "user": "alice", "password": "pw2" }));
    assert!(p.composer.evaluate(&new).await.is_authorized());
}

#[tokio::test]
async fn stale_token_denied_after_reregistration() {
    let p = pipeline("supersecret");
    let old_token = register(&p, "alice", "pw1").await;
    let new_token = register(&p, "alice", "pw2").await;

    let stale = AuthRequest::new().with_header(TOKEN_HEADER, old_token);
    assert!(!p.composer.evaluate(&stale).await.is_authorized());

    let fresh = AuthRequest::new().with_header(TOKEN_HEADER, new_token);
    assert!(p.composer.evaluate(&fresh).await.is_authorized());
}
