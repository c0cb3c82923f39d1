//! Authgate Core - credential storage, token issuance, and the
//! composable request-authentication pipeline.
//!
//! The pipeline is built from small pieces wired together at process
//! start: a [`CredentialStore`] backed by sled, a [`TokenService`] for
//! signed bearer tokens, one or more [`VerifyStrategy`] implementations
//! that inspect a request, and an [`AuthComposer`] that runs the
//! strategies in order and admits the request if any one of them
//! succeeds.

pub mod composer;
pub mod error;
pub mod store;
pub mod strategy;
pub mod token;

pub use composer::{AuthComposer, Decision, Denial};
pub use error::{Error, Result};
pub use store::CredentialStore;
pub use strategy::{
    AuthRequest, FailureReason, PasswordStrategy, ResponseOverride, StrategyFailure,
    StrategyOutcome, TokenStrategy, VerifyStrategy,
};
pub use token::{TokenClaims, TokenService};
