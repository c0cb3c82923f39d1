//! Strategy composition.
//!
//! Runs an ordered list of verification strategies against a request
//! with OR semantics: the first strategy to succeed authorizes the
//! request and no further strategy runs. When every strategy fails the
//! request is denied and all failures are kept in strategy order.
//!
//! A failure carrying a response override commits the reply: evaluation
//! stops there, remaining strategies never run, and no later success
//! can rescue the request. The override encountered first is therefore
//! the one sent.
//!
//! A store-class failure denies the request like any other failure but
//! is logged at `warn` so infrastructure faults stay distinguishable
//! from credential mismatches.

use std::sync::Arc;

use crate::strategy::{
    AuthRequest, FailureReason, ResponseOverride, StrategyFailure, StrategyOutcome, VerifyStrategy,
};

/// Outcome of evaluating a strategy list against one request.
#[derive(Debug)]
pub enum Decision {
    /// Some strategy succeeded.
    Authorized,
    /// Every strategy failed.
    Denied(Denial),
}

impl Decision {
    /// Check whether the request was authorized.
    pub fn is_authorized(&self) -> bool {
        matches!(self, Decision::Authorized)
    }
}

/// The collected failures of a denied request.
#[derive(Debug, Default)]
pub struct Denial {
    failures: Vec<(&'static str, StrategyFailure)>,
}

impl Denial {
    /// Failures in strategy evaluation order, paired with the name of
    /// the strategy that produced them.
    pub fn failures(&self) -> &[(&'static str, StrategyFailure)] {
        &self.failures
    }

    /// The first response override encountered, if any. This exact
    /// status and body must be sent instead of the generic denial.
    pub fn response_override(&self) -> Option<&ResponseOverride> {
        self.failures
            .iter()
            .find_map(|(_, failure)| failure.response.as_ref())
    }

    /// Whether any failure was a store fault rather than a credential
    /// mismatch.
    pub fn has_store_failure(&self) -> bool {
        self.failures
            .iter()
            .any(|(_, failure)| matches!(failure.reason, FailureReason::Store(_)))
    }
}

/// Ordered, short-circuiting strategy composition.
#[derive(Default)]
pub struct AuthComposer {
    strategies: Vec<Arc<dyn VerifyStrategy>>,
}

impl AuthComposer {
    /// Create an empty composer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a strategy to the evaluation order.
    pub fn with_strategy(mut self, strategy: Arc<dyn VerifyStrategy>) -> Self {
        self.strategies.push(strategy);
        self
    }

    /// Number of configured strategies.
    pub fn strategy_count(&self) -> usize {
        self.strategies.len()
    }

    /// Evaluate the strategies in order against one request.
    ///
    /// Strictly sequential; no strategy runs after one has succeeded,
    /// no strategy runs after one has committed a response override,
    /// and the decision is terminal for this evaluation.
    pub async fn evaluate(&self, request: &AuthRequest) -> Decision {
        let mut denial = Denial::default();

        for strategy in &self.strategies {
            match strategy.verify(request).await {
                StrategyOutcome::Success => {
                    tracing::debug!(strategy = strategy.name(), "request authorized");
                    return Decision::Authorized;
                }
                StrategyOutcome::Failure(failure) => {
                    match &failure.reason {
                        FailureReason::Store(err) => {
                            tracing::warn!(
                                strategy = strategy.name(),
                                error = %err,
                                "store failure during verification"
                            );
                        }
                        reason => {
                            tracing::debug!(
                                strategy = strategy.name(),
                                reason = %reason,
                                "strategy declined request"
                            );
                        }
                    }

                    let committed = failure.response.is_some();
                    denial.failures.push((strategy.name(), failure));

                    // The strategy demanded an exact reply; the denial
                    // is committed and later strategies must not run.
                    if committed {
                        tracing::debug!(
                            strategy = strategy.name(),
                            "response committed, stopping evaluation"
                        );
                        return Decision::Denied(denial);
                    }
                }
            }
        }

        Decision::Denied(denial)
    }
}
