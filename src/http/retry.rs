//! Retry and backoff policy
//!
//! One logical call moves through `Pending -> Attempting -> {Succeeded |
//! Retrying | Failed}`. [`RetryPolicy::decide`] is the transition out of
//! `Attempting`; [`run_with_retry`] drives the loop around any attempt
//! function, so the state machine can be exercised without a network.

use crate::auth::{Authenticator, Credential};
use crate::error::{Error, Result};
use crate::types::BackoffType;
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, warn};

/// Retry budget and backoff configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Additional attempts after the first
    pub max_retries: u32,
    /// Growth of the computed delay
    pub backoff_type: BackoffType,
    /// Delay before the first retry
    pub base_delay: Duration,
    /// Cap on the computed delay
    pub max_delay: Duration,
    /// Floor for every delay, including server retry-after hints
    pub min_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff_type: BackoffType::Exponential,
            base_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(30),
            min_delay: Duration::ZERO,
        }
    }
}

/// What to do after a failed attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Ask the provider for a new credential and try again without
    /// spending budget
    RefreshCredential,
    /// Sleep, then try again
    Retry(Duration),
    /// Surface the error
    Fail,
}

impl RetryPolicy {
    /// Same policy with a different budget
    #[must_use]
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Calculate backoff delay for a given retry (0-based)
    pub fn calculate_backoff(&self, attempt: u32) -> Duration {
        let delay = match self.backoff_type {
            BackoffType::Constant => self.base_delay,
            BackoffType::Linear => self.base_delay.saturating_mul(attempt.saturating_add(1)),
            BackoffType::Exponential => {
                let factor = 2u32.saturating_pow(attempt);
                self.base_delay.saturating_mul(factor)
            }
        };

        delay.min(self.max_delay).max(self.min_delay)
    }

    /// Delay before the next attempt
    ///
    /// A retry-after hint replaces the computed delay, but never goes below
    /// the floor.
    pub fn delay_for(&self, retries_used: u32, err: &Error) -> Duration {
        match err.retry_after() {
            Some(hint) => hint.max(self.min_delay),
            None => self.calculate_backoff(retries_used),
        }
    }

    /// Transition out of `Attempting` after a failure
    pub fn decide(&self, err: &Error, retries_used: u32, refresh_spent: bool) -> RetryDecision {
        if err.is_unauthorized() {
            return if refresh_spent {
                RetryDecision::Fail
            } else {
                RetryDecision::RefreshCredential
            };
        }

        if err.is_retryable() && retries_used < self.max_retries {
            RetryDecision::Retry(self.delay_for(retries_used, err))
        } else {
            RetryDecision::Fail
        }
    }
}

// ============================================================================
// Attempts
// ============================================================================

/// Outcome of one attempt
#[derive(Debug, Clone)]
pub enum AttemptOutcome {
    Success,
    /// No response: socket, connect, timeout or request build failure
    TransportFailure(Error),
    /// The server answered with an error status
    HttpError(Error),
}

/// One execution of a request
#[derive(Debug, Clone)]
pub struct Attempt {
    /// 1-based attempt number within the call
    pub index: u32,
    /// Wall-clock time of this attempt
    pub elapsed: Duration,
    pub outcome: AttemptOutcome,
}

impl Attempt {
    fn succeeded(index: u32, elapsed: Duration) -> Self {
        Self {
            index,
            elapsed,
            outcome: AttemptOutcome::Success,
        }
    }

    fn failed(index: u32, elapsed: Duration, err: Error) -> Self {
        // No status means the request never got an answer
        let outcome = if err.status().is_none() {
            AttemptOutcome::TransportFailure(err)
        } else {
            AttemptOutcome::HttpError(err)
        };
        Self {
            index,
            elapsed,
            outcome,
        }
    }

    /// True if this attempt succeeded
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, AttemptOutcome::Success)
    }
}

/// Drive `attempt` under `policy` until success or a terminal failure
///
/// The credential is fetched once up front. A 401 triggers at most one
/// refresh per call; the retried attempt after a successful refresh does not
/// count against the budget. Every attempt is appended to `attempts`, which
/// stays readable if the caller abandons this future at a deadline.
pub async fn run_with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    authenticator: &Authenticator,
    attempts: &mut Vec<Attempt>,
    mut attempt: F,
) -> Result<T>
where
    F: FnMut(Option<Credential>) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut credential = authenticator.current().await?;
    let mut retries_used = 0u32;
    let mut refresh_spent = false;
    let mut index = 0u32;

    loop {
        index += 1;
        let started = Instant::now();
        let result = attempt(credential.clone()).await;
        let elapsed = started.elapsed();

        let err = match result {
            Ok(value) => {
                debug!(attempt = index, ?elapsed, "Attempt succeeded");
                attempts.push(Attempt::succeeded(index, elapsed));
                return Ok(value);
            }
            Err(err) => err,
        };
        attempts.push(Attempt::failed(index, elapsed, err.clone()));

        match policy.decide(&err, retries_used, refresh_spent) {
            RetryDecision::RefreshCredential => {
                refresh_spent = true;
                debug!(attempt = index, "Credential rejected, refreshing");
                match authenticator.refresh(credential.as_ref()).await {
                    Ok(fresh) => credential = Some(fresh),
                    Err(refresh_err) => {
                        warn!(attempt = index, error = %refresh_err, "Credential refresh failed");
                        return Err(Error::Auth {
                            message: format!(
                                "credential rejected and refresh failed: {}",
                                refresh_err.message()
                            ),
                            status: err.status(),
                        });
                    }
                }
            }
            RetryDecision::Retry(delay) => {
                warn!(
                    "Attempt {} failed ({}), retry {}/{} in {:?}",
                    index,
                    err,
                    retries_used + 1,
                    policy.max_retries,
                    delay
                );
                tokio::time::sleep(delay).await;
                retries_used += 1;
            }
            RetryDecision::Fail => {
                debug!(attempt = index, kind = ?err.kind(), "Attempt failed terminally");
                return Err(err);
            }
        }
    }
}
