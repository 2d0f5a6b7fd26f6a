//! Bounded retry with linear backoff
//!
//! The gap after failed attempt `n` (1-indexed) is `base_delay * n`: with
//! three attempts and a two second base the executor waits 2s, then 4s, then
//! gives up and returns the last error unchanged.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, instrument, warn};

/// Classification hook deciding whether an error is worth another attempt.
pub trait Transient {
    /// `true` when the failure says nothing about the request itself
    /// (connection refused, reset, name resolution).
    fn is_transient(&self) -> bool;
}

/// Errors raised while building a retry policy
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RetryError {
    /// The retry policy configuration is invalid
    #[error("Invalid retry configuration: {message}")]
    InvalidConfiguration { message: String },
}

/// Attempt budget and backoff unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
}

impl RetryPolicy {
    /// Create a validated policy.
    ///
    /// # Errors
    /// Returns `RetryError::InvalidConfiguration` when `max_attempts` is zero.
    pub fn new(max_attempts: u32, base_delay: Duration) -> Result<Self, RetryError> {
        if max_attempts == 0 {
            return Err(RetryError::InvalidConfiguration {
                message: "max_attempts must be greater than 0".to_string(),
            });
        }

        Ok(Self { max_attempts, base_delay })
    }

    /// Single attempt, no backoff.
    pub fn no_retry() -> Self {
        Self { max_attempts: 1, base_delay: Duration::ZERO }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn base_delay(&self) -> Duration {
        self.base_delay
    }

    /// Delay slept after failed attempt `attempt` (1-indexed) before the next
    /// one is issued.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(attempt)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { max_attempts: 3, base_delay: Duration::from_secs(1) }
    }
}

/// Result of a retry execution with summary statistics.
#[derive(Debug)]
pub struct RetryOutcome<T, E> {
    pub result: Result<T, E>,
    /// Attempts actually issued, including the first.
    pub attempts: u32,
    /// Time spent suspended between attempts.
    pub total_delay: Duration,
}

impl<T, E> RetryOutcome<T, E> {
    /// Consume the outcome and return only the result.
    pub fn into_result(self) -> Result<T, E> {
        self.result
    }
}

/// Runs an operation until it succeeds, fails permanently, or the attempt
/// budget is spent.
#[derive(Debug, Clone, Default)]
pub struct RetryExecutor {
    policy: RetryPolicy,
}

impl RetryExecutor {
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    /// Execute an operation with retry logic.
    ///
    /// # Errors
    /// Returns the first non-transient error, or the last transient error once
    /// every attempt has failed.
    pub async fn execute<F, Fut, T, E>(&self, operation: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Transient + fmt::Display,
    {
        self.execute_with_outcome(operation).await.into_result()
    }

    /// Execute an operation with retry logic and return outcome statistics.
    #[instrument(skip_all, fields(max_attempts = self.policy.max_attempts))]
    pub async fn execute_with_outcome<F, Fut, T, E>(&self, mut operation: F) -> RetryOutcome<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Transient + fmt::Display,
    {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut attempt = 1;
        let mut total_delay = Duration::ZERO;

        loop {
            debug!(attempt, max_attempts, "executing operation");

            let error = match operation().await {
                Ok(value) => {
                    if attempt > 1 {
                        debug!(attempt, "operation succeeded after retry");
                    }
                    return RetryOutcome { result: Ok(value), attempts: attempt, total_delay };
                }
                Err(error) => error,
            };

            if !error.is_transient() {
                debug!(attempt, error = %error, "non-transient failure, not retrying");
                return RetryOutcome { result: Err(error), attempts: attempt, total_delay };
            }

            if attempt >= max_attempts {
                warn!(attempts = attempt, error = %error, "retry attempts exhausted");
                return RetryOutcome { result: Err(error), attempts: attempt, total_delay };
            }

            let delay = self.policy.delay_after(attempt);
            warn!(
                attempt,
                delay_ms = delay.as_millis() as u64,
                error = %error,
                "transient failure, retrying"
            );

            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            total_delay += delay;
            attempt += 1;
        }
    }
}
