//! Resilience patterns for transient failures
//!
//! The [`retry`] module wraps a single fallible async operation with a bounded
//! number of attempts and a linear backoff between them. Errors opt in to
//! retries through the [`Transient`] trait; anything not classified as
//! transient is returned on the first failure.
//!
//! Delays go through `tokio::time::sleep`, so only the calling task is
//! suspended and dropping the future cancels the pending attempt.

pub mod retry;

pub use retry::{RetryError, RetryExecutor, RetryOutcome, RetryPolicy, Transient};
