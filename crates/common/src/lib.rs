//! Reusable building blocks shared by Debtwise crates.
//!
//! # Feature Tiers
//!
//! - `runtime`: async resilience helpers (retry executor with linear backoff)
//! - `platform`: secret storage backends (keychain, file, memory)
//!
//! Both tiers are enabled by default.

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

// Runtime tier
// --------------------------------------------------------------------
#[cfg(feature = "runtime")]
pub mod resilience;

// Platform tier
// -------------------------------------------------------------------
#[cfg(feature = "platform")]
pub mod security;

// Re-export commonly used types and traits for convenience
// ------------------------
#[cfg(feature = "runtime")]
pub use resilience::{RetryError, RetryExecutor, RetryOutcome, RetryPolicy, Transient};
#[cfg(feature = "platform")]
pub use security::{
    FileSecretStore, KeychainProvider, MemorySecretStore, SecretStore, SecretStoreError,
};
