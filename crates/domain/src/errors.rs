//! Error types used throughout the client crates

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for Debtwise infrastructure wiring.
///
/// Request-level failures are never reported through this type; they are
/// `Outcome::Failure` values. `DebtwiseError` covers what happens around the
/// requests: loading configuration, installing logging, building the
/// transport.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum DebtwiseError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for Debtwise operations
pub type Result<T> = std::result::Result<T, DebtwiseError>;
