//! API client error types
//!
//! Request failures are `Outcome::Failure` values, never `ApiError`. This type
//! only covers wiring the client together and caller-driven cancellation.

use debtwise_common::resilience::RetryError;
use debtwise_domain::DebtwiseError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Operation cancelled")]
    Cancelled,
}

impl From<DebtwiseError> for ApiError {
    fn from(err: DebtwiseError) -> Self {
        match err {
            DebtwiseError::Config(message) => Self::Config(message),
            other => Self::Config(other.to_string()),
        }
    }
}

impl From<RetryError> for ApiError {
    fn from(err: RetryError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<ApiError> for DebtwiseError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Config(message) => DebtwiseError::Config(message),
            ApiError::Cancelled => DebtwiseError::Internal("operation cancelled".into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_config_errors_keep_their_message() {
        let err: ApiError = DebtwiseError::Config("bad timeout".into()).into();
        assert!(matches!(err, ApiError::Config(ref m) if m == "bad timeout"));

        let err: ApiError = DebtwiseError::Internal("oops".into()).into();
        assert!(matches!(err, ApiError::Config(ref m) if m.contains("oops")));
    }

    #[test]
    fn invalid_retry_policy_is_a_config_error() {
        let err: ApiError =
            RetryError::InvalidConfiguration { message: "max_attempts must be greater than 0".into() }
                .into();
        assert!(err.to_string().contains("max_attempts"));
    }

    #[test]
    fn converts_back_into_domain_error() {
        let err: DebtwiseError = ApiError::Cancelled.into();
        assert!(matches!(err, DebtwiseError::Internal(_)));
    }
}
