//! Uniform result contract returned by every client operation.
//!
//! Callers never see transport exceptions: a dropped connection, a timeout, a
//! 404 and a garbled body all arrive as an [`Outcome::Failure`] carrying an
//! [`ErrorKind`] and a displayable message.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Field name → messages, as reported by the backend for 400/422 responses.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Closed classification of failed requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    Validation,
    RateLimited,
    ServerError,
    NetworkUnavailable,
    Timeout,
    MalformedResponse,
    Unknown,
}

impl ErrorKind {
    /// Fixed message used when the response body carries none.
    pub fn default_message(self) -> &'static str {
        match self {
            Self::BadRequest => "The request could not be processed.",
            Self::Unauthorized => "Your session has expired. Please log in again.",
            Self::Forbidden => "You do not have permission to perform this action.",
            Self::NotFound => "The requested resource was not found.",
            Self::Validation => "Some fields are invalid.",
            Self::RateLimited => "Too many requests. Please try again later.",
            Self::ServerError => "The server encountered an error. Please try again later.",
            Self::NetworkUnavailable => "Unable to reach the server. Check your connection.",
            Self::Timeout => "The request timed out.",
            Self::MalformedResponse => "The server returned an unreadable response.",
            Self::Unknown => "An unexpected error occurred.",
        }
    }

    /// Stable label suitable for structured log fields.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BadRequest => "bad_request",
            Self::Unauthorized => "unauthorized",
            Self::Forbidden => "forbidden",
            Self::NotFound => "not_found",
            Self::Validation => "validation",
            Self::RateLimited => "rate_limited",
            Self::ServerError => "server_error",
            Self::NetworkUnavailable => "network_unavailable",
            Self::Timeout => "timeout",
            Self::MalformedResponse => "malformed_response",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failed request details.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Failure {
    pub kind: ErrorKind,
    pub message: String,
    /// `None` when no response was received (network down, timeout).
    pub status_code: Option<u16>,
    pub field_errors: Option<FieldErrors>,
    /// Set when the session cannot be recovered without a fresh login.
    #[serde(default)]
    pub needs_login: bool,
}

impl Failure {
    /// Failure of the given kind with its fallback message.
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: kind.default_message().to_string(),
            status_code: None,
            field_errors: None,
            needs_login: false,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn with_status(mut self, status_code: u16) -> Self {
        self.status_code = Some(status_code);
        self
    }

    pub fn with_field_errors(mut self, field_errors: FieldErrors) -> Self {
        self.field_errors = Some(field_errors);
        self
    }

    pub fn requiring_login(mut self) -> Self {
        self.needs_login = true;
        self
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status_code {
            Some(status) => write!(f, "{} ({status}): {}", self.kind, self.message),
            None => write!(f, "{}: {}", self.kind, self.message),
        }
    }
}

impl std::error::Error for Failure {}

/// Result of one orchestrated call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    Success { payload: Value, status_code: u16 },
    Failure(Failure),
}

impl Outcome {
    pub fn success(payload: Value, status_code: u16) -> Self {
        Self::Success { payload, status_code }
    }

    pub fn failure(failure: Failure) -> Self {
        Self::Failure(failure)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// `None` for successes.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Success { .. } => None,
            Self::Failure(failure) => Some(failure.kind),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.kind() == Some(ErrorKind::Unauthorized)
    }

    pub fn needs_login(&self) -> bool {
        matches!(self, Self::Failure(failure) if failure.needs_login)
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Success { status_code, .. } => Some(*status_code),
            Self::Failure(failure) => failure.status_code,
        }
    }

    pub fn payload(&self) -> Option<&Value> {
        match self {
            Self::Success { payload, .. } => Some(payload),
            Self::Failure(_) => None,
        }
    }

    pub fn into_result(self) -> Result<Value, Failure> {
        match self {
            Self::Success { payload, .. } => Ok(payload),
            Self::Failure(failure) => Err(failure),
        }
    }

    /// Deserialize the success payload into a typed value.
    ///
    /// A payload that does not match `T` is reported as
    /// `ErrorKind::MalformedResponse`, keeping the original status code.
    pub fn decode<T: DeserializeOwned>(self) -> Result<T, Failure> {
        match self {
            Self::Success { payload, status_code } => serde_json::from_value(payload)
                .map_err(|err| {
                    Failure::new(ErrorKind::MalformedResponse)
                        .with_status(status_code)
                        .with_message(format!("Unexpected response shape: {err}"))
                }),
            Self::Failure(failure) => Err(failure),
        }
    }
}

impl From<Failure> for Outcome {
    fn from(failure: Failure) -> Self {
        Self::Failure(failure)
    }
}
