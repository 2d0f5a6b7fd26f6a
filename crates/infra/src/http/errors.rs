//! Transport failure taxonomy
//!
//! Failures are classified once, at the transport boundary, from the
//! `reqwest::Error` predicates and the first `std::io::Error` found in its
//! source chain. Nothing downstream inspects error strings.

use std::error::Error as StdError;
use std::io;

use debtwise_common::resilience::Transient;
use debtwise_domain::{ErrorKind, Failure};
use thiserror::Error;

/// A request that produced no HTTP response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("connection refused: {0}")]
    ConnectionRefused(String),

    #[error("connection reset: {0}")]
    ConnectionReset(String),

    /// DNS failure or no route to the host.
    #[error("host unreachable: {0}")]
    Unreachable(String),

    /// The server may have seen the request, so this is never retried.
    #[error("request timed out: {0}")]
    Timeout(String),

    /// Anything else: TLS, malformed response framing, body decoding.
    #[error("transport protocol error: {0}")]
    Protocol(String),
}

impl TransportError {
    /// Classify a `reqwest` failure.
    pub fn classify(err: &reqwest::Error) -> Self {
        let detail = err.to_string();

        if err.is_timeout() {
            return Self::Timeout(detail);
        }

        if let Some(kind) = io_error_kind(err) {
            match kind {
                io::ErrorKind::ConnectionRefused => return Self::ConnectionRefused(detail),
                io::ErrorKind::ConnectionReset
                | io::ErrorKind::ConnectionAborted
                | io::ErrorKind::BrokenPipe
                | io::ErrorKind::UnexpectedEof => return Self::ConnectionReset(detail),
                io::ErrorKind::TimedOut => return Self::Timeout(detail),
                io::ErrorKind::NotConnected | io::ErrorKind::AddrNotAvailable => {
                    return Self::Unreachable(detail)
                }
                _ => {}
            }
        }

        // Resolver failures surface as connect errors without a useful io kind.
        #[cfg(not(target_arch = "wasm32"))]
        if err.is_connect() {
            return Self::Unreachable(detail);
        }

        Self::Protocol(detail)
    }

    /// Request-level failure reported once retries are over.
    pub fn into_failure(self) -> Failure {
        match self {
            Self::ConnectionRefused(_) | Self::ConnectionReset(_) | Self::Unreachable(_) => {
                Failure::new(ErrorKind::NetworkUnavailable)
            }
            Self::Timeout(_) => Failure::new(ErrorKind::Timeout),
            Self::Protocol(detail) => Failure::new(ErrorKind::Unknown)
                .with_message(format!("{}: {detail}", ErrorKind::Unknown.default_message())),
        }
    }
}

impl Transient for TransportError {
    fn is_transient(&self) -> bool {
        matches!(self, Self::ConnectionRefused(_) | Self::ConnectionReset(_) | Self::Unreachable(_))
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        Self::classify(&err)
    }
}

fn io_error_kind(err: &(dyn StdError + 'static)) -> Option<io::ErrorKind> {
    let mut current = Some(err);
    while let Some(source) = current {
        if let Some(io_err) = source.downcast_ref::<io::Error>() {
            return Some(io_err.kind());
        }
        current = source.source();
    }
    None
}
