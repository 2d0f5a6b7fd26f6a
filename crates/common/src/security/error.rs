//! Secret storage error types

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SecretStoreError {
    /// Backend refused access (permission denied, locked keychain, ...)
    #[error("Secret store access failed: {0}")]
    AccessFailed(String),

    /// Reading or writing the backing file failed
    #[error("Secret store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing document is not valid JSON
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Underlying keyring library error
    #[error("Keyring error: {0}")]
    Keyring(#[from] keyring::Error),
}
