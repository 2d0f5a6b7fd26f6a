//! Platform keychain backend
//!
//! Thin wrapper over the `keyring` crate. Each secret is one keychain entry
//! under the provider's service name, with the secret key as the account.
//!
//! ```no_run
//! use debtwise_common::security::{KeychainProvider, SecretStore};
//!
//! let keychain = KeychainProvider::new("Debtwise");
//! keychain.set_secret("debtwise.access_token", "token")?;
//! assert_eq!(keychain.get_secret("debtwise.access_token")?.as_deref(), Some("token"));
//! # Ok::<(), debtwise_common::security::SecretStoreError>(())
//! ```

use keyring::Entry;
use tracing::debug;

use super::{SecretStore, SecretStoreError};

/// Keychain-backed secret storage
#[derive(Debug, Clone)]
pub struct KeychainProvider {
    service_name: String,
}

impl KeychainProvider {
    /// Create a new keychain provider for a specific service
    ///
    /// # Arguments
    /// * `service_name` - Service identifier (e.g., "Debtwise")
    pub fn new(service_name: impl Into<String>) -> Self {
        Self { service_name: service_name.into() }
    }

    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    fn create_entry(&self, key: &str) -> Result<Entry, SecretStoreError> {
        Entry::new(&self.service_name, key).map_err(|e| {
            SecretStoreError::AccessFailed(format!("Failed to create keychain entry: {}", e))
        })
    }
}

impl SecretStore for KeychainProvider {
    fn get_secret(&self, key: &str) -> Result<Option<String>, SecretStoreError> {
        debug!(service = %self.service_name, key = %key, "Retrieving secret from keychain");

        match self.create_entry(key)?.get_password() {
            Ok(secret) => Ok(Some(secret)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(SecretStoreError::AccessFailed(format!(
                "Failed to retrieve secret for {}: {}",
                key, e
            ))),
        }
    }

    fn set_secret(&self, key: &str, value: &str) -> Result<(), SecretStoreError> {
        debug!(service = %self.service_name, key = %key, "Storing secret in keychain");

        self.create_entry(key)?.set_password(value).map_err(|e| {
            SecretStoreError::AccessFailed(format!("Failed to store secret for {}: {}", key, e))
        })
    }

    fn delete_secret(&self, key: &str) -> Result<(), SecretStoreError> {
        debug!(service = %self.service_name, key = %key, "Deleting secret from keychain");

        match self.create_entry(key)?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(SecretStoreError::AccessFailed(format!(
                "Failed to delete secret for {}: {}",
                key, e
            ))),
        }
    }
}
