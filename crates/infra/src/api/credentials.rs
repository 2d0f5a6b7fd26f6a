//! Credential persistence on top of a [`SecretStore`]

use std::path::PathBuf;
use std::sync::Arc;

use debtwise_common::security::{
    FileSecretStore, KeychainProvider, MemorySecretStore, SecretStore, SecretStoreError,
};
use debtwise_domain::constants::{ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY};
use debtwise_domain::{Credentials, StorageBackend, StorageConfig};

use super::errors::ApiError;

/// Reads and writes the access/refresh token pair.
///
/// Nothing is cached: every call goes to the backing store.
#[derive(Clone)]
pub struct CredentialStore {
    backend: Arc<dyn SecretStore>,
}

impl CredentialStore {
    pub fn new(backend: Arc<dyn SecretStore>) -> Self {
        Self { backend }
    }

    /// Open the backend selected in configuration.
    ///
    /// # Errors
    /// Returns `ApiError::Config` when the file backend has no path.
    pub fn from_config(config: &StorageConfig) -> Result<Self, ApiError> {
        let backend: Arc<dyn SecretStore> = match config.backend {
            StorageBackend::Keychain => Arc::new(KeychainProvider::new(&config.service_name)),
            StorageBackend::File => {
                let path = config.file_path.as_ref().ok_or_else(|| {
                    ApiError::Config("storage.file_path is required for the file backend".into())
                })?;
                Arc::new(FileSecretStore::new(PathBuf::from(path)))
            }
            StorageBackend::Memory => Arc::new(MemorySecretStore::new()),
        };

        Ok(Self::new(backend))
    }

    pub fn get(&self) -> Result<Credentials, SecretStoreError> {
        Ok(Credentials::new(
            self.backend.get_secret(ACCESS_TOKEN_KEY)?,
            self.backend.get_secret(REFRESH_TOKEN_KEY)?,
        ))
    }

    /// Persist exactly the given state; a `None` token is removed.
    pub fn save(&self, credentials: &Credentials) -> Result<(), SecretStoreError> {
        write(self.backend.as_ref(), ACCESS_TOKEN_KEY, credentials.access_token.as_deref())?;
        write(self.backend.as_ref(), REFRESH_TOKEN_KEY, credentials.refresh_token.as_deref())
    }

    pub fn clear(&self) -> Result<(), SecretStoreError> {
        self.backend.delete_secret(ACCESS_TOKEN_KEY)?;
        self.backend.delete_secret(REFRESH_TOKEN_KEY)
    }
}

fn write(store: &dyn SecretStore, key: &str, value: Option<&str>) -> Result<(), SecretStoreError> {
    match value {
        Some(value) => store.set_secret(key, value),
        None => store.delete_secret(key),
    }
}

/// Backend whose every operation fails, as a locked keychain does.
#[cfg(test)]
pub(crate) struct FailingSecretStore;

#[cfg(test)]
impl SecretStore for FailingSecretStore {
    fn get_secret(&self, _key: &str) -> Result<Option<String>, SecretStoreError> {
        Err(SecretStoreError::AccessFailed("keychain locked".into()))
    }

    fn set_secret(&self, _key: &str, _value: &str) -> Result<(), SecretStoreError> {
        Err(SecretStoreError::AccessFailed("keychain locked".into()))
    }

    fn delete_secret(&self, _key: &str) -> Result<(), SecretStoreError> {
        Err(SecretStoreError::AccessFailed("keychain locked".into()))
    }
}
