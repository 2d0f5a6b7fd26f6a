//! Secret storage backends
//!
//! Every backend implements [`SecretStore`], a flat string key-value map with
//! idempotent writes and deletes. Absence is `Ok(None)`, never an error.
//!
//! - [`KeychainProvider`]: platform keychain (macOS Keychain, Windows
//!   Credential Manager, Linux Secret Service)
//! - [`FileSecretStore`]: JSON document on disk, replaced atomically on write
//! - [`MemorySecretStore`]: process-local map for tests and ephemeral sessions

pub mod error;
pub mod file;
pub mod keychain;
pub mod memory;

pub use error::SecretStoreError;
pub use file::FileSecretStore;
pub use keychain::KeychainProvider;
pub use memory::MemorySecretStore;

/// Durable string key-value storage for secrets.
///
/// Implementations must be safe to share across tasks; each call is atomic at
/// the key level.
pub trait SecretStore: Send + Sync {
    /// Read a secret, `Ok(None)` when the key was never written or was
    /// deleted.
    ///
    /// # Errors
    /// Returns `SecretStoreError` when the backend cannot be read.
    fn get_secret(&self, key: &str) -> Result<Option<String>, SecretStoreError>;

    /// Create or overwrite a secret.
    ///
    /// # Errors
    /// Returns `SecretStoreError` when the backend cannot be written.
    fn set_secret(&self, key: &str, value: &str) -> Result<(), SecretStoreError>;

    /// Remove a secret. Deleting a missing key succeeds.
    ///
    /// # Errors
    /// Returns `SecretStoreError` when the backend cannot be written.
    fn delete_secret(&self, key: &str) -> Result<(), SecretStoreError>;
}
