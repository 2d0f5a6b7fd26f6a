//! File-backed secret store
//!
//! Secrets live in a single JSON object on disk. Every write serializes the
//! whole map to a temporary file in the same directory and renames it over the
//! target, so readers see either the old document or the new one.

use std::collections::BTreeMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use super::{SecretStore, SecretStoreError};

type SecretMap = BTreeMap<String, String>;

/// JSON document secret storage
#[derive(Debug)]
pub struct FileSecretStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within the process.
    lock: Mutex<()>,
}

impl FileSecretStore {
    /// Open (or lazily create) a store at `path`. The file is only created on
    /// the first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), lock: Mutex::new(()) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<SecretMap, SecretStoreError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(SecretMap::new()),
            Err(err) => return Err(err.into()),
        };

        if contents.trim().is_empty() {
            return Ok(SecretMap::new());
        }

        serde_json::from_str(&contents).map_err(|err| {
            warn!(path = %self.path.display(), error = %err, "secret file is not valid JSON");
            SecretStoreError::Serialization(err)
        })
    }

    fn persist(&self, secrets: &SecretMap) -> Result<(), SecretStoreError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;

        let mut tmp = NamedTempFile::new_in(&dir)?;
        serde_json::to_writer_pretty(&mut tmp, secrets)?;
        tmp.flush()?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|err| SecretStoreError::Io(err.error))?;

        debug!(path = %self.path.display(), entries = secrets.len(), "secret file written");
        Ok(())
    }
}

impl SecretStore for FileSecretStore {
    fn get_secret(&self, key: &str) -> Result<Option<String>, SecretStoreError> {
        let _guard = self.lock.lock();
        Ok(self.load()?.remove(key))
    }

    fn set_secret(&self, key: &str, value: &str) -> Result<(), SecretStoreError> {
        let _guard = self.lock.lock();
        let mut secrets = self.load()?;
        secrets.insert(key.to_string(), value.to_string());
        self.persist(&secrets)
    }

    fn delete_secret(&self, key: &str) -> Result<(), SecretStoreError> {
        let _guard = self.lock.lock();
        let mut secrets = self.load()?;
        if secrets.remove(key).is_none() {
            return Ok(());
        }
        self.persist(&secrets)
    }
}
