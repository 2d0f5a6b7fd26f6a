//! Configuration management

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_AUTH_HEADER, DEFAULT_AUTH_SCHEME, DEFAULT_BASE_DELAY_MS, DEFAULT_BASE_URL,
    DEFAULT_LOGIN_PATH, DEFAULT_LOGOUT_PATH, DEFAULT_LOG_FILTER, DEFAULT_MAX_ATTEMPTS,
    DEFAULT_REFRESH_PATH, DEFAULT_REGISTER_PATH, DEFAULT_SERVICE_NAME, DEFAULT_TIMEOUT_SECS,
};

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub retry: RetryConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

/// Backend API configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL every request path is appended to.
    pub base_url: String,
    pub timeout_seconds: u64,
    /// Header carrying the access token on authenticated requests.
    pub auth_header_name: String,
    /// Prefix placed before the token in the auth header value.
    pub auth_scheme: String,
    pub refresh_path: String,
    pub login_path: String,
    pub register_path: String,
    pub logout_path: String,
}

impl ApiConfig {
    /// Request timeout as a `Duration`.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Join the base URL and a request path without doubling the slash.
    pub fn url_for(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        if path.starts_with('/') {
            format!("{base}{path}")
        } else {
            format!("{base}/{path}")
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
            auth_header_name: DEFAULT_AUTH_HEADER.to_string(),
            auth_scheme: DEFAULT_AUTH_SCHEME.to_string(),
            refresh_path: DEFAULT_REFRESH_PATH.to_string(),
            login_path: DEFAULT_LOGIN_PATH.to_string(),
            register_path: DEFAULT_REGISTER_PATH.to_string(),
            logout_path: DEFAULT_LOGOUT_PATH.to_string(),
        }
    }
}

/// Retry configuration for transient transport failures
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Total attempts including the first one.
    pub max_attempts: u32,
    /// Linear backoff unit: the gap after attempt `n` is `n * base_delay_ms`.
    pub base_delay_ms: u64,
}

impl RetryConfig {
    pub fn base_delay(&self) -> Duration {
        Duration::from_millis(self.base_delay_ms)
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self { max_attempts: DEFAULT_MAX_ATTEMPTS, base_delay_ms: DEFAULT_BASE_DELAY_MS }
    }
}

/// Where credentials are persisted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    /// Platform keychain (macOS Keychain, Windows Credential Manager, Secret
    /// Service).
    #[default]
    Keychain,
    /// JSON document on disk at `StorageConfig::file_path`.
    File,
    /// Process-local map; tokens are lost on exit.
    Memory,
}

/// Credential storage configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub service_name: String,
    pub file_path: Option<String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            service_name: DEFAULT_SERVICE_NAME.to_string(),
            file_path: None,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, overridden by `RUST_LOG` when set.
    pub filter: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { filter: DEFAULT_LOG_FILTER.to_string(), json: false }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_for_joins_without_duplicate_slashes() {
        let api = ApiConfig { base_url: "https://api.debtwise.app/".into(), ..Default::default() };

        assert_eq!(api.url_for("/debts/"), "https://api.debtwise.app/debts/");
        assert_eq!(api.url_for("contacts/"), "https://api.debtwise.app/contacts/");
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let config: Config = toml::from_str(
            r#"
[api]
base_url = "https://api.debtwise.app"

[retry]
max_attempts = 5
"#,
        )
        .unwrap();

        assert_eq!(config.api.base_url, "https://api.debtwise.app");
        assert_eq!(config.api.auth_header_name, "Authorization");
        assert_eq!(config.retry.max_attempts, 5);
        assert_eq!(config.retry.base_delay_ms, DEFAULT_BASE_DELAY_MS);
        assert_eq!(config.storage.backend, StorageBackend::Keychain);
        assert!(!config.logging.json);
    }

    #[test]
    fn storage_backend_uses_snake_case_names() {
        let backend: StorageBackend = serde_json::from_str("\"file\"").unwrap();
        assert_eq!(backend, StorageBackend::File);
    }
}
