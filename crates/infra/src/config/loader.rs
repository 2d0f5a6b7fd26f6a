//! Where a [`Config`] comes from.
//!
//! [`load`] tries the process environment first and falls back to a config
//! file when `DEBTWISE_API_BASE_URL` is unset.
//!
//! | Variable                       | Field                   |
//! |--------------------------------|-------------------------|
//! | `DEBTWISE_API_BASE_URL`        | `api.base_url` (required) |
//! | `DEBTWISE_API_TIMEOUT`         | `api.timeout_seconds`   |
//! | `DEBTWISE_AUTH_HEADER`         | `api.auth_header_name`  |
//! | `DEBTWISE_RETRY_MAX_ATTEMPTS`  | `retry.max_attempts`    |
//! | `DEBTWISE_RETRY_BASE_DELAY_MS` | `retry.base_delay_ms`   |
//! | `DEBTWISE_STORAGE_BACKEND`     | `storage.backend`       |
//! | `DEBTWISE_STORAGE_PATH`        | `storage.file_path`     |
//! | `DEBTWISE_LOG_FILTER`          | `logging.filter`        |
//! | `DEBTWISE_LOG_JSON`            | `logging.json`          |
//!
//! Files are JSON or TOML, picked by extension. See [`probe_config_paths`]
//! for the search order.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use debtwise_domain::{Config, DebtwiseError, Result, StorageBackend};

const FILE_NAMES: [&str; 4] = ["config.json", "config.toml", "debtwise.json", "debtwise.toml"];

/// Environment first, then the first config file found on disk.
///
/// # Errors
/// Returns `DebtwiseError::Config` when neither source yields a valid
/// configuration.
pub fn load() -> Result<Config> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!(source = "env", "configuration loaded");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = %e, "environment incomplete, probing config files");
            load_from_file(None)
        }
    }
}

/// Build a config from `DEBTWISE_*` variables over the defaults.
///
/// # Errors
/// Returns `DebtwiseError::Config` when the base URL is unset or a variable
/// does not parse.
pub fn load_from_env() -> Result<Config> {
    let mut config = Config::default();

    config.api.base_url = required_var("DEBTWISE_API_BASE_URL")?;

    if let Some(timeout) = env_parse::<u64>("DEBTWISE_API_TIMEOUT", "timeout")? {
        config.api.timeout_seconds = timeout;
    }
    if let Ok(header) = std::env::var("DEBTWISE_AUTH_HEADER") {
        config.api.auth_header_name = header;
    }

    if let Some(attempts) = env_parse::<u32>("DEBTWISE_RETRY_MAX_ATTEMPTS", "max attempts")? {
        config.retry.max_attempts = attempts;
    }
    if let Some(delay) = env_parse::<u64>("DEBTWISE_RETRY_BASE_DELAY_MS", "base delay")? {
        config.retry.base_delay_ms = delay;
    }

    if let Ok(backend) = std::env::var("DEBTWISE_STORAGE_BACKEND") {
        config.storage.backend = parse_backend(&backend)?;
    }
    if let Ok(path) = std::env::var("DEBTWISE_STORAGE_PATH") {
        config.storage.file_path = Some(path);
    }

    if let Ok(filter) = std::env::var("DEBTWISE_LOG_FILTER") {
        config.logging.filter = filter;
    }
    config.logging.json = env_flag("DEBTWISE_LOG_JSON").unwrap_or(config.logging.json);

    Ok(config)
}

/// Read `path`, or the first probed candidate when `path` is `None`.
///
/// # Errors
/// Returns `DebtwiseError::Config` when the file is missing, unreadable, has
/// an unknown extension or does not deserialize.
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) if p.exists() => p,
        Some(p) => {
            return Err(DebtwiseError::Config(format!("Config file not found: {}", p.display())))
        }
        None => probe_config_paths()
            .ok_or_else(|| DebtwiseError::Config("No config file found".to_string()))?,
    };

    tracing::info!(source = "file", path = %config_path.display(), "loading configuration");

    let contents = std::fs::read_to_string(&config_path).map_err(|e| {
        DebtwiseError::Config(format!("Cannot read {}: {e}", config_path.display()))
    })?;

    parse_config(&contents, &config_path)
}

fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    match path.extension().and_then(|e| e.to_str()).unwrap_or("json") {
        "toml" => toml::from_str(contents)
            .map_err(|e| DebtwiseError::Config(format!("Invalid TOML config: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| DebtwiseError::Config(format!("Invalid JSON config: {e}"))),
        other => Err(DebtwiseError::Config(format!("Unsupported config format: {other}"))),
    }
}

/// First existing config file.
///
/// Looks for `config.{json,toml}` and `debtwise.{json,toml}` in the working
/// directory and its two ancestors, then in the executable's directory and
/// its two ancestors.
pub fn probe_config_paths() -> Option<PathBuf> {
    let roots = [
        std::env::current_dir().ok(),
        std::env::current_exe().ok().and_then(|exe| exe.parent().map(Path::to_path_buf)),
    ];

    roots.into_iter().flatten().flat_map(|root| candidates_in(&root)).find(|p| p.exists())
}

fn candidates_in(dir: &Path) -> Vec<PathBuf> {
    dir.ancestors()
        .take(3)
        .flat_map(|ancestor| FILE_NAMES.iter().map(move |name| ancestor.join(name)))
        .collect()
}

fn required_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| DebtwiseError::Config(format!("{key} is not set")))
}

fn env_parse<T>(key: &str, what: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let Ok(raw) = std::env::var(key) else {
        return Ok(None);
    };
    raw.trim()
        .parse::<T>()
        .map(Some)
        .map_err(|e| DebtwiseError::Config(format!("Invalid {what} in {key}: {e}")))
}

fn parse_backend(raw: &str) -> Result<StorageBackend> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "keychain" => Ok(StorageBackend::Keychain),
        "file" => Ok(StorageBackend::File),
        "memory" => Ok(StorageBackend::Memory),
        other => Err(DebtwiseError::Config(format!("Unknown storage backend: {other}"))),
    }
}

/// `1`/`true`/`yes`/`on` are true, anything else false. Unset is `None`.
fn env_flag(key: &str) -> Option<bool> {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
}
