//! Integration tests for configuration loader
//!
//! Tests the end-to-end behavior of loading configuration from files and
//! wiring a client from it.

use std::io::Write;

use debtwise_domain::StorageBackend;
use debtwise_infra::{config, ApiClient};
use tempfile::{NamedTempFile, TempDir};

#[test]
fn test_load_config_from_json_file() {
    let json_content = r#"{
        "api": {
            "base_url": "https://api.debtwise.app",
            "timeout_seconds": 20,
            "auth_header_name": "Authorization",
            "auth_scheme": "Token"
        },
        "retry": {
            "max_attempts": 2,
            "base_delay_ms": 750
        },
        "storage": {
            "backend": "file",
            "service_name": "DebtwiseStaging",
            "file_path": "/tmp/debtwise/tokens.json"
        },
        "logging": {
            "filter": "warn",
            "json": true
        }
    }"#;

    let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
    temp_file.write_all(json_content.as_bytes()).expect("Failed to write to temp file");

    let path = temp_file.path().with_extension("json");
    std::fs::copy(temp_file.path(), &path).expect("Failed to copy file");

    let result = config::load_from_file(Some(path.clone()));
    std::fs::remove_file(&path).ok();

    let config = result.expect("Failed to load config from JSON file");

    assert_eq!(config.api.base_url, "https://api.debtwise.app");
    assert_eq!(config.api.timeout_seconds, 20);
    assert_eq!(config.api.auth_scheme, "Token");
    assert_eq!(config.retry.max_attempts, 2);
    assert_eq!(config.retry.base_delay_ms, 750);
    assert_eq!(config.storage.backend, StorageBackend::File);
    assert_eq!(config.storage.service_name, "DebtwiseStaging");
    assert!(config.logging.json);
}

#[test]
fn test_load_config_from_toml_file() {
    let toml_content = r#"
[api]
base_url = "http://10.0.2.2:8000"

[storage]
backend = "memory"
"#;

    let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
    temp_file.write_all(toml_content.as_bytes()).expect("Failed to write to temp file");

    let path = temp_file.path().with_extension("toml");
    std::fs::copy(temp_file.path(), &path).expect("Failed to copy file");

    let result = config::load_from_file(Some(path.clone()));
    std::fs::remove_file(&path).ok();

    let config = result.expect("Failed to load config from TOML file");

    assert_eq!(config.api.base_url, "http://10.0.2.2:8000");
    assert_eq!(config.api.refresh_path, "/api/auth/token/refresh/");
    assert_eq!(config.retry.max_attempts, 3);
    assert_eq!(config.storage.backend, StorageBackend::Memory);
}

#[test]
fn test_client_from_loaded_config() {
    let dir = TempDir::new().expect("tempdir");
    let token_path = dir.path().join("tokens.json");
    let config_path = dir.path().join("debtwise.toml");

    std::fs::write(
        &config_path,
        format!(
            "[api]\nbase_url = \"http://127.0.0.1:9\"\n\n[storage]\nbackend = \"file\"\nfile_path = {:?}\n",
            token_path.display().to_string()
        ),
    )
    .expect("write config");

    let config = config::load_from_file(Some(config_path)).expect("config");
    let client = ApiClient::from_config(&config).expect("client");

    assert!(!client.is_authenticated());
    assert_eq!(client.config().base_url, "http://127.0.0.1:9");
}

#[test]
fn test_file_backend_without_path_is_rejected() {
    let dir = TempDir::new().expect("tempdir");
    let config_path = dir.path().join("config.json");
    std::fs::write(&config_path, r#"{"storage": {"backend": "file"}}"#).expect("write config");

    let config = config::load_from_file(Some(config_path)).expect("config");

    assert!(ApiClient::from_config(&config).is_err());
}
