//! Tracing subscriber bootstrap

use debtwise_domain::{DebtwiseError, LoggingConfig, Result};
use tracing_subscriber::EnvFilter;

/// Install the global `fmt` subscriber.
///
/// `RUST_LOG` takes precedence over `config.filter`. Call once at startup.
///
/// # Errors
/// Returns `DebtwiseError::Config` when the filter does not parse or a global
/// subscriber is already installed.
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    let filter = build_filter(config)?;

    let installed = if config.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .json()
            .try_init()
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).with_target(true).try_init()
    };

    installed.map_err(|e| DebtwiseError::Config(format!("Failed to install tracing subscriber: {e}")))
}

fn build_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    EnvFilter::try_from_default_env().or_else(|_| {
        EnvFilter::try_new(&config.filter).map_err(|e| {
            DebtwiseError::Config(format!("Invalid log filter '{}': {}", config.filter, e))
        })
    })
}
