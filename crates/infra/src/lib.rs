//! # Debtwise Infrastructure
//!
//! The impure half of the Debtwise client core.
//!
//! This crate contains:
//! - The HTTP transport and its failure taxonomy
//! - Response normalization and embedded token extraction
//! - Token lifecycle management and credential persistence
//! - The resilient API client
//! - Configuration loading and logging bootstrap
//!
//! ## Architecture
//! - Domain types come from `debtwise-domain`
//! - Retry and secret storage come from `debtwise-common`
//! - Contains all I/O: network, keychain, filesystem

pub mod api;
pub mod config;
pub mod http;
pub mod logging;

// Re-export commonly used items
pub use api::{ApiClient, ApiClientBuilder, ApiError, CredentialStore, TokenManager};
pub use http::{HttpTransport, ReqwestTransport, TransportError, TransportRequest, TransportResponse};
pub use logging::init_tracing;
