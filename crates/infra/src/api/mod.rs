//! Debtwise backend API client
//!
//! Layers, leaves first:
//!
//! - [`credentials`]: token persistence over a `SecretStore`
//! - [`tokens`] and [`normalizer`]: pure functions from a response to an
//!   `Outcome` plus any embedded tokens
//! - [`auth`]: header attachment, the refresh exchange, token absorption
//! - [`client`]: orchestration with retry and one refresh-and-replay cycle

pub mod auth;
pub mod client;
pub mod credentials;
pub mod errors;
pub mod normalizer;
pub mod tokens;

pub use auth::{MissingToken, TokenManager};
pub use client::{ApiClient, ApiClientBuilder};
pub use credentials::CredentialStore;
pub use errors::ApiError;
pub use normalizer::{normalize, Normalized};
pub use tokens::{extract_refreshed, extract_tokens};
