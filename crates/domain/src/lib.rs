//! # Debtwise Domain
//!
//! Data types shared by every Debtwise client crate.
//!
//! This crate contains:
//! - The uniform request result contract (`Outcome`, `ErrorKind`)
//! - Credential and token types
//! - Request descriptions (`RequestSpec`)
//! - Configuration structures and domain errors
//!
//! ## Architecture
//! - No dependencies on other Debtwise crates
//! - No I/O; pure data and small pure helpers

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
