//! HTTP transport
//!
//! A single `send` operation behind the [`HttpTransport`] trait. Retries,
//! authentication and response interpretation live above this layer.

pub mod client;
pub mod errors;

pub use client::{
    HttpTransport, ReqwestTransport, ReqwestTransportBuilder, TransportRequest, TransportResponse,
};
pub use errors::TransportError;
