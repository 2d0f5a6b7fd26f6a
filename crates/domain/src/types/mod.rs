//! Domain types and models

pub mod credentials;
pub mod outcome;
pub mod request;

pub use credentials::{Credentials, TokenPair};
pub use outcome::{ErrorKind, Failure, FieldErrors, Outcome};
pub use request::{HttpMethod, RequestSpec};
