//! Domain constants
//!
//! Key names and endpoint defaults shared between the client and its storage.

/// Storage key holding the current access token.
pub const ACCESS_TOKEN_KEY: &str = "debtwise.access_token";
/// Storage key holding the current refresh token.
pub const REFRESH_TOKEN_KEY: &str = "debtwise.refresh_token";

/// Keychain service name used when none is configured.
pub const DEFAULT_SERVICE_NAME: &str = "Debtwise";

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_REFRESH_PATH: &str = "/api/auth/token/refresh/";
pub const DEFAULT_LOGIN_PATH: &str = "/api/auth/login/";
pub const DEFAULT_REGISTER_PATH: &str = "/api/auth/register/";
pub const DEFAULT_LOGOUT_PATH: &str = "/api/auth/logout/";

pub const DEFAULT_AUTH_HEADER: &str = "Authorization";
pub const DEFAULT_AUTH_SCHEME: &str = "Bearer";

pub const DEFAULT_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_BASE_DELAY_MS: u64 = 1_000;
pub const DEFAULT_LOG_FILTER: &str = "info";
