//! Token lifecycle
//!
//! Decides whether a request gets an authorization header, runs the refresh
//! exchange, and absorbs tokens embedded in responses. Storage failures are
//! logged and degrade to "no credentials": losing a token only forces a new
//! login.

use std::sync::Arc;

use debtwise_domain::{ApiConfig, Credentials, HttpMethod, RequestSpec, TokenPair};
use serde_json::json;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use super::credentials::CredentialStore;
use super::normalizer::parse_body;
use super::tokens::extract_refreshed;
use crate::http::{HttpTransport, TransportRequest};

/// An authenticated request was attempted with no access token stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no access token stored")]
pub struct MissingToken;

/// Owns every read and write of the session tokens.
pub struct TokenManager {
    store: CredentialStore,
    transport: Arc<dyn HttpTransport>,
    api: ApiConfig,
}

impl TokenManager {
    pub fn new(store: CredentialStore, transport: Arc<dyn HttpTransport>, api: ApiConfig) -> Self {
        Self { store, transport, api }
    }

    /// Headers to attach to `spec`. Public requests get none.
    ///
    /// # Errors
    /// Returns [`MissingToken`] when the request needs auth and no access
    /// token is stored.
    pub fn attach_if_needed(&self, spec: &RequestSpec) -> Result<Vec<(String, String)>, MissingToken> {
        if !spec.requires_auth() {
            return Ok(Vec::new());
        }

        let access = self.credentials().access_token.ok_or(MissingToken)?;
        Ok(vec![(self.api.auth_header_name.clone(), format!("{} {access}", self.api.auth_scheme))])
    }

    /// Exchange the stored refresh token for a new access token.
    ///
    /// Fails closed: any failure clears both tokens. The exchange is a single
    /// attempt with no retries.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> bool {
        let Some(refresh_token) = self.credentials().refresh_token else {
            warn!("no refresh token stored; clearing session");
            self.clear();
            return false;
        };

        let request = TransportRequest::new(HttpMethod::Post, self.api.url_for(&self.api.refresh_path))
            .with_body(json!({ "refresh": refresh_token }));

        let response = match self.transport.send(&request).await {
            Ok(response) => response,
            Err(err) => {
                warn!(error = %err, "token refresh request failed");
                self.clear();
                return false;
            }
        };

        if !(200..300).contains(&response.status) {
            warn!(status = response.status, "token refresh rejected");
            self.clear();
            return false;
        }

        let tokens = parse_body(&response.body).ok().as_ref().and_then(extract_refreshed);

        match tokens {
            Some(tokens) => {
                let rotated = tokens.refresh.is_some();
                self.absorb(tokens);
                info!(rotated, "access token refreshed");
                true
            }
            None => {
                warn!(status = response.status, "token refresh response carried no access token");
                self.clear();
                false
            }
        }
    }

    /// Persist tokens found in a response, keeping the stored refresh token
    /// when the pair does not rotate it.
    pub fn absorb(&self, tokens: TokenPair) {
        let merged = tokens.merge_into(self.credentials());
        match self.store.save(&merged) {
            Ok(()) => debug!("session tokens updated"),
            Err(err) => warn!(error = %err, "failed to persist session tokens"),
        }
    }

    pub fn clear(&self) {
        if let Err(err) = self.store.clear() {
            warn!(error = %err, "failed to clear session tokens");
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.credentials().access_token.is_some()
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.credentials().refresh_token
    }

    fn credentials(&self) -> Credentials {
        self.store.get().unwrap_or_else(|err| {
            warn!(error = %err, "failed to read session tokens; treating as signed out");
            Credentials::empty()
        })
    }
}
