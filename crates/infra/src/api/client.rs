//! Request orchestration
//!
//! [`ApiClient`] attaches credentials, sends through the retry executor,
//! normalizes the response and, on a 401, runs one refresh-and-replay cycle.
//! Every public operation resolves to an [`Outcome`].

use std::sync::Arc;

use debtwise_common::resilience::{RetryExecutor, RetryPolicy};
use debtwise_common::security::SecretStore;
use debtwise_domain::{ApiConfig, Config, ErrorKind, Failure, Outcome, RequestSpec};
use serde::Serialize;
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use super::auth::{MissingToken, TokenManager};
use super::credentials::CredentialStore;
use super::errors::ApiError;
use super::normalizer::normalize;
use crate::http::{HttpTransport, ReqwestTransport, TransportRequest};

/// Resilient API client, shared as `Arc<ApiClient>`.
pub struct ApiClient {
    transport: Arc<dyn HttpTransport>,
    tokens: TokenManager,
    executor: RetryExecutor,
    config: ApiConfig,
}

impl ApiClient {
    /// Create a new API client
    ///
    /// # Arguments
    ///
    /// * `config` - Endpoint configuration
    /// * `transport` - HTTP transport
    /// * `store` - Credential storage
    /// * `policy` - Retry policy for transient transport failures
    pub fn new(
        config: ApiConfig,
        transport: Arc<dyn HttpTransport>,
        store: CredentialStore,
        policy: RetryPolicy,
    ) -> Self {
        let tokens = TokenManager::new(store, transport.clone(), config.clone());
        Self { transport, tokens, executor: RetryExecutor::new(policy), config }
    }

    /// Create a builder for fluent configuration
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    /// Wire the production transport, storage backend and retry policy.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Config` for an invalid retry policy, a file backend
    /// without a path, or an HTTP client that cannot be built.
    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        let transport = ReqwestTransport::builder().timeout(config.api.timeout()).build()?;
        let store = CredentialStore::from_config(&config.storage)?;
        let policy = RetryPolicy::new(config.retry.max_attempts, config.retry.base_delay())?;

        info!(
            base_url = %config.api.base_url,
            backend = ?config.storage.backend,
            max_attempts = policy.max_attempts(),
            "API client configured"
        );

        Ok(Self::new(config.api.clone(), Arc::new(transport), store, policy))
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Execute a request, refreshing and replaying once on 401.
    #[instrument(skip(self, spec), fields(method = %spec.method(), path = %spec.path()))]
    pub async fn call(&self, spec: RequestSpec) -> Outcome {
        let first = self.attempt(&spec).await;

        if !spec.requires_auth() || !first.is_unauthorized() || first.needs_login() {
            return first;
        }

        debug!("access token rejected, refreshing");
        if !self.tokens.refresh().await {
            warn!("session refresh failed; login required");
            return require_login(first);
        }

        let replay = self.attempt(&spec).await;
        if replay.is_unauthorized() {
            warn!("replay rejected after refresh; clearing session");
            self.tokens.clear();
            return require_login(replay);
        }

        replay
    }

    /// [`call`](Self::call) that stops as soon as `cancel` fires.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Cancelled` when the token is cancelled first. The
    /// in-flight attempt, backoff and any pending replay are dropped.
    pub async fn call_with_cancellation(
        &self,
        spec: RequestSpec,
        cancel: CancellationToken,
    ) -> Result<Outcome, ApiError> {
        let path = spec.path().to_string();

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(%path, "request cancelled");
                Err(ApiError::Cancelled)
            }
            outcome = self.call(spec) => Ok(outcome),
        }
    }

    pub async fn get(&self, path: &str) -> Outcome {
        self.call(RequestSpec::get(path)).await
    }

    pub async fn post<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> Outcome {
        match to_body(body) {
            Ok(body) => self.call(RequestSpec::post(path, body)).await,
            Err(failure) => failure.into(),
        }
    }

    pub async fn put<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> Outcome {
        match to_body(body) {
            Ok(body) => self.call(RequestSpec::put(path, body)).await,
            Err(failure) => failure.into(),
        }
    }

    pub async fn patch<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> Outcome {
        match to_body(body) {
            Ok(body) => self.call(RequestSpec::patch(path, body)).await,
            Err(failure) => failure.into(),
        }
    }

    pub async fn delete(&self, path: &str) -> Outcome {
        self.call(RequestSpec::delete(path)).await
    }

    /// Sign in. Tokens in the response are stored as a side effect.
    #[instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> Outcome {
        let body = json!({ "username": username, "password": password });
        let outcome = self.call(RequestSpec::post(&self.config.login_path, body).public()).await;

        if outcome.is_success() && !self.tokens.is_authenticated() {
            warn!("login succeeded but the response carried no access token");
        }
        outcome
    }

    /// Create an account. Tokens in the response are stored as a side effect.
    #[instrument(skip_all)]
    pub async fn register<T: Serialize + ?Sized>(&self, body: &T) -> Outcome {
        match to_body(body) {
            Ok(body) => {
                self.call(RequestSpec::post(&self.config.register_path, body).public()).await
            }
            Err(failure) => failure.into(),
        }
    }

    /// Best-effort server-side logout. Local credentials are cleared whatever
    /// the server answers.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Outcome {
        let body = match self.tokens.refresh_token() {
            Some(refresh) => json!({ "refresh": refresh }),
            None => json!({}),
        };

        let outcome = self.attempt(&RequestSpec::post(&self.config.logout_path, body)).await;
        self.tokens.clear();

        info!(server_acknowledged = outcome.is_success(), "logged out");
        outcome
    }

    pub fn is_authenticated(&self) -> bool {
        self.tokens.is_authenticated()
    }

    /// One pass of attach, send with retry, normalize, absorb tokens.
    async fn attempt(&self, spec: &RequestSpec) -> Outcome {
        let headers = match self.tokens.attach_if_needed(spec) {
            Ok(headers) => headers,
            Err(MissingToken) => {
                debug!("no access token stored, skipping request");
                return Failure::new(ErrorKind::Unauthorized).requiring_login().into();
            }
        };

        let request = TransportRequest {
            method: spec.method(),
            url: self.config.url_for(spec.path()),
            headers,
            body: spec.body().cloned(),
        };

        let outcome = self.executor.execute_with_outcome(|| self.transport.send(&request)).await;
        let response = match outcome.result {
            Ok(response) => response,
            Err(err) => {
                warn!(attempts = outcome.attempts, error = %err, "request failed without a response");
                return err.into_failure().into();
            }
        };

        let normalized = normalize(response.status, &response.body);
        if let Some(tokens) = normalized.tokens {
            self.tokens.absorb(tokens);
        }

        if let Outcome::Failure(failure) = &normalized.outcome {
            debug!(kind = failure.kind.as_str(), status = ?failure.status_code, "request failed");
        }

        normalized.outcome
    }
}

fn require_login(outcome: Outcome) -> Outcome {
    match outcome {
        Outcome::Failure(failure) => failure.requiring_login().into(),
        success => success,
    }
}

fn to_body<T: Serialize + ?Sized>(body: &T) -> Result<Value, Failure> {
    serde_json::to_value(body).map_err(|err| {
        Failure::new(ErrorKind::Unknown).with_message(format!("Failed to serialize body: {err}"))
    })
}

/// Builder for API client
#[derive(Default)]
pub struct ApiClientBuilder {
    config: Option<ApiConfig>,
    transport: Option<Arc<dyn HttpTransport>>,
    store: Option<Arc<dyn SecretStore>>,
    policy: Option<RetryPolicy>,
}

impl ApiClientBuilder {
    /// Set the endpoint configuration
    pub fn config(mut self, config: ApiConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Use a specific transport instead of `ReqwestTransport`
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Set the secret storage backend
    pub fn secret_store(mut self, store: Arc<dyn SecretStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = Some(policy);
        self
    }

    /// Build the API client
    ///
    /// # Errors
    ///
    /// Returns error if the secret store is missing or the default transport
    /// cannot be created
    pub fn build(self) -> Result<ApiClient, ApiError> {
        let config = self.config.unwrap_or_default();
        let store =
            self.store.ok_or_else(|| ApiError::Config("Secret store not set".to_string()))?;

        let transport: Arc<dyn HttpTransport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::builder().timeout(config.timeout()).build()?),
        };

        Ok(ApiClient::new(
            config,
            transport,
            CredentialStore::new(store),
            self.policy.unwrap_or_default(),
        ))
    }
}
