//! Integration tests for the API client against a live mock backend
//!
//! Drives `ApiClient` through the real `ReqwestTransport` and asserts on
//! request counts recorded by wiremock.

use std::sync::Arc;
use std::time::Duration;

use debtwise_common::resilience::RetryPolicy;
use debtwise_common::security::{MemorySecretStore, SecretStore};
use debtwise_domain::{ApiConfig, ErrorKind, Outcome, RequestSpec};
use debtwise_infra::{ApiClient, ReqwestTransport};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ACCESS: &str = "debtwise.access_token";
const REFRESH: &str = "debtwise.refresh_token";

fn client_for(server: &MockServer, secrets: Arc<MemorySecretStore>) -> ApiClient {
    let config = ApiConfig { base_url: server.uri(), ..Default::default() };
    let transport = ReqwestTransport::builder()
        .timeout(Duration::from_secs(5))
        .build()
        .expect("transport");

    ApiClient::builder()
        .config(config)
        .transport(Arc::new(transport))
        .secret_store(secrets)
        .retry_policy(RetryPolicy::new(3, Duration::from_millis(10)).expect("policy"))
        .build()
        .expect("client")
}

fn signed_in(access: &str, refresh: &str) -> Arc<MemorySecretStore> {
    let secrets = Arc::new(MemorySecretStore::new());
    secrets.set_secret(ACCESS, access).expect("seed access");
    secrets.set_secret(REFRESH, refresh).expect("seed refresh");
    secrets
}

/// Expired access token: exactly one refresh call and one replay.
#[tokio::test]
async fn test_expired_token_refreshes_and_replays_once() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/debts/"))
        .and(header("authorization", "Bearer expired"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"detail": "expired"})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/auth/token/refresh/"))
        .and(body_json(json!({"refresh": "refresh-1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access": "fresh"})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/debts/"))
        .and(header("authorization", "Bearer fresh"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{"id": 1}, {"id": 2}])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let secrets = signed_in("expired", "refresh-1");
    let client = client_for(&server, secrets.clone());

    let outcome = client.get("/api/debts/").await;

    assert_eq!(outcome, Outcome::success(json!([{"id": 1}, {"id": 2}]), 200));
    assert_eq!(secrets.get_secret(ACCESS).unwrap().as_deref(), Some("fresh"));
    assert_eq!(secrets.get_secret(REFRESH).unwrap().as_deref(), Some("refresh-1"));
}

/// A replay that is still rejected is not refreshed again.
#[tokio::test]
async fn test_second_401_requires_login() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/profile/"))
        .respond_with(ResponseTemplate::new(401))
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/auth/token/refresh/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"access": "A2", "refresh": "R2"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let secrets = signed_in("A1", "R1");
    let client = client_for(&server, secrets.clone());

    let outcome = client.get("/api/profile/").await;

    assert!(outcome.is_unauthorized());
    assert!(outcome.needs_login());
    assert!(secrets.is_empty());
}

/// Embedded tokens under `data.tokens` are stored and `data` is the payload.
#[tokio::test]
async fn test_login_persists_nested_tokens() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login/"))
        .and(body_json(json!({"username": "ada", "password": "pw"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"tokens": {"access": "A1", "refresh": "R1"}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let secrets = Arc::new(MemorySecretStore::new());
    let client = client_for(&server, secrets.clone());

    let outcome = client.login("ada", "pw").await;

    assert_eq!(
        outcome,
        Outcome::success(json!({"tokens": {"access": "A1", "refresh": "R1"}}), 200)
    );
    assert_eq!(secrets.get_secret(ACCESS).unwrap().as_deref(), Some("A1"));
    assert_eq!(secrets.get_secret(REFRESH).unwrap().as_deref(), Some("R1"));
    assert!(client.is_authenticated());
}

/// 429 is surfaced immediately with the fixed message.
#[tokio::test]
async fn test_rate_limit_is_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/contacts/"))
        .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, signed_in("A", "R"));

    let outcome = client.get("/api/contacts/").await;

    match outcome {
        Outcome::Failure(failure) => {
            assert_eq!(failure.kind, ErrorKind::RateLimited);
            assert_eq!(failure.message, ErrorKind::RateLimited.default_message());
            assert_eq!(failure.status_code, Some(429));
        }
        other => panic!("expected rate limit failure, got {other:?}"),
    }
}

/// Validation errors carry field-level detail and are never retried.
#[tokio::test]
async fn test_validation_errors_surface_fields() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/payments/"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "message": "Invalid payment",
            "errors": {"amount": ["must be positive"]}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, signed_in("A", "R"));

    let failure = client
        .post("/api/payments/", &json!({"amount": -5}))
        .await
        .into_result()
        .expect_err("validation failure");

    assert_eq!(failure.kind, ErrorKind::Validation);
    assert_eq!(failure.message, "Invalid payment");
    assert_eq!(failure.field_errors.unwrap()["amount"], vec!["must be positive"]);
}

/// A body that is not valid UTF-8 is malformed, even on a 200.
#[tokio::test]
async fn test_invalid_utf8_body_is_malformed() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/profile/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(b"{\"name\":\"\xff\xfe\"}".to_vec(), "application/json"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, signed_in("A", "R"));

    let outcome = client.get("/api/profile/").await;

    assert_eq!(outcome.kind(), Some(ErrorKind::MalformedResponse));
    assert_eq!(outcome.status_code(), Some(200));
}

/// Public requests carry no authorization header.
#[tokio::test]
async fn test_public_request_has_no_auth_header() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/register/"))
        .respond_with(|req: &wiremock::Request| {
            if req.headers.contains_key("authorization") {
                ResponseTemplate::new(400)
            } else {
                ResponseTemplate::new(201).set_body_json(json!({"id": 5}))
            }
        })
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, signed_in("A", "R"));

    let outcome = client.register(&json!({"email": "ada@example.com", "password": "pw"})).await;

    assert_eq!(outcome, Outcome::success(json!({"id": 5}), 201));
}

/// Concurrent calls through one shared client.
#[tokio::test(flavor = "multi_thread")]
async fn test_shared_client_serves_concurrent_calls() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"ok": true}})))
        .expect(8)
        .mount(&server)
        .await;

    let client = Arc::new(client_for(&server, signed_in("A", "R")));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let client = Arc::clone(&client);
            tokio::spawn(async move { client.call(RequestSpec::get(format!("/api/debts/{i}/"))).await })
        })
        .collect();

    for handle in handles {
        let outcome = handle.await.expect("task");
        assert_eq!(outcome, Outcome::success(json!({"ok": true}), 200));
    }
}

/// Nothing listening: retried, then reported as network unavailable.
#[tokio::test]
async fn test_unreachable_backend_is_network_unavailable() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let config = ApiConfig { base_url: format!("http://{addr}"), ..Default::default() };
    let client = ApiClient::builder()
        .config(config)
        .secret_store(signed_in("A", "R"))
        .retry_policy(RetryPolicy::new(2, Duration::from_millis(5)).expect("policy"))
        .build()
        .expect("client");

    let outcome = client.get("/api/debts/").await;

    assert_eq!(outcome.kind(), Some(ErrorKind::NetworkUnavailable));
    assert_eq!(outcome.status_code(), None);
}
