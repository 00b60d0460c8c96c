//! Session refresh behavior on HTTP 401.
//!
//! # Invariants
//! - A 401 with session auth clears the token, logs in again and re-issues
//!   the request exactly once
//! - A second 401, or any 401 with API token auth, yields `LoginRequired`
//!   and publishes `AuthEvent::LoginRequired`
//! - Concurrent 401s on the same token trigger a single re-login

mod common;

use std::sync::atomic::Ordering;

use common::*;
use tower_client::{AuthEvent, ClientError};
use wiremock::matchers::{header, method, path};

#[tokio::test]
async fn test_retry_on_401_session_auth() {
    let mock_server = MockServer::start().await;
    let logins = mount_login(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/api/connections"))
        .and(header("Authorization", "Bearer session-1"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "message": "Session expired"
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/connections"))
        .and(header("Authorization", "Bearer session-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"id": "c1", "name": "Main store", "type": "shopify"}
        ])))
        .mount(&mock_server)
        .await;

    let client = session_client(&mock_server);
    let mut events = client.subscribe();

    let connections = client.list_connections().await.unwrap();

    assert_eq!(connections.len(), 1);
    assert_eq!(logins.load(Ordering::SeqCst), 2);
    assert_eq!(hits(&mock_server, "GET", "/api/connections").await, 2);
    assert_eq!(events.try_recv().unwrap(), AuthEvent::SessionRefreshed);
}

#[tokio::test]
async fn test_second_401_requires_login() {
    let mock_server = MockServer::start().await;
    let logins = mount_login(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/api/connections"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&mock_server)
        .await;

    let client = session_client(&mock_server);
    let mut events = client.subscribe();

    let err = client.list_connections().await.unwrap_err();

    assert!(matches!(err, ClientError::LoginRequired));
    assert_eq!(logins.load(Ordering::SeqCst), 2);
    assert_eq!(hits(&mock_server, "GET", "/api/connections").await, 2);
    assert_eq!(events.try_recv().unwrap(), AuthEvent::SessionRefreshed);
    assert_eq!(events.try_recv().unwrap(), AuthEvent::LoginRequired);
}

#[tokio::test]
async fn test_no_retry_on_401_api_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/connections"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "message": "Invalid token"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = api_token_client(&mock_server, "invalid-token");
    let mut events = client.subscribe();

    let err = client.list_connections().await.unwrap_err();

    assert!(matches!(err, ClientError::LoginRequired));
    assert!(err.is_auth_error());
    assert_eq!(events.try_recv().unwrap(), AuthEvent::LoginRequired);
}

#[tokio::test]
async fn test_rejected_credentials_on_refresh_require_login() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "token": "session-1"
        })))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "message": "Password changed"
        })))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/connection-types"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&mock_server)
        .await;

    let client = session_client(&mock_server);
    let err = client.list_connection_types().await.unwrap_err();

    assert!(matches!(err, ClientError::LoginRequired));
    assert_eq!(hits(&mock_server, "GET", "/api/connection-types").await, 1);
}

#[tokio::test]
async fn test_initial_login_failure_is_auth_failed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "error": "Bad credentials"
        })))
        .mount(&mock_server)
        .await;

    let client = session_client(&mock_server);
    let err = client.login().await.unwrap_err();

    match err {
        ClientError::AuthFailed(message) => assert_eq!(message, "Bad credentials"),
        other => panic!("expected AuthFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn test_login_response_without_token_is_invalid() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .mount(&mock_server)
        .await;

    let client = session_client(&mock_server);
    assert!(matches!(
        client.login().await.unwrap_err(),
        ClientError::InvalidResponse(_)
    ));
}

#[tokio::test]
async fn test_concurrent_401s_share_one_relogin() {
    let mock_server = MockServer::start().await;
    let logins = mount_login(&mock_server).await;

    for route in ["/api/connections", "/api/connection-types"] {
        Mock::given(method("GET"))
            .and(path(route))
            .and(header("Authorization", "Bearer session-1"))
            .respond_with(
                ResponseTemplate::new(401).set_delay(std::time::Duration::from_millis(50)),
            )
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path(route))
            .and(header("Authorization", "Bearer session-2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&mock_server)
            .await;
    }

    let client = session_client(&mock_server);
    client.login().await.unwrap();

    let (connections, types) =
        tokio::join!(client.list_connections(), client.list_connection_types());

    assert!(connections.unwrap().is_empty());
    assert!(types.unwrap().is_empty());
    assert_eq!(logins.load(Ordering::SeqCst), 2);
}
