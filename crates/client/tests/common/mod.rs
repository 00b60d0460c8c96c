//! Common test utilities for integration tests.
//!
//! Re-exports the wiremock types every test uses and builds clients pointed
//! at a mock server.
//!
//! # What this does NOT handle
//! - Mock setup for specific endpoints (each test mounts its own)

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use secrecy::SecretString;
use tower_client::{AuthStrategy, TowerClient};
use wiremock::matchers::{method, path};

pub use wiremock::{Mock, MockServer, ResponseTemplate};

/// Client authenticating with a static API token.
pub fn api_token_client(server: &MockServer, token: &str) -> TowerClient {
    TowerClient::builder()
        .base_url(server.uri())
        .auth_strategy(AuthStrategy::ApiToken {
            token: SecretString::new(token.to_string().into()),
        })
        .max_retries(0)
        .build()
        .unwrap()
}

/// Client authenticating with username and password.
pub fn session_client(server: &MockServer) -> TowerClient {
    TowerClient::builder()
        .base_url(server.uri())
        .auth_strategy(AuthStrategy::SessionToken {
            username: "admin".to_string(),
            password: SecretString::new("testpassword".to_string().into()),
        })
        .max_retries(0)
        .build()
        .unwrap()
}

/// Mount a login endpoint handing out `session-1`, `session-2`, ...
///
/// Returns the number of logins served so far.
pub async fn mount_login(server: &MockServer) -> Arc<AtomicUsize> {
    let logins = Arc::new(AtomicUsize::new(0));
    let counter = logins.clone();
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(move |_: &wiremock::Request| {
            let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
            ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "token": format!("session-{n}")
            }))
        })
        .mount(server)
        .await;
    logins
}

/// Number of requests the server saw for `route`.
pub async fn hits(server: &MockServer, http_method: &str, route: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.method.as_str() == http_method && r.url.path() == route)
        .count()
}

pub fn schema_body() -> serde_json::Value {
    serde_json::json!({
        "sourceFields": {"price": "19.99", "product_name": "Desk"},
        "targetFields": {"price": 0.0, "name": "", "sku": ""},
        "mappings": [
            {"sourcePath": "price", "targetPath": "price", "transform": "parseFloat"}
        ]
    })
}
