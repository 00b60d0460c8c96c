//! Authentication endpoints.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::endpoints::send_request_with_retry;
use crate::error::{ClientError, Result};

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    token: Option<String>,
}

/// Log in with username and password and return the session token.
///
/// # Errors
///
/// Returns [`ClientError::AuthFailed`] when the server rejects the
/// credentials and [`ClientError::InvalidResponse`] when no token comes back.
pub async fn login(
    client: &Client,
    base_url: &str,
    username: &str,
    password: &str,
    max_retries: usize,
) -> Result<String> {
    debug!("Logging in to Tower as {}", username);

    let url = format!("{}/api/auth/login", base_url);
    let builder = client
        .post(&url)
        .json(&LoginRequest { username, password });

    let response = match send_request_with_retry(builder, max_retries).await {
        Ok(response) => response,
        Err(ClientError::ApiError { status, message, .. }) if status == 401 || status == 403 => {
            return Err(ClientError::AuthFailed(message));
        }
        Err(e) => return Err(e),
    };

    let body: LoginResponse = response.json().await?;
    body.token
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ClientError::InvalidResponse("Missing token in login response".to_string()))
}
