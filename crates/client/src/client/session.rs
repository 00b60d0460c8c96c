//! Client-level session handling and the 401 refresh-and-retry.
//!
//! # What this module does NOT handle:
//! - Token storage (handled by [`SessionManager`] in `auth.rs`)
//! - The login HTTP call itself (handled by [`endpoints::login`])
//!
//! # Invariants
//! - API token authentication never triggers login.
//! - Logins are serialized behind the session lock; concurrent 401s on the
//!   same token cause a single re-login.
//! - A request is re-issued at most once after a 401.
//! - Giving up publishes [`AuthEvent::LoginRequired`] and returns
//!   [`ClientError::LoginRequired`].

use secrecy::ExposeSecret;
use serde_json::Value;
use tracing::{debug, info};

use crate::auth::{AuthEvent, AuthStrategy, SessionManager};
use crate::client::TowerClient;
use crate::endpoints::{self, ApiRequest};
use crate::error::{ClientError, Result};

const UNAUTHORIZED: u16 = 401;

impl TowerClient {
    /// Check if the client is using API token authentication.
    pub fn is_api_token_auth(&self) -> bool {
        self.api_token_auth
    }

    /// Log in with the configured username and password.
    ///
    /// Calls made without a session log in on demand, so this is only
    /// needed to check credentials up front.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::AuthFailed`] for API token auth or rejected credentials.
    pub async fn login(&self) -> Result<()> {
        let mut session = self.session.lock().await;
        self.login_locked(&mut session).await.map(|_| ())
    }

    /// Drop the session token so the next call logs in again.
    pub async fn logout(&self) {
        self.session.lock().await.clear_session();
    }

    /// Get the current bearer token, logging in if there is no session yet.
    pub(crate) async fn get_auth_token(&self) -> Result<String> {
        let mut session = self.session.lock().await;
        if let Some(token) = session.get_bearer_token() {
            return Ok(token.to_string());
        }
        self.login_locked(&mut session).await
    }

    async fn login_locked(&self, session: &mut SessionManager) -> Result<String> {
        let AuthStrategy::SessionToken { username, password } = session.strategy().clone() else {
            return Err(ClientError::AuthFailed(
                "Cannot login with API token auth strategy".to_string(),
            ));
        };

        let token = endpoints::login(
            &self.http,
            &self.base_url,
            &username,
            password.expose_secret(),
            self.max_retries,
        )
        .await?;
        session.set_session_token(token.clone());
        info!(username = %username, "Logged in to Tower");
        Ok(token)
    }

    /// Replace a rejected session token.
    ///
    /// Returns the token to retry with and whether this call logged in. When
    /// another task already replaced `rejected`, its token is reused.
    async fn refresh_session(&self, rejected: &str) -> Result<(String, bool)> {
        let mut session = self.session.lock().await;
        if let Some(current) = session.get_bearer_token()
            && current != rejected
        {
            return Ok((current.to_string(), false));
        }
        session.clear_session();
        let token = self.login_locked(&mut session).await?;
        Ok((token, true))
    }

    /// Send `request` with the bearer token, refreshing the session once on 401.
    pub(crate) async fn send_with_auth(&self, request: &ApiRequest) -> Result<Value> {
        let token = self.get_auth_token().await?;
        match self.send_once(&token, request).await {
            Err(e) if e.status() == Some(UNAUTHORIZED) => {}
            other => return other,
        }

        if self.api_token_auth {
            debug!(path = %request.path, "API token rejected");
            return Err(self.login_required());
        }

        debug!(path = %request.path, "Session expired, re-authenticating");
        if let Some(metrics) = &self.metrics {
            metrics.record_auth_retry();
        }

        let token = match self.refresh_session(&token).await {
            Ok((token, refreshed)) => {
                if refreshed {
                    self.publish(AuthEvent::SessionRefreshed);
                }
                token
            }
            Err(e) if e.is_auth_error() => return Err(self.login_required()),
            Err(e) => return Err(e),
        };

        match self.send_once(&token, request).await {
            Err(e) if e.status() == Some(UNAUTHORIZED) => {
                self.session.lock().await.clear_session();
                Err(self.login_required())
            }
            other => other,
        }
    }

    async fn send_once(&self, token: &str, request: &ApiRequest) -> Result<Value> {
        endpoints::send_json(&self.http, &self.base_url, token, request, self.max_retries).await
    }

    fn login_required(&self) -> ClientError {
        self.publish(AuthEvent::LoginRequired);
        ClientError::LoginRequired
    }

    fn publish(&self, event: AuthEvent) {
        if self.events.send(event).is_err() {
            debug!(?event, "No auth event subscribers");
        }
    }
}
