//! Authentication strategies, session state and auth events.
//!
//! Responsibilities:
//! - Hold the configured auth strategy and the current session token.
//! - Define the events published when the session changes.
//!
//! Does NOT handle:
//! - Login requests (see `endpoints::login`).
//! - The 401 refresh-and-retry flow (see `client::session`).
//!
//! Invariants:
//! - API tokens never expire client-side and are never cleared.
//! - Session tokens live only in memory.

use secrecy::{ExposeSecret, SecretString};

/// Strategy for authenticating with the Tower API.
#[derive(Debug, Clone)]
pub enum AuthStrategy {
    /// Username and password; the client logs in and keeps the session token.
    SessionToken {
        username: String,
        password: SecretString,
    },
    /// Static bearer token.
    ApiToken { token: SecretString },
}

impl From<&tower_config::AuthStrategy> for AuthStrategy {
    fn from(strategy: &tower_config::AuthStrategy) -> Self {
        match strategy {
            tower_config::AuthStrategy::SessionToken { username, password } => {
                AuthStrategy::SessionToken {
                    username: username.clone(),
                    password: password.clone(),
                }
            }
            tower_config::AuthStrategy::ApiToken { token } => AuthStrategy::ApiToken {
                token: token.clone(),
            },
        }
    }
}

/// Session change published to subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthEvent {
    /// The session could not be renewed; credentials are needed.
    LoginRequired,
    /// A fresh session token replaced an expired one.
    SessionRefreshed,
}

/// Holds the auth strategy and the current session token.
#[derive(Debug)]
pub struct SessionManager {
    auth_strategy: AuthStrategy,
    session_token: Option<SecretString>,
}

impl SessionManager {
    pub fn new(strategy: AuthStrategy) -> Self {
        Self {
            auth_strategy: strategy,
            session_token: None,
        }
    }

    pub fn strategy(&self) -> &AuthStrategy {
        &self.auth_strategy
    }

    /// Check if we're using API token auth (no session management needed).
    pub fn is_api_token(&self) -> bool {
        matches!(self.auth_strategy, AuthStrategy::ApiToken { .. })
    }

    /// Get the bearer token for API requests.
    ///
    /// For session auth this is `None` until a login has succeeded.
    pub fn get_bearer_token(&self) -> Option<&str> {
        match &self.auth_strategy {
            AuthStrategy::ApiToken { token } => Some(token.expose_secret()),
            AuthStrategy::SessionToken { .. } => {
                self.session_token.as_ref().map(|t| t.expose_secret())
            }
        }
    }

    pub fn set_session_token(&mut self, token: String) {
        self.session_token = Some(SecretString::new(token.into()));
    }

    pub fn has_session(&self) -> bool {
        self.session_token.is_some()
    }

    /// Clear the current session token (force re-authentication).
    pub fn clear_session(&mut self) {
        self.session_token = None;
    }
}
