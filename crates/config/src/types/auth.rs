//! Authentication settings.

use secrecy::SecretString;

/// How the client authenticates against the Tower API.
#[derive(Debug, Clone)]
pub enum AuthStrategy {
    /// Username and password exchanged for a bearer token at login.
    SessionToken {
        username: String,
        password: SecretString,
    },
    /// Static bearer token.
    ApiToken { token: SecretString },
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub strategy: AuthStrategy,
}
