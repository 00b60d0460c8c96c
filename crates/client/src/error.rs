//! Error types for the Tower client.

use std::sync::Arc;

use thiserror::Error;

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur during Tower client operations.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Authentication failed.
    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Non-success response from the Tower API.
    #[error("API error ({status}) at {url}: {message}{}", .request_id.as_ref().map(|id| format!(" [Request ID: {id}]")).unwrap_or_default())]
    ApiError {
        status: u16,
        url: String,
        message: String,
        request_id: Option<String>,
    },

    /// The session could not be refreshed; the user has to log in again.
    #[error("Login required")]
    LoginRequired,

    /// Invalid response format from the Tower API.
    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    /// Maximum retries exceeded.
    #[error("Maximum retries exceeded ({0} attempts)")]
    MaxRetriesExceeded(usize),

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Not found.
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Building a request payload failed.
    #[error(transparent)]
    Mapping(#[from] tower_mapping::MappingError),

    /// Error from a deduplicated call, shared by every caller that joined it.
    #[error(transparent)]
    Shared(Arc<ClientError>),
}

impl ClientError {
    /// Check if an HTTP status code is retryable.
    ///
    /// Retryable status codes:
    /// - 429: Too Many Requests
    /// - 502, 503, 504: transient gateway/server errors
    pub fn is_retryable_status(status: u16) -> bool {
        matches!(status, 429 | 502 | 503 | 504)
    }

    /// The error behind any number of [`ClientError::Shared`] wrappers.
    pub fn root(&self) -> &ClientError {
        match self {
            Self::Shared(inner) => inner.root(),
            other => other,
        }
    }

    /// HTTP status of an API error, if this is one.
    pub fn status(&self) -> Option<u16> {
        match self.root() {
            Self::ApiError { status, .. } => Some(*status),
            Self::HttpError(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Check if this error indicates authentication failure.
    pub fn is_auth_error(&self) -> bool {
        matches!(self.root(), Self::AuthFailed(_) | Self::LoginRequired)
            || self.status() == Some(401)
    }

    /// Unwrap a shared error when this caller holds the last reference.
    pub(crate) fn from_shared(error: Arc<ClientError>) -> Self {
        Arc::try_unwrap(error).unwrap_or_else(ClientError::Shared)
    }
}
