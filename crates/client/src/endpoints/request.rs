//! Request description and the retrying send helper.
//!
//! Responsibilities:
//! - Describe one API call (`ApiRequest`) and derive its deduplication key.
//! - Send it with a bearer token, retrying HTTP 429 with exponential backoff.
//! - Turn non-success responses into `ClientError::ApiError`.
//!
//! Does NOT handle:
//! - 401 refresh-and-retry (see `client::session`).
//! - Caching or deduplication (see `client`).

use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::error::{ClientError, Result};

/// Header carrying the server-side request id on error responses.
const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// One call against the Tower API, relative to the base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    /// Whether a successful call changes server state.
    pub mutates: bool,
}

/// Identity of a request for in-flight deduplication.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestKey {
    pub method: String,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<String>,
}

impl ApiRequest {
    fn new(method: Method, path: impl Into<String>, body: Option<Value>) -> Self {
        let mutates = method != Method::GET;
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body,
            mutates,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path, None)
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self::new(Method::POST, path, Some(body))
    }

    pub fn patch(path: impl Into<String>, body: Value) -> Self {
        Self::new(Method::PATCH, path, Some(body))
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path, None)
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Mark a non-GET call as leaving server state untouched.
    pub fn read_only(mut self) -> Self {
        self.mutates = false;
        self
    }

    pub fn key(&self) -> RequestKey {
        let mut query = self.query.clone();
        query.sort();
        RequestKey {
            method: self.method.as_str().to_string(),
            path: self.path.clone(),
            query,
            body: self.body.as_ref().map(Value::to_string),
        }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(alias = "error")]
    message: String,
}

/// Send `request` with a bearer token and decode the JSON body.
///
/// An empty body decodes to `Value::Null`.
pub async fn send_json(
    client: &Client,
    base_url: &str,
    token: &str,
    request: &ApiRequest,
    max_retries: usize,
) -> Result<Value> {
    let url = format!("{}{}", base_url, request.path);
    let mut builder = client
        .request(request.method.clone(), &url)
        .bearer_auth(token);
    if !request.query.is_empty() {
        builder = builder.query(&request.query);
    }
    if let Some(body) = &request.body {
        builder = builder.json(body);
    }

    let response = send_request_with_retry(builder, max_retries).await?;
    read_json(response).await
}

async fn read_json(response: Response) -> Result<Value> {
    let url = response.url().to_string();
    let text = response.text().await?;
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(&text)
        .map_err(|e| ClientError::InvalidResponse(format!("{url}: {e}")))
}

/// Sends an HTTP request, retrying HTTP 429 responses.
///
/// Backoff is `2^attempt` seconds. After `max_retries` retries the call
/// fails with [`ClientError::MaxRetriesExceeded`]. Any other non-success
/// status becomes [`ClientError::ApiError`] without retrying.
pub async fn send_request_with_retry(
    builder: RequestBuilder,
    max_retries: usize,
) -> Result<Response> {
    for attempt in 0..=max_retries {
        let Some(attempt_builder) = builder.try_clone() else {
            if attempt == 0 {
                debug!("Request builder cannot be cloned, single attempt only");
                return into_result(builder.send().await?).await;
            }
            debug!("Cannot clone request builder for retry");
            return Err(ClientError::MaxRetriesExceeded(attempt));
        };

        let response = attempt_builder.send().await?;
        if response.status().as_u16() != 429 {
            if attempt > 0 {
                debug!(attempt = attempt + 1, "Request succeeded after retry");
            }
            return into_result(response).await;
        }

        if attempt < max_retries {
            let backoff_secs = 2u64.pow(attempt as u32);
            debug!(
                attempt = attempt + 1,
                max_retries = max_retries + 1,
                backoff_secs,
                "Rate limited (HTTP 429), retrying with exponential backoff"
            );
            tokio::time::sleep(std::time::Duration::from_secs(backoff_secs)).await;
        }
    }

    debug!(
        attempts = max_retries + 1,
        "Max retries exhausted for rate-limited request"
    );
    Err(ClientError::MaxRetriesExceeded(max_retries + 1))
}

async fn into_result(response: Response) -> Result<Response> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status().as_u16();
    let url = response.url().to_string();
    let request_id = response
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(|s| s.to_string());
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Could not read error response body".to_string());

    let message = serde_json::from_str::<ErrorBody>(&body)
        .map(|e| e.message)
        .unwrap_or(body);

    Err(ClientError::ApiError {
        status,
        url,
        message,
        request_id,
    })
}
