//! REST API endpoint implementations.

mod auth;
mod request;
pub mod url_encoding;

pub use auth::login;
pub use request::{ApiRequest, RequestKey, send_json, send_request_with_retry};
pub use url_encoding::encode_path_segment;
