//! Reverb marketplace API client.
//!
//! Creates listings and reads the metadata the listing form needs.
//!
//! # API Reference
//!
//! - Base URL: `https://api.reverb.com/api` (configurable for tests)
//! - Authentication: personal access token via `Authorization: Bearer <token>`
//! - API Version: `3.0` (specified via `Accept-Version` header)
//! - Media type: `application/hal+json`

mod listings;
mod metadata;
mod types;

pub use types::*;

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::Deserialize;
use thiserror::Error;

use crate::config::ReverbConfig;

/// Reverb API version (`Accept-Version` header).
const API_VERSION: &str = "3.0";

/// HAL+JSON media type used for requests and responses.
const HAL_JSON: &str = "application/hal+json";

/// Listing metadata changes rarely; keep it for an hour.
const METADATA_TTL: Duration = Duration::from_secs(3600);

/// Errors that can occur when interacting with the Reverb API.
#[derive(Debug, Error)]
pub enum ReverbError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Rate limited by Reverb.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Failed to parse response.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Unauthorized (invalid or revoked token).
    #[error("Unauthorized: invalid API token")]
    Unauthorized,
}

/// Cached metadata entries.
#[derive(Clone)]
enum CacheValue {
    Conditions(Arc<Vec<ListingCondition>>),
    Categories(Arc<Vec<Category>>),
}

/// Reverb API client.
#[derive(Clone)]
pub struct ReverbClient {
    inner: Arc<ReverbClientInner>,
}

struct ReverbClientInner {
    client: reqwest::Client,
    base_url: String,
    cache: Cache<&'static str, CacheValue>,
}

/// Error body shapes Reverb uses: `{"message": ..}` and/or `{"errors": ..}`.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    errors: Option<serde_json::Value>,
}

impl ReverbClient {
    /// Create a new Reverb API client.
    ///
    /// # Errors
    ///
    /// Returns error if the token is not a valid header value or the HTTP
    /// client fails to build.
    pub fn new(config: &ReverbConfig) -> Result<Self, ReverbError> {
        let mut headers = HeaderMap::new();

        let auth_value = format!("Bearer {}", config.api_token.expose_secret());
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&auth_value)
                .map_err(|e| ReverbError::Parse(format!("Invalid API token format: {e}")))?,
        );
        headers.insert("Accept-Version", HeaderValue::from_static(API_VERSION));
        headers.insert(ACCEPT, HeaderValue::from_static(HAL_JSON));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(HAL_JSON));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        let cache = Cache::builder()
            .max_capacity(16)
            .time_to_live(METADATA_TTL)
            .build();

        Ok(Self {
            inner: Arc::new(ReverbClientInner {
                client,
                base_url: config.api_url.trim_end_matches('/').to_string(),
                cache,
            }),
        })
    }

    /// Execute a GET request to the Reverb API.
    pub(crate) async fn get<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<T, ReverbError> {
        let url = format!("{}{path}", self.inner.base_url);
        let response = self.inner.client.get(&url).send().await?;
        handle_response(response).await
    }

    /// Execute a POST request to the Reverb API.
    pub(crate) async fn post<T: serde::de::DeserializeOwned, B: serde::Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ReverbError> {
        let url = format!("{}{path}", self.inner.base_url);
        let response = self.inner.client.post(&url).json(body).send().await?;
        handle_response(response).await
    }
}

impl std::fmt::Debug for ReverbClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReverbClient")
            .field("base_url", &self.inner.base_url)
            .finish_non_exhaustive()
    }
}

/// Handle API response and parse JSON.
async fn handle_response<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ReverbError> {
    if response.status().is_success() {
        return response
            .json()
            .await
            .map_err(|e| ReverbError::Parse(format!("Failed to parse response: {e}")));
    }

    Err(parse_error(response).await)
}

/// Parse error response from the Reverb API.
async fn parse_error(response: reqwest::Response) -> ReverbError {
    let status = response.status().as_u16();

    if status == 429 {
        let retry_after = response
            .headers()
            .get("Retry-After")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse().ok())
            .unwrap_or(60);
        return ReverbError::RateLimited(retry_after);
    }

    if status == 401 || status == 403 {
        return ReverbError::Unauthorized;
    }

    if status == 404 {
        return ReverbError::NotFound("Resource not found".to_string());
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());

    ReverbError::Api {
        status,
        message: error_message(&body),
    }
}

/// Pull a readable message out of an error body, falling back to the raw text.
fn error_message(body: &str) -> String {
    let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) else {
        return body.chars().take(500).collect();
    };

    let details = parsed.errors.map(|errors| match errors {
        // {"errors": {"price": ["must be positive"], "make": ["can't be blank"]}}
        serde_json::Value::Object(fields) => fields
            .iter()
            .map(|(field, value)| format!("{field}: {}", flatten_value(value)))
            .collect::<Vec<_>>()
            .join("; "),
        other => flatten_value(&other),
    });

    match (parsed.message, details) {
        (Some(message), Some(details)) if !details.is_empty() => format!("{message} ({details})"),
        (Some(message), _) => message,
        (None, Some(details)) if !details.is_empty() => details,
        _ => body.chars().take(500).collect(),
    }
}

fn flatten_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Array(items) => items
            .iter()
            .map(flatten_value)
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_message_prefers_message_field() {
        assert_eq!(
            error_message(r#"{"message": "Listing could not be saved"}"#),
            "Listing could not be saved"
        );
    }

    #[test]
    fn error_message_includes_field_errors() {
        let msg = error_message(
            r#"{"message": "Invalid listing", "errors": {"price": ["must be greater than 0"]}}"#,
        );
        assert_eq!(msg, "Invalid listing (price: must be greater than 0)");
    }

    #[test]
    fn error_message_handles_bare_errors() {
        assert_eq!(
            error_message(r#"{"errors": ["make can't be blank", "model can't be blank"]}"#),
            "make can't be blank, model can't be blank"
        );
    }

    #[test]
    fn error_message_falls_back_to_body() {
        assert_eq!(error_message("<html>Bad Gateway</html>"), "<html>Bad Gateway</html>");
    }

    #[test]
    fn test_api_constants() {
        assert_eq!(API_VERSION, "3.0");
        assert_eq!(METADATA_TTL.as_secs(), 3600);
    }
}
