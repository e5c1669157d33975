//! Shopify Admin API client (the catalog API).
//!
//! # Architecture
//!
//! - Queries implement `graphql_client::GraphQLQuery` over hand-written
//!   operation documents and serde response types
//! - Direct API calls to Shopify (no local catalog sync)
//! - Access token obtained through the app-install OAuth handshake
//!
//! # Example
//!
//! ```rust,ignore
//! use reverb_bridge_admin::shopify::AdminClient;
//!
//! let client = AdminClient::new(&config.shopify);
//!
//! // Get the first page of products
//! let page = client.get_products(25, None, None, ProductSort::default()).await?;
//!
//! // Get a specific product
//! let product = client.get_product("gid://shopify/Product/123").await?;
//! ```

mod admin;
pub mod signature;
pub mod types;

pub use admin::{AdminClient, CreatedProduct, OAuthToken};
pub use types::*;

use thiserror::Error;

/// Errors that can occur when interacting with Shopify Admin API.
#[derive(Debug, Error)]
pub enum AdminShopifyError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// GraphQL query returned errors.
    #[error("GraphQL errors: {}", format_graphql_errors(.0))]
    GraphQL(Vec<GraphQLError>),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Rate limited by Shopify.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Authentication/authorization failed.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// User error from mutation (e.g., invalid input).
    #[error("User error: {0}")]
    UserError(String),

    /// The app has not been installed yet (no access token).
    #[error("No access token; the app must be installed first")]
    NoAccessToken,

    /// OAuth handshake failed.
    #[error("OAuth error: {0}")]
    OAuth(String),
}

/// A GraphQL error returned by the Shopify Admin API.
#[derive(Debug, Clone)]
pub struct GraphQLError {
    /// Error message.
    pub message: String,
    /// Source locations in the query.
    pub locations: Vec<GraphQLErrorLocation>,
    /// Path to the error in the response.
    pub path: Vec<serde_json::Value>,
}

impl GraphQLError {
    /// Error with only a message.
    #[must_use]
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            locations: vec![],
            path: vec![],
        }
    }
}

/// Location in a GraphQL query where an error occurred.
#[derive(Debug, Clone)]
pub struct GraphQLErrorLocation {
    /// Line number (1-indexed).
    pub line: i64,
    /// Column number (1-indexed).
    pub column: i64,
}

fn format_graphql_errors(errors: &[GraphQLError]) -> String {
    errors
        .iter()
        .map(|e| e.message.clone())
        .collect::<Vec<_>>()
        .join("; ")
}
