//! Shopify access token storage.
//!
//! One row per installed shop, written by the OAuth callback and read back
//! on the first request after a restart.

use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;

use super::RepositoryError;
use crate::shopify::OAuthToken;

// =============================================================================
// Types
// =============================================================================

/// A stored Shopify access token.
///
/// Implements `Debug` manually to redact the access token.
#[derive(Clone)]
pub struct ShopifyToken {
    /// Shop domain (e.g., your-store.myshopify.com).
    pub shop: String,
    /// Admin API access token (redacted in debug output).
    pub access_token: SecretString,
    /// Granted scopes.
    pub scopes: Vec<String>,
    /// Unix timestamp when token was obtained.
    pub obtained_at: i64,
}

impl std::fmt::Debug for ShopifyToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopifyToken")
            .field("shop", &self.shop)
            .field("access_token", &"[REDACTED]")
            .field("scopes", &self.scopes)
            .field("obtained_at", &self.obtained_at)
            .finish()
    }
}

impl From<ShopifyToken> for OAuthToken {
    fn from(token: ShopifyToken) -> Self {
        Self {
            access_token: token.access_token.expose_secret().to_string(),
            scope: token.scopes.join(","),
            obtained_at: token.obtained_at,
            shop: token.shop,
        }
    }
}

/// Internal row type for `PostgreSQL` queries.
#[derive(Debug, sqlx::FromRow)]
struct ShopifySessionRow {
    shop: String,
    access_token: String,
    scope: String,
    obtained_at: i64,
}

impl From<ShopifySessionRow> for ShopifyToken {
    fn from(row: ShopifySessionRow) -> Self {
        Self {
            shop: row.shop,
            access_token: SecretString::from(row.access_token),
            scopes: parse_scopes(&row.scope),
            obtained_at: row.obtained_at,
        }
    }
}

/// Split a comma-separated scope string, dropping blanks.
#[must_use]
pub fn parse_scopes(scope: &str) -> Vec<String> {
    scope
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for Shopify token database operations.
pub struct ShopifyTokenRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ShopifyTokenRepository<'a> {
    /// Create a new Shopify token repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get the token for a shop.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_shop(&self, shop: &str) -> Result<Option<ShopifyToken>, RepositoryError> {
        let row = sqlx::query_as::<_, ShopifySessionRow>(
            r"
            SELECT shop, access_token, scope, obtained_at
            FROM app.shopify_session
            WHERE shop = $1
            ",
        )
        .bind(shop)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(ShopifyToken::from))
    }

    /// Save or update the token for a shop.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn save(&self, token: &OAuthToken) -> Result<(), RepositoryError> {
        let scope = parse_scopes(&token.scope).join(",");

        sqlx::query(
            r"
            INSERT INTO app.shopify_session (shop, access_token, scope, obtained_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (shop) DO UPDATE SET
                access_token = EXCLUDED.access_token,
                scope = EXCLUDED.scope,
                obtained_at = EXCLUDED.obtained_at,
                updated_at = NOW()
            ",
        )
        .bind(&token.shop)
        .bind(&token.access_token)
        .bind(scope)
        .bind(token.obtained_at)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Delete the token for a shop. Returns whether a row was removed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, shop: &str) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM app.shopify_session WHERE shop = $1")
            .bind(shop)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Shop domain of any stored session, most recently updated first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn first_shop(&self) -> Result<Option<String>, RepositoryError> {
        let shop = sqlx::query_scalar::<_, String>(
            "SELECT shop FROM app.shopify_session ORDER BY updated_at DESC LIMIT 1",
        )
        .fetch_optional(self.pool)
        .await?;

        Ok(shop)
    }

    /// Check the database is reachable.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(self.pool).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scopes_are_trimmed_and_blanks_dropped() {
        assert_eq!(
            parse_scopes("read_products, write_products,,"),
            vec!["read_products".to_string(), "write_products".to_string()]
        );
        assert!(parse_scopes("").is_empty());
    }

    #[test]
    fn token_debug_redacts_access_token() {
        let token = ShopifyToken {
            shop: "guitar-barn.myshopify.com".to_string(),
            access_token: SecretString::from("shpat_very_secret"),
            scopes: vec!["read_products".to_string()],
            obtained_at: 1_700_000_000,
        };
        let debug = format!("{token:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("shpat_very_secret"));
    }

    #[test]
    fn stored_token_converts_to_client_token() {
        let token = ShopifyToken {
            shop: "guitar-barn.myshopify.com".to_string(),
            access_token: SecretString::from("shpat_1"),
            scopes: vec!["read_products".to_string(), "write_products".to_string()],
            obtained_at: 42,
        };
        let oauth = OAuthToken::from(token);
        assert_eq!(oauth.access_token, "shpat_1");
        assert_eq!(oauth.scope, "read_products,write_products");
        assert_eq!(oauth.shop, "guitar-barn.myshopify.com");
    }
}
