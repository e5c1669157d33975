//! Session middleware configuration for admin.
//!
//! Sets up `PostgreSQL`-backed sessions using tower-sessions. The app is
//! rendered inside the Shopify admin iframe, so over HTTPS the cookie is
//! `SameSite=None`; plain-HTTP development falls back to `Lax`. The cookie
//! is signed with a key derived from `ADMIN_SESSION_SECRET`.

use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha512};
use sqlx::PgPool;
use tower_sessions::cookie::{Key, SameSite};
use tower_sessions::service::SignedCookie;
use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::PostgresStore;

use crate::config::AdminConfig;

/// Session cookie name for admin.
pub const SESSION_COOKIE_NAME: &str = "rb_admin_session";

/// Session expiry time in seconds (24 hours).
const SESSION_EXPIRY_SECONDS: i64 = 24 * 60 * 60;

/// Create the session layer with `PostgreSQL` store.
///
/// # Panics
///
/// Panics if the schema name or table name is invalid (should never happen
/// with hardcoded "app" and "session" values).
#[must_use]
pub fn create_session_layer(
    pool: &PgPool,
    config: &AdminConfig,
) -> SessionManagerLayer<PostgresStore, SignedCookie> {
    // The session table is created by the admin migrations.
    let store = PostgresStore::new(pool.clone())
        .with_schema_name("app")
        .expect("valid schema name")
        .with_table_name("session")
        .expect("valid table name");

    let is_secure = config.base_url.starts_with("https://");

    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(is_secure)
        .with_same_site(same_site(is_secure))
        .with_http_only(true)
        .with_path("/")
        .with_signed(signing_key(&config.session_secret))
}

/// Cookie signing key. SHA-512 stretches the secret to the 64 bytes `Key` needs.
fn signing_key(secret: &SecretString) -> Key {
    let digest = Sha512::digest(secret.expose_secret().as_bytes());
    Key::from(digest.as_slice())
}

/// Browsers drop `SameSite=None` cookies that are not `Secure`.
const fn same_site(is_secure: bool) -> SameSite {
    if is_secure { SameSite::None } else { SameSite::Lax }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_site_depends_on_https() {
        assert_eq!(same_site(true), SameSite::None);
        assert_eq!(same_site(false), SameSite::Lax);
    }

    #[test]
    fn signing_key_is_stable_per_secret() {
        let a = signing_key(&SecretString::from("x".repeat(32)));
        let b = signing_key(&SecretString::from("x".repeat(32)));
        let c = signing_key(&SecretString::from("y".repeat(32)));
        assert_eq!(a.master(), b.master());
        assert_ne!(a.master(), c.master());
    }
}
