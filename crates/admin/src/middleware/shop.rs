//! Shop connection extractor.
//!
//! Every page that reads the catalog or writes to Reverb takes a
//! [`ShopConnection`]. Building one needs two things:
//!
//! 1. A session Shopify has vouched for. An app load whose query carries a
//!    valid `hmac`, a fresh `timestamp` and the configured `shop` records the
//!    shop in the session; later requests must present that session.
//! 2. An Admin API token. It lives in memory on the client and in
//!    `app.shopify_session`; after a restart the first request reloads it.
//!
//! Missing either sends the merchant to the install flow, which restores
//! both.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::db::ShopifyTokenRepository;
use crate::error::AppError;
use crate::models::session_keys;
use crate::shopify::signature::{timestamp_is_fresh, verify_query_hmac};
use crate::state::AppState;

/// Path that starts the Shopify install flow.
pub const CONNECT_PATH: &str = "/shopify/connect";

/// Form field carrying the session's CSRF token.
pub const CSRF_FIELD: &str = "csrf_token";

/// A request from a merchant Shopify vouched for, with an Admin API token
/// available.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(_shop: ShopConnection, State(state): State<AppState>) -> Response {
///     let page = state.shopify().get_products(25, None, None, ProductSort::default()).await?;
///     ...
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ShopConnection {
    /// Connected shop domain.
    pub shop: String,
    /// Token state-changing forms must post back in [`CSRF_FIELD`].
    pub csrf_token: String,
}

impl ShopConnection {
    /// Check the token posted with a state-changing form.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Forbidden` when the token is missing or does not
    /// match the session.
    pub fn verify_csrf(&self, submitted: Option<&str>) -> Result<(), AppError> {
        match submitted {
            Some(token) if !token.is_empty() && token == self.csrf_token => Ok(()),
            _ => {
                tracing::warn!(shop = %self.shop, "Form posted without a valid CSRF token");
                Err(AppError::Forbidden("invalid form token".to_string()))
            }
        }
    }
}

/// Rejection when the request is not vouched for or no token is available.
pub enum ShopConnectionRejection {
    /// Send the merchant through the install flow.
    Connect,
    /// The session layer is not installed on this route.
    NoSession,
    /// Loading the session or the stored token failed.
    Error(AppError),
}

impl IntoResponse for ShopConnectionRejection {
    fn into_response(self) -> Response {
        match self {
            Self::Connect => Redirect::to(CONNECT_PATH).into_response(),
            Self::NoSession => {
                tracing::error!("ShopConnection used on a route without a session layer");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
            Self::Error(e) => e.into_response(),
        }
    }
}

impl From<tower_sessions::session::Error> for ShopConnectionRejection {
    fn from(e: tower_sessions::session::Error) -> Self {
        Self::Error(e.into())
    }
}

/// Record a shop Shopify has vouched for and issue a fresh form token.
///
/// The session ID is rotated so a cookie planted before the merchant signed
/// in cannot ride on the verified session.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn establish_shop_session(
    session: &Session,
    shop: &str,
) -> Result<String, tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(session_keys::SHOP, shop).await?;
    let csrf_token = uuid::Uuid::new_v4().to_string();
    session.insert(session_keys::CSRF_TOKEN, &csrf_token).await?;
    Ok(csrf_token)
}

/// What the query of an incoming request says about who sent it.
#[derive(Debug, PartialEq, Eq)]
enum AppLoad {
    /// No `hmac` parameter; rely on the session.
    Unsigned,
    /// Signed by Shopify for this shop.
    Verified(String),
    /// Signed, but the signature, timestamp or shop does not check out.
    Invalid(&'static str),
}

fn inspect_app_load(query: Option<&str>, store: &str, client_secret: &str, now: i64) -> AppLoad {
    let Some(query) = query else {
        return AppLoad::Unsigned;
    };

    let mut signed = false;
    let mut shop = None;
    let mut timestamp = None;
    for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
        match key.as_ref() {
            "hmac" => signed = true,
            "shop" => shop = Some(value.into_owned()),
            "timestamp" => timestamp = Some(value.into_owned()),
            _ => {}
        }
    }

    if !signed {
        return AppLoad::Unsigned;
    }
    if !verify_query_hmac(query, client_secret) {
        return AppLoad::Invalid("signature mismatch");
    }
    if !timestamp.is_some_and(|ts| timestamp_is_fresh(&ts, now)) {
        return AppLoad::Invalid("stale or missing timestamp");
    }
    match shop {
        Some(shop) if shop == store => AppLoad::Verified(shop),
        _ => AppLoad::Invalid("signed for another shop"),
    }
}

impl FromRequestParts<AppState> for ShopConnection {
    type Rejection = ShopConnectionRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|_| ShopConnectionRejection::NoSession)?;
        let client = state.shopify();
        let store = client.store();

        let app_load = inspect_app_load(
            parts.uri.query(),
            store,
            client.client_secret(),
            chrono::Utc::now().timestamp(),
        );
        let csrf_token = match app_load {
            AppLoad::Verified(shop) => {
                tracing::debug!(shop = %shop, "Verified signed app load");
                Some(establish_shop_session(&session, &shop).await?)
            }
            AppLoad::Invalid(reason) => {
                tracing::warn!(reason, "Rejected signed app load");
                return Err(ShopConnectionRejection::Connect);
            }
            AppLoad::Unsigned => None,
        };

        let verified: Option<String> = session.get(session_keys::SHOP).await?;
        if verified.as_deref() != Some(store) {
            tracing::info!(shop = store, "Request without a verified shop session");
            return Err(ShopConnectionRejection::Connect);
        }

        let csrf_token = match csrf_token {
            Some(token) => token,
            None => match session.get::<String>(session_keys::CSRF_TOKEN).await? {
                Some(token) => token,
                None => establish_shop_session(&session, store).await?,
            },
        };

        if client.has_token().await {
            return Ok(Self {
                shop: store.to_string(),
                csrf_token,
            });
        }

        let stored = ShopifyTokenRepository::new(state.pool())
            .get_by_shop(store)
            .await
            .map_err(|e| ShopConnectionRejection::Error(e.into()))?;

        let Some(stored) = stored else {
            tracing::info!(shop = store, "No stored Shopify token, starting install");
            return Err(ShopConnectionRejection::Connect);
        };

        let shop = stored.shop.clone();
        client.set_token(stored.into()).await;
        tracing::debug!(shop = %shop, "Loaded Shopify token from database");

        Ok(Self { shop, csrf_token })
    }
}
