//! Shopify app install (OAuth) routes.
//!
//! The app runs inside the Shopify admin iframe, where Shopify's OAuth page
//! refuses to load. The connect page therefore breaks out to the top window
//! before following the authorization URL.

use askama::Template;
use axum::{
    Router,
    extract::{Query, RawQuery, State},
    response::{IntoResponse, Redirect, Response},
    routing::get,
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::db::ShopifyTokenRepository;
use crate::filters;
use crate::middleware::shop::establish_shop_session;
use crate::models::{Flash, session_keys};
use crate::shopify::signature::verify_query_hmac;
use crate::state::AppState;

use super::{render, set_flash};

/// Admin API scopes requested at install.
const ADMIN_SCOPES: &[&str] = &["read_products", "write_products"];

// =============================================================================
// Templates
// =============================================================================

/// Install page: redirects the top window to Shopify or shows what failed.
#[derive(Template)]
#[template(path = "shopify/connect.html")]
pub struct ConnectTemplate {
    pub current_path: String,
    pub shop: String,
    pub auth_url: Option<String>,
    pub error_message: Option<String>,
}

impl ConnectTemplate {
    fn redirect(shop: &str, auth_url: String) -> Self {
        Self {
            current_path: "/shopify/connect".to_string(),
            shop: shop.to_string(),
            auth_url: Some(auth_url),
            error_message: None,
        }
    }

    fn failed(shop: &str, message: impl Into<String>) -> Self {
        Self {
            current_path: "/shopify/connect".to_string(),
            shop: shop.to_string(),
            auth_url: None,
            error_message: Some(message.into()),
        }
    }
}

/// Build the Shopify OAuth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/shopify/connect", get(connect))
        .route("/shopify/callback", get(callback))
}

// =============================================================================
// Query Parameters
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct ConnectParams {
    pub shop: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct OAuthCallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub shop: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

// =============================================================================
// Route Handlers
// =============================================================================

/// GET /shopify/connect - Start OAuth flow.
#[instrument(skip(state, session))]
async fn connect(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<ConnectParams>,
) -> Response {
    let store = state.shopify().store();

    if let Some(shop) = params.shop.as_deref().filter(|shop| *shop != store) {
        tracing::warn!(requested = shop, configured = store, "Install requested for another shop");
        return render(&ConnectTemplate::failed(
            shop,
            format!("This app is configured for {store}, not {shop}."),
        ));
    }

    // Random state parameter for CSRF protection
    let oauth_state = uuid::Uuid::new_v4().to_string();

    if let Err(e) = session.insert(session_keys::OAUTH_STATE, &oauth_state).await {
        tracing::error!("Failed to store OAuth state: {}", e);
        return render(&ConnectTemplate::failed(
            store,
            "Could not start the install. Please try again.",
        ));
    }

    let redirect_uri = format!("{}/shopify/callback", state.config().base_url);
    let auth_url = state
        .shopify()
        .authorization_url(&redirect_uri, ADMIN_SCOPES, &oauth_state);

    tracing::info!(shop = store, "Redirecting to Shopify OAuth");
    render(&ConnectTemplate::redirect(store, auth_url))
}

/// GET /shopify/callback - Handle OAuth callback.
#[instrument(skip(state, session, raw_query))]
async fn callback(
    State(state): State<AppState>,
    session: Session,
    RawQuery(raw_query): RawQuery,
    Query(params): Query<OAuthCallbackParams>,
) -> Response {
    let store = state.shopify().store();

    if let Some(error) = &params.error {
        let description = params.error_description.as_deref().unwrap_or_default();
        tracing::error!("Shopify OAuth error: {} - {}", error, description);
        return render(&ConnectTemplate::failed(
            store,
            "The install was declined in Shopify.",
        ));
    }

    if !verify_query_hmac(
        raw_query.as_deref().unwrap_or_default(),
        state.shopify().client_secret(),
    ) {
        tracing::error!("Invalid HMAC signature in OAuth callback");
        return render(&ConnectTemplate::failed(
            store,
            "Invalid security signature. Please try again.",
        ));
    }

    if params.shop.as_deref().is_some_and(|shop| shop != store) {
        tracing::error!(shop = ?params.shop, "OAuth callback for an unexpected shop");
        return render(&ConnectTemplate::failed(store, "Unexpected shop in callback."));
    }

    let (Some(code), Some(callback_state)) = (&params.code, &params.state) else {
        tracing::error!("Missing code or state in OAuth callback");
        return render(&ConnectTemplate::failed(
            store,
            "Shopify did not return an authorization code.",
        ));
    };

    let stored_state: Option<String> = session
        .remove(session_keys::OAUTH_STATE)
        .await
        .ok()
        .flatten();
    if stored_state.as_ref() != Some(callback_state) {
        tracing::error!("OAuth state mismatch");
        return render(&ConnectTemplate::failed(
            store,
            "The install link expired. Please try again.",
        ));
    }

    let token = match state.shopify().exchange_code(code).await {
        Ok(token) => token,
        Err(e) => {
            tracing::error!("Failed to exchange OAuth code: {}", e);
            return render(&ConnectTemplate::failed(
                store,
                "Failed to exchange the authorization code.",
            ));
        }
    };

    if let Err(e) = ShopifyTokenRepository::new(state.pool()).save(&token).await {
        tracing::error!("Failed to save Shopify token: {}", e);
        return render(&ConnectTemplate::failed(store, "Failed to save credentials."));
    }

    // Completing the install proves the merchant is signed in to this shop
    if let Err(e) = establish_shop_session(&session, &token.shop).await {
        tracing::error!("Failed to store verified shop in session: {}", e);
        return render(&ConnectTemplate::failed(store, "Failed to start a session."));
    }

    tracing::info!(shop = %token.shop, "Connected to Shopify");
    set_flash(&session, Flash::success("Connected to Shopify")).await;
    Redirect::to("/").into_response()
}
