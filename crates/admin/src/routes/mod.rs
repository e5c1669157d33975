//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness (in app.rs)
//! GET  /health/ready           - Readiness, database ping (in app.rs)
//!
//! # Dashboard
//! GET  /                       - Shop greeting, Reverb status, notices
//! POST /sample-product         - Create a sample draft product
//!
//! # Products (read from Shopify)
//! GET  /products               - Product table (q, status, type, sort, cursor)
//!
//! # Listings (written to Reverb)
//! GET  /listings/new?id=..     - Listing form for the selected products
//! POST /listings               - Submit drafts, one at a time
//! GET  /listings/results       - Outcomes of the last submission
//!
//! # Shopify install
//! GET  /shopify/connect        - Start OAuth
//! GET  /shopify/callback       - Finish OAuth (HMAC + state verified)
//! ```

pub mod dashboard;
pub mod listings;
pub mod products;
pub mod shopify;

use askama::Template;
use axum::{
    Router,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use tower_sessions::Session;

use crate::db::ShopifyTokenRepository;
use crate::error::AppError;
use crate::middleware::shop::CONNECT_PATH;
use crate::models::{Flash, session_keys};
use crate::shopify::AdminShopifyError;
use crate::state::AppState;

/// Build the application router (health routes and static files are added
/// in `app.rs`).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard::index))
        .route("/sample-product", post(dashboard::create_sample_product))
        .route("/products", get(products::index))
        .route("/listings/new", get(listings::new_form))
        .route("/listings", post(listings::create))
        .route("/listings/results", get(listings::results))
        .merge(shopify::router())
}

/// Render a template to an HTML response.
pub(crate) fn render<T: Template>(template: &T) -> Response {
    Html(template.render().unwrap_or_else(|e| {
        tracing::error!("Template render error: {}", e);
        "Internal Server Error".to_string()
    }))
    .into_response()
}

/// Queue a notice for the next page render.
pub(crate) async fn set_flash(session: &Session, flash: Flash) {
    if let Err(e) = session.insert(session_keys::FLASH, flash).await {
        tracing::warn!("Failed to store flash message: {}", e);
    }
}

/// Take the pending notice, if any.
pub(crate) async fn take_flash(session: &Session) -> Option<Flash> {
    session
        .remove::<Flash>(session_keys::FLASH)
        .await
        .ok()
        .flatten()
}

/// Map an Admin API failure to a response.
///
/// A rejected token means the app was uninstalled or the token revoked, so
/// the token is dropped from memory and storage and the merchant is sent
/// back through the install flow.
pub(crate) async fn shopify_failure(state: &AppState, error: AdminShopifyError) -> Response {
    match error {
        AdminShopifyError::Unauthorized(_) => {
            tracing::warn!(error = %error, "Shopify token rejected, reconnecting");
            let shopify = state.shopify();
            shopify.clear_token().await;
            if let Err(e) = ShopifyTokenRepository::new(state.pool())
                .delete(shopify.store())
                .await
            {
                tracing::error!("Failed to delete revoked Shopify token: {}", e);
            }
            Redirect::to(CONNECT_PATH).into_response()
        }
        AdminShopifyError::NoAccessToken => Redirect::to(CONNECT_PATH).into_response(),
        other => AppError::Shopify(other).into_response(),
    }
}
