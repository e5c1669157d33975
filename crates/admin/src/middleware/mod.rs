//! HTTP middleware and extractors for admin.
//!
//! # Middleware Order (outermost first, see `main.rs`)
//!
//! 1. Sentry layers (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Session layer (tower-sessions with `PostgreSQL` store)
//!
//! Handlers behind the app take the [`ShopConnection`] extractor. It accepts
//! only sessions Shopify has vouched for (a signed app load or a finished
//! install), loads the stored access token, and otherwise redirects to the
//! install flow. State-changing forms also post back the session's CSRF
//! token.

pub mod session;
pub mod shop;

pub use session::{SESSION_COOKIE_NAME, create_session_layer};
pub use shop::{CSRF_FIELD, ShopConnection, ShopConnectionRejection, establish_shop_session};
