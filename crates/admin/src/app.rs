//! Router assembly.
//!
//! [`router`] returns every route with state applied but no session layer;
//! the server adds the `PostgreSQL`-backed one, tests add an in-memory one.

use axum::{Router, extract::State, http::StatusCode, routing::get};
use tower_http::services::ServeDir;

use crate::db::ShopifyTokenRepository;
use crate::routes;
use crate::state::AppState;

/// Directory served under `/static`, relative to the workspace root.
pub const STATIC_DIR: &str = "crates/admin/static";

/// Health checks, app pages and static assets.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(routes::routes())
        .nest_service("/static", ServeDir::new(STATIC_DIR))
        .with_state(state)
}

/// Liveness: the process is up. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness: the token store answers. 503 otherwise.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match ShopifyTokenRepository::new(state.pool()).ping().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
