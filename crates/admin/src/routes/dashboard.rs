//! Dashboard route handlers.

use askama::Template;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::{
    db::ShopifyTokenRepository,
    filters,
    middleware::ShopConnection,
    models::Flash,
    services::ListingOutcome,
    state::AppState,
};

use super::{render, set_flash, shopify_failure, take_flash};

/// Reverb connection status shown on the dashboard.
#[derive(Debug, Clone)]
pub struct ReverbStatusView {
    pub connected: bool,
    /// Seller display name when connected, error text otherwise.
    pub detail: String,
}

/// Dashboard page template.
#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub current_path: String,
    pub csrf_token: String,
    pub shop_name: String,
    pub shop_domain: String,
    pub reverb: ReverbStatusView,
    pub flash: Option<Flash>,
    pub last_batch: Option<BatchSummary>,
}

/// Counts from the most recent listing batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatchSummary {
    pub published: usize,
    pub drafts: usize,
    pub failed: usize,
}

impl BatchSummary {
    #[must_use]
    pub fn from_outcomes(outcomes: &[ListingOutcome]) -> Self {
        outcomes.iter().fold(Self::default(), |mut acc, o| {
            match o {
                ListingOutcome::Created { draft: true, .. } => acc.drafts += 1,
                ListingOutcome::Created { .. } => acc.published += 1,
                ListingOutcome::Failed { .. } => acc.failed += 1,
            }
            acc
        })
    }

    #[must_use]
    pub const fn total(&self) -> usize {
        self.published + self.drafts + self.failed
    }
}

/// Dashboard page handler.
#[instrument(skip(connection, state, session))]
pub async fn index(
    connection: ShopConnection,
    State(state): State<AppState>,
    session: Session,
) -> Response {
    let (shop_name, shop_domain) = match state.shopify().get_shop().await {
        Ok(shop) => (shop.name, shop.domain),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to fetch shop, using stored session");
            let stored = ShopifyTokenRepository::new(state.pool())
                .first_shop()
                .await
                .ok()
                .flatten()
                .unwrap_or_else(|| connection.shop.clone());
            (stored.clone(), stored)
        }
    };

    let reverb = match state.reverb().account().await {
        Ok(account) => ReverbStatusView {
            connected: true,
            detail: account.display_name(),
        },
        Err(e) => {
            tracing::warn!(error = %e, "Reverb account check failed");
            ReverbStatusView {
                connected: false,
                detail: e.to_string(),
            }
        }
    };

    let last_batch = session
        .get::<Vec<ListingOutcome>>(crate::models::session_keys::LAST_BATCH)
        .await
        .ok()
        .flatten()
        .map(|outcomes| BatchSummary::from_outcomes(&outcomes));

    let template = DashboardTemplate {
        current_path: "/".to_string(),
        csrf_token: connection.csrf_token,
        shop_name,
        shop_domain,
        reverb,
        flash: take_flash(&session).await,
        last_batch,
    };

    render(&template)
}

/// Body of the sample-product form.
#[derive(Debug, Deserialize)]
pub struct SampleProductForm {
    pub csrf_token: Option<String>,
}

/// Create a sample draft product, then return to the dashboard.
#[instrument(skip(connection, state, session, form))]
pub async fn create_sample_product(
    connection: ShopConnection,
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<SampleProductForm>,
) -> Response {
    if let Err(e) = connection.verify_csrf(form.csrf_token.as_deref()) {
        return e.into_response();
    }

    match state.shopify().create_sample_product().await {
        Ok(product) => {
            tracing::info!(product_id = %product.id, title = %product.title, "Created sample product");
            set_flash(
                &session,
                Flash::success(format!("Created draft product \"{}\"", product.title)),
            )
            .await;
        }
        Err(e @ crate::shopify::AdminShopifyError::UserError(_)) => {
            set_flash(&session, Flash::error(e.to_string())).await;
        }
        Err(e) => return shopify_failure(&state, e).await,
    }

    Redirect::to("/").into_response()
}
