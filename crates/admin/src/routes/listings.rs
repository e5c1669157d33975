//! Listing form and submission handlers.
//!
//! The form posts one group of fields per selected product, named
//! `items[<n>].<field>`.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use askama::Template;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use regex::Regex;
use reverb_bridge_core::{DraftReason, ListingDraft, ShopifyGid};
use tower_sessions::Session;
use tracing::instrument;

use crate::{
    error::AppError,
    filters,
    middleware::{CSRF_FIELD, ShopConnection},
    models::{Flash, session_keys},
    reverb::{Category, ListingCondition},
    services::{
        ListingOutcome, submit_listings,
        listing::{build_listing, extract_youtube_link},
    },
    shopify::types::AdminProduct,
    state::AppState,
};

use super::{dashboard::BatchSummary, render, set_flash, shopify_failure, take_flash};

static ITEM_KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^items\[(\d+)\]\.([a-z_]+)$").expect("Invalid regex"));

// =============================================================================
// Form parsing
// =============================================================================

#[derive(Debug, Default)]
struct DraftFields {
    product_id: Option<String>,
    model: String,
    finish: Option<String>,
    condition: Option<String>,
    category: Option<String>,
    draft: bool,
    attach_video: bool,
}

/// Parse the multi-item listing form into drafts, ordered by item index.
///
/// # Errors
///
/// Returns `AppError::BadRequest` for malformed keys, unknown fields, a
/// missing or invalid `product_id`, or a form with no items.
pub fn parse_drafts(pairs: &[(String, String)]) -> Result<Vec<ListingDraft>, AppError> {
    let mut items: BTreeMap<usize, DraftFields> = BTreeMap::new();

    for (key, value) in pairs {
        let caps = ITEM_KEY_RE
            .captures(key)
            .ok_or_else(|| AppError::BadRequest(format!("unexpected form field: {key}")))?;
        let index: usize = caps[1]
            .parse()
            .map_err(|_| AppError::BadRequest(format!("invalid item index in {key}")))?;
        let fields = items.entry(index).or_default();

        match &caps[2] {
            "product_id" => fields.product_id = Some(value.clone()),
            "model" => fields.model.clone_from(value),
            "finish" => fields.finish = Some(value.clone()),
            "condition" => fields.condition = Some(value.clone()),
            "category" => fields.category = Some(value.clone()),
            // Checkboxes are only sent when ticked
            "draft" => fields.draft = true,
            "attach_video" => fields.attach_video = true,
            other => {
                return Err(AppError::BadRequest(format!("unknown listing field: {other}")));
            }
        }
    }

    if items.is_empty() {
        return Err(AppError::BadRequest("no listings submitted".to_string()));
    }

    items
        .into_iter()
        .map(|(index, fields)| {
            let raw_id = fields
                .product_id
                .ok_or_else(|| AppError::BadRequest(format!("item {index} has no product_id")))?;
            let product_id = ShopifyGid::parse(&raw_id)
                .map_err(|e| AppError::BadRequest(format!("item {index}: {e}")))?;
            if product_id.resource() != "Product" {
                return Err(AppError::BadRequest(format!(
                    "item {index}: not a product id: {raw_id}"
                )));
            }

            Ok(ListingDraft {
                product_id,
                model: fields.model,
                finish: fields.finish,
                condition: fields.condition,
                category: fields.category,
                draft: fields.draft,
                attach_video: fields.attach_video,
            })
        })
        .collect()
}

/// Product IDs from repeated `id` query parameters, deduplicated in order.
///
/// # Errors
///
/// Returns `AppError::BadRequest` when an ID is not a product GID.
pub fn selected_ids(pairs: &[(String, String)]) -> Result<Vec<ShopifyGid>, AppError> {
    let mut ids: Vec<ShopifyGid> = Vec::new();
    for (_, value) in pairs.iter().filter(|(k, _)| k == "id") {
        let gid = ShopifyGid::parse(value)
            .map_err(|e| AppError::BadRequest(format!("invalid product id {value}: {e}")))?;
        if gid.resource() != "Product" {
            return Err(AppError::BadRequest(format!("not a product id: {value}")));
        }
        if !ids.contains(&gid) {
            ids.push(gid);
        }
    }
    Ok(ids)
}

// =============================================================================
// Views
// =============================================================================

/// One card in the listing form.
#[derive(Debug, Clone)]
pub struct ListingFormItem {
    pub index: usize,
    pub product_id: String,
    pub title: String,
    pub make: String,
    pub image_url: Option<String>,
    pub photo_count: usize,
    pub price: String,
    pub sku: String,
    pub video_link: Option<String>,
    /// Reasons the listing will be a draft regardless of form input.
    pub warnings: Vec<String>,
}

impl ListingFormItem {
    fn new(index: usize, product: &AdminProduct, state: &AppState) -> Self {
        // A draft with condition and category filled in isolates the
        // product-side problems (photos, price).
        let mut placeholder = ListingDraft::for_product(ShopifyGid::product(0));
        placeholder.condition = Some("-".to_string());
        placeholder.category = Some("-".to_string());
        let built = build_listing(product, &placeholder, state.listing_settings());

        let warnings = built
            .draft_reasons
            .iter()
            .map(|r| format!("Will be saved as draft: {r}"))
            .collect();

        Self {
            index,
            product_id: product.id.clone(),
            title: product.title.clone(),
            make: product.vendor.clone(),
            image_url: product.featured_image().map(|i| i.url.clone()),
            photo_count: product.images.len(),
            price: built
                .request
                .price
                .map_or_else(|| "-".to_string(), |p| format!("{} {}", p.amount, p.currency)),
            sku: built.request.sku.unwrap_or_default(),
            video_link: extract_youtube_link(&product.description_html)
                .or_else(|| extract_youtube_link(&product.description)),
            warnings,
        }
    }
}

/// Listing form template.
#[derive(Template)]
#[template(path = "listings/new.html")]
pub struct ListingFormTemplate {
    pub current_path: String,
    pub csrf_token: String,
    pub items: Vec<ListingFormItem>,
    pub conditions: Vec<ListingCondition>,
    pub categories: Vec<Category>,
    /// Problems loading products or Reverb metadata.
    pub notices: Vec<String>,
}

/// One row of the results page.
#[derive(Debug, Clone)]
pub struct OutcomeView {
    pub title: String,
    pub product_id: String,
    pub ok: bool,
    pub label: String,
    pub detail: String,
    pub url: Option<String>,
}

impl From<&ListingOutcome> for OutcomeView {
    fn from(outcome: &ListingOutcome) -> Self {
        match outcome {
            ListingOutcome::Created {
                product_id,
                title,
                listing_id,
                draft,
                reasons,
                url,
            } => Self {
                title: title.clone(),
                product_id: product_id.to_string(),
                ok: true,
                label: if *draft { "Draft created" } else { "Published" }.to_string(),
                detail: describe_reasons(*listing_id, reasons),
                url: url.clone(),
            },
            ListingOutcome::Failed {
                product_id,
                title,
                message,
            } => Self {
                title: title.clone().unwrap_or_else(|| product_id.to_string()),
                product_id: product_id.to_string(),
                ok: false,
                label: "Failed".to_string(),
                detail: message.clone(),
                url: None,
            },
        }
    }
}

fn describe_reasons(listing_id: u64, reasons: &[DraftReason]) -> String {
    if reasons.is_empty() {
        return format!("Listing #{listing_id}");
    }
    let reasons = reasons
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    format!("Listing #{listing_id} ({reasons})")
}

/// Results page template.
#[derive(Template)]
#[template(path = "listings/results.html")]
pub struct ResultsTemplate {
    pub current_path: String,
    pub summary: BatchSummary,
    pub outcomes: Vec<OutcomeView>,
    pub flash: Option<Flash>,
}

// =============================================================================
// Handlers
// =============================================================================

/// GET /listings/new - One form card per selected product.
#[instrument(skip(connection, state, session, params))]
pub async fn new_form(
    connection: ShopConnection,
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<Vec<(String, String)>>,
) -> Response {
    let ids = match selected_ids(&params) {
        Ok(ids) => ids,
        Err(e) => return e.into_response(),
    };
    if ids.is_empty() {
        set_flash(&session, Flash::error("Select at least one product")).await;
        return Redirect::to("/products").into_response();
    }

    let mut notices = Vec::new();
    let mut items = Vec::with_capacity(ids.len());
    for id in &ids {
        match state.shopify().get_product(&id.to_string()).await {
            Ok(Some(product)) => items.push(ListingFormItem::new(items.len(), &product, &state)),
            Ok(None) => notices.push(format!("Product {id} no longer exists and was skipped")),
            Err(e) => return shopify_failure(&state, e).await,
        }
    }

    let conditions = match state.reverb().listing_conditions().await {
        Ok(conditions) => conditions.as_ref().clone(),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load Reverb conditions");
            notices.push(format!("Could not load Reverb conditions: {e}"));
            Vec::new()
        }
    };
    let categories = match state.reverb().categories().await {
        Ok(categories) => categories.as_ref().clone(),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load Reverb categories");
            notices.push(format!("Could not load Reverb categories: {e}"));
            Vec::new()
        }
    };

    let template = ListingFormTemplate {
        current_path: "/products".to_string(),
        csrf_token: connection.csrf_token,
        items,
        conditions,
        categories,
        notices,
    };

    render(&template)
}

/// POST /listings - Submit every draft, then show the outcomes.
#[instrument(skip(connection, state, session, form))]
pub async fn create(
    connection: ShopConnection,
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<Vec<(String, String)>>,
) -> Result<Response, AppError> {
    let (token, fields): (Vec<_>, Vec<_>) = form.into_iter().partition(|(k, _)| k == CSRF_FIELD);
    connection.verify_csrf(token.first().map(|(_, v)| v.as_str()))?;

    let drafts = parse_drafts(&fields)?;

    let outcomes = submit_listings(
        state.shopify(),
        state.reverb(),
        state.listing_settings(),
        &drafts,
    )
    .await;

    let summary = BatchSummary::from_outcomes(&outcomes);
    let flash = if summary.failed == 0 {
        Flash::success(format!("Created {} Reverb listing(s)", summary.total()))
    } else {
        Flash::error(format!(
            "{} of {} listing(s) failed",
            summary.failed,
            summary.total()
        ))
    };

    session.insert(session_keys::LAST_BATCH, &outcomes).await?;
    set_flash(&session, flash).await;

    // Redirect so a refresh cannot submit the batch twice
    Ok(Redirect::to("/listings/results").into_response())
}

/// GET /listings/results - Outcomes of the last submission.
#[instrument(skip(_connection, session))]
pub async fn results(_connection: ShopConnection, session: Session) -> Result<Response, AppError> {
    let Some(outcomes) = session
        .get::<Vec<ListingOutcome>>(session_keys::LAST_BATCH)
        .await?
    else {
        return Ok(Redirect::to("/products").into_response());
    };

    let template = ResultsTemplate {
        current_path: "/products".to_string(),
        summary: BatchSummary::from_outcomes(&outcomes),
        outcomes: outcomes.iter().map(OutcomeView::from).collect(),
        flash: take_flash(&session).await,
    };

    Ok(render(&template))
}
