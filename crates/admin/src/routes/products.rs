//! Product table route handler.

use std::collections::HashMap;

use askama::Template;
use axum::{
    extract::{Query, State},
    response::Response,
};
use reverb_bridge_core::{CurrencyCode, Price, ReverbListingState};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::{
    components::{DataTableConfig, products_table_config},
    filters::{self, NAME_DISPLAY_LEN, truncate_chars},
    middleware::ShopConnection,
    models::Flash,
    shopify::types::{AdminProduct, ProductSort, ProductStatus},
    state::AppState,
};

use super::{render, shopify_failure, take_flash};

/// Products per page, as in the Shopify admin.
pub const PAGE_SIZE: i64 = 25;

/// Thumbnail shown for products without images.
pub const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/50";

/// Table query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct ProductsQuery {
    /// Case-insensitive name filter.
    pub q: Option<String>,
    /// `active`, `draft` or `archived`; empty means all.
    pub status: Option<String>,
    /// Product type filter.
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// `<field>-<asc|desc>`.
    pub sort: Option<String>,
    /// Pagination cursor.
    pub cursor: Option<String>,
}

/// One table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductView {
    pub id: String,
    pub image_url: String,
    pub name: String,
    pub short_name: String,
    pub sku: String,
    pub price: String,
    pub stock: i64,
    pub in_stock: bool,
    pub status: String,
    pub status_class: String,
    pub last_modified: String,
    pub reverb_status: String,
    pub reverb_class: String,
}

// =============================================================================
// Type Conversions
// =============================================================================

impl ProductView {
    /// Flatten a product into a table row.
    #[must_use]
    pub fn new(
        product: &AdminProduct,
        reverb_states: &HashMap<String, ReverbListingState>,
        currency: CurrencyCode,
    ) -> Self {
        let status_class = match product.status {
            ProductStatus::Active => "badge--success",
            ProductStatus::Draft => "badge--warning",
            ProductStatus::Archived => "badge--muted",
            ProductStatus::Unlisted => "badge--info",
        };

        let variant = product.primary_variant();
        let sku = variant.and_then(|v| v.sku.clone()).unwrap_or_default();
        let price = variant
            .and_then(|v| Price::parse_amount(&v.price.amount, currency))
            .map_or_else(|| "-".to_string(), |p| p.display());

        let reverb_state = reverb_states.get(&sku).copied().unwrap_or_default();
        let reverb_class = match reverb_state {
            ReverbListingState::Live => "badge--success",
            ReverbListingState::Draft => "badge--warning",
            ReverbListingState::SoldOut | ReverbListingState::Ended => "badge--muted",
            ReverbListingState::Suspended => "badge--critical",
            ReverbListingState::Unknown => "badge--info",
        };

        Self {
            id: product.id.clone(),
            image_url: product
                .featured_image()
                .map_or_else(|| PLACEHOLDER_IMAGE.to_string(), |i| i.url.clone()),
            name: product.title.clone(),
            short_name: truncate_chars(&product.title, NAME_DISPLAY_LEN),
            sku,
            price,
            stock: product.total_inventory,
            in_stock: product.total_inventory > 0,
            status: product.status.label().to_string(),
            status_class: status_class.to_string(),
            last_modified: product.updated_at.map_or_else(
                || "Unknown Date".to_string(),
                |d| d.format("%Y-%m-%d").to_string(),
            ),
            reverb_status: reverb_state.label().to_string(),
            reverb_class: reverb_class.to_string(),
        }
    }
}

/// Keep rows whose name contains `query`, ignoring case.
#[must_use]
pub fn filter_by_name(rows: Vec<ProductView>, query: &str) -> Vec<ProductView> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return rows;
    }
    rows.into_iter()
        .filter(|row| row.name.to_lowercase().contains(&needle))
        .collect()
}

/// Shopify search syntax for the status and product type filters.
#[must_use]
pub fn build_search_query(status: Option<&str>, kind: Option<&str>) -> Option<String> {
    let mut terms = Vec::new();

    if let Some(status) = status.and_then(|s| s.parse::<ProductStatus>().ok()) {
        terms.push(format!("status:{}", status.search_value()));
    }

    if let Some(kind) = kind.map(str::trim).filter(|k| !k.is_empty()) {
        let escaped = kind.replace('\\', "\\\\").replace('"', "\\\"");
        terms.push(format!("product_type:\"{escaped}\""));
    }

    (!terms.is_empty()).then(|| terms.join(" AND "))
}

/// Product table template.
#[derive(Template)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub current_path: String,
    pub table: DataTableConfig,
    pub products: Vec<ProductView>,
    pub has_next_page: bool,
    pub next_cursor: Option<String>,
    pub search_query: String,
    pub status_filter: String,
    pub type_filter: String,
    pub sort: String,
    pub flash: Option<Flash>,
}

impl ProductsIndexTemplate {
    /// Query string for the next page, preserving filters.
    #[must_use]
    pub fn next_page_href(&self) -> Option<String> {
        let cursor = self.next_cursor.as_deref()?;
        Some(self.href_with(&self.sort, Some(cursor)))
    }

    /// Query string for sorting by `sort`, preserving filters.
    #[must_use]
    pub fn sort_href(&self, sort: &str) -> String {
        self.href_with(sort, None)
    }

    /// Current value of the filter named `key`.
    #[must_use]
    pub fn filter_value(&self, key: &str) -> &str {
        match key {
            "q" => &self.search_query,
            "status" => &self.status_filter,
            "type" => &self.type_filter,
            "sort" => &self.sort,
            _ => "",
        }
    }

    fn href_with(&self, sort: &str, cursor: Option<&str>) -> String {
        let mut href = format!(
            "/products?q={}&status={}&type={}&sort={}",
            urlencoding::encode(&self.search_query),
            urlencoding::encode(&self.status_filter),
            urlencoding::encode(&self.type_filter),
            urlencoding::encode(sort),
        );
        if let Some(cursor) = cursor {
            href.push_str("&cursor=");
            href.push_str(&urlencoding::encode(cursor));
        }
        href
    }
}

/// Product table handler.
#[instrument(skip(_connection, state, session))]
pub async fn index(
    _connection: ShopConnection,
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<ProductsQuery>,
) -> Response {
    let sort = query
        .sort
        .as_deref()
        .and_then(ProductSort::parse)
        .unwrap_or_default();
    let search = build_search_query(query.status.as_deref(), query.kind.as_deref());

    let page = match state
        .shopify()
        .get_products(PAGE_SIZE, query.cursor.clone(), search, sort)
        .await
    {
        Ok(page) => page,
        Err(e) => return shopify_failure(&state, e).await,
    };

    let skus: Vec<String> = page
        .products
        .iter()
        .filter_map(|p| p.primary_variant().and_then(|v| v.sku.clone()))
        .collect();

    // Reverb status is informational; the table still renders without it
    let reverb_states = match state.reverb().listing_states_by_sku(&skus).await {
        Ok(states) => states,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to fetch Reverb listing states");
            HashMap::new()
        }
    };

    let currency = state.listing_settings().currency;
    let rows = page
        .products
        .iter()
        .map(|p| ProductView::new(p, &reverb_states, currency))
        .collect();
    let search_query = query.q.unwrap_or_default();

    let template = ProductsIndexTemplate {
        current_path: "/products".to_string(),
        table: products_table_config(),
        products: filter_by_name(rows, &search_query),
        has_next_page: page.page_info.has_next_page,
        next_cursor: page.page_info.end_cursor,
        search_query,
        status_filter: query.status.unwrap_or_default(),
        type_filter: query.kind.unwrap_or_default(),
        sort: sort.as_value(),
        flash: take_flash(&session).await,
    };

    render(&template)
}
