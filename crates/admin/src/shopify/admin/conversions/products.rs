//! Product type conversion functions.

use chrono::{DateTime, Utc};

use crate::shopify::types::{
    AdminProduct, AdminProductConnection, AdminProductVariant, Image, Money, PageInfo,
    ProductStatus,
};

use super::super::queries::{self, ProductNode, VariantNode, get_products};
use super::DEFAULT_CURRENCY_CODE;

// =============================================================================
// Product conversions
// =============================================================================

/// Unknown statuses are treated as drafts, the most restrictive state.
pub const fn convert_status(status: queries::ProductStatus) -> ProductStatus {
    match status {
        queries::ProductStatus::Active => ProductStatus::Active,
        queries::ProductStatus::Archived => ProductStatus::Archived,
        queries::ProductStatus::Unlisted => ProductStatus::Unlisted,
        queries::ProductStatus::Draft | queries::ProductStatus::Other => ProductStatus::Draft,
    }
}

pub fn convert_product(product: ProductNode) -> AdminProduct {
    let status = convert_status(product.status);

    // totalInventory is null for products without tracked inventory
    let total_inventory = product.total_inventory.unwrap_or_else(|| {
        product
            .variants
            .edges
            .iter()
            .filter_map(|e| e.node.inventory_quantity)
            .sum()
    });

    AdminProduct {
        id: product.id,
        handle: product.handle,
        title: product.title,
        vendor: product.vendor,
        kind: product.product_type,
        description: product.description,
        description_html: product.description_html,
        status,
        total_inventory,
        updated_at: product.updated_at.as_deref().and_then(parse_timestamp),
        images: product
            .media
            .edges
            .into_iter()
            .filter_map(|e| {
                e.node.preview.and_then(|p| p.image).map(|i| Image {
                    url: i.url,
                    alt_text: i.alt_text,
                })
            })
            .collect(),
        variants: product
            .variants
            .edges
            .into_iter()
            .map(|e| convert_variant(e.node))
            .collect(),
    }
}

fn convert_variant(v: VariantNode) -> AdminProductVariant {
    AdminProductVariant {
        id: v.id,
        sku: v.sku.filter(|s| !s.trim().is_empty()),
        price: Money {
            amount: v.price,
            currency_code: DEFAULT_CURRENCY_CODE.to_string(), // Price is Money scalar, no currency info
        },
        inventory_quantity: v.inventory_quantity.unwrap_or(0),
    }
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

// =============================================================================
// GetProducts conversions
// =============================================================================

pub fn convert_product_connection(
    conn: get_products::GetProductsProducts,
) -> AdminProductConnection {
    AdminProductConnection {
        products: conn
            .edges
            .into_iter()
            .map(|e| convert_product(e.node))
            .collect(),
        page_info: PageInfo {
            has_next_page: conn.page_info.has_next_page,
            has_previous_page: conn.page_info.has_previous_page,
            start_cursor: conn.page_info.start_cursor,
            end_cursor: conn.page_info.end_cursor,
        },
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn node(value: serde_json::Value) -> ProductNode {
        serde_json::from_value(value).unwrap()
    }

    fn base_node() -> serde_json::Value {
        json!({
            "id": "gid://shopify/Product/1",
            "handle": "jazzmaster",
            "title": "Fender Jazzmaster",
            "vendor": "Fender",
            "productType": "Electric Guitars",
            "description": "Offset classic",
            "descriptionHtml": "<p>Offset classic</p>",
            "status": "ACTIVE",
            "totalInventory": 3,
            "updatedAt": "2024-05-01T12:30:00Z",
            "media": { "edges": [
                { "node": { "preview": { "image": { "url": "https://cdn.shopify.com/a.jpg", "altText": null } } } },
                { "node": { "preview": null } },
                { "node": { "preview": { "image": { "url": "https://cdn.shopify.com/b.jpg", "altText": "back" } } } }
            ]},
            "variants": { "edges": [
                { "node": { "id": "gid://shopify/ProductVariant/11", "sku": "FJM-1", "price": "1299.00", "inventoryQuantity": 3 } }
            ]}
        })
    }

    #[test]
    fn flattens_media_and_variants() {
        let product = convert_product(node(base_node()));

        assert_eq!(product.status, ProductStatus::Active);
        assert_eq!(product.images.len(), 2, "media without preview image is skipped");
        assert_eq!(product.featured_image().unwrap().url, "https://cdn.shopify.com/a.jpg");
        let variant = product.primary_variant().unwrap();
        assert_eq!(variant.sku.as_deref(), Some("FJM-1"));
        assert_eq!(variant.price.amount, "1299.00");
        assert_eq!(
            product.updated_at.unwrap().format("%Y-%m-%d").to_string(),
            "2024-05-01"
        );
    }

    #[test]
    fn blank_sku_becomes_none() {
        let mut value = base_node();
        value["variants"]["edges"][0]["node"]["sku"] = json!("  ");
        let product = convert_product(node(value));
        assert!(product.primary_variant().unwrap().sku.is_none());
    }

    #[test]
    fn missing_total_inventory_falls_back_to_variants() {
        let mut value = base_node();
        value["totalInventory"] = json!(null);
        value["variants"]["edges"][0]["node"]["inventoryQuantity"] = json!(7);
        let product = convert_product(node(value));
        assert_eq!(product.total_inventory, 7);
    }

    #[test]
    fn unknown_status_maps_to_draft() {
        let mut value = base_node();
        value["status"] = json!("PENDING_REVIEW");
        let product = convert_product(node(value));
        assert_eq!(product.status, ProductStatus::Draft);
    }
}
