//! Product domain types for Shopify Admin API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use reverb_bridge_core::ProductStatus;

use super::common::{Image, Money, PageInfo};

// =============================================================================
// Product Types
// =============================================================================

/// A product variant with the fields listings need.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminProductVariant {
    /// Variant ID.
    pub id: String,
    /// SKU code.
    pub sku: Option<String>,
    /// Current price.
    pub price: Money,
    /// Inventory quantity (across all locations).
    pub inventory_quantity: i64,
}

/// A product in the admin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminProduct {
    /// Product ID.
    pub id: String,
    /// URL handle.
    pub handle: String,
    /// Product title.
    pub title: String,
    /// Vendor name.
    pub vendor: String,
    /// Product type/category.
    #[serde(rename = "product_type")]
    pub kind: String,
    /// Plain text description.
    pub description: String,
    /// HTML description.
    pub description_html: String,
    /// Product status (Active, Draft, Archived).
    pub status: ProductStatus,
    /// Total inventory quantity across all variants.
    pub total_inventory: i64,
    /// Last update timestamp.
    pub updated_at: Option<DateTime<Utc>>,
    /// All product images, featured first.
    pub images: Vec<Image>,
    /// Product variants (first variant only for list queries).
    pub variants: Vec<AdminProductVariant>,
}

impl AdminProduct {
    /// First image, used as the table thumbnail.
    #[must_use]
    pub fn featured_image(&self) -> Option<&Image> {
        self.images.first()
    }

    /// First variant, which carries the SKU and price used for listings.
    #[must_use]
    pub fn primary_variant(&self) -> Option<&AdminProductVariant> {
        self.variants.first()
    }
}

// =============================================================================
// Pagination Types
// =============================================================================

/// Paginated list of products.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminProductConnection {
    /// Products in this page.
    pub products: Vec<AdminProduct>,
    /// Pagination info.
    pub page_info: PageInfo,
}

// =============================================================================
// Sort Keys
// =============================================================================

/// Sort keys for product queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductSortKey {
    /// Sort by title.
    Title,
    /// Sort by product type.
    ProductType,
    /// Sort by vendor.
    Vendor,
    /// Sort by inventory total.
    InventoryTotal,
    /// Sort by last update.
    UpdatedAt,
}

/// A sort key plus direction, as chosen in the product table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductSort {
    /// Field to sort by.
    pub key: ProductSortKey,
    /// Descending order.
    pub reverse: bool,
}

impl Default for ProductSort {
    fn default() -> Self {
        Self {
            key: ProductSortKey::Title,
            reverse: false,
        }
    }
}

impl ProductSort {
    /// Sort options offered in the table, as `(value, label)` pairs.
    pub const OPTIONS: &'static [(&'static str, &'static str)] = &[
        ("title-asc", "Product A-Z"),
        ("title-desc", "Product Z-A"),
        ("vendor-asc", "Vendor A-Z"),
        ("vendor-desc", "Vendor Z-A"),
        ("type-asc", "Type A-Z"),
        ("type-desc", "Type Z-A"),
        ("inventory-desc", "Most stock"),
        ("updated-desc", "Recently modified"),
    ];

    /// Parse a `<field>-<asc|desc>` sort value. Unknown values yield `None`.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let (field, direction) = value.split_once('-')?;
        let key = match field {
            "title" => ProductSortKey::Title,
            "vendor" => ProductSortKey::Vendor,
            "type" => ProductSortKey::ProductType,
            "inventory" => ProductSortKey::InventoryTotal,
            "updated" => ProductSortKey::UpdatedAt,
            _ => return None,
        };
        let reverse = match direction {
            "asc" => false,
            "desc" => true,
            _ => return None,
        };
        Some(Self { key, reverse })
    }

    /// Inverse of [`ProductSort::parse`].
    #[must_use]
    pub fn as_value(&self) -> String {
        let field = match self.key {
            ProductSortKey::Title => "title",
            ProductSortKey::Vendor => "vendor",
            ProductSortKey::ProductType => "type",
            ProductSortKey::InventoryTotal => "inventory",
            ProductSortKey::UpdatedAt => "updated",
        };
        let direction = if self.reverse { "desc" } else { "asc" };
        format!("{field}-{direction}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_parses_known_values() {
        assert_eq!(
            ProductSort::parse("vendor-desc"),
            Some(ProductSort {
                key: ProductSortKey::Vendor,
                reverse: true
            })
        );
        assert_eq!(ProductSort::parse("title-asc"), Some(ProductSort::default()));
    }

    #[test]
    fn sort_rejects_unknown_values() {
        assert_eq!(ProductSort::parse("price-asc"), None);
        assert_eq!(ProductSort::parse("title-up"), None);
        assert_eq!(ProductSort::parse("title"), None);
    }

    #[test]
    fn every_option_round_trips() {
        for (value, _) in ProductSort::OPTIONS {
            let sort = ProductSort::parse(value);
            assert_eq!(sort.map(|s| s.as_value()).as_deref(), Some(*value));
        }
    }
}
