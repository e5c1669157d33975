//! Product operations for the Admin API.

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::Serialize;
use tracing::instrument;

use super::{
    AdminClient, AdminShopifyError, GraphQLError,
    conversions::{convert_product, convert_product_connection, convert_status},
    queries::{self, GetProduct, GetProducts, ProductCreate, ProductVariantsBulkUpdate, UserError},
};
use crate::shopify::types::{AdminProduct, AdminProductConnection, ProductSort, ProductStatus};

/// Colors used for generated sample products.
const SAMPLE_COLORS: &[&str] = &["Red", "Orange", "Yellow", "Green"];

/// A product returned by a create mutation.
#[derive(Debug, Clone, Serialize)]
pub struct CreatedProduct {
    pub id: String,
    pub title: String,
    pub handle: String,
    pub status: ProductStatus,
    /// Price of the default variant, when it was set.
    pub price: Option<String>,
}

/// Random sample price below 100, two decimals.
fn sample_price(rng: &mut impl Rng) -> String {
    let cents: u32 = rng.random_range(100..10_000);
    format!("{}.{:02}", cents / 100, cents % 100)
}

fn user_error_message(errors: &[UserError]) -> String {
    errors
        .iter()
        .map(|e| {
            let field = e.field.as_ref().map_or_else(String::new, |f| f.join("."));
            format!("{}: {}", field, e.message)
        })
        .collect::<Vec<_>>()
        .join("; ")
}

impl AdminClient {
    /// Get a product by ID.
    ///
    /// # Arguments
    ///
    /// * `id` - Shopify product ID (e.g., `gid://shopify/Product/123`)
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_product(&self, id: &str) -> Result<Option<AdminProduct>, AdminShopifyError> {
        let variables = queries::get_product::Variables { id: id.to_string() };

        let response = self.execute::<GetProduct>(variables).await?;

        Ok(response.product.map(convert_product))
    }

    /// Get a paginated list of products.
    ///
    /// # Arguments
    ///
    /// * `first` - Number of products to return
    /// * `after` - Cursor for pagination
    /// * `query` - Optional Shopify search query (e.g. `status:active`)
    /// * `sort` - Sort key and direction
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self))]
    pub async fn get_products(
        &self,
        first: i64,
        after: Option<String>,
        query: Option<String>,
        sort: ProductSort,
    ) -> Result<AdminProductConnection, AdminShopifyError> {
        let variables = queries::get_products::Variables {
            first,
            after,
            query,
            sort_key: Some(sort.key),
            reverse: Some(sort.reverse),
        };

        let response = self.execute::<GetProducts>(variables).await?;

        Ok(convert_product_connection(response.products))
    }

    /// Create a draft product titled `<Color> Snowboard` with a random
    /// price on its default variant.
    ///
    /// # Errors
    ///
    /// Returns `UserError` if Shopify rejects the input, or an error if the
    /// API request fails.
    #[instrument(skip(self))]
    pub async fn create_sample_product(&self) -> Result<CreatedProduct, AdminShopifyError> {
        let (color, price) = {
            let mut rng = rand::rng();
            let color = SAMPLE_COLORS.choose(&mut rng).copied().unwrap_or("Red");
            (color, sample_price(&mut rng))
        };

        let variables = queries::product_create::Variables {
            product: queries::product_create::ProductCreateInput {
                title: format!("{color} Snowboard"),
                vendor: None,
                status: "DRAFT",
            },
        };

        let response = self.execute::<ProductCreate>(variables).await?;

        let Some(payload) = response.product_create else {
            return Err(AdminShopifyError::GraphQL(vec![GraphQLError::message(
                "No payload returned from productCreate",
            )]));
        };

        if !payload.user_errors.is_empty() {
            return Err(AdminShopifyError::UserError(user_error_message(
                &payload.user_errors,
            )));
        }

        let product = payload.product.ok_or_else(|| {
            AdminShopifyError::GraphQL(vec![GraphQLError::message(
                "No product returned from create",
            )])
        })?;

        // New products get a single default variant
        let price = match product.variants.edges.first() {
            Some(edge) => Some(self.set_variant_price(&product.id, &edge.node.id, price).await?),
            None => {
                tracing::warn!(product_id = %product.id, "Sample product has no variant to price");
                None
            }
        };

        Ok(CreatedProduct {
            id: product.id,
            title: product.title,
            handle: product.handle,
            status: convert_status(product.status),
            price,
        })
    }

    async fn set_variant_price(
        &self,
        product_id: &str,
        variant_id: &str,
        price: String,
    ) -> Result<String, AdminShopifyError> {
        let variables = queries::product_variants_bulk_update::Variables {
            product_id: product_id.to_string(),
            variants: vec![queries::product_variants_bulk_update::VariantPriceInput {
                id: variant_id.to_string(),
                price,
            }],
        };

        let response = self.execute::<ProductVariantsBulkUpdate>(variables).await?;

        let Some(payload) = response.product_variants_bulk_update else {
            return Err(AdminShopifyError::GraphQL(vec![GraphQLError::message(
                "No payload returned from productVariantsBulkUpdate",
            )]));
        };

        if !payload.user_errors.is_empty() {
            return Err(AdminShopifyError::UserError(user_error_message(
                &payload.user_errors,
            )));
        }

        payload
            .product_variants
            .and_then(|variants| variants.into_iter().next())
            .map(|variant| variant.price)
            .ok_or_else(|| {
                AdminShopifyError::GraphQL(vec![GraphQLError::message(
                    "No variant returned from price update",
                )])
            })
    }
}
