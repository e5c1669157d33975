//! GraphQL operation definitions for Shopify Admin API.
//!
//! Each operation is a unit struct implementing `graphql_client::GraphQLQuery`
//! with a module holding its document, `Variables` and `ResponseData`.

use graphql_client::{GraphQLQuery, QueryBody};
use serde::{Deserialize, Serialize};

/// Fields every product query selects.
macro_rules! product_fields {
    () => {
        r"
fragment ProductFields on Product {
  id
  handle
  title
  vendor
  productType
  description
  descriptionHtml
  status
  totalInventory
  updatedAt
  media(first: 10) {
    edges {
      node {
        preview {
          image {
            url
            altText
          }
        }
      }
    }
  }
  variants(first: 1) {
    edges {
      node {
        id
        sku
        price
        inventoryQuantity
      }
    }
  }
}
"
    };
}

// =============================================================================
// Shared response shapes
// =============================================================================

/// Generic `edges { node }` connection.
#[derive(Debug, Clone, Deserialize)]
pub struct Connection<T> {
    pub edges: Vec<Edge<T>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Edge<T> {
    pub node: T,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub has_next_page: bool,
    pub has_previous_page: bool,
    pub start_cursor: Option<String>,
    pub end_cursor: Option<String>,
}

/// `ProductStatus` enum as sent by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductStatus {
    Active,
    Archived,
    Draft,
    Unlisted,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductNode {
    pub id: String,
    pub handle: String,
    pub title: String,
    pub vendor: String,
    pub product_type: String,
    pub description: String,
    pub description_html: String,
    pub status: ProductStatus,
    pub total_inventory: Option<i64>,
    pub updated_at: Option<String>,
    pub media: Connection<MediaNode>,
    pub variants: Connection<VariantNode>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MediaNode {
    pub preview: Option<MediaPreview>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MediaPreview {
    pub image: Option<MediaImage>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaImage {
    pub url: String,
    pub alt_text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantNode {
    pub id: String,
    pub sku: Option<String>,
    pub price: String,
    pub inventory_quantity: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserError {
    pub field: Option<Vec<String>>,
    pub message: String,
}

// =============================================================================
// Shop query
// =============================================================================

pub struct GetShop;

pub mod get_shop {
    use super::{Deserialize, Serialize};

    pub const OPERATION_NAME: &str = "GetShop";
    pub const QUERY: &str = r"
query GetShop {
  shop {
    name
    myshopifyDomain
    currencyCode
  }
}
";

    #[derive(Debug, Serialize)]
    pub struct Variables {}

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub shop: GetShopShop,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct GetShopShop {
        pub name: String,
        pub myshopify_domain: String,
        pub currency_code: String,
    }
}

impl GraphQLQuery for GetShop {
    type Variables = get_shop::Variables;
    type ResponseData = get_shop::ResponseData;

    fn build_query(variables: Self::Variables) -> QueryBody<Self::Variables> {
        QueryBody {
            variables,
            query: get_shop::QUERY,
            operation_name: get_shop::OPERATION_NAME,
        }
    }
}

// =============================================================================
// Product queries
// =============================================================================

pub struct GetProducts;

pub mod get_products {
    use super::{Deserialize, Edge, PageInfo, ProductNode, Serialize};

    pub const OPERATION_NAME: &str = "GetProducts";
    pub const QUERY: &str = concat!(
        r"
query GetProducts($first: Int!, $after: String, $query: String, $sortKey: ProductSortKeys, $reverse: Boolean) {
  products(first: $first, after: $after, query: $query, sortKey: $sortKey, reverse: $reverse) {
    edges {
      node {
        ...ProductFields
      }
    }
    pageInfo {
      hasNextPage
      hasPreviousPage
      startCursor
      endCursor
    }
  }
}
",
        product_fields!()
    );

    #[derive(Debug, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub first: i64,
        pub after: Option<String>,
        pub query: Option<String>,
        pub sort_key: Option<crate::shopify::types::ProductSortKey>,
        pub reverse: Option<bool>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub products: GetProductsProducts,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct GetProductsProducts {
        pub edges: Vec<Edge<ProductNode>>,
        pub page_info: PageInfo,
    }
}

impl GraphQLQuery for GetProducts {
    type Variables = get_products::Variables;
    type ResponseData = get_products::ResponseData;

    fn build_query(variables: Self::Variables) -> QueryBody<Self::Variables> {
        QueryBody {
            variables,
            query: get_products::QUERY,
            operation_name: get_products::OPERATION_NAME,
        }
    }
}

pub struct GetProduct;

pub mod get_product {
    use super::{Deserialize, ProductNode, Serialize};

    pub const OPERATION_NAME: &str = "GetProduct";
    pub const QUERY: &str = concat!(
        r"
query GetProduct($id: ID!) {
  product(id: $id) {
    ...ProductFields
  }
}
",
        product_fields!()
    );

    #[derive(Debug, Serialize)]
    pub struct Variables {
        pub id: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub product: Option<ProductNode>,
    }
}

impl GraphQLQuery for GetProduct {
    type Variables = get_product::Variables;
    type ResponseData = get_product::ResponseData;

    fn build_query(variables: Self::Variables) -> QueryBody<Self::Variables> {
        QueryBody {
            variables,
            query: get_product::QUERY,
            operation_name: get_product::OPERATION_NAME,
        }
    }
}

// =============================================================================
// Product mutations
// =============================================================================

pub struct ProductCreate;

pub mod product_create {
    use super::{Connection, Deserialize, ProductStatus, Serialize, UserError};

    pub const OPERATION_NAME: &str = "ProductCreate";
    pub const QUERY: &str = r"
mutation ProductCreate($product: ProductCreateInput!) {
  productCreate(product: $product) {
    product {
      id
      title
      handle
      status
      variants(first: 1) {
        edges {
          node {
            id
          }
        }
      }
    }
    userErrors {
      field
      message
    }
  }
}
";

    #[derive(Debug, Serialize)]
    pub struct Variables {
        pub product: ProductCreateInput,
    }

    #[derive(Debug, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ProductCreateInput {
        pub title: String,
        pub vendor: Option<String>,
        pub status: &'static str,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub product_create: Option<ProductCreatePayload>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ProductCreatePayload {
        pub product: Option<ProductCreateProduct>,
        pub user_errors: Vec<UserError>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ProductCreateProduct {
        pub id: String,
        pub title: String,
        pub handle: String,
        pub status: ProductStatus,
        pub variants: Connection<CreatedVariant>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct CreatedVariant {
        pub id: String,
    }
}

impl GraphQLQuery for ProductCreate {
    type Variables = product_create::Variables;
    type ResponseData = product_create::ResponseData;

    fn build_query(variables: Self::Variables) -> QueryBody<Self::Variables> {
        QueryBody {
            variables,
            query: product_create::QUERY,
            operation_name: product_create::OPERATION_NAME,
        }
    }
}

pub struct ProductVariantsBulkUpdate;

pub mod product_variants_bulk_update {
    use super::{Deserialize, Serialize, UserError};

    pub const OPERATION_NAME: &str = "ProductVariantsBulkUpdate";
    pub const QUERY: &str = r"
mutation ProductVariantsBulkUpdate($productId: ID!, $variants: [ProductVariantsBulkInput!]!) {
  productVariantsBulkUpdate(productId: $productId, variants: $variants) {
    productVariants {
      id
      price
    }
    userErrors {
      field
      message
    }
  }
}
";

    #[derive(Debug, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub product_id: String,
        pub variants: Vec<VariantPriceInput>,
    }

    #[derive(Debug, Serialize)]
    pub struct VariantPriceInput {
        pub id: String,
        pub price: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub product_variants_bulk_update: Option<BulkUpdatePayload>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct BulkUpdatePayload {
        pub product_variants: Option<Vec<UpdatedVariant>>,
        pub user_errors: Vec<UserError>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct UpdatedVariant {
        pub id: String,
        pub price: String,
    }
}

impl GraphQLQuery for ProductVariantsBulkUpdate {
    type Variables = product_variants_bulk_update::Variables;
    type ResponseData = product_variants_bulk_update::ResponseData;

    fn build_query(variables: Self::Variables) -> QueryBody<Self::Variables> {
        QueryBody {
            variables,
            query: product_variants_bulk_update::QUERY,
            operation_name: product_variants_bulk_update::OPERATION_NAME,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn product_queries_include_fragment() {
        assert!(get_products::QUERY.contains("fragment ProductFields on Product"));
        assert!(get_product::QUERY.contains("...ProductFields"));
        assert!(get_product::QUERY.contains("fragment ProductFields on Product"));
    }

    #[test]
    fn variables_serialize_camel_case() {
        let body = GetProducts::build_query(get_products::Variables {
            first: 25,
            after: None,
            query: Some("status:active".to_string()),
            sort_key: Some(crate::shopify::types::ProductSortKey::UpdatedAt),
            reverse: Some(true),
        });
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["operationName"], "GetProducts");
        assert_eq!(json["variables"]["sortKey"], "UPDATED_AT");
        assert_eq!(json["variables"]["first"], 25);
    }

    #[test]
    fn bulk_update_variables_serialize_camel_case() {
        let body = ProductVariantsBulkUpdate::build_query(product_variants_bulk_update::Variables {
            product_id: "gid://shopify/Product/1".to_string(),
            variants: vec![product_variants_bulk_update::VariantPriceInput {
                id: "gid://shopify/ProductVariant/9".to_string(),
                price: "42.50".to_string(),
            }],
        });
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["variables"]["productId"], "gid://shopify/Product/1");
        assert_eq!(json["variables"]["variants"][0]["price"], "42.50");
    }

    #[test]
    fn unknown_status_deserializes_as_other() {
        let status: ProductStatus = serde_json::from_str("\"SOMETHING_NEW\"").unwrap();
        assert_eq!(status, ProductStatus::Other);
    }
}
