//! Type conversions from GraphQL response types to domain types.
//!
//! These functions convert the raw response shapes in `queries`
//! into our clean domain types.

mod products;
mod shop;

pub use products::{convert_product, convert_product_connection, convert_status};
pub use shop::convert_shop;

/// Currency Shopify's `Money` scalar is reported in when the query carries none.
pub const DEFAULT_CURRENCY_CODE: &str = "USD";
