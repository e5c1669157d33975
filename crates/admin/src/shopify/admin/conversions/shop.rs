//! Shop conversion.

use crate::shopify::types::Shop;

use super::super::queries::get_shop;

pub fn convert_shop(shop: get_shop::GetShopShop) -> Shop {
    Shop {
        name: shop.name,
        domain: shop.myshopify_domain,
        currency_code: shop.currency_code,
    }
}
