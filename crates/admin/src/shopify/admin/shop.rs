//! Shop information.

use tracing::instrument;

use super::{
    AdminClient, AdminShopifyError,
    conversions::convert_shop,
    queries::{GetShop, get_shop},
};
use crate::shopify::types::Shop;

impl AdminClient {
    /// Get the shop's name, domain and currency.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self))]
    pub async fn get_shop(&self) -> Result<Shop, AdminShopifyError> {
        let response = self.execute::<GetShop>(get_shop::Variables {}).await?;
        Ok(convert_shop(response.shop))
    }
}
