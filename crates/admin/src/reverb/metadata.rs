//! Listing metadata: conditions, categories, and the seller account.
//!
//! Conditions and categories are cached for an hour.

use std::sync::Arc;

use tracing::{debug, instrument};

use super::{
    Account, CacheValue, CategoriesResponse, Category, ConditionsResponse, ListingCondition,
    ReverbClient, ReverbError,
};

const CONDITIONS_KEY: &str = "listing_conditions";
const CATEGORIES_KEY: &str = "categories";

impl ReverbClient {
    /// The authenticated seller account.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` when the token is invalid, or another error if
    /// the request fails.
    #[instrument(skip(self))]
    pub async fn account(&self) -> Result<Account, ReverbError> {
        self.get("/my/account").await
    }

    /// All listing conditions.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn listing_conditions(&self) -> Result<Arc<Vec<ListingCondition>>, ReverbError> {
        if let Some(CacheValue::Conditions(conditions)) =
            self.inner.cache.get(CONDITIONS_KEY).await
        {
            debug!("Listing conditions cache hit");
            return Ok(conditions);
        }

        let response: ConditionsResponse = self.get("/listing_conditions").await?;
        let conditions = Arc::new(response.conditions);

        self.inner
            .cache
            .insert(CONDITIONS_KEY, CacheValue::Conditions(Arc::clone(&conditions)))
            .await;

        Ok(conditions)
    }

    /// All categories, sorted by full name.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn categories(&self) -> Result<Arc<Vec<Category>>, ReverbError> {
        if let Some(CacheValue::Categories(categories)) =
            self.inner.cache.get(CATEGORIES_KEY).await
        {
            debug!("Categories cache hit");
            return Ok(categories);
        }

        let response: CategoriesResponse = self.get("/categories/flat").await?;
        let mut categories = response.categories;
        categories.sort_by(|a, b| a.full_name.cmp(&b.full_name));
        let categories = Arc::new(categories);

        self.inner
            .cache
            .insert(CATEGORIES_KEY, CacheValue::Categories(Arc::clone(&categories)))
            .await;

        Ok(categories)
    }
}
