//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::{
    config::AdminConfig,
    reverb::{ReverbClient, ReverbError},
    services::ListingSettings,
    shopify::AdminClient,
};

/// Application state shared across all handlers.
///
/// Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    pool: PgPool,
    shopify: AdminClient,
    reverb: ReverbClient,
    listing_settings: ListingSettings,
}

impl AppState {
    /// Build state with API clients for the configured endpoints.
    ///
    /// # Errors
    ///
    /// Returns an error if the Reverb client cannot be built (e.g. the token
    /// is not a valid header value).
    pub fn new(config: AdminConfig, pool: PgPool) -> Result<Self, ReverbError> {
        let shopify = AdminClient::new(&config.shopify);
        let reverb = ReverbClient::new(&config.reverb)?;
        Ok(Self::with_clients(config, pool, shopify, reverb))
    }

    /// Build state around existing clients.
    #[must_use]
    pub fn with_clients(
        config: AdminConfig,
        pool: PgPool,
        shopify: AdminClient,
        reverb: ReverbClient,
    ) -> Self {
        let listing_settings = ListingSettings::from(&config.reverb);
        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                shopify,
                reverb,
                listing_settings,
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    #[must_use]
    pub fn shopify(&self) -> &AdminClient {
        &self.inner.shopify
    }

    #[must_use]
    pub fn reverb(&self) -> &ReverbClient {
        &self.inner.reverb
    }

    /// Currency and shipping profile applied to new listings.
    #[must_use]
    pub fn listing_settings(&self) -> &ListingSettings {
        &self.inner.listing_settings
    }
}
