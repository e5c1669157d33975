//! Listing operations.

use std::collections::HashMap;

use reverb_bridge_core::ReverbListingState;
use tracing::instrument;

use super::{
    CreateListingResponse, CreatedListing, ListingRequest, MyListingsResponse, ReverbClient,
    ReverbError,
};

/// Page size for the seller's own listings.
const MY_LISTINGS_PAGE_SIZE: u32 = 100;

impl ReverbClient {
    /// Create a listing.
    ///
    /// `request.publish == false` creates a draft.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or Reverb rejects the listing.
    #[instrument(skip(self, request), fields(sku = ?request.sku, publish = request.publish))]
    pub async fn create_listing(
        &self,
        request: &ListingRequest,
    ) -> Result<CreatedListing, ReverbError> {
        let response: CreateListingResponse = self.post("/listings", request).await?;
        let created = CreatedListing::from(response.listing);

        tracing::info!(listing_id = created.id, state = ?created.state, "Created Reverb listing");

        Ok(created)
    }

    /// Look up the Reverb state of the seller's listings for the given SKUs.
    ///
    /// Reads the most recent page of the seller's listings (all states).
    /// SKUs with no listing on that page are absent from the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, skus), fields(count = skus.len()))]
    pub async fn listing_states_by_sku(
        &self,
        skus: &[String],
    ) -> Result<HashMap<String, ReverbListingState>, ReverbError> {
        if skus.is_empty() {
            return Ok(HashMap::new());
        }

        let path = format!("/my/listings?state=all&per_page={MY_LISTINGS_PAGE_SIZE}");
        let response: MyListingsResponse = self.get(&path).await?;

        let mut states = HashMap::new();
        for listing in response.listings {
            let Some(sku) = listing.sku.as_deref() else {
                continue;
            };
            if skus.iter().any(|s| s == sku) {
                // Newest first; keep the first state seen per SKU
                states
                    .entry(sku.to_string())
                    .or_insert_with(|| listing.state());
            }
        }

        Ok(states)
    }
}
