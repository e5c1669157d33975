//! Reverb listing creation for Shopify products.
//!
//! Drafts are submitted strictly one at a time. A failed item is logged and
//! recorded, and the loop moves on to the next; nothing is retried.

mod mapping;
mod video;

pub use mapping::{BuiltListing, ListingSettings, build_listing};
pub use video::extract_youtube_link;

use reverb_bridge_core::{DraftReason, ListingDraft, ShopifyGid};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::config::ReverbConfig;
use crate::reverb::{ReverbClient, ReverbError};
use crate::shopify::{AdminClient, AdminShopifyError, types::AdminProduct};

impl From<&ReverbConfig> for ListingSettings {
    fn from(config: &ReverbConfig) -> Self {
        Self {
            currency: config.currency,
            shipping_profile_id: config.shipping_profile_id.clone(),
        }
    }
}

/// Result of submitting one draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum ListingOutcome {
    /// Reverb accepted the listing.
    Created {
        product_id: ShopifyGid,
        title: String,
        listing_id: u64,
        /// Created with `publish = false`.
        draft: bool,
        reasons: Vec<DraftReason>,
        url: Option<String>,
    },
    /// The product could not be loaded or Reverb rejected the listing.
    Failed {
        product_id: ShopifyGid,
        title: Option<String>,
        message: String,
    },
}

impl ListingOutcome {
    #[must_use]
    pub const fn is_created(&self) -> bool {
        matches!(self, Self::Created { .. })
    }

    /// Source product of this outcome.
    #[must_use]
    pub const fn product_id(&self) -> &ShopifyGid {
        match self {
            Self::Created { product_id, .. } | Self::Failed { product_id, .. } => product_id,
        }
    }
}

/// Why a single submission failed.
#[derive(Debug, thiserror::Error)]
enum SubmitError {
    #[error("Shopify: {0}")]
    Shopify(#[from] AdminShopifyError),
    #[error("Reverb: {0}")]
    Reverb(#[from] ReverbError),
    #[error("product not found")]
    ProductNotFound,
}

/// Submit every draft to Reverb, in order, awaiting each before the next.
///
/// Always returns one outcome per draft, in input order.
#[instrument(skip_all, fields(count = drafts.len()))]
pub async fn submit_listings(
    shopify: &AdminClient,
    reverb: &ReverbClient,
    settings: &ListingSettings,
    drafts: &[ListingDraft],
) -> Vec<ListingOutcome> {
    let mut outcomes = Vec::with_capacity(drafts.len());

    for draft in drafts {
        let product = match fetch_product(shopify, &draft.product_id).await {
            Ok(product) => product,
            Err(e) => {
                outcomes.push(failed(draft, None, &e));
                continue;
            }
        };

        let built = build_listing(&product, draft, settings);
        if !built.draft_reasons.is_empty() {
            tracing::debug!(
                product_id = %draft.product_id,
                reasons = ?built.draft_reasons,
                "Listing will be created as draft"
            );
        }

        let outcome = match reverb.create_listing(&built.request).await {
            Ok(listing) => ListingOutcome::Created {
                product_id: draft.product_id.clone(),
                title: product.title,
                listing_id: listing.id,
                draft: !built.request.publish,
                reasons: built.draft_reasons,
                url: listing.web_url,
            },
            Err(e) => failed(draft, Some(product.title), &SubmitError::from(e)),
        };
        outcomes.push(outcome);
    }

    let created = outcomes.iter().filter(|o| o.is_created()).count();
    tracing::info!(
        created,
        failed = outcomes.len() - created,
        "Listing submission finished"
    );

    outcomes
}

async fn fetch_product(
    shopify: &AdminClient,
    id: &ShopifyGid,
) -> Result<AdminProduct, SubmitError> {
    shopify
        .get_product(&id.to_string())
        .await?
        .ok_or(SubmitError::ProductNotFound)
}

fn failed(draft: &ListingDraft, title: Option<String>, error: &SubmitError) -> ListingOutcome {
    tracing::warn!(
        product_id = %draft.product_id,
        error = %error,
        "Failed to create Reverb listing"
    );
    ListingOutcome::Failed {
        product_id: draft.product_id.clone(),
        title,
        message: error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_serializes_with_tag() {
        let outcome = ListingOutcome::Failed {
            product_id: ShopifyGid::product(7),
            title: None,
            message: "Reverb: Unauthorized: invalid API token".to_string(),
        };
        let json = serde_json::to_value(&outcome).unwrap_or_default();
        assert_eq!(json["result"], "failed");
        assert_eq!(json["product_id"], "gid://shopify/Product/7");
        assert!(!outcome.is_created());
        assert_eq!(outcome.product_id().numeric_id(), 7);
    }
}
