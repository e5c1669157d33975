//! Listing drafts collected per product before submission to Reverb.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::gid::ShopifyGid;

/// Merchant-entered fields for one Reverb listing.
///
/// Everything not captured here (title, make, photos, price, stock) is taken
/// from the Shopify product at submission time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingDraft {
    /// Source product.
    pub product_id: ShopifyGid,
    /// Reverb "model" field.
    pub model: String,
    /// Reverb "finish" field.
    pub finish: Option<String>,
    /// Reverb listing condition UUID.
    pub condition: Option<String>,
    /// Reverb category UUID.
    pub category: Option<String>,
    /// Merchant asked for the listing to stay a draft.
    pub draft: bool,
    /// Attach a YouTube link found in the product description.
    pub attach_video: bool,
}

impl ListingDraft {
    /// Empty draft for a product, with video attachment on.
    #[must_use]
    pub fn for_product(product_id: ShopifyGid) -> Self {
        Self {
            product_id,
            model: String::new(),
            finish: None,
            condition: None,
            category: None,
            draft: false,
            attach_video: true,
        }
    }
}

/// Why a listing was sent to Reverb as a draft instead of published.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DraftReason {
    /// The merchant ticked the draft box.
    Requested,
    /// The product has no images.
    NoPhotos,
    /// No listing condition was chosen.
    MissingCondition,
    /// No category was chosen.
    MissingCategory,
    /// The product has no variant price, or the price is not positive.
    MissingPrice,
}

impl DraftReason {
    /// Short explanation shown next to the listing outcome.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Requested => "saved as draft on request",
            Self::NoPhotos => "product has no images",
            Self::MissingCondition => "no condition selected",
            Self::MissingCategory => "no category selected",
            Self::MissingPrice => "product has no price",
        }
    }
}

impl fmt::Display for DraftReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_draft_attaches_video_by_default() {
        let draft = ListingDraft::for_product(ShopifyGid::product(1));
        assert!(draft.attach_video);
        assert!(!draft.draft);
        assert!(draft.condition.is_none());
    }

    #[test]
    fn reason_display_uses_message() {
        assert_eq!(DraftReason::NoPhotos.to_string(), "product has no images");
    }
}
