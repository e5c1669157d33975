//! Mapping a Shopify product plus a listing draft onto a Reverb listing.

use reverb_bridge_core::{CurrencyCode, DraftReason, ListingDraft, Price};

use crate::reverb::{ListingPrice, ListingRequest, UuidRef, VideoLink};
use crate::shopify::types::AdminProduct;

use super::video::extract_youtube_link;

/// Store-wide listing settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingSettings {
    /// Currency prices are listed in.
    pub currency: CurrencyCode,
    /// Reverb shipping profile applied to every listing.
    pub shipping_profile_id: Option<String>,
}

/// A listing payload plus the reasons it was forced to draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltListing {
    pub request: ListingRequest,
    /// Empty when the listing publishes.
    pub draft_reasons: Vec<DraftReason>,
}

/// Build the Reverb payload for one product.
///
/// The listing is published only when the merchant did not ask for a draft
/// and the product has photos, a positive price, a condition and a category.
#[must_use]
pub fn build_listing(
    product: &AdminProduct,
    draft: &ListingDraft,
    settings: &ListingSettings,
) -> BuiltListing {
    let variant = product.primary_variant();
    let price = variant
        .and_then(|v| Price::parse_amount(&v.price.amount, settings.currency))
        .filter(Price::is_positive);
    let condition = non_empty(draft.condition.as_deref());
    let category = non_empty(draft.category.as_deref());
    let photos: Vec<String> = product.images.iter().map(|i| i.url.clone()).collect();

    let description = if product.description_html.trim().is_empty() {
        product.description.clone()
    } else {
        product.description_html.clone()
    };

    let videos = if draft.attach_video {
        extract_youtube_link(&description)
            .or_else(|| extract_youtube_link(&product.description))
            .map(|link| vec![VideoLink { link }])
            .unwrap_or_default()
    } else {
        Vec::new()
    };

    let mut draft_reasons = Vec::new();
    if draft.draft {
        draft_reasons.push(DraftReason::Requested);
    }
    if photos.is_empty() {
        draft_reasons.push(DraftReason::NoPhotos);
    }
    if condition.is_none() {
        draft_reasons.push(DraftReason::MissingCondition);
    }
    if category.is_none() {
        draft_reasons.push(DraftReason::MissingCategory);
    }
    if price.is_none() {
        draft_reasons.push(DraftReason::MissingPrice);
    }

    let request = ListingRequest {
        make: product.vendor.trim().to_string(),
        model: draft.model.trim().to_string(),
        title: product.title.clone(),
        description,
        finish: non_empty(draft.finish.as_deref()),
        sku: variant.and_then(|v| v.sku.clone()),
        condition: condition.map(|uuid| UuidRef { uuid }),
        categories: category.map(|uuid| vec![UuidRef { uuid }]).unwrap_or_default(),
        photos,
        videos,
        price: price.map(|p| ListingPrice {
            amount: p.amount_string(),
            currency: p.currency_code.code().to_string(),
        }),
        has_inventory: true,
        inventory: product.total_inventory.max(0),
        shipping_profile_id: settings.shipping_profile_id.clone(),
        publish: draft_reasons.is_empty(),
    };

    BuiltListing {
        request,
        draft_reasons,
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use reverb_bridge_core::ShopifyGid;

    use super::*;
    use crate::shopify::types::{AdminProductVariant, Image, Money, ProductStatus};

    fn product() -> AdminProduct {
        AdminProduct {
            id: "gid://shopify/Product/1".to_string(),
            handle: "jazzmaster".to_string(),
            title: "Fender American Vintage II 1966 Jazzmaster".to_string(),
            vendor: "Fender".to_string(),
            kind: "Electric Guitars".to_string(),
            description: "Watch https://youtu.be/dQw4w9WgXcQ".to_string(),
            description_html: "<p>Watch https://youtu.be/dQw4w9WgXcQ</p>".to_string(),
            status: ProductStatus::Active,
            total_inventory: 2,
            updated_at: None,
            images: vec![
                Image {
                    url: "https://cdn.shopify.com/front.jpg".to_string(),
                    alt_text: None,
                },
                Image {
                    url: "https://cdn.shopify.com/back.jpg".to_string(),
                    alt_text: None,
                },
            ],
            variants: vec![AdminProductVariant {
                id: "gid://shopify/ProductVariant/11".to_string(),
                sku: Some("FJM-66".to_string()),
                price: Money {
                    amount: "2499.9".to_string(),
                    currency_code: "USD".to_string(),
                },
                inventory_quantity: 2,
            }],
        }
    }

    fn complete_draft() -> ListingDraft {
        ListingDraft {
            product_id: ShopifyGid::product(1),
            model: "  Jazzmaster ".to_string(),
            finish: Some("Olympic White".to_string()),
            condition: Some("df268ad1-c462-4ba6-b6db-e007e23922ea".to_string()),
            category: Some("dfd39027-d134-4353-b9e4-57dc6be791b9".to_string()),
            draft: false,
            attach_video: true,
        }
    }

    #[test]
    fn complete_listing_publishes() {
        let built = build_listing(&product(), &complete_draft(), &ListingSettings::default());
        let request = &built.request;

        assert!(built.draft_reasons.is_empty());
        assert!(request.publish);
        assert_eq!(request.make, "Fender");
        assert_eq!(request.model, "Jazzmaster");
        assert_eq!(request.sku.as_deref(), Some("FJM-66"));
        assert_eq!(request.photos.len(), 2);
        assert_eq!(request.inventory, 2);
        assert!(request.has_inventory);
        assert_eq!(
            request.price,
            Some(ListingPrice {
                amount: "2499.90".to_string(),
                currency: "USD".to_string()
            })
        );
        assert_eq!(request.categories.len(), 1);
        assert!(request.description.starts_with("<p>"));
    }

    #[test]
    fn no_images_forces_draft() {
        let mut product = product();
        product.images.clear();

        let built = build_listing(&product, &complete_draft(), &ListingSettings::default());

        assert!(!built.request.publish);
        assert_eq!(built.draft_reasons, vec![DraftReason::NoPhotos]);
    }

    #[test]
    fn requested_draft_is_recorded() {
        let mut draft = complete_draft();
        draft.draft = true;

        let built = build_listing(&product(), &draft, &ListingSettings::default());

        assert!(!built.request.publish);
        assert_eq!(built.draft_reasons, vec![DraftReason::Requested]);
    }

    #[test]
    fn blank_fields_are_absent_and_force_draft() {
        let mut draft = complete_draft();
        draft.finish = Some(" ".to_string());
        draft.condition = Some(String::new());
        draft.category = None;

        let built = build_listing(&product(), &draft, &ListingSettings::default());

        assert!(built.request.finish.is_none());
        assert!(built.request.condition.is_none());
        assert!(built.request.categories.is_empty());
        assert_eq!(
            built.draft_reasons,
            vec![DraftReason::MissingCondition, DraftReason::MissingCategory]
        );
    }

    #[test]
    fn zero_or_missing_price_forces_draft() {
        let mut product = product();
        product.variants[0].price.amount = "0.00".to_string();
        let built = build_listing(&product, &complete_draft(), &ListingSettings::default());
        assert!(built.request.price.is_none());
        assert_eq!(built.draft_reasons, vec![DraftReason::MissingPrice]);

        product.variants.clear();
        let built = build_listing(&product, &complete_draft(), &ListingSettings::default());
        assert!(built.request.sku.is_none());
        assert_eq!(built.draft_reasons, vec![DraftReason::MissingPrice]);
    }

    #[test]
    fn video_attached_only_when_requested() {
        let built = build_listing(&product(), &complete_draft(), &ListingSettings::default());
        assert_eq!(
            built.request.videos,
            vec![VideoLink {
                link: "https://www.youtube.com/watch?v=dQw4w9WgXcQ".to_string()
            }]
        );

        let mut draft = complete_draft();
        draft.attach_video = false;
        let built = build_listing(&product(), &draft, &ListingSettings::default());
        assert!(built.request.videos.is_empty());
        let json = serde_json::to_value(&built.request).unwrap();
        assert!(json.get("videos").is_none());
    }

    #[test]
    fn negative_inventory_clamps_to_zero() {
        let mut product = product();
        product.total_inventory = -3;
        let built = build_listing(&product, &complete_draft(), &ListingSettings::default());
        assert_eq!(built.request.inventory, 0);
    }

    #[test]
    fn settings_flow_into_payload() {
        let settings = ListingSettings {
            currency: CurrencyCode::CAD,
            shipping_profile_id: Some("12345".to_string()),
        };
        let built = build_listing(&product(), &complete_draft(), &settings);
        assert_eq!(built.request.price.unwrap().currency, "CAD");
        assert_eq!(built.request.shipping_profile_id.as_deref(), Some("12345"));
    }

    #[test]
    fn plain_description_used_when_html_blank() {
        let mut product = product();
        product.description_html = String::new();
        let built = build_listing(&product, &complete_draft(), &ListingSettings::default());
        assert_eq!(built.request.description, "Watch https://youtu.be/dQw4w9WgXcQ");
    }
}
