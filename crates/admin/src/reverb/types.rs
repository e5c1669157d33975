//! Reverb API request and response types.

use serde::{Deserialize, Serialize};

use reverb_bridge_core::ReverbListingState;

// =============================================================================
// Listing creation
// =============================================================================

/// Body of `POST /listings`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListingRequest {
    pub make: String,
    pub model: String,
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<UuidRef>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<UuidRef>,
    pub photos: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub videos: Vec<VideoLink>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<ListingPrice>,
    pub has_inventory: bool,
    pub inventory: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_profile_id: Option<String>,
    /// `false` creates a draft.
    pub publish: bool,
}

/// `{"uuid": ".."}` reference used for conditions and categories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UuidRef {
    pub uuid: String,
}

/// `{"link": ".."}` video reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoLink {
    pub link: String,
}

/// Listing price. Amount is a decimal string, currency an ISO 4217 code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingPrice {
    pub amount: String,
    pub currency: String,
}

/// A listing as returned by the API (only the fields we use).
#[derive(Debug, Clone, Deserialize)]
pub struct Listing {
    pub id: u64,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub state: Option<ListingStateRef>,
    #[serde(default, rename = "_links")]
    pub links: Option<ListingLinks>,
}

impl Listing {
    /// Listing state, `Unknown` when absent.
    #[must_use]
    pub fn state(&self) -> ReverbListingState {
        self.state
            .as_ref()
            .map_or_else(ReverbListingState::default, |s| {
                ReverbListingState::from_slug(&s.slug)
            })
    }

    /// Public web URL, when the API provided one.
    #[must_use]
    pub fn web_url(&self) -> Option<&str> {
        self.links
            .as_ref()
            .and_then(|l| l.web.as_ref())
            .map(|w| w.href.as_str())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListingStateRef {
    pub slug: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListingLinks {
    #[serde(default)]
    pub web: Option<Link>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Link {
    pub href: String,
}

/// Response of `POST /listings`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CreateListingResponse {
    pub listing: Listing,
}

/// A listing that was just created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedListing {
    pub id: u64,
    pub state: ReverbListingState,
    pub web_url: Option<String>,
}

impl From<Listing> for CreatedListing {
    fn from(listing: Listing) -> Self {
        Self {
            id: listing.id,
            state: listing.state(),
            web_url: listing.web_url().map(str::to_string),
        }
    }
}

/// Response of `GET /my/listings`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct MyListingsResponse {
    #[serde(default)]
    pub listings: Vec<Listing>,
}

// =============================================================================
// Metadata
// =============================================================================

/// A listing condition (Mint, Excellent, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingCondition {
    pub uuid: String,
    pub display_name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ConditionsResponse {
    pub conditions: Vec<ListingCondition>,
}

/// A marketplace category, from the flat category list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub uuid: String,
    /// Full path, e.g. `Electric Guitars / Solid Body`.
    pub full_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CategoriesResponse {
    pub categories: Vec<Category>,
}

/// The authenticated seller account.
#[derive(Debug, Clone, Deserialize)]
pub struct Account {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub shop_name: Option<String>,
}

impl Account {
    /// Shop name, then full name, then email.
    #[must_use]
    pub fn display_name(&self) -> String {
        if let Some(shop) = self.shop_name.as_deref().filter(|s| !s.is_empty()) {
            return shop.to_string();
        }
        let name = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if !name.is_empty() {
            return name;
        }
        self.email.clone().unwrap_or_else(|| "Reverb seller".to_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn request_omits_absent_optionals() {
        let request = ListingRequest {
            make: "Fender".to_string(),
            model: "Jazzmaster".to_string(),
            title: "Fender Jazzmaster".to_string(),
            description: String::new(),
            finish: None,
            sku: None,
            condition: None,
            categories: vec![],
            photos: vec![],
            videos: vec![],
            price: None,
            has_inventory: true,
            inventory: 0,
            shipping_profile_id: None,
            publish: false,
        };
        let value = serde_json::to_value(&request).unwrap();
        let object = value.as_object().unwrap();

        for key in ["finish", "sku", "condition", "categories", "videos", "price", "shipping_profile_id"] {
            assert!(!object.contains_key(key), "{key} should be omitted");
        }
        assert_eq!(value["publish"], json!(false));
        assert_eq!(value["photos"], json!([]));
    }

    #[test]
    fn listing_reads_state_and_web_link() {
        let listing: Listing = serde_json::from_value(json!({
            "id": 4242,
            "sku": "FJM-1",
            "state": { "slug": "draft", "description": "Draft" },
            "_links": { "web": { "href": "https://reverb.com/item/4242" } }
        }))
        .unwrap();

        let created = CreatedListing::from(listing);
        assert_eq!(created.id, 4242);
        assert_eq!(created.state, ReverbListingState::Draft);
        assert_eq!(created.web_url.as_deref(), Some("https://reverb.com/item/4242"));
    }

    #[test]
    fn account_display_name_fallbacks() {
        let account: Account = serde_json::from_value(json!({
            "first_name": "Ada",
            "last_name": "Lovelace",
            "email": "ada@example.com"
        }))
        .unwrap();
        assert_eq!(account.display_name(), "Ada Lovelace");

        let account: Account = serde_json::from_value(json!({ "email": "ada@example.com" })).unwrap();
        assert_eq!(account.display_name(), "ada@example.com");
    }
}
