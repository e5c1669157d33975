//! Status enums for catalog products and marketplace listings.

use serde::{Deserialize, Serialize};

/// Product status on Shopify.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductStatus {
    /// Product is visible on the storefront.
    #[default]
    Active,
    /// Product is not visible (work in progress).
    Draft,
    /// Product is hidden/archived.
    Archived,
    /// Product is unlisted (not shown in search/collections but accessible via URL).
    Unlisted,
}

impl ProductStatus {
    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Draft => "Draft",
            Self::Archived => "Archived",
            Self::Unlisted => "Unlisted",
        }
    }

    /// Value accepted by the Admin API `status:` search filter.
    #[must_use]
    pub const fn search_value(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Draft => "draft",
            Self::Archived => "archived",
            Self::Unlisted => "unlisted",
        }
    }
}

impl std::str::FromStr for ProductStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "draft" => Ok(Self::Draft),
            "archived" => Ok(Self::Archived),
            "unlisted" => Ok(Self::Unlisted),
            _ => Err(format!("invalid product status: {s}")),
        }
    }
}

/// Listing state on Reverb, as reported by `state.slug`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReverbListingState {
    /// Saved but not published.
    Draft,
    /// Published and purchasable.
    Live,
    /// All inventory sold.
    SoldOut,
    /// Ended by the seller.
    Ended,
    /// Suspended by Reverb.
    Suspended,
    /// No listing found, or the state could not be determined.
    #[default]
    Unknown,
}

impl ReverbListingState {
    /// Map a Reverb state slug.
    #[must_use]
    pub fn from_slug(slug: &str) -> Self {
        match slug {
            "draft" => Self::Draft,
            "live" => Self::Live,
            "sold_out" => Self::SoldOut,
            "ended" => Self::Ended,
            "suspended" => Self::Suspended,
            _ => Self::Unknown,
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Live => "Active",
            Self::SoldOut => "Sold Out",
            Self::Ended => "Inactive",
            Self::Suspended => "Suspended",
            Self::Unknown => "Unknown",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_status_parses_case_insensitively() {
        assert_eq!("ACTIVE".parse::<ProductStatus>(), Ok(ProductStatus::Active));
        assert_eq!(" draft ".parse::<ProductStatus>(), Ok(ProductStatus::Draft));
        assert!("live".parse::<ProductStatus>().is_err());
    }

    #[test]
    fn reverb_state_unknown_slug() {
        assert_eq!(ReverbListingState::from_slug("live"), ReverbListingState::Live);
        assert_eq!(
            ReverbListingState::from_slug("something_new"),
            ReverbListingState::Unknown
        );
    }

    #[test]
    fn labels_match_table_badges() {
        assert_eq!(ReverbListingState::Live.label(), "Active");
        assert_eq!(ReverbListingState::Ended.label(), "Inactive");
        assert_eq!(ProductStatus::Archived.label(), "Archived");
    }
}
