//! Shopify global ID type.

use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

const GID_PREFIX: &str = "gid://shopify/";

/// Errors that can occur when parsing a [`ShopifyGid`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum GidError {
    /// The input does not start with `gid://shopify/`.
    #[error("global ID must start with {GID_PREFIX}")]
    MissingPrefix,
    /// The resource type segment is empty.
    #[error("global ID is missing a resource type")]
    MissingResource,
    /// The numeric ID segment is missing or not a number.
    #[error("global ID has an invalid numeric id: {0}")]
    InvalidId(String),
}

/// A Shopify global ID such as `gid://shopify/Product/123`.
///
/// Query strings some resources carry (e.g. `?checkout=...`) are dropped.
///
/// ## Examples
///
/// ```
/// use reverb_bridge_core::ShopifyGid;
///
/// let gid = ShopifyGid::parse("gid://shopify/Product/8123").unwrap();
/// assert_eq!(gid.resource(), "Product");
/// assert_eq!(gid.numeric_id(), 8123);
/// assert_eq!(gid.to_string(), "gid://shopify/Product/8123");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ShopifyGid {
    resource: String,
    id: u64,
}

impl ShopifyGid {
    /// Build a global ID from its parts.
    #[must_use]
    pub fn new(resource: impl Into<String>, id: u64) -> Self {
        Self {
            resource: resource.into(),
            id,
        }
    }

    /// Build a product global ID.
    #[must_use]
    pub fn product(id: u64) -> Self {
        Self::new("Product", id)
    }

    /// Parse a global ID string.
    ///
    /// # Errors
    ///
    /// Returns [`GidError`] if the string is not a well-formed Shopify global ID.
    pub fn parse(value: &str) -> Result<Self, GidError> {
        let rest = value
            .trim()
            .strip_prefix(GID_PREFIX)
            .ok_or(GidError::MissingPrefix)?;
        let rest = rest.split('?').next().unwrap_or_default();

        let (resource, id) = rest.split_once('/').ok_or(GidError::MissingResource)?;
        if resource.is_empty() {
            return Err(GidError::MissingResource);
        }

        let id = id
            .parse::<u64>()
            .map_err(|_| GidError::InvalidId(id.to_string()))?;

        Ok(Self {
            resource: resource.to_string(),
            id,
        })
    }

    /// Resource type segment (e.g. `Product`).
    #[must_use]
    pub fn resource(&self) -> &str {
        &self.resource
    }

    /// Trailing numeric ID, as used in admin URLs.
    #[must_use]
    pub const fn numeric_id(&self) -> u64 {
        self.id
    }
}

impl fmt::Display for ShopifyGid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{GID_PREFIX}{}/{}", self.resource, self.id)
    }
}

impl FromStr for ShopifyGid {
    type Err = GidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ShopifyGid {
    type Error = GidError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ShopifyGid> for String {
    fn from(gid: ShopifyGid) -> Self {
        gid.to_string()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parses_product_gid() {
        let gid = ShopifyGid::parse("gid://shopify/Product/42").unwrap();
        assert_eq!(gid, ShopifyGid::product(42));
    }

    #[test]
    fn strips_query_suffix() {
        let gid = ShopifyGid::parse("gid://shopify/MediaImage/7?v=2").unwrap();
        assert_eq!(gid.resource(), "MediaImage");
        assert_eq!(gid.numeric_id(), 7);
    }

    #[test]
    fn rejects_bare_number() {
        assert_eq!(ShopifyGid::parse("42"), Err(GidError::MissingPrefix));
    }

    #[test]
    fn rejects_missing_resource() {
        assert_eq!(
            ShopifyGid::parse("gid://shopify//42"),
            Err(GidError::MissingResource)
        );
        assert_eq!(
            ShopifyGid::parse("gid://shopify/42"),
            Err(GidError::MissingResource)
        );
    }

    #[test]
    fn rejects_non_numeric_id() {
        assert!(matches!(
            ShopifyGid::parse("gid://shopify/Product/abc"),
            Err(GidError::InvalidId(_))
        ));
    }

    #[test]
    fn serde_uses_string_form() {
        let gid = ShopifyGid::product(9);
        let json = serde_json::to_string(&gid).unwrap();
        assert_eq!(json, "\"gid://shopify/Product/9\"");
        let back: ShopifyGid = serde_json::from_str(&json).unwrap();
        assert_eq!(back, gid);
    }
}
