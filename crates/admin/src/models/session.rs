//! Session-stored state.
//!
//! There are no user accounts. Shopify vouches for the merchant, either by
//! signing the app-load URL or by completing the install handshake, and the
//! session remembers the shop it vouched for. Besides that it carries the
//! OAuth `state` nonce, the form token, and short-lived feedback between a
//! POST and the page it redirects to.

use serde::{Deserialize, Serialize};

/// Session keys.
pub mod session_keys {
    /// CSRF nonce for the Shopify install flow.
    pub const OAUTH_STATE: &str = "shopify_oauth_state";

    /// Shop domain verified from a signed app load or a finished install.
    pub const SHOP: &str = "shopify_shop";

    /// Token every state-changing form must echo back.
    pub const CSRF_TOKEN: &str = "csrf_token";

    /// One-shot notice shown on the next page render.
    pub const FLASH: &str = "flash";

    /// Outcomes of the most recent listing batch.
    pub const LAST_BATCH: &str = "last_listing_batch";
}

/// Notice severity, mapped to a banner style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlashKind {
    Success,
    Error,
}

impl FlashKind {
    /// CSS modifier for the banner.
    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Success => "banner--success",
            Self::Error => "banner--error",
        }
    }
}

/// A one-shot notice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub kind: FlashKind,
    pub message: String,
}

impl Flash {
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Success,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Error,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flash_constructors() {
        let flash = Flash::success("Product created");
        assert_eq!(flash.kind, FlashKind::Success);
        assert_eq!(flash.kind.css_class(), "banner--success");
        assert_eq!(Flash::error("nope").kind.css_class(), "banner--error");
    }
}
