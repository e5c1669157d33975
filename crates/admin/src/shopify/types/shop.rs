//! Shop identity types.

use serde::{Deserialize, Serialize};

/// The connected shop, as shown in the dashboard greeting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shop {
    /// Shop display name.
    pub name: String,
    /// Permanent `*.myshopify.com` domain.
    pub domain: String,
    /// Store currency (ISO 4217).
    pub currency_code: String,
}
