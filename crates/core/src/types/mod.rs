//! Core types for reverb-bridge.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod gid;
pub mod listing;
pub mod price;
pub mod status;

pub use gid::{GidError, ShopifyGid};
pub use listing::{DraftReason, ListingDraft};
pub use price::{CurrencyCode, Price};
pub use status::*;
