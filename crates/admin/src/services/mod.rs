//! Business logic services for admin.
//!
//! # Services
//!
//! - `listing` - Reverb listing creation from Shopify products

pub mod listing;

pub use listing::{ListingOutcome, ListingSettings, submit_listings};
