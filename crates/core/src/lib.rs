//! reverb-bridge core - Shared types library.
//!
//! This crate provides the domain types used across reverb-bridge components:
//! - `admin` - Embedded Shopify app that creates Reverb listings
//! - `cli` - Command-line tools for migrations and Reverb metadata
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no database
//! access, no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Prices, statuses, Shopify global IDs and listing drafts

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
