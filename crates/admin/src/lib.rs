//! Reverb Bridge admin library.
//!
//! An embedded Shopify admin app that lists catalog products and creates
//! Reverb marketplace listings from them. [`app::router`] assembles the
//! routes; the binary in `main.rs` adds sessions, tracing and Sentry and
//! serves it. Everything lives here so the integration tests can drive the
//! router, clients and services directly.
//!
//! # Credentials
//!
//! - Shopify Admin API token, obtained through the app install flow and
//!   stored in `app.shopify_session`
//! - Reverb personal access token, from `REVERB_API_TOKEN`

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod app;
pub mod components;
pub mod config;
pub mod db;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod reverb;
pub mod routes;
pub mod services;
pub mod shopify;
pub mod state;
