//! Reverb API lookups.
//!
//! Uses the same `REVERB_*` variables as the admin server.

use reverb_bridge_admin::config::{ConfigError, ReverbConfig};
use reverb_bridge_admin::reverb::{ReverbClient, ReverbError};
use thiserror::Error;

/// Errors from Reverb commands.
#[derive(Debug, Error)]
pub enum ReverbCommandError {
    /// Reverb settings are missing or invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The API call failed.
    #[error(transparent)]
    Reverb(#[from] ReverbError),
}

fn client() -> Result<ReverbClient, ReverbCommandError> {
    dotenvy::dotenv().ok();
    let config = ReverbConfig::from_env()?;
    Ok(ReverbClient::new(&config)?)
}

/// Print the account the token belongs to.
///
/// # Errors
///
/// Returns `ReverbCommandError` if configuration is invalid or the request fails.
pub async fn account() -> Result<(), ReverbCommandError> {
    let account = client()?.account().await?;

    #[allow(clippy::print_stdout)]
    {
        println!("Connected as {}", account.display_name());
    }
    Ok(())
}

/// Print listing conditions with their UUIDs.
///
/// # Errors
///
/// Returns `ReverbCommandError` if configuration is invalid or the request fails.
pub async fn conditions() -> Result<(), ReverbCommandError> {
    let conditions = client()?.listing_conditions().await?;

    #[allow(clippy::print_stdout)]
    for condition in conditions.iter() {
        println!("{}  {}", condition.uuid, condition.display_name);
    }
    Ok(())
}

/// Print categories with their UUIDs, optionally filtered by name.
///
/// # Errors
///
/// Returns `ReverbCommandError` if configuration is invalid or the request fails.
pub async fn categories(filter: Option<&str>) -> Result<(), ReverbCommandError> {
    let categories = client()?.categories().await?;
    let needle = filter.map(str::to_lowercase);

    #[allow(clippy::print_stdout)]
    for category in categories.iter().filter(|c| {
        needle
            .as_deref()
            .is_none_or(|n| c.full_name.to_lowercase().contains(n))
    }) {
        println!("{}  {}", category.uuid, category.full_name);
    }
    Ok(())
}
