//! Reverb Bridge CLI - Database migrations and Reverb lookups.
//!
//! # Usage
//!
//! ```bash
//! # Run admin database migrations
//! rb-cli migrate
//!
//! # Check the Reverb token
//! rb-cli reverb account
//!
//! # List listing conditions and categories (UUIDs for the listing form)
//! rb-cli reverb conditions
//! rb-cli reverb categories --filter guitar
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "rb-cli")]
#[command(author, version, about = "Reverb Bridge CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Query the Reverb API with the configured token
    Reverb {
        #[command(subcommand)]
        action: ReverbAction,
    },
}

#[derive(Subcommand)]
enum ReverbAction {
    /// Show the account the token belongs to
    Account,
    /// List listing conditions
    Conditions,
    /// List categories
    Categories {
        /// Only show categories whose name contains this text
        #[arg(short, long)]
        filter: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::admin().await?,
        Commands::Reverb { action } => match action {
            ReverbAction::Account => commands::reverb::account().await?,
            ReverbAction::Conditions => commands::reverb::conditions().await?,
            ReverbAction::Categories { filter } => {
                commands::reverb::categories(filter.as_deref()).await?;
            }
        },
    }
    Ok(())
}
