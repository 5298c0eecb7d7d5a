//! WebSale CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! ws-cli migrate
//!
//! # Import products from a JSON file, replacing the current catalog
//! ws-cli seed products --file data/products.json --replace
//!
//! # Block a customer
//! ws-cli customer set-status --email jane@example.com --status blocked
//! ```
//!
//! # Environment Variables
//!
//! - `WEBSALE_DATABASE_URL` (or `DATABASE_URL`) - `PostgreSQL` connection string

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use secrecy::SecretString;

mod commands;

#[derive(Parser)]
#[command(name = "ws-cli")]
#[command(author, version, about = "WebSale CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed the database
    Seed {
        #[command(subcommand)]
        target: SeedTarget,
    },
    /// Manage customers
    Customer {
        #[command(subcommand)]
        action: CustomerAction,
    },
}

#[derive(Subcommand)]
enum SeedTarget {
    /// Import products from a JSON array
    Products {
        /// Path to the products JSON file
        #[arg(short, long)]
        file: PathBuf,

        /// Delete every existing product first
        #[arg(long)]
        replace: bool,
    },
}

#[derive(Subcommand)]
enum CustomerAction {
    /// Change a customer's account status
    SetStatus {
        /// Customer email address
        #[arg(short, long)]
        email: String,

        /// New status (`active`, `inactive`, `blocked`)
        #[arg(short, long)]
        status: String,
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
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed { target } => match target {
            SeedTarget::Products { file, replace } => {
                commands::seed::products(&file, replace).await?;
            }
        },
        Commands::Customer { action } => match action {
            CustomerAction::SetStatus { email, status } => {
                commands::customer::set_status(&email, &status).await?;
            }
        },
    }
    Ok(())
}

/// Missing database configuration.
#[derive(Debug, thiserror::Error)]
#[error("Missing environment variable: WEBSALE_DATABASE_URL (or DATABASE_URL)")]
pub struct MissingDatabaseUrl;

/// Read the database URL the same way the API server does.
fn database_url() -> Result<SecretString, MissingDatabaseUrl> {
    dotenvy::dotenv().ok();

    std::env::var("WEBSALE_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| MissingDatabaseUrl)
}
