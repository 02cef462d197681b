//! SmoothGen CLI - Random product fixtures for e-commerce catalogs.
//!
//! # Usage
//!
//! ```bash
//! # Generate 25 products in memory and export them
//! smoothgen generate products --count 25 --seed 42 --output catalog.json
//!
//! # Generate products on a WooCommerce site (see config.rs for variables)
//! smoothgen generate products --count 10 --store woocommerce --profile fixtures.yaml
//!
//! # Validate a generation profile
//! smoothgen profile check fixtures.yaml
//! ```
//!
//! # Commands
//!
//! - `generate products` - Generate simple and variable products
//! - `profile check` - Validate a YAML generation profile

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LogFormat;

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "smoothgen")]
#[command(author, version, about = "Random product fixtures for e-commerce catalogs")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate fixtures
    Generate {
        #[command(subcommand)]
        target: GenerateTarget,
    },
    /// Work with generation profiles
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },
}

#[derive(Subcommand)]
enum GenerateTarget {
    /// Generate random simple and variable products
    Products(commands::generate::ProductsArgs),
}

#[derive(Subcommand)]
enum ProfileAction {
    /// Validate a YAML generation profile
    Check {
        /// Profile file
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    // Load .env file if present (ignore errors if not found)
    let _ = dotenvy::dotenv();

    init_tracing(LogFormat::from_env());

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn init_tracing(format: LogFormat) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());

    let is_json = format == LogFormat::Json;
    let json_layer = is_json.then(|| tracing_subscriber::fmt::layer().json().flatten_event(true));
    let text_layer = (!is_json).then(tracing_subscriber::fmt::layer);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Generate { target } => match target {
            GenerateTarget::Products(args) => commands::generate::products(args).await?,
        },
        Commands::Profile { action } => match action {
            ProfileAction::Check { file } => commands::profile::check(&file).await?,
        },
    }
    Ok(())
}
