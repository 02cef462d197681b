//! Generate fixtures into a catalog store.

use std::path::PathBuf;

use clap::{Args, ValueEnum};
use smoothgen_generator::{
    BatchResult, CatalogStore, GeneratorProfile, MemoryStore, ProductGenerator, WooCommerceStore,
};
use tracing::{error, info};

use crate::config;

/// Where generated products are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StoreKind {
    /// Keep the catalog in memory (optionally exported as JSON)
    Memory,
    /// Create the products on a WooCommerce site
    #[value(name = "woocommerce")]
    WooCommerce,
}

/// Options for `generate products`.
#[derive(Debug, Args)]
pub struct ProductsArgs {
    /// Number of products to generate
    #[arg(short, long, default_value_t = 10)]
    pub count: usize,

    /// RNG seed for a reproducible run (random if omitted)
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// YAML generation profile
    #[arg(short, long)]
    pub profile: Option<PathBuf>,

    /// Catalog store to write to
    #[arg(long, value_enum, default_value_t = StoreKind::Memory)]
    pub store: StoreKind,

    /// Write the generated catalog as JSON (memory store only)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Generate random products.
///
/// # Errors
///
/// Returns an error if the profile or configuration is invalid, a fatal
/// store error occurs, or the output file cannot be written.
pub async fn products(args: ProductsArgs) -> Result<(), Box<dyn std::error::Error>> {
    if args.output.is_some() && args.store != StoreKind::Memory {
        return Err("--output is only supported with --store memory".into());
    }

    let profile = match &args.profile {
        Some(path) => GeneratorProfile::load(path).await?,
        None => GeneratorProfile::default(),
    };
    let seed = args.seed.unwrap_or_else(rand::random);
    let mut generator = ProductGenerator::seeded(seed, profile)?;

    info!(seed, count = args.count, store = ?args.store, "Generating products");

    match args.store {
        StoreKind::Memory => {
            let store = MemoryStore::new();
            run(&mut generator, &store, args.count).await?;

            if let Some(path) = &args.output {
                let snapshot = store.into_snapshot();
                let json = serde_json::to_string_pretty(&snapshot)?;
                tokio::fs::write(path, json).await?;
                info!(path = %path.display(), products = snapshot.products.len(), "Wrote catalog");
            }
        }
        StoreKind::WooCommerce => {
            let config = config::woocommerce_from_env()?;
            info!(site = %config.base_url, "Connecting to WooCommerce");
            let store = WooCommerceStore::new(&config)?;
            run(&mut generator, &store, args.count).await?;
        }
    }

    Ok(())
}

async fn run<S: CatalogStore>(
    generator: &mut ProductGenerator,
    store: &S,
    count: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let result = generator.generate_batch(store, count).await?;
    report(&result);

    if result.generated() == 0 && count > 0 {
        return Err("no products were generated".into());
    }
    Ok(())
}

fn report(result: &BatchResult) {
    info!("Generation complete!");
    info!("  Simple products: {}", result.simple);
    info!("  Variable products: {}", result.variable);
    info!("  Variations: {}", result.variations);

    if !result.errors.is_empty() {
        error!("  Errors: {}", result.errors.len());
        for (index, err) in &result.errors {
            error!("    - product {index}: {err}");
        }
    }
}
