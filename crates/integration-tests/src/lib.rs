//! Integration tests for SmoothGen.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p smoothgen-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `generate_catalog` - Full batch runs against the in-memory store
//! - `profiles` - YAML profiles driving generation
//!
//! Everything runs against [`MemoryStore`]; no network access is needed.

use std::collections::HashSet;

use smoothgen_core::{ProductKind, Taxonomy};
use smoothgen_generator::{
    BatchResult, CatalogSnapshot, GenerateError, GeneratorProfile, MemoryStore, ProductGenerator,
};

/// Run a seeded batch into a fresh memory store.
///
/// # Errors
///
/// Returns an error if the profile is invalid or the batch hits a fatal error.
pub async fn generate_catalog(
    seed: u64,
    count: usize,
    profile: GeneratorProfile,
) -> Result<(BatchResult, CatalogSnapshot), GenerateError> {
    let store = MemoryStore::new();
    let mut generator = ProductGenerator::seeded(seed, profile)?;
    let result = generator.generate_batch(&store, count).await?;
    Ok((result, store.into_snapshot()))
}

/// Assert that every ID a record references exists in the catalog.
///
/// # Panics
///
/// Panics with a description of the first dangling reference.
pub fn assert_catalog_consistent(snapshot: &CatalogSnapshot) {
    let product_ids: HashSet<_> = snapshot.products.iter().filter_map(|p| p.id).collect();
    assert_eq!(product_ids.len(), snapshot.products.len(), "product IDs are unique");

    let categories: HashSet<_> = snapshot
        .terms_in(Taxonomy::ProductCategory)
        .map(|t| t.id)
        .collect();
    let tags: HashSet<_> = snapshot.terms_in(Taxonomy::ProductTag).map(|t| t.id).collect();

    for product in &snapshot.products {
        let name = &product.name;
        for image in product.image_id.iter().chain(&product.gallery_image_ids) {
            assert!(snapshot.image(*image).is_some(), "{name}: missing image {image}");
        }
        for category in &product.category_ids {
            assert!(categories.contains(category), "{name}: missing category {category}");
        }
        for tag in &product.tag_ids {
            assert!(tags.contains(tag), "{name}: missing tag {tag}");
        }
        for related in product.upsell_ids.iter().chain(&product.cross_sell_ids) {
            assert!(product_ids.contains(related), "{name}: missing product {related}");
        }
    }

    for variation in &snapshot.variations {
        let parent = snapshot.product(variation.parent_id);
        assert!(
            parent.is_some_and(|p| p.kind == ProductKind::Variable),
            "variation {:?} has no variable parent",
            variation.id
        );
        if let Some(image) = variation.image_id {
            assert!(snapshot.image(image).is_some(), "variation image {image} missing");
        }
    }
}
