//! Integration tests for full generation runs against the in-memory store.

use smoothgen_core::{ProductKind, StockStatus, slugify};
use smoothgen_generator::{GeneratorProfile, cartesian_product};
use smoothgen_integration_tests::{assert_catalog_consistent, generate_catalog};

// =============================================================================
// Batch Runs
// =============================================================================

#[tokio::test]
async fn test_batch_produces_consistent_catalog() {
    let (result, snapshot) = generate_catalog(2024, 40, GeneratorProfile::default())
        .await
        .expect("batch");

    assert_eq!(result.generated(), 40);
    assert!(result.errors.is_empty());
    assert_eq!(snapshot.products.len(), 40);
    assert_eq!(snapshot.variations.len(), result.variations);
    assert_eq!(result.product_ids.len(), 40);
    assert_catalog_consistent(&snapshot);
}

#[tokio::test]
async fn test_batch_mixes_product_kinds() {
    let (result, snapshot) = generate_catalog(7, 60, GeneratorProfile::default())
        .await
        .expect("batch");

    // 30% variable by default.
    assert!(result.simple > 0);
    assert!(result.variable > 0);

    let variable = snapshot
        .products
        .iter()
        .filter(|p| p.kind == ProductKind::Variable)
        .count();
    assert_eq!(variable, result.variable);
}

#[tokio::test]
async fn test_zero_count_is_empty_run() {
    let (result, snapshot) = generate_catalog(1, 0, GeneratorProfile::default())
        .await
        .expect("batch");
    assert_eq!(result.generated(), 0);
    assert!(snapshot.products.is_empty());
    assert!(snapshot.images.is_empty());
}

// =============================================================================
// Variable Products
// =============================================================================

#[tokio::test]
async fn test_variations_follow_attribute_combinations() {
    let profile = GeneratorProfile {
        variable_chance: 1.0,
        ..GeneratorProfile::default()
    };
    let (_, snapshot) = generate_catalog(99, 8, profile).await.expect("batch");

    for product in &snapshot.products {
        let parent = product.id.expect("stored product has ID");
        let axes: Vec<(String, Vec<String>)> = product
            .variation_attributes()
            .map(|attr| (attr.slug(), attr.options.iter().map(|o| slugify(o)).collect()))
            .collect();
        let expected = cartesian_product(&axes);

        let variations: Vec<_> = snapshot.variations_of(parent).collect();
        assert_eq!(variations.len(), expected.len(), "{}", product.name);

        for (position, (variation, combination)) in variations.iter().zip(&expected).enumerate() {
            for (slug, option) in combination {
                assert_eq!(variation.attributes.get(slug), Some(option.as_str()));
            }
            assert_eq!(usize::try_from(variation.menu_order).ok(), Some(position));
            assert_eq!(variation.stock_status, StockStatus::InStock);
        }
    }
}

#[tokio::test]
async fn test_simple_products_never_manage_stock() {
    let profile = GeneratorProfile {
        variable_chance: 0.0,
        ..GeneratorProfile::default()
    };
    let (_, snapshot) = generate_catalog(5, 20, profile).await.expect("batch");

    assert!(snapshot.variations.is_empty());
    for product in &snapshot.products {
        assert!(!product.manage_stock);
        assert!(product.stock_quantity.is_none());
        assert!(product.sku.is_some());
    }
}

// =============================================================================
// Reproducibility & Export
// =============================================================================

#[tokio::test]
async fn test_seed_determines_catalog() {
    let (_, first) = generate_catalog(31, 10, GeneratorProfile::default())
        .await
        .expect("batch");
    let (_, second) = generate_catalog(31, 10, GeneratorProfile::default())
        .await
        .expect("batch");
    let (_, other) = generate_catalog(32, 10, GeneratorProfile::default())
        .await
        .expect("batch");

    let names = |snapshot: &smoothgen_generator::CatalogSnapshot| {
        snapshot
            .products
            .iter()
            .map(|p| p.name.clone())
            .collect::<Vec<_>>()
    };
    assert_eq!(names(&first), names(&second));
    assert_eq!(first.images, second.images);
    assert_ne!(names(&first), names(&other));
}

#[tokio::test]
async fn test_snapshot_exports_as_json() {
    let (_, snapshot) = generate_catalog(3, 5, GeneratorProfile::default())
        .await
        .expect("batch");

    let json = serde_json::to_value(&snapshot).expect("serialize");
    let products = json["products"].as_array().expect("products array");
    assert_eq!(products.len(), 5);

    let first = &products[0];
    assert!(first["virtual"].is_boolean());
    assert_eq!(first["stock_status"], "instock");
    assert!(first["regular_price"]["amount"].is_string());

    let restored: smoothgen_generator::CatalogSnapshot =
        serde_json::from_value(json).expect("deserialize");
    assert_eq!(restored, snapshot);
}
