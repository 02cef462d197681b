//! Integration tests for YAML profiles driving generation.

use rust_decimal::Decimal;
use smoothgen_core::CurrencyCode;
use smoothgen_generator::{GeneratorProfile, ProfileError};
use smoothgen_integration_tests::{assert_catalog_consistent, generate_catalog};

const FIXED_PROFILE: &str = r"
variable_chance: 0.5
sale_chance: 1.0
gallery_chance: 0.0
currency: GBP
overrides:
  height: 10
  width: { min: 20, max: 30 }
  price: { min: 5, max: 9 }
";

// =============================================================================
// Loading
// =============================================================================

#[tokio::test]
async fn test_load_profile_from_file() {
    let path = std::env::temp_dir().join(format!("smoothgen-profile-{}.yaml", std::process::id()));
    tokio::fs::write(&path, FIXED_PROFILE)
        .await
        .expect("write profile");

    let profile = GeneratorProfile::load(&path).await.expect("load");
    let _ = tokio::fs::remove_file(&path).await;

    assert_eq!(profile.currency, CurrencyCode::GBP);
    assert!(profile.validate().is_empty());
}

#[tokio::test]
async fn test_invalid_profile_cannot_generate() {
    let profile = GeneratorProfile::from_yaml_str("variable_chance: 3").expect("parses");
    let result = generate_catalog(1, 1, profile).await;
    assert!(matches!(
        result,
        Err(smoothgen_generator::GenerateError::Profile(ProfileError::Invalid(_)))
    ));
}

// =============================================================================
// Generation
// =============================================================================

#[tokio::test]
async fn test_profile_overrides_apply_to_every_record() {
    let profile = GeneratorProfile::from_yaml_str(FIXED_PROFILE).expect("parses");
    let (result, snapshot) = generate_catalog(12, 15, profile).await.expect("batch");
    assert_eq!(result.generated(), 15);
    assert_catalog_consistent(&snapshot);

    for product in &snapshot.products {
        let dimensions = product.dimensions.expect("dimensions");
        assert_eq!(dimensions.height, 10);
        assert!((20..=30).contains(&dimensions.width));
        assert!(product.gallery_image_ids.is_empty());

        let regular = product.regular_price.expect("regular price");
        assert_eq!(regular.currency_code, CurrencyCode::GBP);
        assert!((Decimal::from(5)..=Decimal::from(9)).contains(&regular.amount));

        let sale = product.sale_price.expect("always on sale");
        assert!(sale.amount < regular.amount);
        assert!(product.date_on_sale_to.is_some());
    }

    for variation in &snapshot.variations {
        assert_eq!(variation.dimensions.height, 10);
        assert!(variation.is_on_sale());
    }
}
