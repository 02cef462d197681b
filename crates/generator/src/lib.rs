//! SmoothGen Generator - Random product fixtures for a storefront catalog.
//!
//! Fabricates plausible but randomized simple and variable products and
//! persists them through a [`CatalogStore`].
//!
//! # Example
//!
//! ```rust,no_run
//! use smoothgen_generator::{GeneratorProfile, MemoryStore, ProductGenerator};
//!
//! # async fn run() -> Result<(), smoothgen_generator::GenerateError> {
//! let store = MemoryStore::new();
//! let mut generator = ProductGenerator::seeded(42, GeneratorProfile::default())?;
//! let result = generator.generate_batch(&store, 25).await?;
//! assert_eq!(result.generated(), 25);
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`product`] - The product generator and batch runs
//! - [`cartesian`] - Attribute-combination expansion for variations
//! - [`profile`] - Tunable probabilities and value overrides (YAML-loadable)
//! - [`image`] - Placeholder image descriptions
//! - [`store`] - The catalog storage seam and its implementations
//! - [`random`] - Lorem text and small random helpers

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cartesian;
mod error;
pub mod image;
pub mod product;
pub mod profile;
pub mod random;
pub mod store;

pub use cartesian::cartesian_product;
pub use error::GenerateError;
pub use image::ImageSpec;
pub use product::{BatchResult, GeneratedProduct, ProductGenerator};
pub use profile::{GeneratorProfile, NumberSpec, ProductOverrides, ProfileError};
pub use store::{
    CatalogSnapshot, CatalogStore, MemoryStore, StoreError, WooCommerceConfig, WooCommerceStore,
};
