//! Catalog storage.
//!
//! The generator only builds records; a [`CatalogStore`] owns persistence,
//! ID assignment, taxonomy storage and image handling.
//!
//! ## Implementations
//!
//! - [`MemoryStore`] - In-process catalog, exportable as JSON
//! - [`WooCommerceStore`] - WooCommerce REST API (`/wp-json/wc/v3`)

mod memory;
mod woocommerce;

use std::future::Future;

use smoothgen_core::{ImageId, Product, ProductId, TermId, Taxonomy, Variation, VariationId};
use thiserror::Error;

use crate::image::ImageSpec;

pub use memory::{CatalogSnapshot, MemoryStore, StoredImage};
pub use woocommerce::{WooCommerceConfig, WooCommerceStore};

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Referenced record does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Record is in a state that forbids the operation.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Failed to parse a response or build a request.
    #[error("parse error: {0}")]
    Parse(String),

    /// Credentials were rejected.
    #[error("unauthorized: invalid API credentials")]
    Unauthorized,
}

/// Persistence operations the generator relies on.
///
/// Mirrors the object API of a storefront CMS: records are inserted and get
/// an ID back, terms are looked up by name before being created, and
/// variations are re-sorted once all of them exist.
pub trait CatalogStore: Send + Sync {
    /// Persist a new product and return its ID.
    ///
    /// The product must not have an ID yet.
    fn insert_product(
        &self,
        product: &Product,
    ) -> impl Future<Output = Result<ProductId, StoreError>> + Send;

    /// Save changes to an existing product.
    fn update_product(&self, product: &Product)
    -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Persist a variation of an existing variable product.
    fn insert_variation(
        &self,
        variation: &Variation,
    ) -> impl Future<Output = Result<VariationId, StoreError>> + Send;

    /// Renumber a product's variations (`menu_order`) in creation order.
    fn sort_variations(
        &self,
        parent: ProductId,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Register an image and return its attachment ID.
    fn insert_image(
        &self,
        image: &ImageSpec,
    ) -> impl Future<Output = Result<ImageId, StoreError>> + Send;

    /// Return the term called `name` in `taxonomy`, creating it if needed.
    fn find_or_create_term(
        &self,
        taxonomy: Taxonomy,
        name: &str,
    ) -> impl Future<Output = Result<TermId, StoreError>> + Send;

    /// IDs of the most recently created products, newest first.
    fn recent_product_ids(
        &self,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<ProductId>, StoreError>> + Send;

    /// Forget per-product bookkeeping after a variable product failed
    /// part-way through. Stores without such state do nothing.
    fn release_product(&self, parent: ProductId) -> impl Future<Output = ()> + Send {
        let _ = parent;
        async {}
    }
}
