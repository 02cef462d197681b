//! In-memory catalog store.
//!
//! IDs are allocated sequentially per record kind, starting at 1. Products
//! are kept in creation order, which doubles as their date order.

use serde::{Deserialize, Serialize};
use smoothgen_core::{
    ImageId, Product, ProductId, ProductKind, Taxonomy, Term, TermId, Variation, VariationId,
};
use tokio::sync::Mutex;
use tracing::{debug, instrument};

use super::{CatalogStore, StoreError};
use crate::image::ImageSpec;

/// An image registered with the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredImage {
    pub id: ImageId,
    #[serde(flatten)]
    pub spec: ImageSpec,
}

/// Everything a [`MemoryStore`] holds, in creation order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    pub products: Vec<Product>,
    pub variations: Vec<Variation>,
    pub images: Vec<StoredImage>,
    pub terms: Vec<Term>,
}

impl CatalogSnapshot {
    /// Look up a product by ID.
    #[must_use]
    pub fn product(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == Some(id))
    }

    /// Variations of `parent`, in storage order.
    pub fn variations_of(&self, parent: ProductId) -> impl Iterator<Item = &Variation> {
        self.variations.iter().filter(move |v| v.parent_id == parent)
    }

    /// Terms in one taxonomy.
    pub fn terms_in(&self, taxonomy: Taxonomy) -> impl Iterator<Item = &Term> {
        self.terms.iter().filter(move |t| t.taxonomy == taxonomy)
    }

    /// Look up an image by ID.
    #[must_use]
    pub fn image(&self, id: ImageId) -> Option<&StoredImage> {
        self.images.iter().find(|image| image.id == id)
    }
}

/// Catalog store that keeps everything in process memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<CatalogSnapshot>,
}

/// Next sequential ID for a collection currently holding `len` records.
fn next_id(len: usize) -> Result<i32, StoreError> {
    len.checked_add(1)
        .and_then(|id| i32::try_from(id).ok())
        .ok_or_else(|| StoreError::Conflict("ID space exhausted".to_string()))
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the current catalog.
    pub async fn snapshot(&self) -> CatalogSnapshot {
        self.state.lock().await.clone()
    }

    /// Consume the store, returning the catalog.
    #[must_use]
    pub fn into_snapshot(self) -> CatalogSnapshot {
        self.state.into_inner()
    }
}

impl CatalogStore for MemoryStore {
    #[instrument(skip_all, fields(name = %product.name))]
    async fn insert_product(&self, product: &Product) -> Result<ProductId, StoreError> {
        if let Some(id) = product.id {
            return Err(StoreError::Conflict(format!("product already has ID {id}")));
        }

        let mut state = self.state.lock().await;
        let id = ProductId::new(next_id(state.products.len())?);

        let mut stored = product.clone();
        stored.id = Some(id);
        state.products.push(stored);

        debug!(%id, kind = %product.kind, "Inserted product");
        Ok(id)
    }

    #[instrument(skip_all, fields(id = ?product.id))]
    async fn update_product(&self, product: &Product) -> Result<(), StoreError> {
        let id = product
            .id
            .ok_or_else(|| StoreError::NotFound("product has no ID".to_string()))?;

        let mut state = self.state.lock().await;
        let stored = state
            .products
            .iter_mut()
            .find(|p| p.id == Some(id))
            .ok_or_else(|| StoreError::NotFound(format!("product {id}")))?;
        *stored = product.clone();

        Ok(())
    }

    #[instrument(skip_all, fields(parent = %variation.parent_id))]
    async fn insert_variation(&self, variation: &Variation) -> Result<VariationId, StoreError> {
        if let Some(id) = variation.id {
            return Err(StoreError::Conflict(format!(
                "variation already has ID {id}"
            )));
        }

        let mut state = self.state.lock().await;
        let parent = state
            .product(variation.parent_id)
            .ok_or_else(|| StoreError::NotFound(format!("product {}", variation.parent_id)))?;
        if parent.kind != ProductKind::Variable {
            return Err(StoreError::Conflict(format!(
                "product {} is {}, not variable",
                variation.parent_id, parent.kind
            )));
        }

        let id = VariationId::new(next_id(state.variations.len())?);
        let mut stored = variation.clone();
        stored.id = Some(id);
        state.variations.push(stored);

        Ok(id)
    }

    #[instrument(skip(self))]
    async fn sort_variations(&self, parent: ProductId) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        if state.product(parent).is_none() {
            return Err(StoreError::NotFound(format!("product {parent}")));
        }

        let mut siblings: Vec<&mut Variation> = state
            .variations
            .iter_mut()
            .filter(|v| v.parent_id == parent)
            .collect();
        siblings.sort_by_key(|v| (v.menu_order, v.id));
        for (position, variation) in siblings.into_iter().enumerate() {
            variation.menu_order = u32::try_from(position).unwrap_or(u32::MAX);
        }

        Ok(())
    }

    async fn insert_image(&self, image: &ImageSpec) -> Result<ImageId, StoreError> {
        let mut state = self.state.lock().await;
        let id = ImageId::new(next_id(state.images.len())?);
        state.images.push(StoredImage {
            id,
            spec: image.clone(),
        });
        Ok(id)
    }

    async fn find_or_create_term(
        &self,
        taxonomy: Taxonomy,
        name: &str,
    ) -> Result<TermId, StoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::Conflict("term name cannot be empty".to_string()));
        }

        let mut state = self.state.lock().await;
        if let Some(term) = state.terms.iter().find(|t| t.matches(taxonomy, name)) {
            return Ok(term.id);
        }

        let id = TermId::new(next_id(state.terms.len())?);
        state.terms.push(Term::new(id, taxonomy, name));
        debug!(%id, %taxonomy, name, "Created term");
        Ok(id)
    }

    async fn recent_product_ids(&self, limit: usize) -> Result<Vec<ProductId>, StoreError> {
        let state = self.state.lock().await;
        Ok(state
            .products
            .iter()
            .rev()
            .filter_map(|p| p.id)
            .take(limit)
            .collect())
    }
}
