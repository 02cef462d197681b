//! Random product generation.
//!
//! A [`ProductGenerator`] owns its RNG and a [`GeneratorProfile`]. Each call
//! builds one product, registers its images and taxonomy terms with the
//! store, and persists it. Variable products additionally get one variation
//! per attribute-option combination.
//!
//! ## Reproducibility
//!
//! With [`ProductGenerator::seeded`] every random draw (text included) comes
//! from one `StdRng`, so the same seed, profile and starting catalog produce
//! the same products. Sale end dates are relative to the wall clock and are
//! the only exception.

use chrono::{DateTime, Months, Utc};
use rand::rngs::StdRng;
use rand::seq::{IndexedRandom, SliceRandom};
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use serde::Serialize;
use smoothgen_core::{
    BackorderPolicy, CatalogVisibility, Dimensions, ImageId, Price, Product, ProductAttribute,
    ProductId, ProductKind, StockStatus, TaxStatus, Taxonomy, TermId, Variation, slugify,
};
use tracing::{debug, info, instrument, warn};

use crate::cartesian::cartesian_product;
use crate::error::GenerateError;
use crate::image::ImageSpec;
use crate::profile::{GeneratorProfile, NumberSpec, ProductOverrides};
use crate::random;
use crate::store::{CatalogStore, StoreError};

/// Dimension range used when no override is given.
const DEFAULT_DIMENSION: NumberSpec = NumberSpec::Between { min: 1, max: 200 };

/// Regular price bounds in cents when no override is given.
const PRICE_CENTS: std::ops::RangeInclusive<i64> = 100..=100_000;

/// Sale discount bounds in hundredths of a percent (1.00% to 75.00%).
const DISCOUNT_BASIS_POINTS: std::ops::RangeInclusive<i64> = 100..=7_500;

/// Stock quantity bounds for products that manage stock.
const STOCK_QUANTITY: std::ops::RangeInclusive<i32> = -100..=100;

/// Upper bound for `total_sales` and `menu_order`.
const MAX_COUNTER: u32 = 10_000;

/// How many existing products upsells and cross-sells are drawn from.
const RELATED_PRODUCTS: usize = 5;

/// A persisted product and, for variable products, its variations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratedProduct {
    pub product: Product,
    pub variations: Vec<Variation>,
}

impl GeneratedProduct {
    /// ID the store assigned to the product.
    #[must_use]
    pub const fn id(&self) -> Option<ProductId> {
        self.product.id
    }
}

/// Outcome of [`ProductGenerator::generate_batch`].
#[derive(Debug, Default)]
pub struct BatchResult {
    /// Number of simple products created.
    pub simple: usize,
    /// Number of variable products created.
    pub variable: usize,
    /// Number of variations created across all variable products.
    pub variations: usize,
    /// IDs of the created products, in creation order.
    pub product_ids: Vec<ProductId>,
    /// Failed products (`index` within the batch, error message).
    pub errors: Vec<(usize, String)>,
}

impl BatchResult {
    /// Number of products created.
    #[must_use]
    pub const fn generated(&self) -> usize {
        self.simple + self.variable
    }
}

/// Values drawn identically for simple and variable products.
struct CommonDraws {
    name: String,
    dimensions: Dimensions,
    regular_price: Price,
    sale_price: Option<Price>,
    date_on_sale_to: Option<DateTime<Utc>>,
    image_id: ImageId,
    gallery_image_ids: Vec<ImageId>,
    category_ids: Vec<TermId>,
    tag_ids: Vec<TermId>,
    upsell_ids: Vec<ProductId>,
    cross_sell_ids: Vec<ProductId>,
}

/// Generates random products into a [`CatalogStore`].
#[derive(Debug)]
pub struct ProductGenerator<R = StdRng> {
    rng: R,
    profile: GeneratorProfile,
}

impl ProductGenerator<StdRng> {
    /// Generator with a reproducible RNG.
    ///
    /// # Errors
    ///
    /// Returns `GenerateError::Profile` if the profile is invalid.
    pub fn seeded(seed: u64, profile: GeneratorProfile) -> Result<Self, GenerateError> {
        Self::new(StdRng::seed_from_u64(seed), profile)
    }
}

impl<R: Rng + Send> ProductGenerator<R> {
    /// Create a generator from an RNG and a profile.
    ///
    /// # Errors
    ///
    /// Returns `GenerateError::Profile` if the profile is invalid.
    pub fn new(rng: R, profile: GeneratorProfile) -> Result<Self, GenerateError> {
        Ok(Self {
            rng,
            profile: profile.validated()?,
        })
    }

    #[must_use]
    pub const fn profile(&self) -> &GeneratorProfile {
        &self.profile
    }

    /// Generate and persist one product, variable with probability
    /// `profile.variable_chance`.
    ///
    /// # Errors
    ///
    /// Returns an error if any store operation fails.
    pub async fn generate<S: CatalogStore>(
        &mut self,
        store: &S,
    ) -> Result<GeneratedProduct, GenerateError> {
        let overrides = self.profile.overrides;
        if random::chance(&mut self.rng, self.profile.variable_chance) {
            self.generate_variable_product(store, &overrides).await
        } else {
            self.generate_simple_product(store, &overrides).await
        }
    }

    /// Generate and persist a simple product.
    ///
    /// # Errors
    ///
    /// Returns an error if any store operation fails.
    #[instrument(skip_all)]
    pub async fn generate_simple_product<S: CatalogStore>(
        &mut self,
        store: &S,
        overrides: &ProductOverrides,
    ) -> Result<GeneratedProduct, GenerateError> {
        let common = self.common_draws(store, overrides).await?;

        let mut product = self.base_product(ProductKind::Simple, common, overrides);
        product.featured = random::chance(&mut self.rng, 0.5);
        product.catalog_visibility = CatalogVisibility::Visible;
        let description_paragraphs = self.rng.random_range(1..=5);
        product.description = random::paragraphs(&mut self.rng, description_paragraphs);
        product.short_description = random::paragraph(&mut self.rng);
        product.sku = Some(format!(
            "{}-{}",
            slugify(&product.name),
            random::ean8(&mut self.rng)
        ));
        product.total_sales = self.rng.random_range(0..=MAX_COUNTER);
        product.manage_stock = false;
        product.stock_quantity = None;

        let id = store.insert_product(&product).await?;
        product.id = Some(id);

        debug!(%id, name = %product.name, "Generated simple product");
        Ok(GeneratedProduct {
            product,
            variations: Vec::new(),
        })
    }

    /// Generate and persist a variable product with one variation per
    /// attribute-option combination.
    ///
    /// # Errors
    ///
    /// Returns an error if any store operation fails. Variations created
    /// before the failure are left in the store, and the parent is passed
    /// to [`CatalogStore::release_product`].
    #[instrument(skip_all)]
    pub async fn generate_variable_product<S: CatalogStore>(
        &mut self,
        store: &S,
        overrides: &ProductOverrides,
    ) -> Result<GeneratedProduct, GenerateError> {
        let common = self.common_draws(store, overrides).await?;
        let regular_price = common.regular_price;

        let mut product = self.base_product(ProductKind::Variable, common, overrides);
        product.featured = random::chance(&mut self.rng, 0.1);
        product.manage_stock = random::chance(&mut self.rng, 0.5);
        product.stock_quantity = self.stock_quantity(product.manage_stock);
        product.attributes = self.attributes();

        let parent_id = store.insert_product(&product).await?;
        product.id = Some(parent_id);

        let variations = match self
            .create_variations(store, &product, regular_price, overrides)
            .await
        {
            Ok(variations) => variations,
            Err(e) => {
                store.release_product(parent_id).await;
                return Err(e);
            }
        };

        debug!(
            id = %parent_id,
            name = %product.name,
            variations = variations.len(),
            "Generated variable product"
        );
        Ok(GeneratedProduct {
            product,
            variations,
        })
    }

    /// Create one variation per attribute combination, sort them and save
    /// the parent.
    async fn create_variations<S: CatalogStore>(
        &mut self,
        store: &S,
        product: &Product,
        regular_price: Price,
        overrides: &ProductOverrides,
    ) -> Result<Vec<Variation>, GenerateError> {
        let parent_id = product
            .id
            .ok_or_else(|| StoreError::NotFound("product has no ID".to_string()))?;

        let axes: Vec<(String, Vec<String>)> = product
            .variation_attributes()
            .map(|attr| {
                let options = attr.options.iter().map(|option| slugify(option)).collect();
                (attr.slug(), options)
            })
            .collect();

        let mut variations = Vec::new();
        for combination in cartesian_product(&axes) {
            let attributes = combination.into_iter().collect();
            let mut variation = Variation::new(parent_id, attributes, regular_price);
            variation.sale_price = product.sale_price;
            variation.date_on_sale_from = None;
            variation.date_on_sale_to = product.date_on_sale_to;
            variation.tax_status = TaxStatus::Taxable;
            variation.manage_stock = product.manage_stock;
            variation.stock_quantity = self.stock_quantity(product.manage_stock);
            variation.stock_status = StockStatus::InStock;
            variation.dimensions = product.dimensions.unwrap_or_default();
            variation.is_virtual = overrides.is_virtual;
            variation.downloadable = false;
            variation.image_id = Some(self.generate_image(store).await?);

            let id = store.insert_variation(&variation).await?;
            variation.id = Some(id);
            variations.push(variation);
        }

        store.sort_variations(parent_id).await?;
        for (variation, menu_order) in variations.iter_mut().zip(0_u32..) {
            variation.menu_order = menu_order;
        }
        store.update_product(product).await?;
        Ok(variations)
    }

    /// Generate `count` products one after another.
    ///
    /// A product that fails is logged and recorded in
    /// [`BatchResult::errors`]; the batch moves on to the next one unless
    /// the error is fatal (see [`GenerateError::is_fatal`]).
    ///
    /// # Errors
    ///
    /// Returns the first fatal error.
    #[instrument(skip(self, store))]
    pub async fn generate_batch<S: CatalogStore>(
        &mut self,
        store: &S,
        count: usize,
    ) -> Result<BatchResult, GenerateError> {
        let mut result = BatchResult::default();

        for index in 0..count {
            match self.generate(store).await {
                Ok(generated) => {
                    match generated.product.kind {
                        ProductKind::Variable => result.variable += 1,
                        _ => result.simple += 1,
                    }
                    result.variations += generated.variations.len();
                    result.product_ids.extend(generated.id());
                }
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    warn!(index, error = %e, "Failed to generate product");
                    result.errors.push((index, e.to_string()));
                }
            }
        }

        info!(
            simple = result.simple,
            variable = result.variable,
            variations = result.variations,
            errors = result.errors.len(),
            "Batch complete"
        );

        Ok(result)
    }

    /// Register one random image with the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the image.
    pub async fn generate_image<S: CatalogStore>(
        &mut self,
        store: &S,
    ) -> Result<ImageId, StoreError> {
        let image = ImageSpec::random(&mut self.rng);
        store.insert_image(&image).await
    }

    /// With probability `profile.gallery_chance`, one to three new images;
    /// otherwise none.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects an image.
    pub async fn maybe_gallery_image_ids<S: CatalogStore>(
        &mut self,
        store: &S,
    ) -> Result<Vec<ImageId>, StoreError> {
        if !random::chance(&mut self.rng, self.profile.gallery_chance) {
            return Ok(Vec::new());
        }

        let count = self.rng.random_range(1..=3);
        let mut gallery = Vec::with_capacity(count);
        for _ in 0..count {
            gallery.push(self.generate_image(store).await?);
        }
        Ok(gallery)
    }

    /// Up to `limit` IDs picked at random from the `2 * limit` newest
    /// products.
    ///
    /// # Errors
    ///
    /// Returns an error if the store lookup fails.
    pub async fn existing_product_ids<S: CatalogStore>(
        &mut self,
        store: &S,
        limit: usize,
    ) -> Result<Vec<ProductId>, StoreError> {
        let mut ids = store.recent_product_ids(limit.saturating_mul(2)).await?;
        ids.shuffle(&mut self.rng);
        ids.truncate(limit);
        Ok(ids)
    }

    /// One to ten lorem words found-or-created as terms of `taxonomy`.
    ///
    /// # Errors
    ///
    /// Returns an error if a term lookup or insert fails.
    pub async fn generate_term_ids<S: CatalogStore>(
        &mut self,
        store: &S,
        taxonomy: Taxonomy,
    ) -> Result<Vec<TermId>, StoreError> {
        let names = random::dedup_preserving_order(random::words(&mut self.rng, 1, 10));

        let mut ids = Vec::with_capacity(names.len());
        for name in &names {
            let id = store.find_or_create_term(taxonomy, name).await?;
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        Ok(ids)
    }

    async fn common_draws<S: CatalogStore>(
        &mut self,
        store: &S,
        overrides: &ProductOverrides,
    ) -> Result<CommonDraws, StoreError> {
        let name = random::words(&mut self.rng, 1, 5).join(" ");
        let dimensions = self.dimensions(overrides);
        let regular_price = self.regular_price(overrides);

        let on_sale = random::chance(&mut self.rng, self.profile.sale_chance);
        let (sale_price, date_on_sale_to) = if on_sale {
            let percent = Decimal::new(self.rng.random_range(DISCOUNT_BASIS_POINTS), 2);
            (Some(regular_price.discounted_by(percent)), self.sale_end())
        } else {
            (None, None)
        };

        let image_id = self.generate_image(store).await?;
        let gallery_image_ids = self.maybe_gallery_image_ids(store).await?;
        let category_ids = self
            .generate_term_ids(store, Taxonomy::ProductCategory)
            .await?;
        let tag_ids = self.generate_term_ids(store, Taxonomy::ProductTag).await?;
        let upsell_ids = self.existing_product_ids(store, RELATED_PRODUCTS).await?;
        let cross_sell_ids = self.existing_product_ids(store, RELATED_PRODUCTS).await?;

        Ok(CommonDraws {
            name,
            dimensions,
            regular_price,
            sale_price,
            date_on_sale_to,
            image_id,
            gallery_image_ids,
            category_ids,
            tag_ids,
            upsell_ids,
            cross_sell_ids,
        })
    }

    /// Product with the shared draws and the remaining per-product fields.
    fn base_product(
        &mut self,
        kind: ProductKind,
        common: CommonDraws,
        overrides: &ProductOverrides,
    ) -> Product {
        let mut product = Product::new(kind, common.name);
        product.regular_price = Some(common.regular_price);
        product.sale_price = common.sale_price;
        product.date_on_sale_from = None;
        product.date_on_sale_to = common.date_on_sale_to;
        product.dimensions = Some(common.dimensions);
        product.image_id = Some(common.image_id);
        product.gallery_image_ids = common.gallery_image_ids;
        product.category_ids = common.category_ids;
        product.tag_ids = common.tag_ids;
        product.upsell_ids = common.upsell_ids;
        product.cross_sell_ids = common.cross_sell_ids;

        product.tax_status = TaxStatus::Taxable;
        product.tax_class = String::new();
        product.stock_status = StockStatus::InStock;
        product.backorders = BackorderPolicy::ALL
            .choose(&mut self.rng)
            .copied()
            .unwrap_or_default();
        product.sold_individually = random::chance(&mut self.rng, 0.2);
        product.reviews_allowed = random::chance(&mut self.rng, 0.5);
        product.purchase_note = if random::chance(&mut self.rng, 0.5) {
            random::paragraph(&mut self.rng)
        } else {
            String::new()
        };
        product.menu_order = self.rng.random_range(0..=MAX_COUNTER);
        product.is_virtual = overrides.is_virtual;
        product.downloadable = false;
        product.parent_id = None;
        product.shipping_class_id = 0;

        product
    }

    /// One to three attributes with two to four options each.
    ///
    /// Attributes whose name slugifies to one already taken are dropped.
    fn attributes(&mut self) -> Vec<ProductAttribute> {
        let count = self.rng.random_range(1..=3);
        let mut attributes: Vec<ProductAttribute> = Vec::with_capacity(count);

        for _ in 0..count {
            let name = random::ucfirst(&random::words(&mut self.rng, 1, 3).join(" "));
            let options = random::dedup_preserving_order(random::words(&mut self.rng, 2, 4));
            let attribute = ProductAttribute::new(name, options);

            if attributes.iter().any(|a| a.slug() == attribute.slug()) {
                debug!(name = %attribute.name, "Skipping duplicate attribute");
                continue;
            }
            attributes.push(attribute);
        }

        attributes
    }

    fn dimensions(&mut self, overrides: &ProductOverrides) -> Dimensions {
        let mut draw =
            |spec: Option<NumberSpec>| spec.unwrap_or(DEFAULT_DIMENSION).sample(&mut self.rng);
        Dimensions {
            height: draw(overrides.height),
            width: draw(overrides.width),
            length: draw(overrides.length),
            weight: draw(overrides.weight),
        }
    }

    fn regular_price(&mut self, overrides: &ProductOverrides) -> Price {
        let currency = self.profile.currency;
        match overrides.price {
            Some(spec) => Price::new(Decimal::from(spec.sample(&mut self.rng)), currency),
            None => Price::from_cents(self.rng.random_range(PRICE_CENTS), currency),
        }
    }

    fn stock_quantity(&mut self, manage_stock: bool) -> Option<i32> {
        manage_stock.then(|| self.rng.random_range(STOCK_QUANTITY))
    }

    /// Random instant between now and one month from now, whole seconds.
    fn sale_end(&mut self) -> Option<DateTime<Utc>> {
        let now = Utc::now();
        let until = now.checked_add_months(Months::new(1))?;
        let seconds = self.rng.random_range(now.timestamp()..=until.timestamp());
        DateTime::from_timestamp(seconds, 0)
    }
}
