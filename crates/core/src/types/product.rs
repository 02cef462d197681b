//! Product, attribute and variation records.
//!
//! These mirror the props a storefront keeps for a catalog item. The
//! generator fills them in and a catalog store persists them; IDs stay `None`
//! until the store assigns one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::{ImageId, ProductId, TermId, VariationId};
use super::price::Price;
use super::slug::slugify;
use super::status::{BackorderPolicy, CatalogVisibility, ProductKind, StockStatus, TaxStatus};

/// Shipping dimensions and weight, in store units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Dimensions {
    pub height: u32,
    pub width: u32,
    pub length: u32,
    pub weight: u32,
}

/// A custom (non-taxonomy) product attribute such as "Size" or "Color".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductAttribute {
    /// Display name.
    pub name: String,
    /// Values this attribute can take.
    pub options: Vec<String>,
    /// Sort position on the product page.
    pub position: u32,
    /// Shown on the product page.
    pub visible: bool,
    /// Used to build variations.
    pub variation: bool,
}

impl ProductAttribute {
    /// Create a visible attribute used for variations.
    #[must_use]
    pub fn new(name: impl Into<String>, options: Vec<String>) -> Self {
        Self {
            name: name.into(),
            options,
            position: 0,
            visible: true,
            variation: true,
        }
    }

    /// Key under which variations reference this attribute.
    #[must_use]
    pub fn slug(&self) -> String {
        slugify(&self.name)
    }
}

/// One attribute value chosen by a variation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VariationAttribute {
    /// Attribute slug (see [`ProductAttribute::slug`]).
    pub name: String,
    /// Chosen option.
    pub option: String,
}

/// The ordered attribute-value combination that identifies a variation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct VariationAttributes(Vec<VariationAttribute>);

impl VariationAttributes {
    /// Look up the option chosen for an attribute slug.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|attr| attr.name == name)
            .map(|attr| attr.option.as_str())
    }

    /// Iterate over the `(attribute, option)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = &VariationAttribute> {
        self.0.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for VariationAttributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(name, option)| VariationAttribute {
                    name: name.into(),
                    option: option.into(),
                })
                .collect(),
        )
    }
}

/// A catalog product (simple or variable parent).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Product {
    /// Assigned by the store on first insert.
    pub id: Option<ProductId>,
    pub kind: ProductKind,
    pub name: String,
    pub sku: Option<String>,
    pub featured: bool,
    pub catalog_visibility: CatalogVisibility,
    pub description: String,
    pub short_description: String,
    /// Variable parents carry their prices on the variations.
    pub regular_price: Option<Price>,
    pub sale_price: Option<Price>,
    pub date_on_sale_from: Option<DateTime<Utc>>,
    pub date_on_sale_to: Option<DateTime<Utc>>,
    pub total_sales: u32,
    pub tax_status: TaxStatus,
    pub tax_class: String,
    pub manage_stock: bool,
    /// Only set when `manage_stock` is true. May be negative (oversold).
    pub stock_quantity: Option<i32>,
    pub stock_status: StockStatus,
    pub backorders: BackorderPolicy,
    pub sold_individually: bool,
    pub dimensions: Option<Dimensions>,
    pub upsell_ids: Vec<ProductId>,
    pub cross_sell_ids: Vec<ProductId>,
    pub parent_id: Option<ProductId>,
    pub reviews_allowed: bool,
    pub purchase_note: String,
    pub menu_order: u32,
    #[serde(rename = "virtual")]
    pub is_virtual: bool,
    pub downloadable: bool,
    pub category_ids: Vec<TermId>,
    pub tag_ids: Vec<TermId>,
    pub shipping_class_id: u32,
    pub image_id: Option<ImageId>,
    pub gallery_image_ids: Vec<ImageId>,
    pub attributes: Vec<ProductAttribute>,
}

impl Product {
    /// Create an empty product of the given kind.
    #[must_use]
    pub fn new(kind: ProductKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn is_on_sale(&self) -> bool {
        self.sale_price.is_some()
    }

    /// Attributes flagged for building variations.
    pub fn variation_attributes(&self) -> impl Iterator<Item = &ProductAttribute> {
        self.attributes.iter().filter(|attr| attr.variation)
    }
}

/// One concrete attribute combination of a variable product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variation {
    /// Assigned by the store on insert.
    pub id: Option<VariationId>,
    pub parent_id: ProductId,
    pub attributes: VariationAttributes,
    pub regular_price: Price,
    pub sale_price: Option<Price>,
    pub date_on_sale_from: Option<DateTime<Utc>>,
    pub date_on_sale_to: Option<DateTime<Utc>>,
    pub tax_status: TaxStatus,
    pub tax_class: String,
    pub manage_stock: bool,
    pub stock_quantity: Option<i32>,
    pub stock_status: StockStatus,
    pub dimensions: Dimensions,
    #[serde(rename = "virtual")]
    pub is_virtual: bool,
    pub downloadable: bool,
    pub image_id: Option<ImageId>,
    /// Position among siblings, set when the store sorts variations.
    pub menu_order: u32,
}

impl Variation {
    /// Create a variation with store defaults for everything but the
    /// combination and price.
    #[must_use]
    pub fn new(parent_id: ProductId, attributes: VariationAttributes, regular_price: Price) -> Self {
        Self {
            id: None,
            parent_id,
            attributes,
            regular_price,
            sale_price: None,
            date_on_sale_from: None,
            date_on_sale_to: None,
            tax_status: TaxStatus::default(),
            tax_class: String::new(),
            manage_stock: false,
            stock_quantity: None,
            stock_status: StockStatus::default(),
            dimensions: Dimensions::default(),
            is_virtual: false,
            downloadable: false,
            image_id: None,
            menu_order: 0,
        }
    }

    #[must_use]
    pub const fn is_on_sale(&self) -> bool {
        self.sale_price.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::price::CurrencyCode;

    #[test]
    fn test_attribute_slug() {
        let attr = ProductAttribute::new("Shoe Size", vec!["nine".into(), "ten".into()]);
        assert_eq!(attr.slug(), "shoe-size");
        assert!(attr.visible);
        assert!(attr.variation);
        assert_eq!(attr.position, 0);
    }

    #[test]
    fn test_variation_attributes_lookup() {
        let attrs: VariationAttributes = [("color", "red"), ("size", "xl")].into_iter().collect();
        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs.get("size"), Some("xl"));
        assert_eq!(attrs.get("material"), None);
    }

    #[test]
    fn test_product_defaults() {
        let product = Product::new(ProductKind::Variable, "Lorem ipsum");
        assert!(product.id.is_none());
        assert!(!product.is_on_sale());
        assert_eq!(product.stock_status, StockStatus::InStock);
        assert_eq!(product.kind, ProductKind::Variable);
    }

    #[test]
    fn test_variation_attributes_filter() {
        let mut product = Product::new(ProductKind::Variable, "Dolor");
        let mut hidden = ProductAttribute::new("Material", vec!["wool".into()]);
        hidden.variation = false;
        product.attributes = vec![
            ProductAttribute::new("Color", vec!["red".into()]),
            hidden,
        ];
        let names: Vec<_> = product.variation_attributes().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Color"]);
    }

    #[test]
    fn test_virtual_flag_serialized_name() {
        let variation = Variation::new(
            ProductId::new(1),
            VariationAttributes::default(),
            Price::from_cents(500, CurrencyCode::USD),
        );
        let json = serde_json::to_value(&variation).expect("serialize");
        assert_eq!(json["virtual"], serde_json::Value::Bool(false));
        assert_eq!(json["parent_id"], serde_json::json!(1));
    }
}
