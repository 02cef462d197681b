//! WooCommerce REST API (v3) payload and response types.
//!
//! Prices and dimensions travel as strings. Dates are sent in UTC through
//! the `*_gmt` fields so the site's timezone setting does not shift them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use smoothgen_core::{
    BackorderPolicy, CatalogVisibility, Dimensions, Price, Product, ProductAttribute,
    ProductId, ProductKind, StockStatus, TaxStatus, TermId, Variation, VariationId,
};

/// Date format accepted by the `*_gmt` fields.
const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

fn format_date(date: Option<DateTime<Utc>>) -> Option<String> {
    date.map(|d| d.format(DATE_FORMAT).to_string())
}

fn format_price(price: Option<Price>) -> String {
    price.map(|p| p.to_string()).unwrap_or_default()
}

/// Reference to a taxonomy term by ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TermRef {
    pub id: TermId,
}

/// Image to sideload from a URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageRef {
    pub src: String,
    pub name: String,
    pub alt: String,
}

/// Dimensions block (weight is a sibling field).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DimensionsPayload {
    pub length: String,
    pub width: String,
    pub height: String,
}

impl From<Dimensions> for DimensionsPayload {
    fn from(d: Dimensions) -> Self {
        Self {
            length: d.length.to_string(),
            width: d.width.to_string(),
            height: d.height.to_string(),
        }
    }
}

/// Custom product attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttributePayload {
    pub name: String,
    pub position: u32,
    pub visible: bool,
    pub variation: bool,
    pub options: Vec<String>,
}

impl From<&ProductAttribute> for AttributePayload {
    fn from(attr: &ProductAttribute) -> Self {
        Self {
            name: attr.name.clone(),
            position: attr.position,
            visible: attr.visible,
            variation: attr.variation,
            options: attr.options.clone(),
        }
    }
}

/// Body for `POST /products` and `PUT /products/{id}`.
#[derive(Debug, Clone, Serialize)]
pub struct ProductPayload {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ProductKind,
    pub status: &'static str,
    pub featured: bool,
    pub catalog_visibility: CatalogVisibility,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub short_description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    pub regular_price: String,
    pub sale_price: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_on_sale_from_gmt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_on_sale_to_gmt: Option<String>,
    pub tax_status: TaxStatus,
    pub tax_class: String,
    pub manage_stock: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock_quantity: Option<i32>,
    pub stock_status: StockStatus,
    pub backorders: BackorderPolicy,
    pub sold_individually: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<DimensionsPayload>,
    pub upsell_ids: Vec<ProductId>,
    pub cross_sell_ids: Vec<ProductId>,
    pub reviews_allowed: bool,
    pub purchase_note: String,
    pub menu_order: u32,
    #[serde(rename = "virtual")]
    pub is_virtual: bool,
    pub downloadable: bool,
    pub categories: Vec<TermRef>,
    pub tags: Vec<TermRef>,
    /// First entry becomes the featured image, the rest the gallery.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<ImageRef>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<AttributePayload>,
}

impl ProductPayload {
    /// Build the payload for `product`. An empty `images` list leaves the
    /// product's current images untouched on update.
    #[must_use]
    pub fn new(product: &Product, images: Vec<ImageRef>) -> Self {
        Self {
            name: product.name.clone(),
            kind: product.kind,
            status: "publish",
            featured: product.featured,
            catalog_visibility: product.catalog_visibility,
            description: product.description.clone(),
            short_description: product.short_description.clone(),
            sku: product.sku.clone(),
            regular_price: format_price(product.regular_price),
            sale_price: format_price(product.sale_price),
            date_on_sale_from_gmt: format_date(product.date_on_sale_from),
            date_on_sale_to_gmt: format_date(product.date_on_sale_to),
            tax_status: product.tax_status,
            tax_class: product.tax_class.clone(),
            manage_stock: product.manage_stock,
            stock_quantity: product.stock_quantity,
            stock_status: product.stock_status,
            backorders: product.backorders,
            sold_individually: product.sold_individually,
            weight: product.dimensions.map(|d| d.weight.to_string()),
            dimensions: product.dimensions.map(DimensionsPayload::from),
            upsell_ids: product.upsell_ids.clone(),
            cross_sell_ids: product.cross_sell_ids.clone(),
            reviews_allowed: product.reviews_allowed,
            purchase_note: product.purchase_note.clone(),
            menu_order: product.menu_order,
            is_virtual: product.is_virtual,
            downloadable: product.downloadable,
            categories: product.category_ids.iter().map(|&id| TermRef { id }).collect(),
            tags: product.tag_ids.iter().map(|&id| TermRef { id }).collect(),
            images,
            attributes: product.attributes.iter().map(AttributePayload::from).collect(),
        }
    }
}

/// One attribute choice of a variation. `name` is the attribute slug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariationAttributePayload {
    pub name: String,
    pub option: String,
}

/// Body for `POST /products/{id}/variations`.
#[derive(Debug, Clone, Serialize)]
pub struct VariationPayload {
    pub regular_price: String,
    pub sale_price: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_on_sale_from_gmt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_on_sale_to_gmt: Option<String>,
    pub tax_status: TaxStatus,
    pub tax_class: String,
    pub manage_stock: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock_quantity: Option<i32>,
    pub stock_status: StockStatus,
    pub weight: String,
    pub dimensions: DimensionsPayload,
    #[serde(rename = "virtual")]
    pub is_virtual: bool,
    pub downloadable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageRef>,
    pub attributes: Vec<VariationAttributePayload>,
    pub menu_order: u32,
}

impl VariationPayload {
    #[must_use]
    pub fn new(variation: &Variation, image: Option<ImageRef>) -> Self {
        Self {
            regular_price: variation.regular_price.to_string(),
            sale_price: format_price(variation.sale_price),
            date_on_sale_from_gmt: format_date(variation.date_on_sale_from),
            date_on_sale_to_gmt: format_date(variation.date_on_sale_to),
            tax_status: variation.tax_status,
            tax_class: variation.tax_class.clone(),
            manage_stock: variation.manage_stock,
            stock_quantity: variation.stock_quantity,
            stock_status: variation.stock_status,
            weight: variation.dimensions.weight.to_string(),
            dimensions: variation.dimensions.into(),
            is_virtual: variation.is_virtual,
            downloadable: variation.downloadable,
            image,
            attributes: variation
                .attributes
                .iter()
                .map(|attr| VariationAttributePayload {
                    name: attr.name.clone(),
                    option: attr.option.clone(),
                })
                .collect(),
            menu_order: variation.menu_order,
        }
    }
}

/// Entry of a `variations/batch` update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuOrderUpdate {
    pub id: VariationId,
    pub menu_order: u32,
}

/// Body for `POST /products/{id}/variations/batch`.
#[derive(Debug, Clone, Serialize)]
pub struct VariationBatch {
    pub update: Vec<MenuOrderUpdate>,
}

/// Body for creating a category or tag.
#[derive(Debug, Clone, Serialize)]
pub struct NewTerm<'a> {
    pub name: &'a str,
}

/// Any created resource; only the ID is read.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedResource {
    pub id: i32,
}

/// Category or tag as returned by the API.
#[derive(Debug, Clone, Deserialize)]
pub struct TermResource {
    pub id: i32,
    pub name: String,
}

/// Error body (`{"code": ..., "message": ..., "data": {...}}`).
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub code: String,
    pub message: String,
    #[serde(default)]
    pub data: Option<ErrorData>,
}

/// Error details. `resource_id` accompanies `term_exists`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorData {
    #[serde(default)]
    pub resource_id: Option<i32>,
}

impl ErrorBody {
    /// ID of the existing term a create request collided with.
    #[must_use]
    pub fn existing_term_id(&self) -> Option<i32> {
        if self.code != "term_exists" {
            return None;
        }
        self.data.as_ref().and_then(|data| data.resource_id)
    }
}
