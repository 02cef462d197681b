//! Core types for SmoothGen.
//!
//! This module provides type-safe wrappers for catalog concepts.

pub mod id;
pub mod price;
pub mod product;
pub mod slug;
pub mod status;
pub mod term;

pub use id::*;
pub use price::{CurrencyCode, Price};
pub use product::{
    Dimensions, Product, ProductAttribute, Variation, VariationAttribute, VariationAttributes,
};
pub use slug::slugify;
pub use status::*;
pub use term::Term;
