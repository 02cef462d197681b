//! Status enums for catalog records.
//!
//! Every enum serializes to the string the storefront's REST API uses, and
//! implements `Display`/`FromStr` with that same string.

use serde::{Deserialize, Serialize};

/// Implements `Display` and `FromStr` for a fieldless enum from a list of
/// `Variant => "wire"` pairs.
macro_rules! wire_strings {
    ($name:ident { $($variant:ident => $wire:literal),+ $(,)? }) => {
        impl $name {
            /// The string used on the wire.
            #[must_use]
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $wire,)+
                }
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($wire => Ok(Self::$variant),)+
                    _ => Err(format!(concat!("invalid ", stringify!($name), ": {}"), s)),
                }
            }
        }
    };
}

/// Shape of a catalog record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProductKind {
    /// Single price/stock/shipping profile.
    #[default]
    Simple,
    /// Parent of attribute-combination variations.
    Variable,
    /// Child of a variable product.
    Variation,
}

wire_strings!(ProductKind {
    Simple => "simple",
    Variable => "variable",
    Variation => "variation",
});

/// Stock availability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum StockStatus {
    #[default]
    #[serde(rename = "instock")]
    InStock,
    #[serde(rename = "outofstock")]
    OutOfStock,
    #[serde(rename = "onbackorder")]
    OnBackorder,
}

wire_strings!(StockStatus {
    InStock => "instock",
    OutOfStock => "outofstock",
    OnBackorder => "onbackorder",
});

/// Whether orders are accepted when out of stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BackorderPolicy {
    Yes,
    #[default]
    No,
    /// Allowed, but the customer is told.
    Notify,
}

impl BackorderPolicy {
    /// All policies, in the order the generator samples them.
    pub const ALL: [Self; 3] = [Self::Yes, Self::No, Self::Notify];
}

wire_strings!(BackorderPolicy {
    Yes => "yes",
    No => "no",
    Notify => "notify",
});

/// Tax treatment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaxStatus {
    #[default]
    Taxable,
    /// Only shipping is taxed.
    Shipping,
    None,
}

wire_strings!(TaxStatus {
    Taxable => "taxable",
    Shipping => "shipping",
    None => "none",
});

/// Where a product shows up in the storefront.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CatalogVisibility {
    #[default]
    Visible,
    Catalog,
    Search,
    Hidden,
}

wire_strings!(CatalogVisibility {
    Visible => "visible",
    Catalog => "catalog",
    Search => "search",
    Hidden => "hidden",
});

/// Product taxonomies the generator assigns terms in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Taxonomy {
    #[serde(rename = "product_cat")]
    ProductCategory,
    #[serde(rename = "product_tag")]
    ProductTag,
}

wire_strings!(Taxonomy {
    ProductCategory => "product_cat",
    ProductTag => "product_tag",
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_strings_match_serde() {
        let json = serde_json::to_string(&StockStatus::InStock).expect("serialize");
        assert_eq!(json, format!("\"{}\"", StockStatus::InStock));

        let json = serde_json::to_string(&Taxonomy::ProductCategory).expect("serialize");
        assert_eq!(json, "\"product_cat\"");

        let json = serde_json::to_string(&BackorderPolicy::Notify).expect("serialize");
        assert_eq!(json, "\"notify\"");
    }

    #[test]
    fn test_from_str_roundtrip() {
        for policy in BackorderPolicy::ALL {
            let parsed: BackorderPolicy = policy.to_string().parse().expect("parse");
            assert_eq!(parsed, policy);
        }
        assert_eq!("variable".parse::<ProductKind>(), Ok(ProductKind::Variable));
        assert_eq!("product_tag".parse::<Taxonomy>(), Ok(Taxonomy::ProductTag));
    }

    #[test]
    fn test_from_str_rejects_unknown() {
        let err = "sometimes".parse::<BackorderPolicy>().expect_err("should fail");
        assert_eq!(err, "invalid BackorderPolicy: sometimes");
    }

    #[test]
    fn test_defaults() {
        assert_eq!(StockStatus::default(), StockStatus::InStock);
        assert_eq!(TaxStatus::default(), TaxStatus::Taxable);
        assert_eq!(CatalogVisibility::default(), CatalogVisibility::Visible);
    }
}
