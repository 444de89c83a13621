//! Catalog record types.
//!
//! These are immutable snapshots of upstream records, taken once per build.
//! The same types double as the on-disk snapshot format (`--catalog`).

use serde::{Deserialize, Serialize};

/// A sellable product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Opaque upstream identifier (e.g., "prod_7RyWOwmK5nEa2V")
    pub id: String,

    /// Display name
    pub name: String,

    /// URL slug, unique per product. Empty when upstream omitted it.
    #[serde(default)]
    pub permalink: String,

    /// Price as presented to shoppers
    #[serde(default)]
    pub price: Price,

    /// Product images in display order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<Image>,

    /// Identifiers of the categories this product is listed under
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,
}

impl Product {
    /// First image in display order, if any.
    pub fn main_image(&self) -> Option<&Image> {
        self.images.first()
    }
}

/// Product price.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Price {
    /// Numeric amount in the store currency
    #[serde(default)]
    pub raw: f64,

    /// Formatted amount including currency symbol (e.g., "$12.00")
    #[serde(default)]
    pub formatted_with_symbol: String,
}

/// A product image hosted by the commerce backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    /// Absolute remote URL
    pub url: String,

    /// Original file name, used to pick an extension when mirroring
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,

    /// Alternative text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Opaque upstream identifier
    pub id: String,

    /// Display name
    pub name: String,

    /// URL segment, unique per category. Empty when upstream omitted it.
    #[serde(default)]
    pub slug: String,
}

/// The store owner. One per site.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Merchant {
    pub business_name: String,
}

/// Everything one catalog query returns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    #[serde(default)]
    pub merchant: Merchant,

    #[serde(default)]
    pub products: Vec<Product>,

    #[serde(default)]
    pub categories: Vec<Category>,
}
