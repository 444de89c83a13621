//! Catalog data ingested from the commerce source.
//!
//! # Data Flow
//!
//! ```text
//! CatalogSource::fetch_catalog()
//!         │
//!         ▼
//!   CatalogSnapshot  ──►  Catalog::new()  ──►  id indexes
//!   (plain records)       (read-only)          product(id) / category(id)
//!         │
//!         └── also the `--catalog` / `fetch` JSON format
//! ```
//!
//! Records are immutable for the whole build and dropped once output is written.

mod store;
mod types;

pub use store::Catalog;
pub use types::{CatalogSnapshot, Category, Image, Merchant, Price, Product};
