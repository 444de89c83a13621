//! In-memory catalog with id lookups.
//!
//! Serves the collection queries (`products()`, `categories()`) used by
//! listing pages and the per-record lookups (`product(id)`, `category(id)`)
//! used by detail templates.

use super::types::{CatalogSnapshot, Category, Merchant, Product};
use rustc_hash::FxHashMap;

/// Read-only catalog for the duration of one build.
#[derive(Debug, Default)]
pub struct Catalog {
    data: CatalogSnapshot,
    product_index: FxHashMap<String, usize>,
    category_index: FxHashMap<String, usize>,
}

impl Catalog {
    /// Index a snapshot. On duplicate ids the first record wins.
    pub fn new(data: CatalogSnapshot) -> Self {
        let product_index = index_by(&data.products, |p| &p.id);
        let category_index = index_by(&data.categories, |c| &c.id);

        Self {
            data,
            product_index,
            category_index,
        }
    }

    pub fn merchant(&self) -> &Merchant {
        &self.data.merchant
    }

    /// All products in upstream order.
    pub fn products(&self) -> &[Product] {
        &self.data.products
    }

    /// All categories in upstream order.
    pub fn categories(&self) -> &[Category] {
        &self.data.categories
    }

    pub fn product(&self, id: &str) -> Option<&Product> {
        self.product_index.get(id).map(|&i| &self.data.products[i])
    }

    pub fn category(&self, id: &str) -> Option<&Category> {
        self.category_index.get(id).map(|&i| &self.data.categories[i])
    }

    /// Products listed under a category, in upstream order.
    pub fn products_in(&self, category_id: &str) -> Vec<&Product> {
        self.data
            .products
            .iter()
            .filter(|p| p.categories.iter().any(|c| c == category_id))
            .collect()
    }

    /// Borrow the underlying snapshot (for `fetch` output).
    pub fn snapshot(&self) -> &CatalogSnapshot {
        &self.data
    }
}

impl From<CatalogSnapshot> for Catalog {
    fn from(data: CatalogSnapshot) -> Self {
        Self::new(data)
    }
}

fn index_by<T>(items: &[T], key: impl Fn(&T) -> &String) -> FxHashMap<String, usize> {
    let mut index = FxHashMap::default();
    for (i, item) in items.iter().enumerate() {
        index.entry(key(item).clone()).or_insert(i);
    }
    index
}
