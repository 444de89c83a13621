//! Chec (Commerce.js) REST API client.
//!
//! Fetches `/merchants`, `/categories` and `/products`, following
//! `meta.pagination` until every page has been read.

use super::{CatalogSource, SourceError};
use crate::{
    data::{Catalog, CatalogSnapshot, Category, Image, Merchant, Price, Product},
    log,
};
use anyhow::{Context, Result};
use serde::{Deserialize, de::DeserializeOwned};

/// Largest page size the API accepts.
const PAGE_LIMIT: u32 = 200;

const USER_AGENT: &str = concat!("storefront/", env!("CARGO_PKG_VERSION"));

/// Blocking client for one store, identified by its public key.
pub struct ChecSource {
    api_url: String,
    public_key: String,
    timeout: u64,
}

impl ChecSource {
    pub fn new(api_url: &str, public_key: &str, timeout: u64) -> Self {
        Self {
            api_url: api_url.trim_end_matches('/').to_owned(),
            public_key: public_key.to_owned(),
            timeout,
        }
    }

    /// GET `{api_url}/{path}` and return the body of a 200 response.
    fn get(&self, path: &str, query: &[(&str, String)]) -> Result<String, SourceError> {
        let url = format!("{}/{}", self.api_url, path);

        let request = query.iter().fold(
            minreq::get(&url)
                .with_header("X-Authorization", &self.public_key)
                .with_header("Accept", "application/json")
                .with_header("User-Agent", USER_AGENT)
                .with_timeout(self.timeout),
            |request, (key, value)| request.with_param(*key, value),
        );

        let response = request.send().map_err(|source| SourceError::Http {
            url: url.clone(),
            source,
        })?;

        if response.status_code != 200 {
            return Err(SourceError::Status {
                url,
                status: response.status_code,
            });
        }

        response
            .as_str()
            .map(str::to_owned)
            .map_err(|source| SourceError::Http { url, source })
    }

    /// Read every page of a list endpoint.
    fn get_all<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, SourceError> {
        let mut items = Vec::new();
        let mut page = 1;

        loop {
            let body = self.get(
                path,
                &[("limit", PAGE_LIMIT.to_string()), ("page", page.to_string())],
            )?;
            let list: List<T> = decode(path, &body)?;
            items.extend(list.data);

            if page >= list.meta.pagination.total_pages {
                return Ok(items);
            }
            page += 1;
        }
    }

    fn fetch_merchant(&self) -> Result<Merchant, SourceError> {
        let body = self.get("merchants", &[])?;
        let merchant: ChecMerchant = decode("merchants", &body)?;
        Ok(merchant.into())
    }
}

impl CatalogSource for ChecSource {
    fn describe(&self) -> String {
        self.api_url.clone()
    }

    fn fetch_catalog(&self) -> Result<Catalog> {
        let merchant = self.fetch_merchant().context("Failed to query merchant")?;

        let categories: Vec<ChecCategory> =
            self.get_all("categories").context("Failed to query categories")?;
        log!("source"; "{} categories", categories.len());

        let products: Vec<ChecProduct> =
            self.get_all("products").context("Failed to query products")?;
        log!("source"; "{} products", products.len());

        Ok(Catalog::new(CatalogSnapshot {
            merchant,
            products: products.into_iter().map(Product::from).collect(),
            categories: categories.into_iter().map(Category::from).collect(),
        }))
    }
}

fn decode<T: DeserializeOwned>(path: &str, body: &str) -> Result<T, SourceError> {
    serde_json::from_str(body).map_err(|source| SourceError::Decode {
        url: path.to_owned(),
        source,
    })
}

// ============================================================================
// Wire Types
// ============================================================================

/// Paginated list envelope: `{ "data": [...], "meta": { "pagination": {...} } }`
#[derive(Debug, Deserialize)]
struct List<T> {
    #[serde(default = "Vec::new")]
    data: Vec<T>,
    #[serde(default)]
    meta: ListMeta,
}

#[derive(Debug, Default, Deserialize)]
struct ListMeta {
    #[serde(default)]
    pagination: Pagination,
}

#[derive(Debug, Deserialize)]
struct Pagination {
    #[serde(default = "one")]
    total_pages: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self { total_pages: one() }
    }
}

fn one() -> u32 {
    1
}

#[derive(Debug, Deserialize)]
struct ChecMerchant {
    #[serde(default)]
    business_name: String,
}

#[derive(Debug, Deserialize)]
struct ChecCategory {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    slug: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChecProduct {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    permalink: Option<String>,
    #[serde(default)]
    price: Option<ChecPrice>,
    #[serde(default)]
    assets: Vec<ChecAsset>,
    #[serde(default)]
    categories: Vec<ChecCategoryRef>,
}

#[derive(Debug, Deserialize)]
struct ChecPrice {
    #[serde(default)]
    raw: f64,
    #[serde(default)]
    formatted_with_symbol: String,
}

#[derive(Debug, Deserialize)]
struct ChecAsset {
    url: String,
    #[serde(default)]
    is_image: bool,
    #[serde(default)]
    filename: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChecCategoryRef {
    id: String,
}

impl From<ChecMerchant> for Merchant {
    fn from(m: ChecMerchant) -> Self {
        Self {
            business_name: m.business_name,
        }
    }
}

impl From<ChecCategory> for Category {
    fn from(c: ChecCategory) -> Self {
        Self {
            id: c.id,
            name: c.name,
            slug: c.slug.unwrap_or_default(),
        }
    }
}

impl From<ChecProduct> for Product {
    fn from(p: ChecProduct) -> Self {
        Self {
            id: p.id,
            name: p.name,
            permalink: p.permalink.unwrap_or_default(),
            price: p
                .price
                .map(|price| Price {
                    raw: price.raw,
                    formatted_with_symbol: price.formatted_with_symbol,
                })
                .unwrap_or_default(),
            images: p
                .assets
                .into_iter()
                .filter(|asset| asset.is_image)
                .map(|asset| Image {
                    url: asset.url,
                    filename: asset.filename,
                    description: asset.description.filter(|d| !d.is_empty()),
                })
                .collect(),
            categories: p.categories.into_iter().map(|c| c.id).collect(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
