//! Page registration: one static output path per catalog record.
//!
//! # Path Mapping
//!
//! | Record / page      | Path                   | Template         | Context |
//! |--------------------|------------------------|------------------|---------|
//! | home               | `/`                    | `Index`          | -       |
//! | product listing    | `/products`            | `ProductList`    | -       |
//! | category listing   | `/categories`          | `CategoryList`   | -       |
//! | product `p`        | `/products/<p.permalink>` | `ProductDetail`  | `p.id`  |
//! | category `c`       | `/categories/<c.slug>` | `CategoryDetail` | `c.id`  |
//!
//! Path uniqueness is left to the upstream data. A record without a
//! permalink/slug, or with one that is not a single path segment, fails the
//! whole registration.

use crate::data::{Category, Product};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors for records that cannot be mapped to a path.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistrarError {
    #[error("product `{0}` has no permalink")]
    MissingPermalink(String),

    #[error("category `{0}` has no slug")]
    MissingSlug(String),

    #[error("{kind} `{id}` has `{segment}`, which is not a single path segment")]
    UnsafeSegment {
        kind: &'static str,
        id: String,
        segment: String,
    },
}

/// Which template renders a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Template {
    Index,
    ProductList,
    CategoryList,
    ProductDetail,
    CategoryDetail,
}

/// Render context handed to a template.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageContext {
    /// Identifier of the product/category a detail page shows
    pub id: Option<String>,
}

/// A page declared for output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSpec {
    /// Site-absolute URL path, e.g. `/products/mug`
    pub path: String,
    pub template: Template,
    pub context: PageContext,
}

impl PageSpec {
    fn listing(path: &str, template: Template) -> Self {
        Self {
            path: path.to_owned(),
            template,
            context: PageContext::default(),
        }
    }

    fn detail(prefix: &str, segment: &str, template: Template, id: &str) -> Self {
        Self {
            path: format!("{prefix}/{segment}"),
            template,
            context: PageContext {
                id: Some(id.to_owned()),
            },
        }
    }

    /// HTML file this page is written to under `root`.
    ///
    /// `/` → `root/index.html`, `/products/mug` → `root/products/mug/index.html`
    pub fn output_file(&self, root: &Path) -> PathBuf {
        self.path
            .split('/')
            .filter(|s| !s.is_empty())
            .fold(root.to_path_buf(), |dir, segment| dir.join(segment))
            .join("index.html")
    }
}

/// Register every page of the site.
///
/// Listings come first, then products and categories in input order, so the
/// same input always yields the same list.
pub fn register_pages(
    products: &[Product],
    categories: &[Category],
) -> Result<Vec<PageSpec>, RegistrarError> {
    let mut pages = Vec::with_capacity(3 + products.len() + categories.len());
    pages.push(PageSpec::listing("/", Template::Index));
    pages.push(PageSpec::listing("/products", Template::ProductList));
    pages.push(PageSpec::listing("/categories", Template::CategoryList));

    for product in products {
        if product.permalink.is_empty() {
            return Err(RegistrarError::MissingPermalink(product.id.clone()));
        }
        check_segment("product", &product.id, &product.permalink)?;
        pages.push(PageSpec::detail(
            "/products",
            &product.permalink,
            Template::ProductDetail,
            &product.id,
        ));
    }

    for category in categories {
        if category.slug.is_empty() {
            return Err(RegistrarError::MissingSlug(category.id.clone()));
        }
        check_segment("category", &category.id, &category.slug)?;
        pages.push(PageSpec::detail(
            "/categories",
            &category.slug,
            Template::CategoryDetail,
            &category.id,
        ));
    }

    Ok(pages)
}

/// Reject values that would escape their output directory.
fn check_segment(kind: &'static str, id: &str, segment: &str) -> Result<(), RegistrarError> {
    let unsafe_segment =
        segment.contains(['/', '\\']) || segment == "." || segment == "..";
    if unsafe_segment {
        return Err(RegistrarError::UnsafeSegment {
            kind,
            id: id.to_owned(),
            segment: segment.to_owned(),
        });
    }
    Ok(())
}
