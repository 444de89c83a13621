//! HTML rendering for registered pages.
//!
//! # Architecture
//!
//! ```text
//! Renderer::render(PageSpec)
//!     │
//!     ├── Template::Index / ProductList / CategoryList
//!     │       └── pages::*       (collection query → list components)
//!     │
//!     ├── Template::ProductDetail / CategoryDetail
//!     │       └── templates::*   (lookup by context id → fixed fields)
//!     │
//!     └── layout                 (doctype, <title>, lang)
//! ```

mod components;
mod pages;
mod templates;

use crate::{
    data::Catalog,
    registrar::{PageSpec, Template},
};
use rustc_hash::FxHashMap;
use std::borrow::Cow;
use thiserror::Error;

/// Shared page skeleton (embedded at compile time)
const LAYOUT_TEMPLATE: &str = include_str!("../embed/layout.html");

/// Remote image URL → `src` written into pages (set for mirrored images).
pub type ImageMap = FxHashMap<String, String>;

/// Errors raised while rendering a page.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenderError {
    #[error("page `{0}` needs a context id")]
    MissingContext(String),

    #[error("page `{path}` refers to unknown product `{id}`")]
    UnknownProduct { path: String, id: String },

    #[error("page `{path}` refers to unknown category `{id}`")]
    UnknownCategory { path: String, id: String },
}

/// Renders pages against one catalog.
pub struct Renderer<'a> {
    catalog: &'a Catalog,
    images: &'a ImageMap,
    /// Used as page title when the merchant has no business name
    fallback_title: &'a str,
    language: &'a str,
}

impl<'a> Renderer<'a> {
    pub fn new(
        catalog: &'a Catalog,
        images: &'a ImageMap,
        fallback_title: &'a str,
        language: &'a str,
    ) -> Self {
        Self {
            catalog,
            images,
            fallback_title,
            language,
        }
    }

    /// Render a full HTML document for one page.
    pub fn render(&self, page: &PageSpec) -> Result<String, RenderError> {
        let catalog = self.catalog;

        let (title, body) = match page.template {
            Template::Index => (
                None,
                pages::index(catalog.merchant(), catalog.products(), catalog.categories()),
            ),
            Template::ProductList => (
                Some("Products".to_owned()),
                pages::products(catalog.products()),
            ),
            Template::CategoryList => (
                Some("Categories".to_owned()),
                pages::categories(catalog.categories()),
            ),
            Template::ProductDetail => {
                let id = context_id(page)?;
                let product = catalog.product(id).ok_or_else(|| RenderError::UnknownProduct {
                    path: page.path.clone(),
                    id: id.to_owned(),
                })?;
                (
                    Some(product.name.clone()),
                    templates::product_page(product, |url| self.image_src(url)),
                )
            }
            Template::CategoryDetail => {
                let id = context_id(page)?;
                let category =
                    catalog.category(id).ok_or_else(|| RenderError::UnknownCategory {
                        path: page.path.clone(),
                        id: id.to_owned(),
                    })?;
                (
                    Some(category.name.clone()),
                    templates::category_page(category, &catalog.products_in(id)),
                )
            }
        };

        Ok(self.layout(title.as_deref(), &body))
    }

    /// `src` for an image: the mirrored copy when there is one.
    fn image_src(&self, url: &str) -> String {
        self.images
            .get(url)
            .cloned()
            .unwrap_or_else(|| url.to_owned())
    }

    fn site_name(&self) -> &str {
        let name = self.catalog.merchant().business_name.as_str();
        if name.is_empty() { self.fallback_title } else { name }
    }

    fn layout(&self, title: Option<&str>, body: &str) -> String {
        let title = match title {
            Some(title) => format!("{title} | {}", self.site_name()),
            None => self.site_name().to_owned(),
        };

        // These are template placeholders, not format args
        #[allow(clippy::literal_string_with_formatting_args)]
        let html = LAYOUT_TEMPLATE
            .replace("{lang}", &escape(self.language))
            .replace("{version}", env!("CARGO_PKG_VERSION"))
            .replace("{title}", &escape(&title))
            .replace("{body}", body);
        html
    }
}

fn context_id(page: &PageSpec) -> Result<&str, RenderError> {
    page.context
        .id
        .as_deref()
        .ok_or_else(|| RenderError::MissingContext(page.path.clone()))
}

/// Escape text for HTML content and attribute values.
pub(crate) fn escape(text: &str) -> Cow<'_, str> {
    quick_xml::escape::escape(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        data::{CatalogSnapshot, Category, Image, Merchant, Price, Product},
        registrar::{PageContext, register_pages},
    };

    fn catalog(merchant: &str) -> Catalog {
        Catalog::new(CatalogSnapshot {
            merchant: Merchant {
                business_name: merchant.into(),
            },
            products: vec![
                Product {
                    id: "prod_1".into(),
                    name: "Mug".into(),
                    permalink: "mug".into(),
                    price: Price {
                        raw: 3.0,
                        formatted_with_symbol: "$3.00".into(),
                    },
                    images: vec![Image {
                        url: "https://cdn.example.com/mug.png".into(),
                        filename: Some("mug.png".into()),
                        description: None,
                    }],
                    categories: vec!["cat_1".into()],
                },
                Product {
                    id: "prod_2".into(),
                    name: "Poster".into(),
                    permalink: "poster".into(),
                    price: Price::default(),
                    images: vec![],
                    categories: vec![],
                },
            ],
            categories: vec![Category {
                id: "cat_1".into(),
                name: "Kitchen".into(),
                slug: "kitchen".into(),
            }],
        })
    }

    fn page(path: &str, template: Template, id: Option<&str>) -> PageSpec {
        PageSpec {
            path: path.into(),
            template,
            context: PageContext {
                id: id.map(str::to_owned),
            },
        }
    }

    #[test]
    fn test_render_index_with_merchant_name() {
        let catalog = catalog("Acme");
        let images = ImageMap::default();
        let renderer = Renderer::new(&catalog, &images, "My Store", "en");

        let html = renderer.render(&page("/", Template::Index, None)).unwrap();
        assert!(html.contains("Acme"));
        assert!(html.contains("<title>Acme</title>"));
        assert!(html.contains(r#"<html lang="en">"#));
    }

    #[test]
    fn test_render_product_without_images() {
        let catalog = catalog("Acme");
        let images = ImageMap::default();
        let renderer = Renderer::new(&catalog, &images, "", "en");

        let html = renderer
            .render(&page("/products/poster", Template::ProductDetail, Some("prod_2")))
            .unwrap();
        assert!(html.contains("<h1>Poster</h1>"));
        assert!(!html.contains("<img"));
        assert!(html.contains("<title>Poster | Acme</title>"));
    }

    #[test]
    fn test_render_product_with_mirrored_image() {
        let catalog = catalog("Acme");
        let mut images = ImageMap::default();
        images.insert(
            "https://cdn.example.com/mug.png".into(),
            "/assets/images/0123.png".into(),
        );
        let renderer = Renderer::new(&catalog, &images, "", "en");

        let html = renderer
            .render(&page("/products/mug", Template::ProductDetail, Some("prod_1")))
            .unwrap();
        assert!(html.contains(r#"src="/assets/images/0123.png""#));
    }

    #[test]
    fn test_render_category_lists_its_products() {
        let catalog = catalog("Acme");
        let images = ImageMap::default();
        let renderer = Renderer::new(&catalog, &images, "", "en");

        let html = renderer
            .render(&page("/categories/kitchen", Template::CategoryDetail, Some("cat_1")))
            .unwrap();
        assert!(html.contains("<h1>Kitchen</h1>"));
        assert!(html.contains(r#"href="/products/mug""#));
        assert!(!html.contains(r#"href="/products/poster""#));
    }

    #[test]
    fn test_fallback_title_without_merchant_name() {
        let catalog = catalog("");
        let images = ImageMap::default();
        let renderer = Renderer::new(&catalog, &images, "My Store", "en");

        let html = renderer
            .render(&page("/products", Template::ProductList, None))
            .unwrap();
        assert!(html.contains("<title>Products | My Store</title>"));
    }

    #[test]
    fn test_unknown_ids_fail() {
        let catalog = catalog("Acme");
        let images = ImageMap::default();
        let renderer = Renderer::new(&catalog, &images, "", "en");

        let err = renderer
            .render(&page("/products/x", Template::ProductDetail, Some("prod_x")))
            .unwrap_err();
        assert!(matches!(err, RenderError::UnknownProduct { .. }));

        let err = renderer
            .render(&page("/categories/x", Template::CategoryDetail, None))
            .unwrap_err();
        assert_eq!(err, RenderError::MissingContext("/categories/x".into()));
    }

    #[test]
    fn test_every_registered_page_renders() {
        let catalog = catalog("Acme");
        let images = ImageMap::default();
        let renderer = Renderer::new(&catalog, &images, "", "en");
        let pages = register_pages(catalog.products(), catalog.categories()).unwrap();

        for page in &pages {
            let html = renderer.render(page).unwrap();
            assert!(html.starts_with("<!DOCTYPE html>"));
        }
    }
}
