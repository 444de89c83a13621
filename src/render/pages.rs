//! Listing pages: `/`, `/products`, `/categories`.

use super::{
    components::{category_list, product_list},
    escape,
};
use crate::data::{Category, Merchant, Product};

/// Home page: merchant name, then category and product listings.
pub fn index(merchant: &Merchant, products: &[Product], categories: &[Category]) -> String {
    format!(
        concat!(
            "<h1>{}</h1>",
            r#"<h3><a href="/categories">Categories</a></h3>{}"#,
            r#"<h3><a href="/products">Products</a></h3>{}"#,
        ),
        escape(&merchant.business_name),
        category_list(categories),
        product_list(products)
    )
}

pub fn products(products: &[Product]) -> String {
    format!("<h1>Products</h1>{}", product_list(products))
}

pub fn categories(categories: &[Category]) -> String {
    format!("<h1>Categories</h1>{}", category_list(categories))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Price;

    fn acme() -> Merchant {
        Merchant {
            business_name: "Acme".into(),
        }
    }

    #[test]
    fn test_index_contains_merchant_name() {
        let html = index(&acme(), &[], &[]);
        assert!(html.contains("Acme"));
        assert!(html.starts_with("<h1>Acme</h1>"));
    }

    #[test]
    fn test_index_lists_both_collections() {
        let products = [Product {
            id: "p1".into(),
            name: "Mug".into(),
            permalink: "mug".into(),
            price: Price::default(),
            images: vec![],
            categories: vec![],
        }];
        let categories = [Category {
            id: "c1".into(),
            name: "Kitchen".into(),
            slug: "kitchen".into(),
        }];
        let html = index(&acme(), &products, &categories);

        let categories_at = html.find(r#"href="/categories/kitchen""#).unwrap();
        let products_heading_at = html.find(r#"<a href="/products">"#).unwrap();
        let products_at = html.find(r#"href="/products/mug""#).unwrap();
        assert!(categories_at < products_heading_at);
        assert!(products_heading_at < products_at);
    }

    #[test]
    fn test_listing_headings() {
        assert_eq!(products(&[]), "<h1>Products</h1>");
        assert_eq!(categories(&[]), "<h1>Categories</h1>");
    }
}
