//! Presentational list components.
//!
//! Each list maps items to `<li><a href=...>` plus a small display block.
//! Empty input renders nothing.

use super::escape;
use crate::data::{Category, Product};
use std::fmt::Write;

/// Link target of a product detail page.
pub fn product_href(product: &Product) -> String {
    format!("/products/{}", urlencoding::encode(&product.permalink))
}

/// Link target of a category detail page.
pub fn category_href(category: &Category) -> String {
    format!("/categories/{}", urlencoding::encode(&category.slug))
}

/// `<ul>` of product links, each showing name and price.
pub fn product_list<'a>(products: impl IntoIterator<Item = &'a Product>) -> String {
    let items: String = products
        .into_iter()
        .fold(String::new(), |mut out, product| {
            let _ = write!(
                out,
                r#"<li><a href="{}">{}</a></li>"#,
                escape(&product_href(product)),
                product_summary(product)
            );
            out
        });
    wrap_list(&items)
}

/// `<ul>` of category links, each showing the name.
pub fn category_list<'a>(categories: impl IntoIterator<Item = &'a Category>) -> String {
    let items: String = categories
        .into_iter()
        .fold(String::new(), |mut out, category| {
            let _ = write!(
                out,
                r#"<li><a href="{}"><p>{}</p></a></li>"#,
                escape(&category_href(category)),
                escape(&category.name)
            );
            out
        });
    wrap_list(&items)
}

fn product_summary(product: &Product) -> String {
    format!(
        "<p>{}</p><p>{}</p>",
        escape(&product.name),
        escape(&product.price.formatted_with_symbol)
    )
}

fn wrap_list(items: &str) -> String {
    if items.is_empty() {
        String::new()
    } else {
        format!("<ul>{items}</ul>")
    }
}
