//! Detail templates for single products and categories.

use super::{components::product_list, escape};
use crate::data::{Category, Product};

/// Product detail body: name, price and the main image when there is one.
///
/// `image_src` maps the image's remote URL to the `src` actually written.
pub fn product_page(product: &Product, image_src: impl Fn(&str) -> String) -> String {
    let mut html = format!(
        "<h1>{}</h1><p>{}</p>",
        escape(&product.name),
        escape(&product.price.formatted_with_symbol)
    );

    if let Some(image) = product.main_image() {
        let alt = image.description.as_deref().unwrap_or(&product.name);
        html.push_str(&format!(
            r#"<img src="{}" alt="{}" style="max-width: 50%">"#,
            escape(&image_src(&image.url)),
            escape(alt)
        ));
    }

    html
}

/// Category detail body: name and the products listed under it.
pub fn category_page(category: &Category, products: &[&Product]) -> String {
    format!(
        "<h1>{}</h1>{}",
        escape(&category.name),
        product_list(products.iter().copied())
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Image, Price};

    fn mug(images: Vec<Image>) -> Product {
        Product {
            id: "prod_1".into(),
            name: "Mug".into(),
            permalink: "mug".into(),
            price: Price {
                raw: 12.5,
                formatted_with_symbol: "$12.50".into(),
            },
            images,
            categories: vec!["cat_1".into()],
        }
    }

    fn image(url: &str) -> Image {
        Image {
            url: url.into(),
            filename: None,
            description: None,
        }
    }

    #[test]
    fn test_product_page_fields() {
        let html = product_page(&mug(vec![]), |url| url.to_owned());

        assert!(html.contains("<h1>Mug</h1>"));
        assert!(html.contains("<p>$12.50</p>"));
    }

    #[test]
    fn test_product_without_images_has_no_img() {
        let html = product_page(&mug(vec![]), |url| url.to_owned());
        assert!(!html.contains("<img"));
    }

    #[test]
    fn test_product_page_uses_first_image_only() {
        let product = mug(vec![image("https://cdn/a.png"), image("https://cdn/b.png")]);
        let html = product_page(&product, |url| url.to_owned());

        assert_eq!(html.matches("<img").count(), 1);
        assert!(html.contains(r#"src="https://cdn/a.png""#));
        assert!(html.contains(r#"alt="Mug""#));
    }

    #[test]
    fn test_product_page_resolves_image_src() {
        let mut img = image("https://cdn/a.png");
        img.description = Some("A blue mug".into());
        let html = product_page(&mug(vec![img]), |_| "/assets/images/abc.png".to_owned());

        assert!(html.contains(r#"src="/assets/images/abc.png""#));
        assert!(html.contains(r#"alt="A blue mug""#));
    }

    #[test]
    fn test_category_page() {
        let category = Category {
            id: "cat_1".into(),
            name: "Kitchen".into(),
            slug: "kitchen".into(),
        };
        let product = mug(vec![]);

        let html = category_page(&category, &[&product]);
        assert!(html.starts_with("<h1>Kitchen</h1><ul>"));
        assert!(html.contains(r#"href="/products/mug""#));

        assert_eq!(category_page(&category, &[]), "<h1>Kitchen</h1>");
    }
}
