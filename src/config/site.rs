//! `[site]` section configuration.
//!
//! Basic site information shared by every rendered page.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};

/// `[site]` section in storefront.toml - basic site metadata.
///
/// # Example
/// ```toml
/// [site]
/// title = "Acme Store"
/// url = "https://shop.acme.com"
/// language = "en"
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SiteInfo {
    /// Fallback title, used when the merchant has no business name.
    #[serde(default = "defaults::site::title")]
    #[educe(Default = defaults::site::title())]
    pub title: String,

    /// Base URL for absolute links in the sitemap.
    /// Required when `[build.sitemap].enable = true`.
    #[serde(default = "defaults::site::url", skip_serializing_if = "Option::is_none")]
    #[educe(Default = defaults::site::url())]
    pub url: Option<String>,

    /// BCP 47 language code written to `<html lang>`.
    #[serde(default = "defaults::site::language")]
    #[educe(Default = defaults::site::language())]
    pub language: String,
}

#[cfg(test)]
mod tests {
    use super::super::SiteConfig;

    #[test]
    fn test_site_config_full() {
        let config = r#"
            [site]
            title = "Acme Store"
            url = "https://shop.acme.com"
            language = "en-GB"
        "#;
        let config: SiteConfig = toml::from_str(config).unwrap();

        assert_eq!(config.site.title, "Acme Store");
        assert_eq!(config.site.url.as_deref(), Some("https://shop.acme.com"));
        assert_eq!(config.site.language, "en-GB");
    }

    #[test]
    fn test_site_config_defaults() {
        let config: SiteConfig = toml::from_str("[site]").unwrap();

        assert_eq!(config.site.title, "My Store");
        assert_eq!(config.site.url, None);
        assert_eq!(config.site.language, "en");
    }

    #[test]
    fn test_unknown_field_rejection() {
        let config = r#"
            [site]
            author = "nobody"
        "#;
        let result: Result<SiteConfig, _> = toml::from_str(config);
        assert!(result.is_err());
    }
}
