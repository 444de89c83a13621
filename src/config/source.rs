//! `[source]` section configuration.
//!
//! Connection settings for the upstream commerce API.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};

/// `[source]` section in storefront.toml - commerce API settings.
///
/// The public key is usually supplied through `CHEC_PUBLIC_KEY` (environment
/// or `.env`) rather than written into the config file.
///
/// # Example
/// ```toml
/// [source]
/// api_url = "https://api.chec.io/v1"
/// download_image_assets = true
/// timeout = 30
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SourceConfig {
    /// API base URL, without trailing slash.
    #[serde(default = "defaults::source::api_url")]
    #[educe(Default = defaults::source::api_url())]
    pub api_url: String,

    /// Public API key sent as `X-Authorization`.
    #[serde(default = "defaults::source::public_key", skip_serializing_if = "Option::is_none")]
    #[educe(Default = defaults::source::public_key())]
    pub public_key: Option<String>,

    /// Mirror product images into the output directory during build.
    #[serde(default = "defaults::r#true")]
    #[educe(Default = true)]
    pub download_image_assets: bool,

    /// Per-request timeout in seconds.
    #[serde(default = "defaults::source::timeout")]
    #[educe(Default = defaults::source::timeout())]
    pub timeout: u64,
}

#[cfg(test)]
mod tests {
    use super::super::SiteConfig;

    #[test]
    fn test_source_config_defaults() {
        let config: SiteConfig = toml::from_str("").unwrap();

        assert_eq!(config.source.api_url, "https://api.chec.io/v1");
        assert_eq!(config.source.public_key, None);
        assert!(config.source.download_image_assets);
        assert_eq!(config.source.timeout, 30);
    }

    #[test]
    fn test_source_config_override() {
        let config = r#"
            [source]
            api_url = "http://localhost:9000/v1"
            public_key = "pk_test_123"
            download_image_assets = false
            timeout = 5
        "#;
        let config: SiteConfig = toml::from_str(config).unwrap();

        assert_eq!(config.source.api_url, "http://localhost:9000/v1");
        assert_eq!(config.source.public_key.as_deref(), Some("pk_test_123"));
        assert!(!config.source.download_image_assets);
        assert_eq!(config.source.timeout, 5);
    }

    #[test]
    fn test_default_config_does_not_serialize_key() {
        let toml = toml::to_string_pretty(&SiteConfig::default()).unwrap();
        assert!(!toml.contains("public_key"));
        assert!(toml.contains("download_image_assets = true"));
    }
}
