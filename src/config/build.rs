//! `[build]` section configuration.
//!
//! Contains build settings: output paths, minification and sitemap.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// `[build]` section in storefront.toml - build pipeline configuration.
///
/// # Example
/// ```toml
/// [build]
/// output = "public"        # Output directory
/// minify = true            # Minify HTML
///
/// [build.sitemap]
/// enable = true
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Project root directory (usually set via CLI `--root`).
    #[serde(default = "defaults::build::root", skip_serializing_if = "Option::is_none")]
    #[educe(Default = defaults::build::root())]
    pub root: Option<PathBuf>,

    /// Build output directory.
    #[serde(default = "defaults::build::output")]
    #[educe(Default = defaults::build::output())]
    pub output: PathBuf,

    /// Directory for mirrored product images, relative to `output`.
    #[serde(default = "defaults::build::images")]
    #[educe(Default = defaults::build::images())]
    pub images: PathBuf,

    /// Minify HTML output (removes whitespace).
    #[serde(default = "defaults::r#true")]
    #[educe(Default = true)]
    pub minify: bool,

    /// Clear output directory before each build.
    #[serde(default = "defaults::r#false")]
    #[educe(Default = false)]
    pub clean: bool,

    /// Sitemap generation settings.
    #[serde(default)]
    pub sitemap: SitemapConfig,
}

/// `[build.sitemap]` section - sitemap.xml generation.
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SitemapConfig {
    /// Enable sitemap generation (requires `[site].url`).
    #[serde(default = "defaults::r#false")]
    #[educe(Default = false)]
    pub enable: bool,

    /// Sitemap path, relative to `output`.
    #[serde(default = "defaults::build::sitemap::path")]
    #[educe(Default = defaults::build::sitemap::path())]
    pub path: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::super::SiteConfig;
    use std::path::PathBuf;

    #[test]
    fn test_build_config_defaults() {
        let config: SiteConfig = toml::from_str("").unwrap();

        assert_eq!(config.build.output, PathBuf::from("public"));
        assert_eq!(config.build.images, PathBuf::from("assets/images"));
        assert!(config.build.minify);
        assert!(!config.build.clean);
        assert!(!config.build.sitemap.enable);
        assert_eq!(config.build.sitemap.path, PathBuf::from("sitemap.xml"));
    }

    #[test]
    fn test_build_sitemap_config() {
        let config = r#"
            [build]
            output = "dist"
            minify = false

            [build.sitemap]
            enable = true
            path = "map.xml"
        "#;
        let config: SiteConfig = toml::from_str(config).unwrap();

        assert_eq!(config.build.output, PathBuf::from("dist"));
        assert!(!config.build.minify);
        assert!(config.build.sitemap.enable);
        assert_eq!(config.build.sitemap.path, PathBuf::from("map.xml"));
    }

    #[test]
    fn test_unknown_field_rejection() {
        let config = r#"
            [build]
            content = "content"
        "#;
        let result: Result<SiteConfig, _> = toml::from_str(config);
        assert!(result.is_err());
    }
}
