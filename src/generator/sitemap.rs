//! Sitemap generation.
//!
//! Lists every registered page in `sitemap.xml` for search engine indexing.
//!
//! # Sitemap Format
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
//!   <url>
//!     <loc>https://shop.example.com/products/mug/</loc>
//!     <lastmod>2025-01-01</lastmod>
//!   </url>
//! </urlset>
//! ```

use crate::{
    config::SiteConfig,
    log,
    registrar::PageSpec,
    utils::minify::{MinifyType, minify},
};
use anyhow::{Context, Result};
use quick_xml::escape::escape;
use std::fmt::Write as _;
use std::fs;

/// XML namespace for sitemap
const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Build sitemap if enabled in config.
///
/// Every page gets the build date as `lastmod`: the whole catalog is
/// re-fetched on each build.
pub fn build_sitemap(config: &SiteConfig, pages: &[PageSpec]) -> Result<()> {
    if !config.build.sitemap.enable {
        return Ok(());
    }
    let Some(base_url) = config.site.url.as_deref() else {
        return Ok(());
    };

    let today = chrono::Utc::now().format("%Y-%m-%d").to_string();
    Sitemap::from_pages(base_url, pages, &today).write(config)
}

/// Sitemap data structure
struct Sitemap {
    urls: Vec<UrlEntry>,
}

/// Single URL entry in the sitemap
struct UrlEntry {
    /// Full URL location
    loc: String,
    /// Last modification date (YYYY-MM-DD)
    lastmod: String,
}

impl Sitemap {
    fn from_pages(base_url: &str, pages: &[PageSpec], lastmod: &str) -> Self {
        let urls = pages
            .iter()
            .map(|page| UrlEntry {
                loc: full_url(base_url, &page.path),
                lastmod: lastmod.to_owned(),
            })
            .collect();

        Self { urls }
    }

    fn into_xml(self) -> String {
        let mut xml = String::with_capacity(128 + self.urls.len() * 96);

        xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        let _ = writeln!(xml, r#"<urlset xmlns="{SITEMAP_NS}">"#);

        for entry in self.urls {
            xml.push_str("  <url>\n");
            let _ = writeln!(xml, "    <loc>{}</loc>", escape(entry.loc.as_str()));
            let _ = writeln!(xml, "    <lastmod>{}</lastmod>", entry.lastmod);
            xml.push_str("  </url>\n");
        }

        xml.push_str("</urlset>\n");
        xml
    }

    fn write(self, config: &SiteConfig) -> Result<()> {
        let sitemap_path = &config.build.sitemap.path;
        let xml = self.into_xml();
        let xml = minify(MinifyType::Xml(xml.as_bytes()), config);

        fs::write(sitemap_path, &*xml)
            .with_context(|| format!("Failed to write sitemap to {}", sitemap_path.display()))?;

        log!("sitemap"; "{}", sitemap_path.file_name().unwrap_or_default().to_string_lossy());
        Ok(())
    }
}

/// Absolute URL of a page path; directory pages end with `/`.
fn full_url(base_url: &str, path: &str) -> String {
    let base = base_url.trim_end_matches('/');
    let encoded: Vec<_> = path
        .split('/')
        .filter(|s| !s.is_empty())
        .map(urlencoding::encode)
        .collect();

    if encoded.is_empty() {
        format!("{base}/")
    } else {
        format!("{base}/{}/", encoded.join("/"))
    }
}
