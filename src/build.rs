//! Site building orchestration.
//!
//! # Architecture
//!
//! ```text
//! build_site()
//!     │
//!     ├── fetch_catalog()      ──► one upstream query, awaited before anything else
//!     │
//!     ├── register_pages()     ──► PageSpec per listing / product / category
//!     │
//!     ├── mirror_images()      ──► optional, <output>/assets/images/*
//!     │
//!     ├── write_pages()        ──► rayon: render + minify + write index.html
//!     │
//!     └── build_sitemap()      ──► optional sitemap.xml
//! ```
//!
//! Any failure aborts the whole build; there is no partial output mode.

use crate::{
    assets,
    config::SiteConfig,
    data::Catalog,
    generator::build_sitemap,
    log,
    registrar::{PageSpec, register_pages},
    render::{ImageMap, Renderer},
    source::{self, CatalogSource},
    utils::{
        log::ProgressBars,
        minify::{MinifyType, minify},
    },
};
use anyhow::{Context, Result, anyhow};
use rayon::prelude::*;
use std::{
    fs,
    path::Path,
    sync::atomic::{AtomicBool, Ordering},
};

/// Output of a finished build.
#[derive(Debug)]
pub struct BuiltSite {
    /// Every registered page, in registration order
    pub pages: Vec<PageSpec>,
}

/// Query the configured source and build the site from its catalog.
pub fn build_site(config: &SiteConfig) -> Result<BuiltSite> {
    let source = source::from_config(config)?;
    let catalog = fetch_catalog(source.as_ref())?;
    build_from_catalog(&catalog, config)
}

/// Run the catalog query, logging where it came from.
pub fn fetch_catalog(source: &dyn CatalogSource) -> Result<Catalog> {
    log!("source"; "querying {}", source.describe());
    let catalog = source
        .fetch_catalog()
        .with_context(|| format!("Catalog query against {} failed", source.describe()))?;
    log!(
        "source"; "{} products, {} categories",
        catalog.products().len(),
        catalog.categories().len()
    );
    Ok(catalog)
}

/// Register, render and write every page for an already fetched catalog.
pub fn build_from_catalog(catalog: &Catalog, config: &SiteConfig) -> Result<BuiltSite> {
    let output = &config.build.output;
    prepare_output(output, config.build.clean)?;

    let pages = register_pages(catalog.products(), catalog.categories())
        .context("Page registration failed")?;
    log!("pages"; "registered {} pages", pages.len());

    let images = if config.source.download_image_assets {
        let count = assets::image_urls(catalog).len();
        let progress = ProgressBars::new(&[("images", count)]);
        let images = assets::mirror_images(catalog, config, || progress.inc_by_name("images"));
        progress.finish();
        let images = images.context("Image download failed")?;
        log!("images"; "{} mirrored", images.len());
        images
    } else {
        ImageMap::default()
    };

    let renderer = Renderer::new(catalog, &images, &config.site.title, &config.site.language);
    let progress = ProgressBars::new(&[("pages", pages.len())]);
    let written = write_pages(&pages, &renderer, config, || progress.inc_by_name("pages"));
    progress.finish();
    written?;

    build_sitemap(config, &pages)?;

    log!("build"; "done, {} pages in {}", pages.len(), output.display());
    Ok(BuiltSite { pages })
}

/// Render and write all pages in parallel. The first failure is logged once.
fn write_pages(
    pages: &[PageSpec],
    renderer: &Renderer<'_>,
    config: &SiteConfig,
    on_progress: impl Fn() + Sync,
) -> Result<()> {
    let has_error = AtomicBool::new(false);

    pages.par_iter().try_for_each(|page| {
        if has_error.load(Ordering::Relaxed) {
            return Err(anyhow!("Aborted"));
        }
        if let Err(e) = write_page(page, renderer, config) {
            if !has_error.swap(true, Ordering::Relaxed) {
                log!("error"; "{}: {:#}", page.path, e);
            }
            return Err(e.context("Build failed"));
        }
        on_progress();
        Ok(())
    })
}

fn write_page(page: &PageSpec, renderer: &Renderer<'_>, config: &SiteConfig) -> Result<()> {
    let html = renderer.render(page)?;
    let html = minify(MinifyType::Html(html.as_bytes()), config);

    let file = page.output_file(&config.build.output);
    if let Some(parent) = file.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(&file, &*html).with_context(|| format!("Failed to write {}", file.display()))
}

/// Create the output directory, wiping it first for clean builds.
fn prepare_output(output: &Path, clean: bool) -> Result<()> {
    if clean && output.exists() {
        fs::remove_dir_all(output).with_context(|| {
            format!("Failed to clear output directory: {}", output.display())
        })?;
    }
    fs::create_dir_all(output)
        .with_context(|| format!("Failed to create output directory: {}", output.display()))
}
