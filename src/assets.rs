//! Product image mirroring.
//!
//! When `[source] download_image_assets` is on, every product image is
//! downloaded into `<output>/<build.images>/` under a content-addressed name
//! (`blake3(url)` + original extension) and pages link the local copy.
//! Files already on disk are reused unless the build is clean.

use crate::{config::SiteConfig, data::Catalog, log, render::ImageMap};
use anyhow::{Context, Result, anyhow, bail};
use rayon::prelude::*;
use rustc_hash::{FxHashMap, FxHashSet};
use std::{
    fs,
    path::Path,
    sync::atomic::{AtomicBool, Ordering},
};

/// Hex chars of the URL hash kept in file names.
const HASH_LEN: usize = 16;

/// Longest extension copied from the source file name.
const MAX_EXT_LEN: usize = 5;

/// Unique image URLs across the catalog, in first-seen order.
pub fn image_urls(catalog: &Catalog) -> Vec<&str> {
    let mut seen = FxHashSet::default();
    catalog
        .products()
        .iter()
        .flat_map(|p| &p.images)
        .map(|image| image.url.as_str())
        .filter(|url| seen.insert(*url))
        .collect()
}

/// Download all product images and map each remote URL to its local href.
///
/// Calls `on_progress` after each image. The first failure aborts the rest.
pub fn mirror_images(
    catalog: &Catalog,
    config: &SiteConfig,
    on_progress: impl Fn() + Sync,
) -> Result<ImageMap> {
    let dir = config.images_dir();
    fs::create_dir_all(&dir).with_context(|| format!("Failed to create {}", dir.display()))?;

    let href_prefix = href_prefix(&config.build.images);
    let filenames: FxHashMap<&str, Option<&str>> = catalog
        .products()
        .iter()
        .flat_map(|p| &p.images)
        .map(|image| (image.url.as_str(), image.filename.as_deref()))
        .collect();

    let has_error = AtomicBool::new(false);
    let mirrored = image_urls(catalog)
        .into_par_iter()
        .map(|url| {
            if has_error.load(Ordering::Relaxed) {
                return Err(anyhow!("Aborted"));
            }
            let name = local_name(url, filenames.get(url).copied().flatten());
            let result = download(url, &dir.join(&name), config);
            on_progress();
            match result {
                Ok(()) => Ok((url.to_owned(), format!("{href_prefix}/{name}"))),
                Err(e) => {
                    if !has_error.swap(true, Ordering::Relaxed) {
                        log!("error"; "{url}: {e:#}");
                    }
                    Err(e)
                }
            }
        })
        .collect::<Result<ImageMap>>()?;

    Ok(mirrored)
}

/// Content-addressed file name: `<hash>.<ext>`.
fn local_name(url: &str, filename: Option<&str>) -> String {
    let digest = blake3::hash(url.as_bytes());
    let hash = &hex::encode(digest.as_bytes())[..HASH_LEN];

    match extension(filename.unwrap_or(url)) {
        Some(ext) => format!("{hash}.{ext}"),
        None => hash.to_owned(),
    }
}

/// Lowercase alphanumeric extension of a file name or URL, if it has one.
fn extension(name: &str) -> Option<String> {
    let path = name.split(['?', '#']).next().unwrap_or(name);
    let last_segment = path.rsplit('/').next().unwrap_or(path);
    let (_, ext) = last_segment.rsplit_once('.')?;

    let valid = !ext.is_empty()
        && ext.len() <= MAX_EXT_LEN
        && ext.chars().all(|c| c.is_ascii_alphanumeric());
    valid.then(|| ext.to_ascii_lowercase())
}

/// Site-absolute URL prefix of the images directory.
fn href_prefix(images: &Path) -> String {
    let segments: Vec<_> = images
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .filter(|s| !s.is_empty() && s != "/")
        .map(|s| urlencoding::encode(&s).into_owned())
        .collect();
    format!("/{}", segments.join("/"))
}

/// Fetch `url` into `dest`, skipping files that already exist.
fn download(url: &str, dest: &Path, config: &SiteConfig) -> Result<()> {
    if !config.build.clean && dest.is_file() {
        return Ok(());
    }

    let response = minreq::get(url)
        .with_timeout(config.source.timeout)
        .send()
        .with_context(|| format!("Failed to download {url}"))?;
    if response.status_code != 200 {
        bail!("HTTP error {} from {url}", response.status_code);
    }

    // Only complete downloads take the final name, so the reuse check above
    // never sees a truncated file.
    let partial = dest.with_extension("part");
    fs::write(&partial, response.as_bytes())
        .with_context(|| format!("Failed to write {}", partial.display()))?;
    fs::rename(&partial, dest)
        .with_context(|| format!("Failed to move {} into place", dest.display()))
}
