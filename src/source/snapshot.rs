//! Local JSON catalog snapshots.
//!
//! Lets a site build offline (or in CI) from a file written earlier by
//! `storefront fetch`.

use super::{CatalogSource, SourceError};
use crate::data::{Catalog, CatalogSnapshot};
use anyhow::{Context, Result};
use std::{fs, path::{Path, PathBuf}};

/// Catalog read from a JSON file on disk.
pub struct SnapshotSource {
    path: PathBuf,
}

impl SnapshotSource {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl CatalogSource for SnapshotSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn fetch_catalog(&self) -> Result<Catalog> {
        let content = fs::read_to_string(&self.path)
            .map_err(|err| SourceError::Snapshot(self.path.clone(), err))?;
        let snapshot: CatalogSnapshot = serde_json::from_str(&content)
            .map_err(|source| SourceError::Decode {
                url: self.describe(),
                source,
            })?;
        Ok(Catalog::new(snapshot))
    }
}

/// Write a catalog as a pretty-printed JSON snapshot.
pub fn write_snapshot(catalog: &Catalog, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(catalog.snapshot())?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Category, Merchant, Price, Product};

    #[test]
    fn test_snapshot_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/catalog.json");
        let catalog = Catalog::new(CatalogSnapshot {
            merchant: Merchant {
                business_name: "Acme".into(),
            },
            products: vec![Product {
                id: "prod_1".into(),
                name: "Mug".into(),
                permalink: "mug".into(),
                price: Price {
                    raw: 3.0,
                    formatted_with_symbol: "$3.00".into(),
                },
                images: vec![],
                categories: vec!["cat_1".into()],
            }],
            categories: vec![Category {
                id: "cat_1".into(),
                name: "Kitchen".into(),
                slug: "kitchen".into(),
            }],
        });

        write_snapshot(&catalog, &path).unwrap();
        let loaded = SnapshotSource::new(path).fetch_catalog().unwrap();

        assert_eq!(loaded.snapshot(), catalog.snapshot());
    }

    #[test]
    fn test_missing_snapshot_is_an_error() {
        let source = SnapshotSource::new(PathBuf::from("/no/such/catalog.json"));
        let err = source.fetch_catalog().unwrap_err();

        assert!(matches!(
            err.downcast_ref::<SourceError>(),
            Some(SourceError::Snapshot(..))
        ));
    }

    #[test]
    fn test_malformed_snapshot_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        fs::write(&path, r#"{ "products": [{ "name": "no id" }] }"#).unwrap();

        assert!(SnapshotSource::new(path).fetch_catalog().is_err());
    }
}
