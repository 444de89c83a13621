//! Upstream catalog sources.
//!
//! A [`CatalogSource`] answers the one query a build needs: every product,
//! every category and the merchant. The build awaits it before registering any
//! page; a failed query aborts the build.
//!
//! | Source             | Used when                  |
//! |--------------------|----------------------------|
//! | [`ChecSource`]     | default, remote REST API   |
//! | [`SnapshotSource`] | `--catalog <file.json>`    |

mod chec;
mod snapshot;

pub use chec::ChecSource;
pub use snapshot::{SnapshotSource, write_snapshot};

use crate::{config::SiteConfig, data::Catalog};
use anyhow::Result;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while querying the catalog.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("request to `{url}` failed")]
    Http {
        url: String,
        #[source]
        source: minreq::Error,
    },

    #[error("`{url}` answered with HTTP {status}")]
    Status { url: String, status: i32 },

    #[error("unexpected response body from `{url}`")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("cannot read catalog snapshot `{0}`")]
    Snapshot(PathBuf, #[source] std::io::Error),

    #[error("no API public key configured")]
    MissingKey,
}

/// Something that can produce the whole catalog in one query.
pub trait CatalogSource {
    /// Human-readable origin, for logs.
    fn describe(&self) -> String;

    fn fetch_catalog(&self) -> Result<Catalog>;
}

/// Pick the source the configuration asks for.
pub fn from_config(config: &SiteConfig) -> Result<Box<dyn CatalogSource>> {
    if let Some(path) = &config.catalog {
        return Ok(Box::new(SnapshotSource::new(path.clone())));
    }

    let key = config.public_key().ok_or(SourceError::MissingKey)?;
    Ok(Box::new(ChecSource::new(
        &config.source.api_url,
        key,
        config.source.timeout,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_prefers_snapshot() {
        let mut config = SiteConfig::default();
        config.catalog = Some(PathBuf::from("/tmp/catalog.json"));
        config.source.public_key = Some("pk_test".into());

        let source = from_config(&config).unwrap();
        assert!(source.describe().contains("catalog.json"));
    }

    #[test]
    fn test_from_config_remote() {
        let mut config = SiteConfig::default();
        config.source.public_key = Some("pk_test".into());

        let source = from_config(&config).unwrap();
        assert!(source.describe().contains("api.chec.io"));
    }

    #[test]
    fn test_from_config_without_key() {
        let err = from_config(&SiteConfig::default()).err().unwrap();
        assert!(matches!(
            err.downcast_ref::<SourceError>(),
            Some(SourceError::MissingKey)
        ));
    }
}
