//! Errors raised while loading or checking `storefront.toml`.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    /// Carries the TOML location (line, column) in its message.
    #[error("invalid storefront.toml: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Validation(String),
}
