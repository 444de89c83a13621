//! Site configuration management for `storefront.toml`.
//!
//! # Sections
//!
//! | Section     | Purpose                                          |
//! |-------------|--------------------------------------------------|
//! | `[site]`    | Site metadata (title, url, language)             |
//! | `[source]`  | Commerce API (url, public key, image mirroring)  |
//! | `[build]`   | Output paths, minify, sitemap                    |
//! | `[serve]`   | Development server (port, interface)             |
//!
//! # Example
//!
//! ```toml
//! [site]
//! url = "https://shop.example.com"
//!
//! [source]
//! download_image_assets = true
//!
//! [build]
//! output = "public"
//! minify = true
//!
//! [build.sitemap]
//! enable = true
//!
//! [serve]
//! port = 5277
//! ```
//!
//! The API public key is read from `CHEC_PUBLIC_KEY` (process environment or a
//! `.env` file in the project root) and takes precedence over `[source] public_key`.

mod build;
pub mod defaults;
mod error;
mod serve;
mod site;
mod source;

use build::BuildConfig;
use serve::ServeConfig;
use site::SiteInfo;
use source::SourceConfig;

pub use error::ConfigError;

use crate::cli::{Cli, Commands};
use anyhow::{Result, bail};
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Component, Path, PathBuf},
};

/// Environment variable holding the API public key.
pub const PUBLIC_KEY_ENV: &str = "CHEC_PUBLIC_KEY";

// ============================================================================
// Root Configuration
// ============================================================================

/// Root configuration structure representing storefront.toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    /// Absolute path to the config file (set after loading)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Local catalog snapshot used instead of the remote API (CLI `--catalog`)
    #[serde(skip)]
    pub catalog: Option<PathBuf>,

    /// Basic site information
    #[serde(default)]
    pub site: SiteInfo,

    /// Commerce API settings
    #[serde(default)]
    pub source: SourceConfig,

    /// Build settings
    #[serde(default)]
    pub build: BuildConfig,

    /// Development server settings
    #[serde(default)]
    pub serve: ServeConfig,
}

impl SiteConfig {
    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: SiteConfig = toml::from_str(content).map_err(ConfigError::Toml)?;
        Ok(config)
    }

    /// Load configuration from file path
    pub fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        Self::from_str(&content)
    }

    /// Get the root directory path
    pub fn get_root(&self) -> &Path {
        self.build.root.as_deref().unwrap_or(Path::new("./"))
    }

    /// Set the root directory path
    pub fn set_root(&mut self, path: &Path) {
        self.build.root = Some(path.to_path_buf())
    }

    /// API public key, if one was configured.
    pub fn public_key(&self) -> Option<&str> {
        self.source.public_key.as_deref().filter(|key| !key.is_empty())
    }

    /// Absolute directory for mirrored product images.
    pub fn images_dir(&self) -> PathBuf {
        self.build.output.join(&self.build.images)
    }

    /// Update configuration with CLI arguments
    pub fn update_with_cli(&mut self, cli: &Cli) {
        let base = cli
            .root
            .clone()
            .unwrap_or_else(|| self.get_root().to_owned());
        let root = match &cli.command {
            Commands::Init { name: Some(name) } => base.join(name),
            _ => base,
        };

        Self::update_option(&mut self.build.output, cli.output.as_ref());
        self.update_path_with_root(&root, &cli.config);

        if let Some(args) = cli.build_args() {
            self.build.clean |= args.clean;
            Self::update_option(&mut self.build.minify, args.minify.as_ref());
            Self::update_option(&mut self.build.sitemap.enable, args.sitemap.as_ref());
            Self::update_option(
                &mut self.source.download_image_assets,
                args.download_images.as_ref(),
            );
            if let Some(catalog) = &args.catalog {
                self.catalog = Some(Self::normalize_path(&self.get_root().join(catalog)));
            }
            if let Some(url) = &args.base_url {
                self.site.url = Some(url.trim_end_matches('/').to_owned());
            }
        }

        if let Commands::Serve {
            interface, port, ..
        } = &cli.command
        {
            Self::update_option(&mut self.serve.interface, interface.as_ref());
            Self::update_option(&mut self.serve.port, port.as_ref());
            if self.site.url.is_none() {
                self.site.url = Some(format!(
                    "http://{}:{}",
                    self.serve.interface, self.serve.port
                ));
            }
        }
    }

    /// Load `.env` from the project root and apply `CHEC_PUBLIC_KEY`.
    ///
    /// Variables already present in the process environment win over `.env`.
    pub fn update_with_env(&mut self) {
        dotenvy::from_path(self.get_root().join(".env")).ok();
        self.apply_public_key(std::env::var(PUBLIC_KEY_ENV).ok());
    }

    /// Override the configured public key with one from the environment.
    fn apply_public_key(&mut self, key: Option<String>) {
        if let Some(key) = key.filter(|key| !key.trim().is_empty()) {
            self.source.public_key = Some(key.trim().to_owned());
        }
    }

    /// Update config option if CLI value is provided
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Update all paths relative to root directory and normalize to absolute paths
    fn update_path_with_root(&mut self, root: &Path, config_file: &Path) {
        let root = Self::normalize_path(root);
        self.set_root(&root);

        self.config_path = Self::normalize_path(&root.join(config_file));
        self.build.output = Self::normalize_path(&root.join(&self.build.output));
        self.build.sitemap.path = self.build.output.join(&self.build.sitemap.path);
    }

    /// Normalize a path to absolute, using canonicalize if the path exists
    fn normalize_path(path: &Path) -> PathBuf {
        path.canonicalize().unwrap_or_else(|_| {
            // For non-existent paths, manually make them absolute
            if path.is_absolute() {
                path.to_path_buf()
            } else {
                std::env::current_dir()
                    .map(|cwd| cwd.join(path))
                    .unwrap_or_else(|_| path.to_path_buf())
            }
        })
    }

    /// Validate configuration for a build
    pub fn validate(&self) -> Result<()> {
        match &self.catalog {
            Some(path) if !path.is_file() => bail!(ConfigError::Validation(format!(
                "catalog snapshot `{}` not found",
                path.display()
            ))),
            Some(_) => {}
            None if self.public_key().is_none() => bail!(ConfigError::Validation(format!(
                "no API public key: set `{PUBLIC_KEY_ENV}` or [source.public_key]"
            ))),
            None => {}
        }

        if !self.source.api_url.starts_with("http") {
            bail!(ConfigError::Validation(
                "[source.api_url] must start with http:// or https://".into()
            ));
        }

        if let Some(url) = &self.site.url
            && !url.starts_with("http")
        {
            bail!(ConfigError::Validation(
                "[site.url] must start with http:// or https://".into()
            ));
        }

        let images_inside_output = self
            .build
            .images
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        if !images_inside_output {
            bail!(ConfigError::Validation(format!(
                "[build.images] `{}` must be a relative path inside the output directory",
                self.build.images.display()
            )));
        }

        if self.build.sitemap.enable && self.site.url.is_none() {
            bail!(ConfigError::Validation(
                "[site.url] is required for sitemap generation".into()
            ));
        }

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
