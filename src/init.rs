//! Site initialization module.
//!
//! Creates a new site skeleton with default configuration.

use crate::config::{PUBLIC_KEY_ENV, SiteConfig};
use anyhow::{Context, Result, bail};
use std::{fs, path::Path};

/// Default config filename
const CONFIG_FILE: &str = "storefront.toml";

/// Template for the `.env` file holding the API key
const ENV_EXAMPLE_FILE: &str = ".env.example";

/// Create a new site at the configured root.
///
/// When no name was given (init in the current directory), the directory
/// must be empty.
pub fn new_site(config: &SiteConfig, has_name: bool) -> Result<()> {
    let root = config.get_root();

    if !has_name && !is_dir_empty(root)? {
        bail!(
            "Current directory is not empty. Use `storefront init <SITE_NAME>` to create in a subdirectory."
        );
    }
    if has_name && root.exists() {
        bail!("Path `{}` already exists", root.display());
    }

    fs::create_dir_all(root).with_context(|| format!("Failed to create {}", root.display()))?;
    init_default_config(root)?;
    init_env_example(root)?;
    init_ignored_files(root, &output_entry(config, root))?;

    Ok(())
}

/// Check if a directory is completely empty
fn is_dir_empty(path: &Path) -> Result<bool> {
    if !path.exists() {
        return Ok(true);
    }
    Ok(fs::read_dir(path)?.next().is_none())
}

/// Write default configuration file
fn init_default_config(root: &Path) -> Result<()> {
    let content = toml::to_string_pretty(&SiteConfig::default())?;
    fs::write(root.join(CONFIG_FILE), content)?;
    Ok(())
}

fn init_env_example(root: &Path) -> Result<()> {
    fs::write(root.join(ENV_EXAMPLE_FILE), format!("{PUBLIC_KEY_ENV}=\n"))?;
    Ok(())
}

/// Output directory as a root-relative ignore pattern.
fn output_entry(config: &SiteConfig, root: &Path) -> String {
    let output = config
        .build
        .output
        .strip_prefix(root)
        .unwrap_or(&config.build.output);
    format!("/{}/", output.display())
}

/// Write `.gitignore` with the output dir, the catalog snapshot and `.env`.
fn init_ignored_files(root: &Path, output: &str) -> Result<()> {
    let path = root.join(".gitignore");
    if !path.exists() {
        fs::write(&path, format!("{output}\n/catalog.json\n.env\n"))?;
    }
    Ok(())
}
