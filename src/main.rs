//! Storefront - A static site generator for headless commerce catalogs.

mod assets;
mod build;
mod cli;
mod config;
mod data;
mod generator;
mod init;
mod registrar;
mod render;
mod serve;
mod source;
mod utils;

use anyhow::{Context, Result, bail};
use build::{build_site, fetch_catalog};
use clap::Parser;
use cli::{Cli, Commands};
use config::SiteConfig;
use init::new_site;
use serve::serve_site;
use std::path::Path;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match &cli.command {
        Commands::Init { name } => new_site(&config, name.is_some()),
        Commands::Build { .. } => build_site(&config).map(|_| ()),
        Commands::Fetch { file } => {
            let source = source::from_config(&config)?;
            let catalog = fetch_catalog(source.as_ref())?;
            let path = config.get_root().join(file);
            source::write_snapshot(&catalog, &path)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            log!("fetch"; "saved {}", path.display());
            Ok(())
        }
        Commands::Serve { .. } => {
            build_site(&config)?;
            serve_site(&config)
        }
    }
}

/// Load and validate configuration from CLI arguments
fn load_config(cli: &Cli) -> Result<SiteConfig> {
    let root = cli.root.as_deref().unwrap_or(Path::new("./"));
    let config_path = root.join(&cli.config);

    let mut config = if config_path.exists() && !cli.is_init() {
        SiteConfig::from_path(&config_path)?
    } else {
        SiteConfig::default()
    };
    config.update_with_cli(cli);

    // Validate config state based on command
    let config_exists = config.config_path.exists();
    match (cli.is_init(), config_exists) {
        (true, true) => {
            bail!("Config file already exists. Remove it manually or init in a different path.")
        }
        (false, false) => bail!("Config file not found."),
        _ => {}
    }

    if !cli.is_init() {
        config.update_with_env();
        config.validate()?;
    }

    Ok(config)
}
