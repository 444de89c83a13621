//! Command-line interface definitions.
//!
//! Defines all CLI arguments and subcommands using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Storefront static site generator CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Project root directory
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Output directory path (relative to project root)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Config file name (default: storefront.toml)
    #[arg(short = 'C', long, default_value = "storefront.toml")]
    pub config: PathBuf,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Shared build arguments for Build and Serve commands
#[derive(clap::Args, Debug, Clone, Default)]
pub struct BuildArgs {
    /// Clean output directory completely before building
    #[arg(long)]
    pub clean: bool,

    /// Minify the html content
    #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub minify: Option<bool>,

    /// enable sitemap generation
    #[arg(long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub sitemap: Option<bool>,

    /// Download product images into the output directory
    #[arg(long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub download_images: Option<bool>,

    /// Build from a local catalog snapshot (JSON) instead of the remote API
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Override base URL for the site.
    ///
    /// Useful for CI/CD deployments where the production URL differs from local development.
    ///
    /// Example:
    ///   storefront build --base-url "https://shop.example.com"
    #[arg(long = "base-url")]
    pub base_url: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Init a site skeleton (config + ignore file)
    Init {
        /// the name(path) of site directory, related to `root`
        name: Option<PathBuf>,
    },

    /// Fetch the catalog and generate the site
    Build {
        #[command(flatten)]
        build_args: BuildArgs,
    },

    /// Fetch the catalog and save it as a JSON snapshot for `build --catalog`
    Fetch {
        /// Snapshot file, relative to `root`
        #[arg(default_value = "catalog.json")]
        file: PathBuf,
    },

    /// Build, then serve the output directory
    Serve {
        #[command(flatten)]
        build_args: BuildArgs,

        /// Interface to bind on
        #[arg(short, long)]
        interface: Option<String>,

        /// The port you should provide
        #[arg(short, long)]
        port: Option<u16>,
    },
}

impl Cli {
    pub const fn is_init(&self) -> bool {
        matches!(self.command, Commands::Init { .. })
    }

    /// Build arguments of the current command, if it builds.
    pub fn build_args(&self) -> Option<&BuildArgs> {
        match &self.command {
            Commands::Build { build_args } | Commands::Serve { build_args, .. } => Some(build_args),
            Commands::Init { .. } | Commands::Fetch { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_build_flags() {
        let cli = Cli::parse_from([
            "storefront",
            "build",
            "--clean",
            "--minify=false",
            "--catalog",
            "catalog.json",
        ]);
        let args = cli.build_args().unwrap();

        assert!(args.clean);
        assert_eq!(args.minify, Some(false));
        assert_eq!(args.catalog, Some(PathBuf::from("catalog.json")));
        assert_eq!(args.sitemap, None);
        assert!(!cli.is_init());
    }

    #[test]
    fn test_parse_flag_without_value() {
        let cli = Cli::parse_from(["storefront", "build", "--sitemap"]);
        assert_eq!(cli.build_args().unwrap().sitemap, Some(true));
    }

    #[test]
    fn test_parse_serve() {
        let cli = Cli::parse_from(["storefront", "serve", "-p", "8080", "-i", "0.0.0.0"]);

        match cli.command {
            Commands::Serve { interface, port, .. } => {
                assert_eq!(interface.as_deref(), Some("0.0.0.0"));
                assert_eq!(port, Some(8080));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_init_has_no_build_args() {
        let cli = Cli::parse_from(["storefront", "init", "shop"]);
        assert!(cli.is_init());
        assert!(cli.build_args().is_none());
    }

    #[test]
    fn test_parse_fetch_default_file() {
        let cli = Cli::parse_from(["storefront", "fetch"]);
        assert!(matches!(cli.command, Commands::Fetch { ref file } if file == &PathBuf::from("catalog.json")));
        assert!(cli.build_args().is_none());
    }

    #[test]
    fn test_default_config_name() {
        let cli = Cli::parse_from(["storefront", "build"]);
        assert_eq!(cli.config, PathBuf::from("storefront.toml"));
    }
}
