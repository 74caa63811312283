//! listpkgs - browse the NurOS package list from a terminal
//!
//! Loads `repodata.json` once (from a file or a single GET) and runs the
//! search, filter and grouping pipeline over it.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use listpkgs_core::config::{BrowserConfig, CatalogSource};
use listpkgs_core::Catalog;

mod browse_cli;

use browse_cli::SearchArgs;

/// Log levels
#[derive(Debug, Clone, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_filter_directive(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

#[derive(Parser, Debug)]
#[clap(
    name = "listpkgs",
    about = "Search, filter and group the NurOS package list",
    version
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,

    /// Catalog file path or http(s) URL (overrides the config file)
    #[clap(long, global = true)]
    catalog: Option<String>,

    /// Override configuration file path
    #[clap(long, global = true)]
    config: Option<PathBuf>,

    /// Set log level
    #[clap(long, default_value = "warn", global = true)]
    log_level: LogLevel,

    /// Emit logs as JSON
    #[clap(long, global = true)]
    log_json: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search and filter packages
    Search(SearchArgs),

    /// Show detailed information about a package
    Show {
        /// Catalog key (e.g. bash@x86_64)
        key: String,

        /// Output as JSON
        #[clap(long)]
        json: bool,
    },

    /// Count packages per architecture, category, maintainer, license and source
    Facets {
        /// Output as JSON
        #[clap(long)]
        json: bool,
    },

    /// Print the effective configuration
    Config {
        /// Write the effective configuration to the config path
        #[clap(long)]
        init: bool,
    },
}

fn initialize_tracing(log_level: &LogLevel, json: bool) {
    // RUST_LOG, when set, refines the level chosen on the command line
    let mut filter = EnvFilter::new(log_level.to_filter_directive());
    if let Ok(extra) = std::env::var("RUST_LOG") {
        for directive in extra.split(',').filter_map(|d| d.parse().ok()) {
            filter = filter.add_directive(directive);
        }
    }

    // Logs go to stderr so stdout stays clean for --json output
    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Resolve the configuration, honoring `--config`
fn load_config(path: Option<&PathBuf>) -> Result<(BrowserConfig, PathBuf)> {
    let path = match path {
        Some(path) => path.clone(),
        None => BrowserConfig::default_config_path()?,
    };

    let config = BrowserConfig::load_from_path(&path)?;
    Ok((config, path))
}

/// Load the catalog from `--catalog` or the configured source
async fn load_catalog(location: Option<&str>, config: &BrowserConfig) -> Result<Catalog> {
    let source = location.map_or_else(|| config.source(), CatalogSource::parse);
    debug!("Loading catalog from {:?}", source);

    let catalog = Catalog::load(&source, config.timeout())
        .await
        .with_context(|| match &source {
            CatalogSource::Path(path) => format!("Failed to load catalog from {}", path.display()),
            CatalogSource::Url(url) => format!("Failed to load catalog from {url}"),
        })?;

    debug!("Catalog ready: {} packages", catalog.len());
    Ok(catalog)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    initialize_tracing(&cli.log_level, cli.log_json);

    let (config, config_path) = load_config(cli.config.as_ref())?;

    match cli.command {
        Command::Config { init } => browse_cli::execute_config(&config, &config_path, init),
        Command::Search(args) => {
            let catalog = load_catalog(cli.catalog.as_deref(), &config).await?;
            browse_cli::execute_search(&catalog, &args)
        }
        Command::Show { key, json } => {
            let catalog = load_catalog(cli.catalog.as_deref(), &config).await?;
            browse_cli::execute_show(&catalog, &key, json)
        }
        Command::Facets { json } => {
            let catalog = load_catalog(cli.catalog.as_deref(), &config).await?;
            browse_cli::execute_facets(&catalog, json)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browse_cli::GroupMode;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "listpkgs",
            "facets",
            "--catalog",
            "./repodata.json",
            "--log-level",
            "debug",
        ])
        .unwrap();

        assert_eq!(cli.catalog.as_deref(), Some("./repodata.json"));
        assert!(matches!(cli.log_level, LogLevel::Debug));
        assert!(matches!(cli.command, Command::Facets { json: false }));
    }

    #[test]
    fn test_search_arguments() {
        let cli = Cli::try_parse_from([
            "listpkgs",
            "search",
            "lib",
            "--arch",
            "x86_64,aarch64",
            "--maintainer",
            "alice",
            "--maintainer",
            "bob",
            "--group",
            "category",
            "--json",
        ])
        .unwrap();

        let Command::Search(args) = cli.command else {
            panic!("expected search command");
        };
        assert_eq!(args.term.as_deref(), Some("lib"));
        assert_eq!(args.group, GroupMode::Category);
        assert!(args.json);

        let selection = args.selection();
        assert_eq!(selection.architecture, "x86_64,aarch64");
        assert_eq!(selection.maintainers.len(), 2);
        assert!(selection.licenses.is_empty());
    }

    #[test]
    fn test_config_flag_overrides_default_path() {
        let path = PathBuf::from("/nonexistent/listpkgs/config.yaml");
        let (config, resolved) = load_config(Some(&path)).unwrap();

        assert_eq!(resolved, path);
        assert_eq!(config, BrowserConfig::default());
    }
}
