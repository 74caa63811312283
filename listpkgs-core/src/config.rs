//! Browser configuration (config.yaml)
//!
//! Says where the catalog comes from. A missing file means defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default published catalog
pub const DEFAULT_CATALOG_URL: &str = "https://listpkgs.nuros.org/repodata.json";

/// Default catalog request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Where to load the catalog from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    /// A local `repodata.json`
    Path(PathBuf),
    /// A URL fetched with a single GET
    Url(String),
}

impl CatalogSource {
    /// Interpret a command-line style location: http(s) URLs are fetched,
    /// anything else is a path
    pub fn parse(location: &str) -> Self {
        if location.starts_with("http://") || location.starts_with("https://") {
            CatalogSource::Url(location.to_string())
        } else {
            CatalogSource::Path(PathBuf::from(location))
        }
    }
}

/// Persisted browser configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// URL of the published catalog
    pub catalog_url: String,

    /// Local catalog file; takes precedence over `catalog_url`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog_path: Option<PathBuf>,

    /// Request timeout for the catalog fetch
    pub timeout_secs: u64,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            catalog_url: DEFAULT_CATALOG_URL.to_string(),
            catalog_path: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl BrowserConfig {
    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::default_config_path()?)
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;

        serde_yaml_ng::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))
    }

    /// Save configuration to a specific path
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_yaml_ng::to_string(self).context("Failed to serialize config")?;

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;

        Ok(())
    }

    /// The configured catalog location
    pub fn source(&self) -> CatalogSource {
        match &self.catalog_path {
            Some(path) => CatalogSource::Path(path.clone()),
            None => CatalogSource::Url(self.catalog_url.clone()),
        }
    }

    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout_secs)
    }

    /// `<config dir>/listpkgs/config.yaml`
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = directories::ProjectDirs::from("org", "nuros", "listpkgs")
            .map(|dirs| dirs.config_dir().to_path_buf())
            .or_else(|| dirs::config_dir().map(|d| d.join("listpkgs")))
            .context("Could not determine config directory")?;

        Ok(config_dir.join("config.yaml"))
    }
}

#[cfg(test)]
mod config_tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = BrowserConfig::load_from_path(&temp_dir.path().join("config.yaml")).unwrap();

        assert_eq!(config, BrowserConfig::default());
        assert_eq!(
            config.source(),
            CatalogSource::Url(DEFAULT_CATALOG_URL.to_string())
        );
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.yaml");
        std::fs::write(&path, "catalog_path: /srv/repodata.json\n").unwrap();

        let config = BrowserConfig::load_from_path(&path).unwrap();

        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(
            config.source(),
            CatalogSource::Path(PathBuf::from("/srv/repodata.json"))
        );
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.yaml");
        std::fs::write(&path, "timeout_secs: [not, a, number]\n").unwrap();

        let err = BrowserConfig::load_from_path(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config"));
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.yaml");

        let config = BrowserConfig {
            catalog_url: "https://mirror.example.org/repodata.json".to_string(),
            catalog_path: None,
            timeout_secs: 5,
        };
        config.save_to_path(&path).unwrap();

        let loaded = BrowserConfig::load_from_path(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.timeout(), std::time::Duration::from_secs(5));
    }

    #[test]
    fn test_catalog_source_parse() {
        assert_eq!(
            CatalogSource::parse("https://listpkgs.nuros.org/repodata.json"),
            CatalogSource::Url("https://listpkgs.nuros.org/repodata.json".to_string())
        );
        assert_eq!(
            CatalogSource::parse("./repodata.json"),
            CatalogSource::Path(PathBuf::from("./repodata.json"))
        );
    }
}
