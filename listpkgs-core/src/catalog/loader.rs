//! Catalog loading from a string, a file, or a single HTTP GET

use serde_json::Value;
use std::path::Path;

use super::{Catalog, Package};
use crate::config::CatalogSource;
use crate::error::{CatalogError, Result};

impl Catalog {
    /// Parse a catalog from JSON text
    pub fn from_json_str(content: &str) -> Result<Self> {
        let value: Value =
            serde_json::from_str(content).map_err(|source| CatalogError::Parse { source })?;
        Self::from_value(&value)
    }

    /// Normalize an already-parsed catalog document
    ///
    /// Entries keep the document's key order.
    pub fn from_value(value: &Value) -> Result<Self> {
        let Some(entries) = value.as_object() else {
            return Err(CatalogError::NotAnObject {
                found: json_kind(value),
            });
        };

        let packages: Vec<Package> = entries
            .iter()
            .map(|(key, raw)| {
                if !raw.is_object() {
                    tracing::warn!(
                        "Catalog entry '{}' is {}, using defaults",
                        key,
                        json_kind(raw)
                    );
                }
                Package::from_raw(key, raw)
            })
            .collect();

        tracing::debug!("Parsed catalog: {} packages", packages.len());
        Ok(Self::new(packages))
    }

    /// Read and parse a catalog file
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::debug!("Read catalog from {}", path.display());
        Self::from_json_str(&content)
    }

    /// Fetch and parse a catalog with one GET request
    #[cfg(feature = "fetch")]
    pub async fn fetch(url: &str, timeout: std::time::Duration) -> Result<Self> {
        let http_error = |source| CatalogError::Http {
            url: url.to_string(),
            source,
        };

        let client = reqwest::Client::builder()
            .user_agent(concat!("listpkgs/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(http_error)?;

        tracing::debug!("Fetching catalog from {}", url);
        let response = client.get(url).send().await.map_err(http_error)?;

        if !response.status().is_success() {
            return Err(CatalogError::Status {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        let content = response.text().await.map_err(http_error)?;
        Self::from_json_str(&content)
    }

    /// Load from a configured source
    #[cfg(feature = "fetch")]
    pub async fn load(source: &CatalogSource, timeout: std::time::Duration) -> Result<Self> {
        match source {
            CatalogSource::Path(path) => Self::from_path(path),
            CatalogSource::Url(url) => Self::fetch(url, timeout).await,
        }
    }

    /// Load from a configured source; URLs need the `fetch` feature
    #[cfg(not(feature = "fetch"))]
    pub async fn load(source: &CatalogSource, _timeout: std::time::Duration) -> Result<Self> {
        match source {
            CatalogSource::Path(path) => Self::from_path(path),
            CatalogSource::Url(url) => Err(CatalogError::FetchDisabled { url: url.clone() }),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod loader_tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_preserves_key_order() {
        let catalog = Catalog::from_json_str(
            r#"{
                "zsh": {"name": "zsh"},
                "bash": {"name": "bash"},
                "mksh": {"name": "mksh"}
            }"#,
        )
        .unwrap();

        let keys: Vec<&str> = catalog.packages().iter().map(|p| p.key.as_str()).collect();
        assert_eq!(keys, vec!["zsh", "bash", "mksh"]);
    }

    #[test]
    fn test_rejects_non_object_catalog() {
        let err = Catalog::from_json_str("[1, 2, 3]").unwrap_err();
        assert!(matches!(err, CatalogError::NotAnObject { found: "an array" }));
        assert!(err.to_string().contains("an array"));
    }

    #[test]
    fn test_rejects_invalid_json() {
        let err = Catalog::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, CatalogError::Parse { .. }));
    }

    #[test]
    fn test_bad_entry_is_defaulted_not_rejected() {
        let catalog = Catalog::from_json_str(r#"{"ok": {"name": "ok"}, "bad": 17}"#).unwrap();

        assert_eq!(catalog.len(), 2);
        let bad = catalog.get("bad").unwrap();
        assert_eq!(bad.name, "bad");
        assert_eq!(bad.version, "unknown");
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"git": {{"name": "git", "type": "development"}}}}"#).unwrap();

        let catalog = Catalog::from_path(file.path()).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("git").unwrap().type_or_unknown(), "development");
    }

    #[test]
    fn test_from_missing_path() {
        let dir = tempfile::TempDir::new().unwrap();
        let missing = dir.path().join("repodata.json");

        let err = Catalog::from_path(&missing).unwrap_err();
        assert!(matches!(err, CatalogError::Read { .. }));
        assert!(err.to_string().contains("repodata.json"));
    }
}
