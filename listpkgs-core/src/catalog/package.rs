//! The `Package` record and its normalization from raw catalog JSON
//!
//! Each `repodata.json` entry is read field by field. Known fields are
//! typed, anything else is kept verbatim in `extra` so callers can still
//! reach attributes this crate does not model.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

/// Filter fallback for absent fields
pub const UNKNOWN: &str = "unknown";

/// Display fallback for an absent architecture
pub const NOT_AVAILABLE: &str = "N/A";

/// Display fallback for an absent description
pub const NO_DESCRIPTION: &str = "No description available";

/// One catalog entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Package {
    /// Catalog object key, unique within a snapshot
    pub key: String,

    /// Display name (falls back to `key`)
    pub name: String,

    /// Version string (falls back to "unknown")
    pub version: String,

    /// Declared category tag (system, application, library, ...)
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub package_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub architecture: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub maintainer: Option<String>,

    /// SPDX-ish license identifier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,

    pub dependencies: Vec<String>,

    pub conflicts: Vec<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub provides: Vec<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub replaces: Vec<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    /// Origin repository, as recorded by the aggregator
    #[serde(rename = "_source_repo", skip_serializing_if = "Option::is_none")]
    pub source_repo: Option<String>,

    /// Last update timestamp of the origin repository
    #[serde(rename = "_last_updated", skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,

    /// Catalog fields without a typed counterpart
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Package {
    /// A package made only of defaults
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            name: key.clone(),
            key,
            version: UNKNOWN.to_string(),
            package_type: None,
            architecture: None,
            description: None,
            maintainer: None,
            license: None,
            homepage: None,
            dependencies: Vec::new(),
            conflicts: Vec::new(),
            provides: Vec::new(),
            replaces: Vec::new(),
            tags: Vec::new(),
            source_repo: None,
            last_updated: None,
            extra: Map::new(),
        }
    }

    /// Build a package from one raw catalog entry
    ///
    /// Never fails: empty strings and values of the wrong JSON type are
    /// treated as absent, list fields keep only their string elements, and
    /// an entry that is not an object yields `Package::new(key)`.
    ///
    /// The catalog object key is the package's identity. A `"key"`
    /// attribute inside the entry is ignored and does not reach `extra`,
    /// since `extra` is flattened next to `key` on serialization.
    pub fn from_raw(key: &str, raw: &Value) -> Self {
        let mut package = Self::new(key);

        let Some(fields) = raw.as_object() else {
            return package;
        };

        for (field, value) in fields {
            match field.as_str() {
                "key" => {}
                "name" => {
                    if let Some(name) = text(value) {
                        package.name = name;
                    }
                }
                "version" => {
                    if let Some(version) = text(value) {
                        package.version = version;
                    }
                }
                "type" => package.package_type = text(value),
                "architecture" => package.architecture = text(value),
                "description" => package.description = text(value),
                "maintainer" => package.maintainer = text(value),
                "license" => package.license = text(value),
                "homepage" => package.homepage = text(value),
                "dependencies" => package.dependencies = list(value),
                "conflicts" => package.conflicts = list(value),
                "provides" => package.provides = list(value),
                "replaces" => package.replaces = list(value),
                "tags" => package.tags = list(value),
                "_source_repo" => package.source_repo = text(value),
                "_last_updated" => package.last_updated = text(value),
                _ => {
                    package.extra.insert(field.clone(), value.clone());
                }
            }
        }

        package
    }

    /// Builder-style setter for the declared type
    pub fn with_type(mut self, package_type: impl Into<String>) -> Self {
        self.package_type = Some(package_type.into());
        self
    }

    /// Builder-style setter for the display name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn type_or_unknown(&self) -> &str {
        self.package_type.as_deref().unwrap_or(UNKNOWN)
    }

    /// Architecture as compared by filters
    pub fn architecture_or_unknown(&self) -> &str {
        self.architecture.as_deref().unwrap_or(UNKNOWN)
    }

    /// Architecture as shown to users
    pub fn architecture_display(&self) -> &str {
        self.architecture.as_deref().unwrap_or(NOT_AVAILABLE)
    }

    pub fn description_display(&self) -> &str {
        self.description.as_deref().unwrap_or(NO_DESCRIPTION)
    }

    pub fn maintainer_or_unknown(&self) -> &str {
        self.maintainer.as_deref().unwrap_or(UNKNOWN)
    }

    pub fn license_or_unknown(&self) -> &str {
        self.license.as_deref().unwrap_or(UNKNOWN)
    }

    pub fn source_or_unknown(&self) -> &str {
        self.source_repo.as_deref().unwrap_or(UNKNOWN)
    }

    /// Parse `_last_updated` as an RFC 3339 timestamp
    pub fn last_updated_at(&self) -> Option<DateTime<Utc>> {
        let raw = self.last_updated.as_deref()?;
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|ts| ts.with_timezone(&Utc))
    }
}

fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

fn list(value: &Value) -> Vec<String> {
    value
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_defaults_for_missing_fields() {
        let pkg = Package::from_raw("bash@x86_64", &json!({}));

        assert_eq!(pkg.key, "bash@x86_64");
        assert_eq!(pkg.name, "bash@x86_64");
        assert_eq!(pkg.version, "unknown");
        assert_eq!(pkg.type_or_unknown(), "unknown");
        assert_eq!(pkg.architecture_display(), "N/A");
        assert_eq!(pkg.architecture_or_unknown(), "unknown");
        assert_eq!(pkg.description_display(), "No description available");
        assert_eq!(pkg.maintainer_or_unknown(), "unknown");
        assert_eq!(pkg.license_or_unknown(), "unknown");
        assert_eq!(pkg.source_or_unknown(), "unknown");
        assert!(pkg.dependencies.is_empty());
        assert!(pkg.conflicts.is_empty());
    }

    #[test]
    fn test_typed_fields() {
        let raw = json!({
            "name": "bash",
            "version": "5.2.21",
            "type": "shell",
            "architecture": "x86_64",
            "description": "The GNU Bourne Again shell",
            "maintainer": "alice",
            "license": "GPL-3.0-or-later",
            "homepage": "https://www.gnu.org/software/bash/",
            "dependencies": ["glibc", "readline"],
            "conflicts": ["bash-static"],
            "_source_repo": "https://github.com/NurOS-Packages/bash",
            "_last_updated": "2025-03-01T12:00:00Z"
        });

        let pkg = Package::from_raw("bash@x86_64", &raw);

        assert_eq!(pkg.name, "bash");
        assert_eq!(pkg.version, "5.2.21");
        assert_eq!(pkg.package_type.as_deref(), Some("shell"));
        assert_eq!(pkg.architecture_display(), "x86_64");
        assert_eq!(pkg.dependencies, vec!["glibc", "readline"]);
        assert_eq!(pkg.conflicts, vec!["bash-static"]);
        assert_eq!(
            pkg.source_or_unknown(),
            "https://github.com/NurOS-Packages/bash"
        );
        assert!(pkg.extra.is_empty());
    }

    #[test]
    fn test_null_and_empty_are_absent() {
        let raw = json!({
            "name": "",
            "architecture": null,
            "license": null,
            "maintainer": ""
        });

        let pkg = Package::from_raw("zlib", &raw);

        assert_eq!(pkg.name, "zlib");
        assert_eq!(pkg.architecture, None);
        assert_eq!(pkg.architecture_display(), "N/A");
        assert_eq!(pkg.license_or_unknown(), "unknown");
        assert_eq!(pkg.maintainer_or_unknown(), "unknown");
    }

    #[test]
    fn test_malformed_fields_degrade() {
        let raw = json!({
            "name": 42,
            "version": ["1.0"],
            "dependencies": "glibc",
            "conflicts": ["foo", 7, null, "bar"]
        });

        let pkg = Package::from_raw("odd", &raw);

        assert_eq!(pkg.name, "odd");
        assert_eq!(pkg.version, "unknown");
        assert!(pkg.dependencies.is_empty());
        assert_eq!(pkg.conflicts, vec!["foo", "bar"]);
    }

    #[test]
    fn test_non_object_entry() {
        let pkg = Package::from_raw("weird", &json!("just a string"));
        assert_eq!(pkg, Package::new("weird"));
    }

    #[test]
    fn test_unknown_fields_pass_through() {
        let raw = json!({
            "name": "nano",
            "conf": ["/etc/nanorc"],
            "size": 123456,
            "build": {"date": "2025-01-01"}
        });

        let pkg = Package::from_raw("nano", &raw);

        assert_eq!(pkg.extra.len(), 3);
        assert_eq!(pkg.extra["size"], json!(123456));

        let serialized = serde_json::to_value(&pkg).unwrap();
        assert_eq!(serialized["conf"], json!(["/etc/nanorc"]));
        assert_eq!(serialized["build"]["date"], json!("2025-01-01"));
        assert_eq!(serialized["name"], json!("nano"));
        assert_eq!(serialized["key"], json!("nano"));
    }

    #[test]
    fn test_key_attribute_does_not_override_catalog_key() {
        let pkg = Package::from_raw("vim", &json!({"key": "not-vim", "name": "vim"}));

        assert_eq!(pkg.key, "vim");
        assert!(!pkg.extra.contains_key("key"));

        let value = serde_json::to_value(&pkg).unwrap();
        assert_eq!(value["key"], json!("vim"));
    }

    #[test]
    fn test_serialized_field_names() {
        let raw = json!({
            "type": "library",
            "_source_repo": "https://github.com/NurOS-Packages/zlib",
            "_last_updated": "2025-03-01T12:00:00Z"
        });

        let serialized = serde_json::to_value(Package::from_raw("zlib", &raw)).unwrap();

        assert_eq!(serialized["type"], json!("library"));
        assert_eq!(
            serialized["_source_repo"],
            json!("https://github.com/NurOS-Packages/zlib")
        );
        assert_eq!(serialized["_last_updated"], json!("2025-03-01T12:00:00Z"));
        assert!(serialized.get("architecture").is_none());
    }

    #[test]
    fn test_last_updated_at() {
        let pkg = Package::from_raw("a", &json!({"_last_updated": "2025-03-01T12:00:00+02:00"}));
        let ts = pkg.last_updated_at().unwrap();
        assert_eq!(ts.to_rfc3339(), "2025-03-01T10:00:00+00:00");

        let pkg = Package::from_raw("b", &json!({"_last_updated": "yesterday"}));
        assert!(pkg.last_updated_at().is_none());
    }
}
