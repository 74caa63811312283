//! Package classification
//!
//! Two related classifiers live here. [`get_category`] derives the coarse
//! category that the category filter and the facet counts use.
//! [`display_category`] derives the human-readable label used to bucket
//! packages for grouped display.

use serde::Serialize;
use std::fmt::Display;

use crate::catalog::{Package, UNKNOWN};

/// Coarse package category, derived from declared type and name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Core,
    Applications,
    Libraries,
    Development,
    Server,
    Runtime,
    Editor,
    Browser,
    Other,
}

impl Category {
    pub const ALL: [Category; 9] = [
        Category::Core,
        Category::Applications,
        Category::Libraries,
        Category::Development,
        Category::Server,
        Category::Runtime,
        Category::Editor,
        Category::Browser,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Core => "core",
            Category::Applications => "applications",
            Category::Libraries => "libraries",
            Category::Development => "development",
            Category::Server => "server",
            Category::Runtime => "runtime",
            Category::Editor => "editor",
            Category::Browser => "browser",
            Category::Other => "other",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a package; rules are tried in order and the first match wins
pub fn get_category(pkg: &Package) -> Category {
    let name = pkg.name.to_lowercase();
    let package_type = pkg
        .package_type
        .as_deref()
        .map(str::to_lowercase)
        .unwrap_or_default();

    match package_type.as_str() {
        _ if package_type == "system" || name.contains("kernel") || name.contains("core") => {
            Category::Core
        }
        "application" | "desktop" | "gui" => Category::Applications,
        _ if package_type == "library" || name.contains("lib") => Category::Libraries,
        "development" | "devel" => Category::Development,
        "server" => Category::Server,
        "runtime" | "lang" => Category::Runtime,
        "editor" => Category::Editor,
        "browser" => Category::Browser,
        _ => Category::Other,
    }
}

/// Group label for grouped display
///
/// A declared type maps to a fixed label, or is title-cased when it has
/// none. Packages without a declared type (absent or "unknown") are
/// labelled from name heuristics.
pub fn display_category(pkg: &Package) -> String {
    match pkg.package_type.as_deref() {
        Some(declared) if declared != UNKNOWN => match declared {
            "system" => "System".to_string(),
            "application" | "desktop" => "Applications".to_string(),
            "library" => "Libraries".to_string(),
            "development" => "Development".to_string(),
            "shell" => "Shells".to_string(),
            "misc" => "Miscellaneous".to_string(),
            other => title_case(other),
        },
        _ => {
            let name = pkg.name.to_lowercase();
            if name.contains("kernel") || name.contains("core") || name.contains("system") {
                "System".to_string()
            } else if name.contains("lib") {
                "Libraries".to_string()
            } else if name.contains("dev") || name.contains("sdk") {
                "Development".to_string()
            } else {
                "Other".to_string()
            }
        }
    }
}

fn title_case(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
