//! Filter engine
//!
//! Every filter takes any iterator of package references and returns the
//! matching subset in input order. Filters compose as a conjunction, so
//! the order in which [`apply_filters`] chains them only changes what the
//! per-stage debug logging shows, never the result.
//!
//! An empty criterion is always the identity.

mod category;

pub use category::{display_category, get_category, Category};

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::catalog::Package;

/// The active filter state, as held by the caller
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterSelection {
    /// Comma-separated architecture substrings
    pub architecture: String,

    /// Comma-separated category tokens
    pub package_type: String,

    /// Exact maintainer values
    pub maintainers: BTreeSet<String>,

    /// Exact license values
    pub licenses: BTreeSet<String>,

    /// Exact source repository values
    pub sources: BTreeSet<String>,
}

impl FilterSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_architecture(mut self, architecture: impl Into<String>) -> Self {
        self.architecture = architecture.into();
        self
    }

    pub fn with_package_type(mut self, package_type: impl Into<String>) -> Self {
        self.package_type = package_type.into();
        self
    }

    pub fn with_maintainer(mut self, maintainer: impl Into<String>) -> Self {
        self.maintainers.insert(maintainer.into());
        self
    }

    pub fn with_license(mut self, license: impl Into<String>) -> Self {
        self.licenses.insert(license.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.sources.insert(source.into());
        self
    }

    /// True when no criterion constrains the result
    pub fn is_empty(&self) -> bool {
        split_list(&self.architecture).is_empty()
            && split_list(&self.package_type).is_empty()
            && self.maintainers.is_empty()
            && self.licenses.is_empty()
            && self.sources.is_empty()
    }
}

/// Split a comma-joined criterion, trimming and dropping empty tokens
fn split_list(list: &str) -> Vec<&str> {
    list.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .collect()
}

/// Case-insensitive substring search over name, description and key
pub fn filter_by_search_term<'a, I>(packages: I, term: &str) -> Vec<&'a Package>
where
    I: IntoIterator<Item = &'a Package>,
{
    let term = term.trim().to_lowercase();

    if term.is_empty() {
        return packages.into_iter().collect();
    }

    packages
        .into_iter()
        .filter(|pkg| {
            let name_match = pkg.name.to_lowercase().contains(&term);
            let description_match = pkg
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(&term));
            let key_match = pkg.key.to_lowercase().contains(&term);

            name_match || description_match || key_match
        })
        .collect()
}

/// Keep packages whose architecture contains any listed substring
pub fn filter_by_architecture<'a, I>(packages: I, architecture: &str) -> Vec<&'a Package>
where
    I: IntoIterator<Item = &'a Package>,
{
    let architectures = split_list(architecture);

    if architectures.is_empty() {
        return packages.into_iter().collect();
    }

    packages
        .into_iter()
        .filter(|pkg| {
            let pkg_arch = pkg.architecture_or_unknown();
            architectures.iter().any(|arch| pkg_arch.contains(arch))
        })
        .collect()
}

/// Keep packages whose derived category matches any requested token
///
/// A token matches when it is a substring of the category or the category
/// is a substring of it. Short tokens over-match: `"s"` selects
/// `applications`, `libraries` and every other category containing an "s".
pub fn filter_by_category<'a, I>(packages: I, package_type: &str) -> Vec<&'a Package>
where
    I: IntoIterator<Item = &'a Package>,
{
    let categories: Vec<String> = split_list(package_type)
        .into_iter()
        .map(str::to_lowercase)
        .collect();

    if categories.is_empty() {
        return packages.into_iter().collect();
    }

    packages
        .into_iter()
        .filter(|pkg| {
            let pkg_category = get_category(pkg).as_str();
            categories
                .iter()
                .any(|cat| pkg_category.contains(cat.as_str()) || cat.contains(pkg_category))
        })
        .collect()
}

/// Keep packages whose maintainer (or "unknown") is in the set
pub fn filter_by_maintainers<'a, I>(packages: I, maintainers: &BTreeSet<String>) -> Vec<&'a Package>
where
    I: IntoIterator<Item = &'a Package>,
{
    filter_by_exact(packages, maintainers, Package::maintainer_or_unknown)
}

/// Keep packages whose license (or "unknown") is in the set
pub fn filter_by_licenses<'a, I>(packages: I, licenses: &BTreeSet<String>) -> Vec<&'a Package>
where
    I: IntoIterator<Item = &'a Package>,
{
    filter_by_exact(packages, licenses, Package::license_or_unknown)
}

/// Keep packages whose source repository (or "unknown") is in the set
pub fn filter_by_sources<'a, I>(packages: I, sources: &BTreeSet<String>) -> Vec<&'a Package>
where
    I: IntoIterator<Item = &'a Package>,
{
    filter_by_exact(packages, sources, Package::source_or_unknown)
}

fn filter_by_exact<'a, I, F>(packages: I, allowed: &BTreeSet<String>, field: F) -> Vec<&'a Package>
where
    I: IntoIterator<Item = &'a Package>,
    F: Fn(&Package) -> &str,
{
    if allowed.is_empty() {
        return packages.into_iter().collect();
    }

    packages
        .into_iter()
        .filter(|pkg| allowed.contains(field(pkg)))
        .collect()
}

/// Run the whole filter pipeline
///
/// Stages: search term, architecture, category, sources, maintainers,
/// licenses. Each stage sees the previous stage's output.
pub fn apply_filters<'a, I>(
    packages: I,
    search_term: &str,
    selection: &FilterSelection,
) -> Vec<&'a Package>
where
    I: IntoIterator<Item = &'a Package>,
{
    let result: Vec<&Package> = packages.into_iter().collect();
    tracing::debug!("Filtering {} packages", result.len());

    let result = filter_by_search_term(result, search_term);
    tracing::debug!(term = search_term, "After search term: {}", result.len());

    let result = filter_by_architecture(result, &selection.architecture);
    tracing::debug!(
        architecture = %selection.architecture,
        "After architecture filter: {}",
        result.len()
    );

    let result = filter_by_category(result, &selection.package_type);
    tracing::debug!(
        package_type = %selection.package_type,
        "After category filter: {}",
        result.len()
    );

    let result = filter_by_sources(result, &selection.sources);
    tracing::debug!(sources = ?selection.sources, "After source filter: {}", result.len());

    let result = filter_by_maintainers(result, &selection.maintainers);
    tracing::debug!(
        maintainers = ?selection.maintainers,
        "After maintainer filter: {}",
        result.len()
    );

    let result = filter_by_licenses(result, &selection.licenses);
    tracing::debug!(licenses = ?selection.licenses, "After license filter: {}", result.len());

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn sample() -> Vec<Package> {
        vec![
            Package::from_raw(
                "git",
                &json!({
                    "name": "git",
                    "type": "development",
                    "architecture": "x86_64",
                    "description": "Distributed version control",
                    "maintainer": "alice",
                    "license": "GPL-2.0",
                    "_source_repo": "https://github.com/NurOS-Packages/git"
                }),
            ),
            Package::from_raw(
                "vim",
                &json!({
                    "name": "vim",
                    "type": "application",
                    "architecture": "aarch64",
                    "description": "Vi IMproved text editor",
                    "license": "Vim"
                }),
            ),
            Package::from_raw(
                "zlib",
                &json!({
                    "name": "zlib",
                    "architecture": "x86_64,aarch64",
                    "maintainer": "bob"
                }),
            ),
            Package::from_raw("kernel-core", &json!({})),
        ]
    }

    fn keys(packages: &[&Package]) -> Vec<String> {
        packages.iter().map(|p| p.key.clone()).collect()
    }

    #[test]
    fn test_search_matches_name_description_key() {
        let packages = sample();

        assert_eq!(keys(&filter_by_search_term(&packages, "GIT")), vec!["git"]);
        assert_eq!(keys(&filter_by_search_term(&packages, "  editor ")), vec!["vim"]);
        assert_eq!(keys(&filter_by_search_term(&packages, "kernel")), vec!["kernel-core"]);
        assert!(filter_by_search_term(&packages, "emacs").is_empty());
    }

    #[test]
    fn test_search_blank_is_identity() {
        let packages = sample();
        assert_eq!(filter_by_search_term(&packages, "   ").len(), packages.len());
    }

    #[test]
    fn test_search_ignores_description_placeholder() {
        let packages = sample();
        assert!(filter_by_search_term(&packages, "no description").is_empty());
    }

    #[test]
    fn test_architecture_filter() {
        let packages = sample();

        assert_eq!(
            keys(&filter_by_architecture(&packages, "x86_64")),
            vec!["git", "zlib"]
        );
        assert_eq!(
            keys(&filter_by_architecture(&packages, " aarch64 , ")),
            vec!["vim", "zlib"]
        );
        assert_eq!(
            keys(&filter_by_architecture(&packages, "unknown")),
            vec!["kernel-core"]
        );
        assert_eq!(filter_by_architecture(&packages, " , ").len(), 4);
    }

    #[test]
    fn test_category_filter() {
        let packages = sample();

        assert_eq!(
            keys(&filter_by_category(&packages, "development")),
            vec!["git"]
        );
        assert_eq!(
            keys(&filter_by_category(&packages, "libraries, core")),
            vec!["zlib", "kernel-core"]
        );
        assert_eq!(
            keys(&filter_by_category(&packages, "Applications")),
            vec!["vim"]
        );
    }

    #[test]
    fn test_category_filter_bidirectional_quirk() {
        let packages = sample();

        // Token contained in the category
        assert_eq!(keys(&filter_by_category(&packages, "app")), vec!["vim"]);
        // Category contained in the token
        assert_eq!(
            keys(&filter_by_category(&packages, "core-system")),
            vec!["kernel-core"]
        );
        // Single letter matches every category containing it
        assert_eq!(
            keys(&filter_by_category(&packages, "s")),
            vec!["vim", "zlib"]
        );
    }

    #[test]
    fn test_exact_set_filters() {
        let packages = sample();

        let maintainers = BTreeSet::from(["alice".to_string()]);
        assert_eq!(keys(&filter_by_maintainers(&packages, &maintainers)), vec!["git"]);

        let unknown = BTreeSet::from(["unknown".to_string()]);
        assert_eq!(
            keys(&filter_by_maintainers(&packages, &unknown)),
            vec!["vim", "kernel-core"]
        );
        assert_eq!(
            keys(&filter_by_licenses(&packages, &unknown)),
            vec!["zlib", "kernel-core"]
        );

        let sources = BTreeSet::from(["https://github.com/NurOS-Packages/git".to_string()]);
        assert_eq!(keys(&filter_by_sources(&packages, &sources)), vec!["git"]);

        // Exact match only, no substrings
        let partial = BTreeSet::from(["ali".to_string()]);
        assert!(filter_by_maintainers(&packages, &partial).is_empty());

        assert_eq!(filter_by_licenses(&packages, &BTreeSet::new()).len(), 4);
    }

    #[test]
    fn test_apply_filters_conjunction() {
        let packages = sample();

        let selection = FilterSelection::new()
            .with_architecture("x86_64")
            .with_maintainer("bob");
        assert_eq!(keys(&apply_filters(&packages, "", &selection)), vec!["zlib"]);

        let selection = FilterSelection::new().with_package_type("development");
        assert_eq!(keys(&apply_filters(&packages, "vim", &selection)), Vec::<String>::new());
    }

    #[test]
    fn test_apply_filters_empty_is_identity() {
        let packages = sample();
        let result = apply_filters(&packages, "", &FilterSelection::new());
        assert_eq!(keys(&result), vec!["git", "vim", "zlib", "kernel-core"]);
    }

    #[test]
    fn test_selection_is_empty() {
        assert!(FilterSelection::new().is_empty());
        assert!(FilterSelection::new().with_architecture(" , ").is_empty());
        assert!(!FilterSelection::new().with_license("MIT").is_empty());
    }

    #[test]
    fn test_selection_deserializes_front_end_shape() {
        let selection: FilterSelection = serde_json::from_value(json!({
            "architecture": "x86_64",
            "packageType": "libraries",
            "maintainers": ["alice", "bob"]
        }))
        .unwrap();

        assert_eq!(selection.package_type, "libraries");
        assert_eq!(selection.maintainers.len(), 2);
        assert!(selection.licenses.is_empty());
    }
}
