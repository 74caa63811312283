//! Package catalog - the in-memory `repodata.json` snapshot
//!
//! # Overview
//!
//! The catalog is a single JSON object keyed by package identifier,
//! produced by the aggregator from each package repository's
//! `metadata.json`:
//!
//! ```text
//! {
//!   "bash@x86_64": { "name": "bash", "version": "5.2.21", ... },
//!   "zlib":        { "name": "zlib", "type": "library", ... }
//! }
//! ```
//!
//! Every entry is normalized into a [`Package`] with defaulted fields, so
//! nothing downstream has to deal with missing or malformed attributes.

mod loader;
mod package;

pub use package::{Package, NOT_AVAILABLE, NO_DESCRIPTION, UNKNOWN};

/// A loaded catalog snapshot, held immutably for the session
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    packages: Vec<Package>,
}

impl Catalog {
    /// Wrap an already-normalized package list
    pub fn new(packages: Vec<Package>) -> Self {
        Self { packages }
    }

    /// All packages, in catalog order
    pub fn packages(&self) -> &[Package] {
        &self.packages
    }

    pub fn into_packages(self) -> Vec<Package> {
        self.packages
    }

    /// Look up a package by catalog key
    pub fn get(&self, key: &str) -> Option<&Package> {
        self.packages.iter().find(|p| p.key == key)
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Package;
    type IntoIter = std::slice::Iter<'a, Package>;

    fn into_iter(self) -> Self::IntoIter {
        self.packages.iter()
    }
}
