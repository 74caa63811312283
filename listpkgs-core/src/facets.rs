//! Facet counts for filter pickers
//!
//! For each filterable dimension, the distinct values present in a package
//! list and how many packages carry each one. Values use the same
//! fallbacks as the filters, so selecting a facet value always matches
//! exactly the counted packages.

use serde::Serialize;
use std::collections::HashMap;

use crate::catalog::Package;
use crate::filter::get_category;
use crate::sort::natural_cmp;

/// One distinct value and its package count
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FacetCount {
    pub value: String,
    pub count: usize,
}

/// Value counts per filterable dimension
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Facets {
    pub architectures: Vec<FacetCount>,
    pub categories: Vec<FacetCount>,
    pub maintainers: Vec<FacetCount>,
    pub licenses: Vec<FacetCount>,
    pub sources: Vec<FacetCount>,
}

impl Facets {
    pub fn from_packages<'a, I>(packages: I) -> Self
    where
        I: IntoIterator<Item = &'a Package>,
    {
        let packages: Vec<&Package> = packages.into_iter().collect();

        Self {
            architectures: tally(packages.iter().map(|p| p.architecture_or_unknown())),
            categories: tally(packages.iter().map(|p| get_category(p).as_str())),
            maintainers: tally(packages.iter().map(|p| p.maintainer_or_unknown())),
            licenses: tally(packages.iter().map(|p| p.license_or_unknown())),
            sources: tally(packages.iter().map(|p| p.source_or_unknown())),
        }
    }
}

/// Count occurrences, ordered by value
fn tally<'p>(values: impl Iterator<Item = &'p str>) -> Vec<FacetCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for value in values {
        *counts.entry(value).or_default() += 1;
    }

    let mut facets: Vec<FacetCount> = counts
        .into_iter()
        .map(|(value, count)| FacetCount {
            value: value.to_string(),
            count,
        })
        .collect();

    facets.sort_by(|a, b| natural_cmp(&a.value, &b.value).then_with(|| a.value.cmp(&b.value)));
    facets
}
