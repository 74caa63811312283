//! Grouping for display
//!
//! Groups partition their input exactly: every package lands in one group.

use serde::Serialize;
use std::collections::HashMap;

use crate::catalog::Package;
use crate::filter::display_category;
use crate::sort::{natural_cmp, sort_by_key, sort_by_name, SortKey};

/// Bucket label for names with no first character
pub const OTHER_LETTER: &str = "#";

/// A display group
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PackageGroup<'a> {
    /// Packages sharing a display category
    Category {
        name: String,
        packages: Vec<&'a Package>,
    },
    /// Packages sharing the uppercased first letter of their name
    Letter {
        letter: String,
        packages: Vec<&'a Package>,
    },
}

impl<'a> PackageGroup<'a> {
    /// Category name or letter
    pub fn label(&self) -> &str {
        match self {
            PackageGroup::Category { name, .. } => name,
            PackageGroup::Letter { letter, .. } => letter,
        }
    }

    pub fn packages(&self) -> &[&'a Package] {
        match self {
            PackageGroup::Category { packages, .. } | PackageGroup::Letter { packages, .. } => {
                packages
            }
        }
    }

    pub fn len(&self) -> usize {
        self.packages().len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages().is_empty()
    }
}

/// Collect into buckets, keeping first-seen order of labels
fn bucket<'a, F>(packages: Vec<&'a Package>, label: F) -> Vec<(String, Vec<&'a Package>)>
where
    F: Fn(&Package) -> String,
{
    let mut buckets: Vec<(String, Vec<&Package>)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for pkg in packages {
        let key = label(pkg);
        match index.get(&key) {
            Some(&i) => buckets[i].1.push(pkg),
            None => {
                index.insert(key.clone(), buckets.len());
                buckets.push((key, vec![pkg]));
            }
        }
    }

    buckets
}

fn first_letter(pkg: &Package) -> String {
    match pkg.name.chars().next() {
        Some(c) => c.to_uppercase().collect(),
        None => OTHER_LETTER.to_string(),
    }
}

/// Group by the uppercased first character of the name
///
/// Packages are name-sorted inside each group. Groups are ordered by
/// letter, with `#` always last.
pub fn group_by_first_letter<'a, I>(packages: I) -> Vec<PackageGroup<'a>>
where
    I: IntoIterator<Item = &'a Package>,
{
    let mut buckets = bucket(sort_by_name(packages), first_letter);

    buckets.sort_by(|(a, _), (b, _)| {
        (a == OTHER_LETTER)
            .cmp(&(b == OTHER_LETTER))
            .then_with(|| natural_cmp(a, b))
    });

    tracing::debug!("Grouped by first letter: {} groups", buckets.len());

    buckets
        .into_iter()
        .map(|(letter, packages)| PackageGroup::Letter { letter, packages })
        .collect()
}

/// Group by display category, packages name-sorted inside each group
pub fn group_by_category<'a, I>(packages: I) -> Vec<PackageGroup<'a>>
where
    I: IntoIterator<Item = &'a Package>,
{
    group_by_category_sorted(packages, SortKey::Name)
}

/// Group by display category with a chosen order inside each group
///
/// Groups are ordered alphabetically by label.
pub fn group_by_category_sorted<'a, I>(packages: I, key: SortKey) -> Vec<PackageGroup<'a>>
where
    I: IntoIterator<Item = &'a Package>,
{
    let mut buckets = bucket(packages.into_iter().collect(), display_category);
    buckets.sort_by(|(a, _), (b, _)| natural_cmp(a, b));

    for (name, packages) in &buckets {
        tracing::debug!("Group \"{}\" has {} packages", name, packages.len());
    }

    buckets
        .into_iter()
        .map(|(name, packages)| PackageGroup::Category {
            packages: sort_by_key(packages, key),
            name,
        })
        .collect()
}
