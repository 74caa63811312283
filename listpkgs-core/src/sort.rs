//! Ordering for package lists
//!
//! Names are compared the way a browser's `localeCompare` with numeric
//! collation orders them: runs of digits compare by value, and outside
//! digit runs whitespace sorts before punctuation, punctuation before
//! digits, digits before letters, and letters compare case-insensitively
//! by base letter, with accents deciding only otherwise-equal names.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use unicode_normalization::char::{decompose_canonical, is_combining_mark};

use crate::catalog::Package;
use crate::filter::FilterSelection;

/// Natural comparison of two strings, so that "pkg2" < "pkg10"
///
/// Accents are ignored on the first pass ("émacs" sorts with "emacs",
/// between "apt" and "zsh") and only break ties.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    compare_by(a, b, base_letter).then_with(|| compare_by(a, b, lowercase))
}

fn compare_by(a: &str, b: &str, fold: fn(char) -> char) -> Ordering {
    let mut left = a.chars().peekable();
    let mut right = b.chars().peekable();

    loop {
        let (l, r) = match (left.peek().copied(), right.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(l), Some(r)) => (l, r),
        };

        let ord = if l.is_ascii_digit() && r.is_ascii_digit() {
            let l_digits = take_digits(&mut left);
            let r_digits = take_digits(&mut right);
            cmp_digit_runs(&l_digits, &r_digits)
        } else {
            left.next();
            right.next();
            collation_key(l, fold).cmp(&collation_key(r, fold))
        };

        if ord != Ordering::Equal {
            return ord;
        }
    }
}

fn take_digits(it: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut digits = String::new();
    while let Some(c) = it.peek().copied() {
        if !c.is_ascii_digit() {
            break;
        }
        digits.push(c);
        it.next();
    }
    digits
}

/// Compare digit runs by value without parsing, so any length works
fn cmp_digit_runs(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

fn collation_key(c: char, fold: fn(char) -> char) -> (u8, char) {
    let class = if c.is_whitespace() {
        0
    } else if c.is_ascii_digit() {
        2
    } else if c.is_alphabetic() {
        3
    } else {
        1
    };
    (class, fold(c))
}

fn lowercase(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

/// Lowercased base letter with diacritics stripped: 'É' -> 'e'
fn base_letter(c: char) -> char {
    let mut base = None;
    decompose_canonical(c, |part| {
        if base.is_none() && !is_combining_mark(part) {
            base = Some(part);
        }
    });
    lowercase(base.unwrap_or(c))
}

/// Stable sort by lowercased name
pub fn sort_by_name<'a, I>(packages: I) -> Vec<&'a Package>
where
    I: IntoIterator<Item = &'a Package>,
{
    let mut keyed: Vec<(String, &Package)> = packages
        .into_iter()
        .map(|pkg| (pkg.name.to_lowercase(), pkg))
        .collect();

    keyed.sort_by(|(a, _), (b, _)| natural_cmp(a, b));
    keyed.into_iter().map(|(_, pkg)| pkg).collect()
}

/// Secondary orderings used inside display groups
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Name,
    Architecture,
    Maintainer,
    License,
}

impl SortKey {
    /// Order that best reflects the active filters
    ///
    /// Architecture wins over maintainers, maintainers over licenses;
    /// otherwise packages are ordered by name.
    pub fn for_selection(selection: &FilterSelection) -> Self {
        if !selection.architecture.trim().is_empty() {
            SortKey::Architecture
        } else if !selection.maintainers.is_empty() {
            SortKey::Maintainer
        } else if !selection.licenses.is_empty() {
            SortKey::License
        } else {
            SortKey::Name
        }
    }

    fn field<'p>(&self, pkg: &'p Package) -> &'p str {
        match self {
            SortKey::Name => &pkg.name,
            SortKey::Architecture => pkg.architecture_or_unknown(),
            SortKey::Maintainer => pkg.maintainer_or_unknown(),
            SortKey::License => pkg.license_or_unknown(),
        }
    }
}

/// Sort by name, then stably by `key`, so ties stay in name order
pub fn sort_by_key<'a, I>(packages: I, key: SortKey) -> Vec<&'a Package>
where
    I: IntoIterator<Item = &'a Package>,
{
    let mut sorted = sort_by_name(packages);
    if key != SortKey::Name {
        sorted.sort_by(|a, b| natural_cmp(key.field(a), key.field(b)));
    }
    sorted
}
