//! listpkgs core - catalog model, search, filtering and grouping
//!
//! The pipeline is synchronous and pure: a caller holds the current
//! search term and [`FilterSelection`] and re-runs
//! [`apply_filters`] followed by [`sort_by_name`] or one of the grouping
//! functions whenever either changes.
//!
//! ```text
//! repodata.json ──▶ Catalog ──▶ apply_filters ──▶ sort_by_name
//!                                              └─▶ group_by_first_letter
//!                                              └─▶ group_by_category
//! ```

pub mod bindings;
pub mod catalog;
pub mod config;
pub mod error;
pub mod facets;
pub mod filter;
pub mod group;
pub mod sort;

pub use catalog::{Catalog, Package};
pub use error::CatalogError;
pub use facets::{FacetCount, Facets};
pub use filter::{
    apply_filters, filter_by_architecture, filter_by_category, filter_by_licenses,
    filter_by_maintainers, filter_by_search_term, filter_by_sources, get_category, Category,
    FilterSelection,
};
pub use group::{group_by_category, group_by_category_sorted, group_by_first_letter, PackageGroup};
pub use sort::{natural_cmp, sort_by_key, sort_by_name, SortKey};
