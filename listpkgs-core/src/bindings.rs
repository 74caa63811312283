//! JSON facade for foreign front-ends
//!
//! Wraps a loaded catalog behind a string-in/string-out API so a
//! JavaScript, Python or other front-end can drive the pipeline without
//! sharing Rust types:
//! - Cloneable and thread-safe (`Arc` internally)
//! - String errors
//! - JSON in, JSON out

use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

use crate::catalog::Catalog;
use crate::facets::Facets;
use crate::filter::{apply_filters, FilterSelection};
use crate::group::{group_by_category_sorted, group_by_first_letter};
use crate::sort::{sort_by_name, SortKey};

/// How query results are shaped
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupBy {
    /// One flat, name-sorted list
    #[default]
    None,
    /// First-letter groups
    Letter,
    /// Display-category groups
    Category,
}

/// A query as sent by a front-end
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QueryRequest {
    pub search_term: String,
    pub filters: FilterSelection,
    pub group_by: GroupBy,
    /// Order inside category groups; derived from `filters` when absent
    pub sort_key: Option<SortKey>,
}

/// FFI-friendly catalog wrapper
#[derive(Debug, Clone)]
pub struct BrowserBinding {
    catalog: Arc<Catalog>,
}

impl BrowserBinding {
    /// Load a catalog from `repodata.json` text
    pub fn new(catalog_json: &str) -> Result<Self, String> {
        let catalog = Catalog::from_json_str(catalog_json)
            .map_err(|e| format!("Failed to load catalog: {}", e))?;

        Ok(Self::from_catalog(catalog))
    }

    /// Wrap an already-loaded catalog
    pub fn from_catalog(catalog: Catalog) -> Self {
        Self {
            catalog: Arc::new(catalog),
        }
    }

    /// Run a query
    ///
    /// # Arguments
    /// * `request_json` - a [`QueryRequest`] as JSON
    ///
    /// # Returns
    /// * `Ok(String)` - `{"total", "matched", "packages"}` for flat results,
    ///   `{"total", "matched", "groups"}` when grouped
    /// * `Err(String)` - the request was not valid JSON
    pub fn query(&self, request_json: &str) -> Result<String, String> {
        let request: QueryRequest = serde_json::from_str(request_json)
            .map_err(|e| format!("Invalid query JSON: {}", e))?;

        let response = self.run(&request);

        serde_json::to_string(&response).map_err(|e| format!("Failed to serialize results: {}", e))
    }

    fn run(&self, request: &QueryRequest) -> serde_json::Value {
        let matched = apply_filters(
            self.catalog.packages(),
            &request.search_term,
            &request.filters,
        );
        let total = self.catalog.len();
        let count = matched.len();

        match request.group_by {
            GroupBy::None => json!({
                "total": total,
                "matched": count,
                "packages": sort_by_name(matched),
            }),
            GroupBy::Letter => json!({
                "total": total,
                "matched": count,
                "groups": group_by_first_letter(matched),
            }),
            GroupBy::Category => {
                let key = request
                    .sort_key
                    .unwrap_or_else(|| SortKey::for_selection(&request.filters));
                json!({
                    "total": total,
                    "matched": count,
                    "groups": group_by_category_sorted(matched, key),
                })
            }
        }
    }

    /// Facet counts over the whole catalog, as JSON
    pub fn facets(&self) -> Result<String, String> {
        serde_json::to_string(&Facets::from_packages(self.catalog.packages()))
            .map_err(|e| format!("Failed to serialize facets: {}", e))
    }

    pub fn package_count(&self) -> usize {
        self.catalog.len()
    }

    pub fn version(&self) -> String {
        format!("listpkgs-core {}", env!("CARGO_PKG_VERSION"))
    }
}

// Thread safety assertions - these will fail compilation if not met
#[allow(dead_code)]
const _: () = {
    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    fn _assertions() {
        assert_send::<BrowserBinding>();
        assert_sync::<BrowserBinding>();
    }
};
