//! Catalog loading errors
//!
//! Only loading the catalog can fail. Once a `Catalog` exists, searching,
//! filtering, sorting and grouping are infallible.

use std::path::PathBuf;
use thiserror::Error;

/// Failures surfaced while obtaining or parsing `repodata.json`
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The catalog file could not be read
    #[error("Failed to read catalog from {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The catalog is not valid JSON
    #[error("Failed to parse catalog JSON")]
    Parse {
        #[source]
        source: serde_json::Error,
    },

    /// The top-level JSON value is not an object keyed by package identifier
    #[error("Catalog must be a JSON object keyed by package identifier, found {found}")]
    NotAnObject { found: &'static str },

    /// A URL was given but the crate was built without HTTP support
    #[error("Cannot fetch {url}: built without the `fetch` feature. Rebuild with --features fetch or use a local catalog file")]
    FetchDisabled { url: String },

    /// The HTTP request for the catalog failed
    #[cfg(feature = "fetch")]
    #[error("Failed to fetch catalog from {url}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status
    #[cfg(feature = "fetch")]
    #[error("Failed to fetch catalog: HTTP {status} from {url}")]
    Status { url: String, status: u16 },
}

pub type Result<T> = std::result::Result<T, CatalogError>;
