//! Error handling types and utilities.

use crate::catalog::StoreError;
use crate::search::CandidateKind;
use std::path::PathBuf;

/// A specialized Result type for application-edge operations.
///
/// This is an alias for `anyhow::Result` with context added via `.context()` and
/// `.with_context()` at the edges (configuration, startup).
pub type Result<T> = anyhow::Result<T>;

/// A search request parameter was rejected before any retrieval ran.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {field}: {reason}")]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: String,
}

impl ValidationError {
    pub fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

/// Error returned by a search.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// One of the concurrent retrievals failed; no partial results are returned.
    #[error("failed to retrieve {kind} candidates: {source}")]
    Retrieval {
        kind: CandidateKind,
        #[source]
        source: StoreError,
    },
    #[error("no catalog loaded; use load_catalog first")]
    NoCatalog,
}

/// Error returned when loading a catalog file fails.
#[derive(Debug, thiserror::Error)]
pub enum CatalogLoadError {
    #[error("failed to read catalog {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse catalog {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("duplicate {kind} id '{id}'")]
    DuplicateId { kind: &'static str, id: String },
    #[error("{kind} '{id}' references unknown {target} '{target_id}'")]
    DanglingReference {
        kind: &'static str,
        id: String,
        target: &'static str,
        target_id: String,
    },
}
