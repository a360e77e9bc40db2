//! Catalog loading handler.

use crate::config::expand_tilde;
use crate::state::CatalogState;
use rmcp::schemars;
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LoadCatalogRequest {
    /// Path to a catalog JSON file with `artists`, `albums` and `tracks` arrays
    pub path: String,
}

/// Load a catalog, replacing the one being served.
pub async fn handle_load_catalog(
    state: &Arc<CatalogState>,
    request: LoadCatalogRequest,
) -> Result<String, String> {
    let path = PathBuf::from(expand_tilde(&request.path).as_ref());
    let stats = state
        .load_catalog(&path)
        .await
        .map_err(|e| format!("Failed to load catalog: {e}"))?;
    Ok(format!("Loaded catalog {}: {}", path.display(), stats))
}
