//! Catalog and cache statistics handler.

use crate::state::CatalogState;
use rmcp::schemars;
use serde::Deserialize;
use std::fmt::Write as _;
use std::sync::Arc;

#[derive(Debug, Default, Deserialize, schemars::JsonSchema)]
pub struct CatalogStatsRequest {}

/// Describe the loaded catalog and the result cache.
pub async fn handle_catalog_stats(
    state: &Arc<CatalogState>,
    _request: CatalogStatsRequest,
) -> Result<String, String> {
    let stats = state.stats().await;
    let mut output = String::new();

    match &stats.catalog {
        Some((path, counts)) => {
            let _ = writeln!(output, "Catalog: {}", path.display());
            let _ = writeln!(output, "  {counts}");
        }
        None => output.push_str("No catalog loaded. Use load_catalog to load one.\n"),
    }

    if stats.cache_capacity == 0 {
        output.push_str("Result cache: disabled\n");
    } else {
        let _ = writeln!(
            output,
            "Result cache: {}/{} pages",
            stats.cached_pages, stats.cache_capacity
        );
    }
    Ok(output)
}
