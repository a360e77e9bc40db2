//! Ranked catalog search handler.

use crate::search::SearchQuery;
use crate::search::engine::{DEFAULT_PAGE, DEFAULT_LIMIT};
use crate::error::ValidationError;
use crate::state::CatalogState;
use rmcp::schemars;
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SearchRequest {
    /// Free-text query matched against track titles, artists, albums and lyrics
    pub query: String,
    /// 1-based page number (default: 1)
    #[serde(default)]
    pub page: Option<NumberParam>,
    /// Results per page (default from configuration, usually 10)
    #[serde(default)]
    pub limit: Option<NumberParam>,
}

/// A positive integer given either as a JSON number or as a numeric string.
///
/// Any other JSON value is kept so that it is rejected as a validation error
/// naming the parameter.
#[derive(Debug, Clone, PartialEq, Deserialize, schemars::JsonSchema)]
#[serde(untagged)]
pub enum NumberParam {
    Number(i64),
    Text(String),
    Other(serde_json::Value),
}

impl NumberParam {
    fn resolve(param: Option<&Self>, field: &'static str, default: i64) -> Result<i64, ValidationError> {
        let invalid = |got: String| {
            ValidationError::new(field, format!("must be a positive integer, got {got}"))
        };
        match param {
            None => Ok(default),
            Some(Self::Number(value)) => Ok(*value),
            Some(Self::Text(text)) => text.trim().parse().map_err(|_| invalid(format!("{text:?}"))),
            Some(Self::Other(value)) => Err(invalid(value.to_string())),
        }
    }
}

impl SearchRequest {
    /// Validates the request into a query, applying configured defaults.
    pub fn to_query(&self, default_limit: usize) -> Result<SearchQuery, ValidationError> {
        let default_limit = i64::try_from(default_limit).unwrap_or(DEFAULT_LIMIT);
        let page = NumberParam::resolve(self.page.as_ref(), "page", DEFAULT_PAGE)?;
        let limit = NumberParam::resolve(self.limit.as_ref(), "limit", default_limit)?;
        SearchQuery::new(self.query.clone(), page, limit)
    }
}

/// Execute a search and render the page as pretty-printed JSON.
pub async fn handle_search(
    state: &Arc<CatalogState>,
    request: SearchRequest,
) -> Result<String, String> {
    let query = request
        .to_query(state.config().default_limit)
        .map_err(|e| e.to_string())?;
    let page = state.search(&query).await.map_err(|e| e.to_string())?;
    serde_json::to_string_pretty(page.as_ref()).map_err(|e| format!("Failed to render results: {e}"))
}
