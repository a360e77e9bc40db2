//! MCP server implementation.

use crate::config::SearchConfig;
use crate::state::CatalogState;
use crate::tools::catalog_stats::{CatalogStatsRequest, handle_catalog_stats};
use crate::tools::load_catalog::{LoadCatalogRequest, handle_load_catalog};
use crate::tools::search::{SearchRequest, handle_search};
use rmcp::{
    ServerHandler,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::*,
    schemars::{self, JsonSchema, generate::SchemaSettings},
    tool, tool_handler, tool_router,
};
use std::sync::Arc;

/// MCP Server for media catalog search
#[derive(Clone)]
pub struct CatalogServer {
    /// Shared catalog state (loaded catalog, result cache)
    state: Arc<CatalogState>,

    /// Tool router for handling MCP tool calls
    tool_router: ToolRouter<Self>,
}

impl std::fmt::Debug for CatalogServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogServer")
            .field("state", &self.state)
            .finish()
    }
}

#[tool_router]
impl CatalogServer {
    pub fn new(config: SearchConfig) -> Self {
        Self {
            state: Arc::new(CatalogState::new(config)),
            tool_router: Self::tool_router(),
        }
    }

    /// Get a reference to the shared CatalogState.
    pub fn state(&self) -> &Arc<CatalogState> {
        &self.state
    }

    #[tool(
        description = "Load a media catalog from a JSON file with `artists`, `albums` and `tracks` arrays. Replaces the catalog being searched and clears cached results.",
        input_schema = inline_schema_for_type::<LoadCatalogRequest>()
    )]
    async fn load_catalog(
        &self,
        Parameters(request): Parameters<LoadCatalogRequest>,
    ) -> std::result::Result<String, String> {
        handle_load_catalog(&self.state, request).await
    }

    #[tool(
        description = "Search tracks, artists, albums and lyrics with fuzzy, phonetic and alias matching. Returns one ranked, paginated JSON list of {type, data, score} results with total and totalPages.",
        input_schema = inline_schema_for_type::<SearchRequest>()
    )]
    async fn search(
        &self,
        Parameters(request): Parameters<SearchRequest>,
    ) -> std::result::Result<String, String> {
        handle_search(&self.state, request).await
    }

    #[tool(
        description = "Show counts of the loaded catalog and result cache occupancy.",
        input_schema = inline_schema_for_type::<CatalogStatsRequest>()
    )]
    async fn catalog_stats(
        &self,
        Parameters(request): Parameters<CatalogStatsRequest>,
    ) -> std::result::Result<String, String> {
        handle_catalog_stats(&self.state, request).await
    }
}

#[tool_handler]
impl ServerHandler for CatalogServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo::new(ServerCapabilities::builder().enable_tools().build())
            .with_protocol_version(ProtocolVersion::V_2024_11_05)
            .with_server_info(Implementation::from_build_env())
            .with_instructions(
                "catalog-search: ranked search over a media catalog of tracks, artists and albums. \
                 Tolerates misspellings, diacritics and short names. \
                 Use load_catalog first unless a catalog was configured at startup."
                    .to_string(),
            )
    }
}

/// Generate an inline JSON schema for MCP tools
///
/// Unlike rmcp's default `schema_for_type()`, this function sets `inline_subschemas = true`
/// to generate inline definitions instead of $ref patterns, so clients render the
/// untagged page/limit parameters directly.
pub fn inline_schema_for_type<T: JsonSchema>() -> Arc<JsonObject> {
    let mut settings = SchemaSettings::draft07();
    settings.transforms = vec![Box::new(schemars::transform::AddNullable::default())];
    settings.inline_subschemas = true;

    let generator = settings.into_generator();
    let schema = generator.into_root_schema_for::<T>();
    let object = serde_json::to_value(schema).expect("failed to serialize schema");

    let json_object = match object {
        serde_json::Value::Object(object) => object,
        _ => panic!("Schema serialization produced non-object value"),
    };

    Arc::new(json_object)
}
