use anyhow::Context;
use catalog_search::{CatalogServer, SearchConfig};
use rmcp::{ServiceExt, transport::stdio};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    catalog_search::tracing::init();

    let config = SearchConfig::load().context("Failed to load configuration")?;
    let catalog_path = config.catalog_path.clone();
    let server = CatalogServer::new(config);

    if let Some(path) = catalog_path {
        // A bad startup catalog is not fatal; load_catalog can still be used.
        if let Err(e) = server.state().load_catalog(&path).await {
            tracing::warn!("{e}");
        }
    }

    tracing::info!("Starting catalog-search MCP server");

    let service = server.serve(stdio()).await.inspect_err(|e| {
        tracing::error!("Error serving MCP server: {:?}", e);
    })?;

    service.waiting().await?;

    Ok(())
}
