mod common;

use assert2::{check, let_assert};
use catalog_search::config::SearchConfig;
use catalog_search::state::CatalogState;
use catalog_search::tools::{
    CatalogStatsRequest, LoadCatalogRequest, SearchRequest, handle_catalog_stats,
    handle_load_catalog, handle_search,
};
use common::{TempCatalog, temp_catalog};
use rstest::rstest;
use serde_json::Value;
use std::sync::Arc;

fn state() -> Arc<CatalogState> {
    catalog_search::tracing::init();
    Arc::new(CatalogState::new(SearchConfig::default()))
}

fn search_request(json: Value) -> SearchRequest {
    serde_json::from_value(json).expect("valid search request")
}

async fn load(state: &Arc<CatalogState>, catalog: &TempCatalog) -> Result<String, String> {
    let request = LoadCatalogRequest {
        path: catalog.path().display().to_string(),
    };
    handle_load_catalog(state, request).await
}

/// Test: Searching before any catalog is loaded reports it.
#[tokio::test]
async fn search_without_catalog_fails() {
    let state = state();
    let result = handle_search(&state, search_request(serde_json::json!({"query": "song"}))).await;
    let_assert!(Err(message) = result);
    check!(message.contains("no catalog loaded"));
}

/// Test: load_catalog reports counts and search returns the JSON page.
#[rstest]
#[tokio::test]
async fn load_then_search(temp_catalog: TempCatalog) {
    let state = state();
    let loaded = load(&state, &temp_catalog).await.unwrap();
    check!(loaded.contains("5 artists, 2 albums, 5 tracks"));

    let output = handle_search(
        &state,
        search_request(serde_json::json!({"query": "Ocean Eyes", "page": "1", "limit": 2})),
    )
    .await
    .unwrap();
    let page: Value = serde_json::from_str(&output).unwrap();

    check!(page["page"] == 1);
    check!(page["results"][0]["type"] == "track");
    check!(page["results"][0]["score"] == 100);
    check!(page["results"][0]["data"]["title"] == "Ocean Eyes");
    check!(page["results"][0]["data"]["artist"]["name"] == "Billie Eilish");
    check!(page["results"][0]["data"]["album"]["title"] == "Happier Than Ever");
    check!(page["results"].as_array().unwrap().len() <= 2);
}

/// Test: Validation errors name the offending parameter.
#[rstest]
#[case(serde_json::json!({"query": "   "}), "query")]
#[case(serde_json::json!({"query": "song", "page": 0}), "page")]
#[case(serde_json::json!({"query": "song", "page": "first"}), "page")]
#[case(serde_json::json!({"query": "song", "page": 1.5}), "page")]
#[case(serde_json::json!({"query": "song", "limit": false}), "limit")]
#[case(serde_json::json!({"query": "song", "limit": 101}), "limit")]
#[tokio::test]
async fn invalid_requests_are_rejected(
    temp_catalog: TempCatalog,
    #[case] request: Value,
    #[case] field: &str,
) {
    let state = state();
    load(&state, &temp_catalog).await.unwrap();

    let_assert!(Err(message) = handle_search(&state, search_request(request)).await);
    check!(message.starts_with(&format!("invalid {field}")), "{}", message);
}

/// Test: Repeated searches are served from the cache, which a reload clears.
#[rstest]
#[tokio::test]
async fn cache_fills_and_clears_on_reload(temp_catalog: TempCatalog) {
    let state = state();
    load(&state, &temp_catalog).await.unwrap();

    let request = || search_request(serde_json::json!({"query": "sad song"}));
    let first = handle_search(&state, request()).await.unwrap();
    let second = handle_search(&state, request()).await.unwrap();
    check!(first == second);
    check!(state.stats().await.cached_pages == 1);

    load(&state, &temp_catalog).await.unwrap();
    check!(state.stats().await.cached_pages == 0);
}

/// Test: A cache capacity of zero disables caching without changing results.
#[rstest]
#[tokio::test]
async fn disabled_cache_still_searches(temp_catalog: TempCatalog) {
    let state = Arc::new(CatalogState::new(SearchConfig {
        cache_capacity: 0,
        ..SearchConfig::default()
    }));
    load(&state, &temp_catalog).await.unwrap();

    let output = handle_search(&state, search_request(serde_json::json!({"query": "bili"})))
        .await
        .unwrap();
    check!(output.contains("\"Billie\""));
    check!(state.stats().await.cached_pages == 0);

    let stats = handle_catalog_stats(&state, CatalogStatsRequest::default())
        .await
        .unwrap();
    check!(stats.contains("Result cache: disabled"));
}

/// Test: Configured aliases extend short-term matching.
#[rstest]
#[tokio::test]
async fn configured_aliases_are_used(temp_catalog: TempCatalog) {
    let config = SearchConfig::parse("[aliases]\nps = [\"patti\"]").unwrap();
    let state = Arc::new(CatalogState::new(config));
    load(&state, &temp_catalog).await.unwrap();

    let output = handle_search(&state, search_request(serde_json::json!({"query": "ps"})))
        .await
        .unwrap();
    check!(output.contains("Patti Smith"));
}

/// Test: A failed load keeps the previously loaded catalog.
#[rstest]
#[tokio::test]
async fn failed_load_keeps_previous_catalog(temp_catalog: TempCatalog) {
    let state = state();
    load(&state, &temp_catalog).await.unwrap();

    let request = LoadCatalogRequest {
        path: temp_catalog.missing_path().display().to_string(),
    };
    let_assert!(Err(message) = handle_load_catalog(&state, request).await);
    check!(message.contains("missing.json"));

    let bad = TempCatalog::new(r#"{"artists": [{"id": "a1", "name": "X"}, {"id": "a1", "name": "Y"}]}"#);
    let_assert!(Err(message) = load(&state, &bad).await);
    check!(message.contains("duplicate artist id 'a1'"));

    let stats = handle_catalog_stats(&state, CatalogStatsRequest::default())
        .await
        .unwrap();
    check!(stats.contains("5 artists, 2 albums, 5 tracks"));
    check!(stats.contains(&temp_catalog.path().display().to_string()));
}

/// Test: catalog_stats without a catalog points at load_catalog.
#[tokio::test]
async fn stats_without_catalog() {
    let state = state();
    let stats = handle_catalog_stats(&state, CatalogStatsRequest::default())
        .await
        .unwrap();
    check!(stats.contains("No catalog loaded"));
    check!(stats.contains("Result cache: 0/256 pages"));
}
