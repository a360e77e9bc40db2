//! Ranked fuzzy search over a media catalog of tracks, artists and albums,
//! served over MCP.

pub mod catalog;
pub mod config;
pub mod error;
pub mod search;
pub mod server;
pub mod state;
pub mod tools;
pub mod tracing;

pub use catalog::{CatalogStats, CatalogStore, MemoryCatalog, StoreError};
pub use config::SearchConfig;
pub use error::{CatalogLoadError, SearchError, ValidationError};
pub use search::{SearchEngine, SearchPage, SearchQuery};
pub use server::CatalogServer;
pub use state::CatalogState;
