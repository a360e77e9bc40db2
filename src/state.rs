//! Shared service state: the loaded catalog, its search engine and the result cache.

use crate::catalog::{CatalogStats, MemoryCatalog};
use crate::config::SearchConfig;
use crate::error::{CatalogLoadError, SearchError};
use crate::search::{AliasTable, SearchEngine, SearchPage, SearchQuery};
use lru::LruCache;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

/// Result cache key: lowercased query text, page and limit.
type CacheKey = (String, usize, usize);

/// The currently served catalog.
struct Loaded {
    path: PathBuf,
    stats: CatalogStats,
    engine: SearchEngine,
}

/// Shared state for catalog serving and result caching.
///
/// This is the central coordination point for:
/// - The loaded catalog and the engine searching it
/// - Caching result pages (LRU), cleared whenever a catalog is loaded
pub struct CatalogState {
    config: SearchConfig,
    aliases: Arc<AliasTable>,

    /// Current catalog (if loaded)
    loaded: RwLock<Option<Loaded>>,

    /// LRU cache of result pages; `None` when caching is disabled
    cache: Option<Mutex<LruCache<CacheKey, Arc<SearchPage>>>>,
}

impl std::fmt::Debug for CatalogState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogState")
            .field("config", &self.config)
            .field("aliases", &self.aliases.len())
            .finish_non_exhaustive()
    }
}

/// Snapshot of what the state currently holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateStats {
    pub catalog: Option<(PathBuf, CatalogStats)>,
    pub cached_pages: usize,
    pub cache_capacity: usize,
}

impl CatalogState {
    pub fn new(config: SearchConfig) -> Self {
        let aliases = Arc::new(AliasTable::with_extra(&config.aliases));
        let cache = NonZeroUsize::new(config.cache_capacity).map(|n| Mutex::new(LruCache::new(n)));
        Self {
            config,
            aliases,
            loaded: RwLock::new(None),
            cache,
        }
    }

    pub const fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Loads a catalog file, replacing the current catalog and clearing the cache.
    ///
    /// On failure the previous catalog stays in place. The swap waits for
    /// in-flight searches, and the cache is cleared before any search sees the
    /// new catalog.
    pub async fn load_catalog(&self, path: &Path) -> Result<CatalogStats, CatalogLoadError> {
        let catalog = MemoryCatalog::from_file(path).await?;
        let stats = catalog.stats();
        let engine = SearchEngine::new(Arc::new(catalog))
            .with_aliases(self.aliases.clone())
            .with_max_limit(self.config.max_limit);

        let mut loaded = self.loaded.write().await;
        *loaded = Some(Loaded {
            path: path.to_path_buf(),
            stats,
            engine,
        });
        self.clear_cache().await;
        drop(loaded);

        tracing::info!("Loaded catalog {} ({})", path.display(), stats);
        Ok(stats)
    }

    /// Clear cached result pages.
    pub async fn clear_cache(&self) {
        if let Some(cache) = &self.cache {
            cache.lock().await.clear();
        }
    }

    /// Searches the loaded catalog, serving repeated requests from the cache.
    ///
    /// The catalog read guard is held until the page is cached, so a page is
    /// never cached for a catalog that has since been replaced.
    pub async fn search(&self, query: &SearchQuery) -> Result<Arc<SearchPage>, SearchError> {
        let loaded = self.loaded.read().await;
        let loaded = loaded.as_ref().ok_or(SearchError::NoCatalog)?;

        let key = (query.text().to_lowercase(), query.page(), query.limit());
        if let Some(cache) = &self.cache
            && let Some(page) = cache.lock().await.get(&key)
        {
            tracing::debug!("Cache hit for {:?}", query.text());
            return Ok(page.clone());
        }

        let page = Arc::new(loaded.engine.search(query).await?);
        if let Some(cache) = &self.cache {
            cache.lock().await.put(key, page.clone());
        }
        Ok(page)
    }

    pub async fn stats(&self) -> StateStats {
        let catalog = self
            .loaded
            .read()
            .await
            .as_ref()
            .map(|loaded| (loaded.path.clone(), loaded.stats));
        let cached_pages = match &self.cache {
            Some(cache) => cache.lock().await.len(),
            None => 0,
        };
        StateStats {
            catalog,
            cached_pages,
            cache_capacity: self.config.cache_capacity,
        }
    }
}
