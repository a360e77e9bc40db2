//! Configuration file support.
//!
//! Loads `SearchConfig` from the first file found among `$CATALOG_SEARCH_CONFIG`,
//! `./catalog-search.toml` and `<config dir>/catalog-search/config.toml`, falling
//! back to defaults when none exists.

use crate::error::Result;
use anyhow::{Context, bail};
use serde::Deserialize;
use std::borrow::Cow;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "CATALOG_SEARCH_CONFIG";

const LOCAL_CONFIG: &str = "catalog-search.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Page size used when a request names none.
    pub default_limit: usize,
    /// Largest page size a request may ask for.
    pub max_limit: usize,
    /// Number of result pages kept in the LRU cache; 0 disables caching.
    pub cache_capacity: usize,
    /// Catalog loaded at startup.
    pub catalog_path: Option<PathBuf>,
    /// Extra short-term aliases merged over the builtin table.
    pub aliases: HashMap<String, Vec<String>>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_limit: 10,
            max_limit: 100,
            cache_capacity: 256,
            catalog_path: None,
            aliases: HashMap::new(),
        }
    }
}

impl SearchConfig {
    /// Load configuration from files.
    ///
    /// An explicit `$CATALOG_SEARCH_CONFIG` must exist and parse. The other
    /// locations are skipped when absent.
    pub fn load() -> Result<Self> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Self::load_from_path(Path::new(&path));
        }

        let local = PathBuf::from(LOCAL_CONFIG);
        if local.is_file() {
            return Self::load_from_path(&local);
        }

        if let Some(dir) = dirs::config_dir() {
            let path = dir.join("catalog-search").join("config.toml");
            if path.is_file() {
                return Self::load_from_path(&path);
            }
        }

        tracing::debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config = Self::parse(&content)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parses and validates a TOML document.
    pub fn parse(content: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(content)?;
        if config.default_limit == 0 {
            bail!("default_limit must be positive");
        }
        if config.max_limit < config.default_limit {
            bail!(
                "max_limit ({}) must not be below default_limit ({})",
                config.max_limit,
                config.default_limit
            );
        }
        if config.cache_capacity == 0 {
            tracing::warn!("cache_capacity is 0, result caching disabled");
        }
        config.catalog_path = config
            .catalog_path
            .map(|path| PathBuf::from(expand_tilde(&path.to_string_lossy()).into_owned()));
        Ok(config)
    }
}

/// Expands tilde (`~`) in a path to the user's home directory.
///
/// - `~/foo` becomes `/home/user/foo`
/// - `~` becomes `/home/user`
/// - Other paths are returned unchanged
pub fn expand_tilde(path: &str) -> Cow<'_, str> {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return Cow::Owned(home.join(stripped).display().to_string());
        }
    } else if path == "~"
        && let Some(home) = dirs::home_dir()
    {
        return Cow::Owned(home.display().to_string());
    }
    Cow::Borrowed(path)
}
