use std::fs;
use std::path::PathBuf;

use chrono::{Duration, Utc};
use tracing::warn;

use super::error::CacheError;
use super::{CacheKey, CachedTree, TreeCache};
use crate::config::CacheConfig;
use crate::tree::TaxonomyTree;

/// File-backed tree cache.
///
/// One JSON file per (user, filter) key:
/// ```text
/// {cache_dir}/
///   {sha256}.json        # CachedTree: fetch time + tree
/// ```
///
/// Entries older than the configured max age are treated as absent. An
/// unreadable or corrupt entry degrades to a miss rather than failing
/// the request.
pub struct FileCache {
    base_path: PathBuf,
    max_age_days: i64,
}

impl FileCache {
    /// Creates a cache rooted at the configured directory.
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            base_path: config.cache_path(),
            max_age_days: config.max_age_days,
        }
    }

    /// Creates a cache rooted at an explicit directory.
    pub fn with_path(path: impl Into<PathBuf>, max_age_days: i64) -> Self {
        Self {
            base_path: path.into(),
            max_age_days,
        }
    }

    /// Path of the entry file for a key.
    pub fn entry_path(&self, key: &CacheKey) -> PathBuf {
        self.base_path.join(format!("{}.json", key.file_stem()))
    }

    fn ensure_dir(&self) -> Result<(), CacheError> {
        if !self.base_path.exists() {
            fs::create_dir_all(&self.base_path).map_err(|e| CacheError::io(&self.base_path, e))?;
        }
        Ok(())
    }

    fn is_fresh(&self, cached: &CachedTree) -> bool {
        Utc::now() - cached.fetched_at < Duration::days(self.max_age_days)
    }
}

impl TreeCache for FileCache {
    fn load(&self, key: &CacheKey) -> Result<Option<CachedTree>, CacheError> {
        let path = self.entry_path(key);
        if !path.exists() {
            return Ok(None);
        }

        let json = match fs::read_to_string(&path) {
            Ok(json) => json,
            Err(e) => {
                warn!("unreadable cache entry {}: {}", path.display(), e);
                return Ok(None);
            }
        };
        let cached: CachedTree = match serde_json::from_str(&json) {
            Ok(cached) => cached,
            Err(e) => {
                warn!("corrupt cache entry {}: {}", path.display(), e);
                return Ok(None);
            }
        };

        if !self.is_fresh(&cached) {
            return Ok(None);
        }
        Ok(Some(cached))
    }

    fn store(&self, key: &CacheKey, tree: &TaxonomyTree) -> Result<(), CacheError> {
        self.ensure_dir()?;

        let cached = CachedTree {
            fetched_at: Utc::now(),
            tree: tree.clone(),
        };
        let path = self.entry_path(key);
        let json = serde_json::to_string_pretty(&cached)?;
        fs::write(&path, json).map_err(|e| CacheError::io(&path, e))?;

        Ok(())
    }

    fn invalidate(&self, key: &CacheKey) -> Result<(), CacheError> {
        let path = self.entry_path(key);
        if path.exists() {
            fs::remove_file(&path).map_err(|e| CacheError::io(&path, e))?;
        }
        Ok(())
    }

    fn clear(&self) -> Result<(), CacheError> {
        if !self.base_path.exists() {
            return Ok(());
        }

        let entries =
            fs::read_dir(&self.base_path).map_err(|e| CacheError::io(&self.base_path, e))?;
        for entry in entries {
            let entry = entry.map_err(|e| CacheError::io(&self.base_path, e))?;
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                fs::remove_file(&path).map_err(|e| CacheError::io(&path, e))?;
            }
        }

        Ok(())
    }
}
