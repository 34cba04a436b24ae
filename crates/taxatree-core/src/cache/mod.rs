mod error;
mod file;

pub use error::CacheError;
pub use file::FileCache;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::tree::{TaxonomyTree, TreeFilter};

/// Identifies one cached tree: a user plus an optional taxon filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheKey {
    pub username: String,
    pub filter: Option<TreeFilter>,
}

impl CacheKey {
    pub fn new(username: impl Into<String>, filter: Option<TreeFilter>) -> Self {
        Self {
            username: username.into(),
            filter,
        }
    }

    /// Stable file stem for this key.
    pub fn file_stem(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.username.as_bytes());
        if let Some(filter) = &self.filter {
            hasher.update([filter.rank.index() as u8]);
            hasher.update(filter.taxon_id.to_be_bytes());
        }
        hex::encode(hasher.finalize())
    }
}

/// A tree together with its fetch time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedTree {
    pub fetched_at: DateTime<Utc>,
    pub tree: TaxonomyTree,
}

/// Trait for tree cache backends.
///
/// Freshness is the backend's concern: `load` never returns an entry
/// the backend considers stale, so callers treat a hit as equivalent to
/// a fresh merge.
pub trait TreeCache {
    /// Loads a cached tree, or None when absent or stale.
    fn load(&self, key: &CacheKey) -> Result<Option<CachedTree>, CacheError>;

    /// Stores a tree under the key, stamping the current time.
    fn store(&self, key: &CacheKey, tree: &TaxonomyTree) -> Result<(), CacheError>;

    /// Removes a single cached entry.
    fn invalidate(&self, key: &CacheKey) -> Result<(), CacheError>;

    /// Removes every cached entry.
    fn clear(&self) -> Result<(), CacheError>;
}
