//! End-to-end tree construction.
//!
//! Ties the stages together behind one call: consult the cache, fetch
//! observations, extract ancestry, merge, store. Emptiness flows out as
//! an empty tree, never as an error.

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::info;

use crate::api::{ApiError, ObservationSource};
use crate::cache::{CacheError, CacheKey, TreeCache};
use crate::extract::extract_chains;
use crate::tree::{TaxonomyTree, TreeFilter};

/// Errors that can occur while building a tree end to end.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),
}

/// A request for one user's tree.
#[derive(Debug, Clone)]
pub struct TreeRequest {
    pub username: String,

    /// Restricts both the API query and the merge to one group.
    pub filter: Option<TreeFilter>,

    /// Skip the cache and fetch anew.
    pub refresh: bool,
}

/// A built tree together with its provenance.
#[derive(Debug, Clone)]
pub struct TreeOutcome {
    pub tree: TaxonomyTree,

    /// Observations behind the tree. None when served from cache.
    pub observation_count: Option<usize>,

    pub from_cache: bool,

    pub fetched_at: DateTime<Utc>,
}

/// Builds taxonomy trees from an observation source, with caching.
pub struct TreePipeline<S: ObservationSource, C: TreeCache> {
    source: S,
    cache: C,
}

impl<S: ObservationSource, C: TreeCache> TreePipeline<S, C> {
    pub fn new(source: S, cache: C) -> Self {
        Self { source, cache }
    }

    /// Returns the user's tree, from cache when fresh.
    ///
    /// An empty tree is a legitimate outcome: the user may have no
    /// observations, or the filter may match none of them.
    pub async fn build(&self, request: &TreeRequest) -> Result<TreeOutcome, PipelineError> {
        let key = CacheKey::new(&request.username, request.filter);

        if !request.refresh {
            if let Some(cached) = self.cache.load(&key)? {
                info!(user = %request.username, "serving tree from cache");
                return Ok(TreeOutcome {
                    tree: cached.tree,
                    observation_count: None,
                    from_cache: true,
                    fetched_at: cached.fetched_at,
                });
            }
        }

        let taxon_id = request.filter.map(|f| f.taxon_id);
        let observations = self
            .source
            .fetch_observations(&request.username, taxon_id)
            .await?;
        info!(
            user = %request.username,
            count = observations.len(),
            "fetched observations"
        );

        let chains = extract_chains(&observations);
        let tree = TaxonomyTree::merge(&chains, request.filter.as_ref());
        self.cache.store(&key, &tree)?;

        Ok(TreeOutcome {
            tree,
            observation_count: Some(observations.len()),
            from_cache: false,
            fetched_at: Utc::now(),
        })
    }

    /// Drops one cached tree.
    pub fn invalidate(&self, request: &TreeRequest) -> Result<(), PipelineError> {
        let key = CacheKey::new(&request.username, request.filter);
        self.cache.invalidate(&key)?;
        Ok(())
    }

    /// Drops every cached tree.
    pub fn clear_cache(&self) -> Result<(), PipelineError> {
        self.cache.clear()?;
        Ok(())
    }
}
