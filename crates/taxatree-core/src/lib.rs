pub mod api;
pub mod cache;
pub mod config;
pub mod extract;
pub mod observation;
pub mod pipeline;
pub mod taxonomy;
pub mod tree;

pub use api::{ApiError, INaturalistClient, ObservationSource};
pub use cache::{CacheError, CacheKey, CachedTree, FileCache, TreeCache};
pub use config::{ApiConfig, CacheConfig, Config, ConfigError};
pub use extract::{extract, extract_chains, AncestryChain, ChainLink, ExtractError, SpeciesLink};
pub use observation::{Ancestor, Observation, ObservationsPage, Taxon};
pub use pipeline::{PipelineError, TreeOutcome, TreePipeline, TreeRequest};
pub use taxonomy::TaxonRank;
pub use tree::{
    flatten, layout, Edge, FlatNode, LayoutOptions, Position, TaxonNode, TaxonomyTree, TreeFilter,
};
