mod error;
mod inaturalist;

pub use error::ApiError;
pub use inaturalist::INaturalistClient;

use async_trait::async_trait;

use crate::observation::Observation;

/// Trait for observation providers.
///
/// Implementations own all network concerns (pagination, pacing, rate
/// limits) and hand the pipeline a fully materialized batch.
#[async_trait]
pub trait ObservationSource: Send + Sync {
    /// Fetches every observation for `username`, optionally restricted
    /// server-side to descendants of `taxon_id`.
    async fn fetch_observations(
        &self,
        username: &str,
        taxon_id: Option<u64>,
    ) -> Result<Vec<Observation>, ApiError>;
}
