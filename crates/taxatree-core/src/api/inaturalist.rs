use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info, warn};

use super::{ApiError, ObservationSource};
use crate::config::{
    DEFAULT_API_BASE_URL, DEFAULT_PAGE_DELAY_MS, DEFAULT_PER_PAGE, DEFAULT_TAXON_DELAY_MS,
};
use crate::observation::{Observation, ObservationsPage, TaxaPage, Taxon};

/// Client for the iNaturalist REST API.
///
/// Observation pages are fetched sequentially with a pause between
/// requests; the public API asks clients to stay polite rather than
/// enforcing strict quotas.
pub struct INaturalistClient {
    base_url: String,
    per_page: u32,
    page_delay: Duration,
    taxon_delay: Duration,
    client: Client,
}

impl INaturalistClient {
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            per_page: DEFAULT_PER_PAGE,
            page_delay: Duration::from_millis(DEFAULT_PAGE_DELAY_MS),
            taxon_delay: Duration::from_millis(DEFAULT_TAXON_DELAY_MS),
            client: Client::new(),
        }
    }

    /// Sets the API base URL (for mirrors or test servers).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the observations page size.
    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page;
        self
    }

    /// Sets the pause between paginated requests.
    pub fn with_page_delay(mut self, delay: Duration) -> Self {
        self.page_delay = delay;
        self
    }

    /// Sets the pause between taxon detail requests.
    pub fn with_taxon_delay(mut self, delay: Duration) -> Self {
        self.taxon_delay = delay;
        self
    }

    async fn fetch_page(
        &self,
        username: &str,
        taxon_id: Option<u64>,
        page: u32,
    ) -> Result<ObservationsPage, ApiError> {
        let mut request = self
            .client
            .get(format!("{}/observations", self.base_url))
            .query(&[
                ("user_login", username.to_string()),
                ("per_page", self.per_page.to_string()),
                ("page", page.to_string()),
                ("order", "desc".to_string()),
                ("order_by", "created_at".to_string()),
            ]);
        if let Some(id) = taxon_id {
            request = request.query(&[("taxon_id", id.to_string())]);
        }

        let response = request.send().await?;
        let status = response.status();

        if status == 429 {
            return Err(ApiError::RateLimited);
        }

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))
    }

    /// Fetches the full record for one taxon.
    async fn fetch_taxon(&self, taxon_id: u64) -> Result<Option<Taxon>, ApiError> {
        let response = self
            .client
            .get(format!("{}/taxa/{}", self.base_url, taxon_id))
            .send()
            .await?;
        let status = response.status();

        if status == 429 {
            return Err(ApiError::RateLimited);
        }

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let page: TaxaPage = response
            .json()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))?;

        Ok(page.results.into_iter().next())
    }

    /// Replaces taxa that arrived without an expanded ancestors list
    /// with their full records, memoizing lookups across the batch.
    ///
    /// A failed detail lookup is a logged miss, not a batch failure:
    /// the observation keeps its original taxon and extraction falls
    /// back to the flat rank fields. Only a rate limit aborts, since
    /// every further request would hit it too.
    async fn hydrate_taxa(&self, observations: &mut [Observation]) -> Result<(), ApiError> {
        let mut fetched: HashMap<u64, Option<Taxon>> = HashMap::new();

        for observation in observations.iter_mut() {
            let Some(taxon) = &observation.taxon else {
                continue;
            };
            if taxon.ancestors.is_some() {
                continue;
            }
            let Some(id) = taxon.id else {
                continue;
            };

            if !fetched.contains_key(&id) {
                tokio::time::sleep(self.taxon_delay).await;
                debug!(taxon_id = id, "fetching taxon details");
                let detail = match self.fetch_taxon(id).await {
                    Ok(detail) => detail,
                    Err(e @ ApiError::RateLimited) => return Err(e),
                    Err(e) => {
                        warn!(taxon_id = id, "taxon detail fetch failed: {}", e);
                        None
                    }
                };
                fetched.insert(id, detail);
            }
            if let Some(full) = fetched.get(&id).and_then(|t| t.clone()) {
                observation.taxon = Some(full);
            }
        }

        Ok(())
    }
}

impl Default for INaturalistClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ObservationSource for INaturalistClient {
    async fn fetch_observations(
        &self,
        username: &str,
        taxon_id: Option<u64>,
    ) -> Result<Vec<Observation>, ApiError> {
        let mut all = Vec::new();
        let mut page = 1;

        loop {
            let result = self.fetch_page(username, taxon_id, page).await?;
            let total = result.total_results;
            let count = result.results.len();
            all.extend(result.results);

            info!(
                page,
                fetched = all.len(),
                total,
                "fetched observation page"
            );

            if count == 0 || all.len() as u64 >= total {
                break;
            }
            page += 1;
            tokio::time::sleep(self.page_delay).await;
        }

        self.hydrate_taxa(&mut all).await?;
        Ok(all)
    }
}
