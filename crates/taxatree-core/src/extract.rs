//! Ancestry extraction from raw observations.
//!
//! Turns one observation into an [`AncestryChain`]: the six ancestor
//! ranks resolved to ids and names, plus a species link taken from the
//! observation's own taxon. Ranks that cannot be resolved are recorded
//! with an absent id rather than dropped, so a chain always describes
//! all six ancestor levels in order.

use thiserror::Error;
use tracing::warn;

use crate::observation::{Observation, Taxon};
use crate::taxonomy::TaxonRank;

/// Errors produced while extracting ancestry from an observation.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("observation {0} has no identified taxon")]
    MalformedObservation(u64),
}

/// One resolved ancestor level of a chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainLink {
    pub rank: TaxonRank,

    /// The taxon id, or None when neither resolution tier produced one.
    pub taxon_id: Option<u64>,

    pub name: String,
}

/// The species leaf of a chain, always from the observation's own taxon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeciesLink {
    pub taxon_id: u64,
    pub name: String,
    pub common_name: String,
}

/// The full ancestry of one observation, ready for merging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AncestryChain {
    /// Ancestor links in rank order, kingdom first. [`extract`] always
    /// produces all six; hand-built chains may carry a shorter prefix.
    pub ancestors: Vec<ChainLink>,

    pub species: SpeciesLink,
}

/// Extracts the ancestry chain from a single observation.
pub fn extract(observation: &Observation) -> Result<AncestryChain, ExtractError> {
    let taxon = observation
        .taxon
        .as_ref()
        .ok_or(ExtractError::MalformedObservation(observation.id))?;
    let species_id = taxon
        .id
        .filter(|&id| id != 0)
        .ok_or(ExtractError::MalformedObservation(observation.id))?;

    let ancestors = TaxonRank::ANCESTORS
        .iter()
        .map(|&rank| resolve_rank(taxon, rank))
        .collect();

    Ok(AncestryChain {
        ancestors,
        species: SpeciesLink {
            taxon_id: species_id,
            name: taxon.name.clone(),
            common_name: taxon.preferred_common_name.clone().unwrap_or_default(),
        },
    })
}

/// Extracts chains from a whole batch.
///
/// Observations without a usable taxon are logged and skipped; one bad
/// record never aborts the batch.
pub fn extract_chains(observations: &[Observation]) -> Vec<AncestryChain> {
    let mut chains = Vec::with_capacity(observations.len());
    for observation in observations {
        match extract(observation) {
            Ok(chain) => chains.push(chain),
            Err(e) => warn!("skipping observation: {}", e),
        }
    }
    chains
}

/// Resolves one ancestor rank from the two available sources.
///
/// The expanded ancestors list wins when it holds an entry at the
/// target rank. Otherwise the flat `<rank>_name` field is paired with
/// the positional entry of `ancestor_ids`; id and name are resolved
/// independently, so either may be present without the other.
fn resolve_rank(taxon: &Taxon, rank: TaxonRank) -> ChainLink {
    if let Some(ancestors) = &taxon.ancestors {
        if let Some(record) = ancestors
            .iter()
            .find(|a| TaxonRank::parse(&a.rank) == Some(rank))
        {
            return ChainLink {
                rank,
                taxon_id: Some(record.id),
                name: record.name.clone().unwrap_or_default(),
            };
        }
    }

    ChainLink {
        rank,
        taxon_id: taxon.ancestor_ids.get(rank.index()).copied(),
        name: taxon.rank_name(rank).unwrap_or_default(),
    }
}
