//! API-shaped observation and taxon records.
//!
//! These mirror the JSON returned by the iNaturalist observations and
//! taxa endpoints. They are transient: produced per fetched page and
//! discarded once ancestry has been extracted.

use serde::{Deserialize, Serialize};

use crate::taxonomy::TaxonRank;

/// One page of results from the observations endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ObservationsPage {
    pub total_results: u64,
    pub page: u32,
    pub per_page: u32,
    pub results: Vec<Observation>,
}

/// One page of results from the taxa endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TaxaPage {
    pub results: Vec<Taxon>,
}

/// A single observation as reported by the API.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Observation {
    pub id: u64,

    /// The identified taxon. Absent when the sighting is unidentified.
    #[serde(default)]
    pub taxon: Option<Taxon>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observed_on: Option<String>,
}

/// An observation's taxon, with whatever ancestry detail the API chose
/// to include.
///
/// The expanded `ancestors` array is only present on some payloads; the
/// flat `<rank>_name` fields and the positional `ancestor_ids` list are
/// the fallback source for missing levels.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Taxon {
    #[serde(default)]
    pub id: Option<u64>,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub rank: String,

    /// Ancestor taxon ids ordered kingdom-first.
    #[serde(default)]
    pub ancestor_ids: Vec<u64>,

    /// Expanded ancestor records, when the API includes them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ancestors: Option<Vec<Ancestor>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_common_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kingdom_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phylum_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genus_name: Option<String>,
}

impl Taxon {
    /// The flat per-rank name field for an ancestor rank.
    ///
    /// Species has no such field; its name lives in [`Taxon::name`].
    pub fn rank_name(&self, rank: TaxonRank) -> Option<String> {
        match rank {
            TaxonRank::Kingdom => self.kingdom_name.clone(),
            TaxonRank::Phylum => self.phylum_name.clone(),
            TaxonRank::Class => self.class_name.clone(),
            TaxonRank::Order => self.order_name.clone(),
            TaxonRank::Family => self.family_name.clone(),
            TaxonRank::Genus => self.genus_name.clone(),
            TaxonRank::Species => None,
        }
    }
}

/// One entry of a taxon's expanded ancestor list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ancestor {
    pub id: u64,

    #[serde(default)]
    pub name: Option<String>,

    /// Raw rank string; non-major ranks (subphylum, tribe, ...) appear
    /// here too and are ignored by extraction.
    #[serde(default)]
    pub rank: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_common_name: Option<String>,
}
