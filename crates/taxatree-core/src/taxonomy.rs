use serde::{Deserialize, Serialize};

/// One level of the fixed Linnaean hierarchy used throughout the tree
/// builder.
///
/// Ranks are totally ordered from broadest to most specific:
/// Kingdom → Phylum → Class → Order → Family → Genus → Species
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum TaxonRank {
    Kingdom,
    Phylum,
    Class,
    Order,
    Family,
    Genus,
    Species,
}

impl TaxonRank {
    /// Every rank, broadest first.
    pub const SEQUENCE: [TaxonRank; 7] = [
        TaxonRank::Kingdom,
        TaxonRank::Phylum,
        TaxonRank::Class,
        TaxonRank::Order,
        TaxonRank::Family,
        TaxonRank::Genus,
        TaxonRank::Species,
    ];

    /// The ancestor ranks (everything above species), broadest first.
    pub const ANCESTORS: [TaxonRank; 6] = [
        TaxonRank::Kingdom,
        TaxonRank::Phylum,
        TaxonRank::Class,
        TaxonRank::Order,
        TaxonRank::Family,
        TaxonRank::Genus,
    ];

    /// Position of this rank in the hierarchy (kingdom = 0).
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Returns the next, more specific rank.
    /// Returns None for species.
    pub fn next(&self) -> Option<TaxonRank> {
        match self {
            TaxonRank::Kingdom => Some(TaxonRank::Phylum),
            TaxonRank::Phylum => Some(TaxonRank::Class),
            TaxonRank::Class => Some(TaxonRank::Order),
            TaxonRank::Order => Some(TaxonRank::Family),
            TaxonRank::Family => Some(TaxonRank::Genus),
            TaxonRank::Genus => Some(TaxonRank::Species),
            TaxonRank::Species => None,
        }
    }

    /// Parses an API rank string.
    ///
    /// The observations API reports many more ranks than the seven used
    /// here (subspecies, hybrid, stateofmatter, ...); those return None
    /// and never match a chain level.
    pub fn parse(s: &str) -> Option<TaxonRank> {
        match s {
            "kingdom" => Some(TaxonRank::Kingdom),
            "phylum" => Some(TaxonRank::Phylum),
            "class" => Some(TaxonRank::Class),
            "order" => Some(TaxonRank::Order),
            "family" => Some(TaxonRank::Family),
            "genus" => Some(TaxonRank::Genus),
            "species" => Some(TaxonRank::Species),
            _ => None,
        }
    }

    /// Returns a human-readable name for the rank.
    pub fn display_name(&self) -> &'static str {
        match self {
            TaxonRank::Kingdom => "Kingdom",
            TaxonRank::Phylum => "Phylum",
            TaxonRank::Class => "Class",
            TaxonRank::Order => "Order",
            TaxonRank::Family => "Family",
            TaxonRank::Genus => "Genus",
            TaxonRank::Species => "Species",
        }
    }
}
