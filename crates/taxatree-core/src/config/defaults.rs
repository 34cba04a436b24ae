//! Default values for TaxaTree configuration.
//!
//! All hardcoded defaults are centralized here for easy maintenance.

use crate::taxonomy::TaxonRank;

// ============================================================================
// API Defaults
// ============================================================================

/// Default iNaturalist API base URL.
pub const DEFAULT_API_BASE_URL: &str = "https://api.inaturalist.org/v1";

/// Default observations page size (the API maximum).
pub const DEFAULT_PER_PAGE: u32 = 200;

/// Default pause between observation pages (milliseconds).
pub const DEFAULT_PAGE_DELAY_MS: u64 = 1000;

/// Default pause between taxon detail requests (milliseconds).
pub const DEFAULT_TAXON_DELAY_MS: u64 = 500;

// ============================================================================
// Cache Defaults
// ============================================================================

/// Default cache entry lifetime in days.
pub const DEFAULT_CACHE_MAX_AGE_DAYS: i64 = 30;

// ============================================================================
// Layout Defaults
// ============================================================================

/// Default horizontal distance between rank levels.
pub const DEFAULT_LEVEL_SEPARATION: f64 = 1.0;

/// Default total vertical span of the diagram.
pub const DEFAULT_CANVAS_SPAN: f64 = 2.0;

// ============================================================================
// Config File
// ============================================================================

/// Project-local config file name.
pub const CONFIG_FILE_NAME: &str = "taxatree.toml";

// ============================================================================
// Taxonomic Groups
// ============================================================================

/// Built-in group presets: display name, filter rank, iNaturalist taxon
/// id. The id doubles as the server-side `taxon_id` query parameter.
pub const TAXON_GROUPS: &[(&str, TaxonRank, u64)] = &[
    ("Insects", TaxonRank::Class, 47158),
    ("Fungi", TaxonRank::Kingdom, 47170),
    ("Plants", TaxonRank::Kingdom, 47126),
    ("Mammals", TaxonRank::Class, 40151),
    ("Reptiles", TaxonRank::Class, 26036),
    ("Amphibians", TaxonRank::Class, 20978),
];
