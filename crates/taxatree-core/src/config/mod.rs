//! Configuration management for TaxaTree.
//!
//! Configuration is loaded from multiple sources with the following priority:
//! 1. Environment variables (highest priority)
//! 2. Project-local `taxatree.toml` file
//! 3. User config `~/.config/taxatree/config.toml`
//! 4. Built-in defaults (lowest priority)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

mod defaults;

pub use defaults::*;

use crate::tree::{LayoutOptions, TreeFilter};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Observations API configuration.
    pub api: ApiConfig,

    /// Tree cache configuration.
    pub cache: CacheConfig,

    /// Layout spacing configuration.
    pub layout: LayoutOptions,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            cache: CacheConfig::default(),
            layout: LayoutOptions::default(),
        }
    }
}

impl Config {
    /// Load configuration from default locations.
    ///
    /// Searches for config in order:
    /// 1. `./taxatree.toml` (project local)
    /// 2. `~/.config/taxatree/config.toml` (user config)
    /// 3. Falls back to defaults
    pub fn load() -> Result<Self, ConfigError> {
        // Try project-local config first
        if Path::new(CONFIG_FILE_NAME).exists() {
            return Self::from_file(CONFIG_FILE_NAME);
        }

        // Try user config
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("taxatree").join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        // Use defaults
        let mut config = Self::default();
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load configuration from a specific file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&content)?;

        // Apply environment variable overrides
        config.apply_env_overrides();

        Ok(config)
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        // API overrides
        if let Ok(url) = std::env::var("TAXATREE_API_BASE_URL") {
            self.api.base_url = url;
        }
        if let Ok(per_page) = std::env::var("TAXATREE_PER_PAGE") {
            if let Ok(n) = per_page.parse() {
                self.api.per_page = n;
            }
        }

        // Cache overrides
        if let Ok(dir) = std::env::var("TAXATREE_CACHE_DIR") {
            self.cache.cache_dir = Some(dir);
        }
        if let Ok(days) = std::env::var("TAXATREE_CACHE_MAX_AGE_DAYS") {
            if let Ok(n) = days.parse() {
                self.cache.max_age_days = n;
            }
        }
    }

    /// Create a default config file content as a string.
    pub fn default_config_string() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

/// Observations API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the iNaturalist-compatible API.
    pub base_url: String,

    /// Observations per page (the API caps this at 200).
    pub per_page: u32,

    /// Pause between paginated requests, in milliseconds.
    pub page_delay_ms: u64,

    /// Pause between taxon detail requests, in milliseconds.
    pub taxon_delay_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            per_page: DEFAULT_PER_PAGE,
            page_delay_ms: DEFAULT_PAGE_DELAY_MS,
            taxon_delay_ms: DEFAULT_TAXON_DELAY_MS,
        }
    }
}

/// Tree cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Cache directory. When unset, the platform cache directory is
    /// used.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_dir: Option<String>,

    /// Entries older than this many days are treated as absent.
    pub max_age_days: i64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            cache_dir: None,
            max_age_days: DEFAULT_CACHE_MAX_AGE_DAYS,
        }
    }
}

impl CacheConfig {
    /// Resolved cache directory: the configured path, or the platform
    /// cache directory.
    pub fn cache_path(&self) -> PathBuf {
        match &self.cache_dir {
            Some(dir) => PathBuf::from(dir),
            None => dirs::cache_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("taxatree"),
        }
    }
}

/// Looks up a built-in taxonomic group by name, case-insensitively.
pub fn group_filter(name: &str) -> Option<TreeFilter> {
    TAXON_GROUPS
        .iter()
        .find(|(group, _, _)| group.eq_ignore_ascii_case(name))
        .map(|&(_, rank, taxon_id)| TreeFilter { rank, taxon_id })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taxonomy::TaxonRank;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.api.base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.api.per_page, DEFAULT_PER_PAGE);
        assert_eq!(config.cache.max_age_days, DEFAULT_CACHE_MAX_AGE_DAYS);
        assert_eq!(config.layout.level_separation, DEFAULT_LEVEL_SEPARATION);
    }

    #[test]
    fn test_config_to_toml() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[api]"));
        assert!(toml_str.contains("[cache]"));
        assert!(toml_str.contains("[layout]"));
    }

    #[test]
    fn test_config_from_toml() {
        let toml_str = r#"
[api]
per_page = 50
page_delay_ms = 0

[cache]
cache_dir = "/tmp/taxatree-test"
max_age_days = 7

[layout]
canvas_span = 4.0
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.api.per_page, 50);
        assert_eq!(config.api.page_delay_ms, 0);
        assert_eq!(config.api.base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.cache.cache_dir, Some("/tmp/taxatree-test".to_string()));
        assert_eq!(config.cache.max_age_days, 7);
        assert_eq!(config.layout.canvas_span, 4.0);
        assert_eq!(config.layout.level_separation, DEFAULT_LEVEL_SEPARATION);
    }

    #[test]
    fn test_group_filter_lookup() {
        let filter = group_filter("Amphibians").unwrap();
        assert_eq!(filter.rank, TaxonRank::Class);
        assert_eq!(filter.taxon_id, 20978);

        let filter = group_filter("fungi").unwrap();
        assert_eq!(filter.rank, TaxonRank::Kingdom);
        assert_eq!(filter.taxon_id, 47170);

        assert!(group_filter("dinosaurs").is_none());
    }

    #[test]
    fn test_explicit_cache_dir_wins() {
        let config = CacheConfig {
            cache_dir: Some("/tmp/custom".to_string()),
            ..CacheConfig::default()
        };
        assert_eq!(config.cache_path(), PathBuf::from("/tmp/custom"));
    }
}
