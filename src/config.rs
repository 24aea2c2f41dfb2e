use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub relimport: RelimportConfig,
    #[serde(default)]
    pub import: ImportConfig,
}

/// Storage and logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RelimportConfig {
    pub db_path: PathBuf,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_migrations_dir")]
    pub migrations_dir: PathBuf,
}

/// Relation import configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ImportConfig {
    /// Taxonomy holding the actor relation types.
    #[serde(default = "default_taxonomy_id")]
    pub taxonomy_id: i64,
    /// Culture used for rows whose `culture` cell is empty.
    #[serde(default = "default_culture")]
    pub default_culture: String,
    /// Index relations for search when `--index` is not passed.
    #[serde(default)]
    pub index_by_default: bool,
    /// Capacity of the run-scoped actor lookup cache; 0 disables it.
    #[serde(default = "default_actor_cache_capacity")]
    pub actor_cache_capacity: usize,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            taxonomy_id: default_taxonomy_id(),
            default_culture: default_culture(),
            index_by_default: false,
            actor_cache_capacity: default_actor_cache_capacity(),
        }
    }
}

/// Taxonomy id of actor relation types in the archival schema.
pub const ACTOR_RELATION_TYPE_TAXONOMY_ID: i64 = 55;

fn default_taxonomy_id() -> i64 {
    ACTOR_RELATION_TYPE_TAXONOMY_ID
}

fn default_culture() -> String {
    "en".to_string()
}

fn default_actor_cache_capacity() -> usize {
    1024
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_migrations_dir() -> PathBuf {
    PathBuf::from("migrations")
}

impl Config {
    /// Load configuration from file
    ///
    /// Loads environment variables from .env file (if present) before loading config.
    /// Looks for config file in this order:
    /// 1. Path specified in RELIMPORT_CONFIG environment variable
    /// 2. ./config.toml in current directory
    pub fn load() -> Result<Self> {
        // .env is optional
        let _ = dotenv::dotenv();

        let config_path = std::env::var("RELIMPORT_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config.toml"));

        Self::from_path(&config_path)
    }

    /// Load and validate configuration from an explicit path
    pub fn from_path(config_path: &Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let config: Config = toml::from_str(&config_str)
            .with_context(|| format!("Failed to parse {}", config_path.display()))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    fn validate(&self) -> Result<()> {
        if self.relimport.db_path.as_os_str().is_empty() {
            anyhow::bail!("relimport.db_path must not be empty");
        }

        if self.import.default_culture.trim().is_empty() {
            anyhow::bail!("import.default_culture must not be empty");
        }

        Ok(())
    }

    /// Get database path
    pub fn db_path(&self) -> &Path {
        &self.relimport.db_path
    }

    /// Get migrations directory
    pub fn migrations_dir(&self) -> &Path {
        &self.relimport.migrations_dir
    }
}
