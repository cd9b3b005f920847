use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level corpus configuration
#[derive(Debug, Deserialize, Clone)]
pub struct CorpusConfig {
    /// Directory holding fetched book content, one sub-directory per provider
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,
    /// SQLite database with sources, recipes, ingredients and instructions
    #[serde(default = "default_database")]
    pub database: PathBuf,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            cache_dir: default_cache_dir(),
            database: default_database(),
            fetch: FetchConfig::default(),
            export: ExportConfig::default(),
        }
    }
}

/// Where books are downloaded from
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct FetchConfig {
    pub gutenberg_base_url: String,
    pub archive_base_url: String,
    /// Request timeout in seconds
    pub timeout: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            gutenberg_base_url: "https://www.gutenberg.org".to_string(),
            archive_base_url: "https://archive.org".to_string(),
            timeout: 30,
        }
    }
}

/// Selection rules and output settings for a dataset export
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct ExportConfig {
    /// Maximum recipes kept per source after filtering
    pub cap_per_source: usize,
    /// Seed mixed into the per-recipe sampling hash
    pub seed: u64,
    /// Recipes with more failed extraction attempts are left out
    pub max_failed: u32,
    pub min_ingredients: u32,
    pub min_steps: u32,
    /// Inclusive bounds on the total instruction length, in characters
    pub min_chars: u64,
    pub max_chars: u64,
    /// Categories never exported (compared lower-case)
    pub excluded_categories: Vec<String>,
    pub dataset_version: String,
    pub output_dir: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            cap_per_source: 200,
            seed: 42,
            max_failed: 3,
            min_ingredients: 3,
            min_steps: 1,
            min_chars: 80,
            max_chars: 50_000,
            excluded_categories: default_excluded_categories(),
            dataset_version: "v1".to_string(),
            output_dir: PathBuf::from("exports"),
        }
    }
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from("cache")
}

fn default_database() -> PathBuf {
    PathBuf::from("cookbooks.sqlite3")
}

fn default_excluded_categories() -> Vec<String> {
    ["medicinal", "household", "toiletry", "cleaning", "veterinary"]
        .iter()
        .map(|category| category.to_string())
        .collect()
}

impl CorpusConfig {
    /// Load configuration from `cookbooks.toml` and the environment.
    ///
    /// See [`load_config`].
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }
}

/// Load configuration from file and environment variables
///
/// Configuration is loaded with the following priority (highest to lowest):
/// 1. Environment variables with COOKBOOKS__ prefix
/// 2. cookbooks.toml file in current directory
/// 3. Default values
///
/// Environment variable format: COOKBOOKS__EXPORT__SEED. Lists are comma
/// separated: COOKBOOKS__EXPORT__EXCLUDED_CATEGORIES=medicinal,household
pub fn load_config() -> Result<CorpusConfig, ConfigError> {
    load_config_from(Path::new("cookbooks.toml"))
}

/// Same as [`load_config`] with an explicit (optional) file.
pub fn load_config_from(path: &Path) -> Result<CorpusConfig, ConfigError> {
    let settings = Config::builder()
        .add_source(File::from(path).required(false))
        .add_source(
            Environment::with_prefix("COOKBOOKS")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("export.excluded_categories")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}
