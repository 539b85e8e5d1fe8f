use crate::model::NetworkKind;
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::env;

/// Which entities get their pairwise edges strengthened after a served request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReinforcementScope {
    /// Source plus returned neighbors for rankers, endpoints for walks.
    #[default]
    Served,
    /// Every pair among the entities named by the request.
    QueryEntities,
    Disabled,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct IngestionConfig {
    #[serde(default = "default_entities_file")]
    pub entities_file: String,
    #[serde(default = "default_documents_file")]
    pub documents_file: String,
    #[serde(default = "default_min_sentence_chars")]
    pub min_sentence_chars: usize,
    #[serde(default = "default_min_paragraph_chars")]
    pub min_paragraph_chars: usize,
    #[serde(default = "default_true")]
    pub remove_isolated: bool,
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            entities_file: default_entities_file(),
            documents_file: default_documents_file(),
            min_sentence_chars: default_min_sentence_chars(),
            min_paragraph_chars: default_min_paragraph_chars(),
            remove_isolated: true,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct RecommenderConfig {
    #[serde(default)]
    pub default_network: NetworkKind,
    #[serde(default = "default_top_k")]
    pub default_top_k: usize,
    #[serde(default = "default_max_top_k")]
    pub max_top_k: usize,
    /// Ceiling for `length` and `max_steps`; walks are only bounded by what callers pass.
    #[serde(default = "default_max_walk_steps")]
    pub max_walk_steps: usize,
    #[serde(default)]
    pub reinforcement: ReinforcementScope,
    #[serde(default = "default_true")]
    pub persist_after_request: bool,
}

impl Default for RecommenderConfig {
    fn default() -> Self {
        Self {
            default_network: NetworkKind::default(),
            default_top_k: default_top_k(),
            max_top_k: default_max_top_k(),
            max_walk_steps: default_max_walk_steps(),
            reinforcement: ReinforcementScope::default(),
            persist_after_request: true,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct LoggingConfig {
    #[serde(default)]
    pub json: bool,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub ingestion: IngestionConfig,
    #[serde(default)]
    pub recommender: RecommenderConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Layers `{dir}/default`, `{dir}/{RUN_MODE}` and `COGRAPH__*` environment overrides.
    pub fn load_from(dir: &str) -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let builder = Config::builder()
            .add_source(File::with_name(&format!("{}/default", dir)).required(false))
            .add_source(File::with_name(&format!("{}/{}", dir, run_mode)).required(false))
            .add_source(Environment::with_prefix("COGRAPH").separator("__"));

        builder.build()?.try_deserialize()
    }
}

fn default_data_dir() -> String {
    "data".to_string()
}

fn default_entities_file() -> String {
    "hyderabad_entities.json".to_string()
}

fn default_documents_file() -> String {
    "scraped_data.json".to_string()
}

const fn default_min_sentence_chars() -> usize {
    10
}

const fn default_min_paragraph_chars() -> usize {
    50
}

const fn default_top_k() -> usize {
    5
}

const fn default_max_top_k() -> usize {
    100
}

const fn default_max_walk_steps() -> usize {
    64
}

const fn default_true() -> bool {
    true
}
