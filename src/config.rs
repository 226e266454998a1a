use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub db: DbConfig,
    #[serde(default)]
    pub indexer: IndexerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DbConfig {
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct IndexerConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_query_limit")]
    pub query_limit: i64,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            poll_interval_secs: default_poll_interval_secs(),
            timeout_secs: default_timeout_secs(),
            query_limit: default_query_limit(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}
fn default_poll_interval_secs() -> u64 {
    5
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_query_limit() -> i64 {
    5
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let mut config: Config =
        toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    // Validate indexer
    if config.indexer.base_url.is_empty() {
        anyhow::bail!("indexer.base_url must not be empty");
    }
    // Trailing slashes would produce double-slash request paths
    while config.indexer.base_url.ends_with('/') {
        config.indexer.base_url.pop();
    }

    if config.indexer.poll_interval_secs == 0 {
        anyhow::bail!("indexer.poll_interval_secs must be >= 1");
    }

    if config.indexer.query_limit < 1 {
        anyhow::bail!("indexer.query_limit must be >= 1");
    }

    Ok(config)
}
