//! CLI configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use taskrank_scoring::{Strategy, DEFAULT_SUGGESTIONS};

/// File name of the configuration inside the storage directory.
pub const CONFIG_FILE: &str = "config.json";

/// Settings read from `<storage>/config.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage directory (not read from the file)
    #[serde(skip)]
    pub storage_path: PathBuf,
    /// Strategy used when none is given on the command line
    pub default_strategy: Strategy,
    /// Number of suggestions returned by `suggest`
    pub suggestion_count: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_path: ".taskrank".into(),
            default_strategy: Strategy::default(),
            suggestion_count: DEFAULT_SUGGESTIONS,
        }
    }
}

impl Config {
    /// Load the config stored under `storage_path`, falling back to defaults
    /// when the file does not exist.
    pub async fn load(storage_path: &Path) -> Result<Self> {
        let path = storage_path.join(CONFIG_FILE);
        let mut config = match tokio::fs::read_to_string(&path).await {
            Ok(text) => serde_json::from_str::<Config>(&text)
                .with_context(|| format!("invalid config file {}", path.display()))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Config::default(),
            Err(e) => return Err(e).with_context(|| format!("reading {}", path.display())),
        };
        config.storage_path = storage_path.to_path_buf();
        Ok(config)
    }
}
