use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Process-wide settings, loaded once at startup and read-only afterwards.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub bot: BotConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

/// Bot identity stamped on outgoing packs and credits.
#[derive(Debug, Deserialize, Clone)]
pub struct BotConfig {
    #[serde(default = "default_pack_name")]
    pub pack_name: String,
    #[serde(default = "default_author")]
    pub author: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StoreConfig {
    /// Where the auto-reply map is persisted.
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
}

fn default_pack_name() -> String {
    "حارس".to_string()
}

fn default_author() -> String {
    "harisbot".to_string()
}

fn default_store_path() -> PathBuf {
    PathBuf::from("data/auto_replies.json")
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            pack_name: default_pack_name(),
            author: default_author(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }
}
