//! Configuration for the valley sampler.

use crate::core::windowing::EdgePolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Tags excluded from sampling when no block-list is given.
pub const DEFAULT_BLOCK_LIST: [&str; 2] = ["F01000310F30010011711560", "E2003066701700620960B90B"];

/// Main configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Grouping, alignment and naming settings for the sampling pass
    pub sampling: SamplingConfig,

    /// Column names used by the duration pass
    pub duration: DurationConfig,

    /// Whether writers may replace existing files
    pub overwrite: bool,

    /// Path for storing run statistics
    pub data_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("valley-sampler");

        Self {
            sampling: SamplingConfig::default(),
            duration: DurationConfig::default(),
            overwrite: true,
            data_path: data_dir,
        }
    }
}

impl Config {
    /// Load configuration from the default location.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from `path`, falling back to defaults when absent.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            let content =
                std::fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;
            let config: Config = serde_json::from_str(&content)
                .map_err(|e| ConfigError::ParseError(e.to_string()))?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to `path`.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::IoError(e.to_string()))?;
        }

        let content = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        std::fs::write(path, content).map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }

    /// Get the path to the configuration file.
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("valley-sampler")
            .join("config.json")
    }

    /// Path of the persisted statistics of the last run.
    pub fn stats_path(&self) -> PathBuf {
        crate::stats::stats_file(&self.data_path)
    }

    /// Ensure all required directories exist.
    pub fn ensure_directories(&self) -> Result<(), ConfigError> {
        std::fs::create_dir_all(&self.data_path)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;
        Ok(())
    }
}

/// Settings for grouping, alignment and output naming.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
    /// Column used both to group rows and to filter groups
    pub filter_key: String,
    /// Numeric column whose minimum anchors the window
    pub align_key: String,
    /// Group keys that are never sampled
    pub block_list: Vec<String>,
    /// How many trailing key characters go into output names
    pub group_key_len: usize,
    /// Behaviour when the valley is the first row
    pub edge_policy: EdgePolicy,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            filter_key: "epc".to_string(),
            align_key: "rssi".to_string(),
            block_list: DEFAULT_BLOCK_LIST.iter().map(|s| s.to_string()).collect(),
            group_key_len: 4,
            edge_policy: EdgePolicy::default(),
        }
    }
}

impl SamplingConfig {
    /// Replace the block-list. An empty list keeps the current one.
    pub fn with_block_list(mut self, block_list: Vec<String>) -> Self {
        if !block_list.is_empty() {
            self.block_list = block_list;
        }
        self
    }

    /// Parse a block-list from a comma-separated string.
    pub fn parse_block_list(s: &str) -> Vec<String> {
        s.split(',')
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Column names read and written by the duration pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DurationConfig {
    pub timestamp_key: String,
    pub duration_column: String,
    pub avg_duration_column: String,
}

impl Default for DurationConfig {
    fn default() -> Self {
        Self {
            timestamp_key: "time_stamp".to_string(),
            duration_column: "duration".to_string(),
            avg_duration_column: "avg_duration".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug)]
pub enum ConfigError {
    IoError(String),
    ParseError(String),
    SerializeError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "IO error: {e}"),
            ConfigError::ParseError(e) => write!(f, "Parse error: {e}"),
            ConfigError::SerializeError(e) => write!(f, "Serialize error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}
