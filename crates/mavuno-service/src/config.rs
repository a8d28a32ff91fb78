//! Application configuration.

use crate::error::{AppError, AppResult};
use mavuno_engine::EngineConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Lifecycle sweep configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepConfig {
    /// Interval between lifecycle sweeps (ms). Default: 1,000.
    ///
    /// The sweep only needs to be roughly on time: the arbitration
    /// window check keeps late bids out between passes.
    #[serde(default = "default_sweep_interval_ms")]
    pub interval_ms: u64,
}

fn default_sweep_interval_ms() -> u64 {
    1_000
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_sweep_interval_ms(),
        }
    }
}

impl SweepConfig {
    #[must_use]
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms.max(1))
    }
}

/// Settlement journal configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalConfig {
    /// Whether to journal settlement records. Default: true.
    #[serde(default = "default_journal_enabled")]
    pub enabled: bool,
    /// Output directory for daily JSONL files.
    #[serde(default = "default_journal_dir")]
    pub dir: String,
    /// Records buffered before a flush. Default: 16.
    #[serde(default = "default_journal_buffer")]
    pub max_buffer_size: usize,
}

fn default_journal_enabled() -> bool {
    true
}

fn default_journal_dir() -> String {
    "data/settlements".to_string()
}

fn default_journal_buffer() -> usize {
    16
}

impl Default for JournalConfig {
    fn default() -> Self {
        Self {
            enabled: default_journal_enabled(),
            dir: default_journal_dir(),
            max_buffer_size: default_journal_buffer(),
        }
    }
}

/// Inventory collaborator configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryConfig {
    /// Catalog inventory endpoint. When unset the service runs with an
    /// empty in-memory inventory (useful for demos; every auction
    /// creation will fail its product lookup).
    #[serde(default)]
    pub base_url: Option<String>,
    /// Per-request timeout (ms). Default: 10,000.
    #[serde(default = "default_inventory_timeout_ms")]
    pub request_timeout_ms: u64,
}

fn default_inventory_timeout_ms() -> u64 {
    10_000
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            request_timeout_ms: default_inventory_timeout_ms(),
        }
    }
}

impl InventoryConfig {
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub sweep: SweepConfig,
    #[serde(default)]
    pub journal: JournalConfig,
    #[serde(default)]
    pub inventory: InventoryConfig,
}

impl AppConfig {
    /// Load from a path, falling back to defaults when the file does
    /// not exist.
    pub fn load(config_path: &str) -> AppResult<Self> {
        if Path::new(config_path).exists() {
            Self::from_file(config_path)
        } else {
            tracing::warn!(path = %config_path, "Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load from a specific file.
    pub fn from_file(path: &str) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("Failed to read config: {e}")))?;

        toml::from_str(&content)
            .map_err(|e| AppError::Config(format!("Failed to parse config: {e}")))
    }
}
