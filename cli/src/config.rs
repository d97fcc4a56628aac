//! CLI configuration with TOML file support.

use qv_store_lmdb::environment::DEFAULT_MAP_SIZE;
use qv_utils::LogFormat;
use qv_voting::{TopProposals, VotingParams};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Settings for the `qv` binary.
///
/// Loaded from TOML via [`CliConfig::from_toml_file`]; command-line flags and
/// environment variables override individual fields afterwards.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Directory holding the LMDB environment.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Maximum LMDB map size in bytes.
    #[serde(default = "default_map_size")]
    pub map_size: usize,

    #[serde(default)]
    pub log_format: LogFormat,

    /// Filter directive, e.g. `"info"` or `"warn,qv_voting=debug"`.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Engine limits, the `[limits]` table.
    #[serde(default)]
    pub limits: VotingParams,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_data_dir() -> PathBuf {
    PathBuf::from("./qv_data")
}

fn default_map_size() -> usize {
    DEFAULT_MAP_SIZE
}

fn default_log_level() -> String {
    "warn".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl CliConfig {
    pub fn from_toml_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config {}: {}", path.display(), e))?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(s: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(s)?;
        let capacity = config.limits.top_capacity;
        if !(1..=TopProposals::MAX_CAPACITY).contains(&capacity) {
            anyhow::bail!(
                "limits.top_capacity must be between 1 and {}, got {}",
                TopProposals::MAX_CAPACITY,
                capacity
            );
        }
        Ok(config)
    }
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            map_size: default_map_size(),
            log_format: LogFormat::default(),
            log_level: default_log_level(),
            limits: VotingParams::default(),
        }
    }
}
