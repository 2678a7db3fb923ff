//! Scan configuration for the reference host.
//!
//! Settings come from a TOML file, then `WAVG_*` environment variables override them,
//! then [`ScanConfig::validate`] rejects anything unusable before a request starts.

use crate::error::{WavgError, WavgResult};
use serde::Deserialize;
use std::path::Path;
use tracing::info;
use wavg_calculator::AccumulationPolicy;

/// How documents are spread over shards and how many shards run at once.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ScanConfig {
    /// Number of shards the collection is partitioned into
    #[serde(default = "default_shard_count")]
    pub shard_count: usize,

    /// Below this many documents, shards run sequentially on the caller's thread
    #[serde(default = "default_parallel_threshold")]
    pub parallel_threshold: usize,

    /// Size of the worker pool used for parallel shard execution
    #[serde(default = "default_max_workers")]
    pub max_workers: usize,

    /// Policy used when a request does not name one
    #[serde(default)]
    pub default_policy: AccumulationPolicy,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            shard_count: default_shard_count(),
            parallel_threshold: default_parallel_threshold(),
            max_workers: default_max_workers(),
            default_policy: AccumulationPolicy::default(),
        }
    }
}

impl ScanConfig {
    pub fn from_toml_str(source: &str) -> WavgResult<Self> {
        toml::from_str(source).map_err(|e| WavgError::serialization(e.to_string(), "toml"))
    }

    pub fn from_file(path: &Path) -> WavgResult<Self> {
        let source = std::fs::read_to_string(path)
            .map_err(|source| WavgError::Io { path: path.display().to_string(), source })?;
        Self::from_toml_str(&source)
    }

    /// Loads `path` when given, otherwise the defaults; then applies environment
    /// overrides and validates.
    pub fn load(path: Option<&Path>) -> WavgResult<Self> {
        let config = match path {
            Some(path) => {
                info!(path = %path.display(), "Loading scan configuration");
                Self::from_file(path)?
            }
            None => Self::default(),
        };
        let config = config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Overrides settings from `WAVG_SHARD_COUNT`, `WAVG_PARALLEL_THRESHOLD`,
    /// `WAVG_MAX_WORKERS` and `WAVG_POLICY`.
    pub fn apply_overrides<F>(mut self, lookup: F) -> WavgResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("WAVG_SHARD_COUNT") {
            self.shard_count = parse_override("WAVG_SHARD_COUNT", &value)?;
        }
        if let Some(value) = lookup("WAVG_PARALLEL_THRESHOLD") {
            self.parallel_threshold = parse_override("WAVG_PARALLEL_THRESHOLD", &value)?;
        }
        if let Some(value) = lookup("WAVG_MAX_WORKERS") {
            self.max_workers = parse_override("WAVG_MAX_WORKERS", &value)?;
        }
        if let Some(value) = lookup("WAVG_POLICY") {
            self.default_policy = value.parse()?;
        }
        Ok(self)
    }

    pub fn validate(&self) -> WavgResult<()> {
        if self.shard_count == 0 {
            return Err(WavgError::configuration("shard_count must be at least 1", "shard_count"));
        }
        if self.max_workers == 0 {
            return Err(WavgError::configuration("max_workers must be at least 1", "max_workers"));
        }
        Ok(())
    }

    /// Worker threads used for a sharded scan; a shard is never split across workers.
    pub fn shard_workers(&self) -> usize {
        self.max_workers.min(self.shard_count)
    }
}

fn parse_override(key: &str, value: &str) -> WavgResult<usize> {
    value.trim().parse::<usize>().map_err(|_| {
        WavgError::configuration(format!("{key} must be a non-negative integer, got '{value}'"), key)
    })
}

fn default_shard_count() -> usize {
    5
}

fn default_parallel_threshold() -> usize {
    1000
}

fn default_max_workers() -> usize {
    num_cpus::get()
}
