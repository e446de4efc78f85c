//! Engine configuration.
//!
//! Controls when metrics switch from the sequential path to the sharded
//! path, how many shards are used, and the seed for the pre-partition
//! shuffle. Loaded from a TOML file such as:
//!
//! ```toml
//! parallel_threshold = 1000
//! shard_count = 4
//! shuffle_seed = 42
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Tuning for the sequential/sharded execution split.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CentralityConfig {
    /// Graphs with at least this many nodes run sharded.
    #[serde(default = "default_parallel_threshold")]
    pub parallel_threshold: usize,
    /// Number of shards (and worker threads) on the sharded path.
    #[serde(default = "default_shard_count")]
    pub shard_count: usize,
    /// Seed for the node shuffle that precedes partitioning.
    #[serde(default = "default_shuffle_seed")]
    pub shuffle_seed: u64,
}

impl Default for CentralityConfig {
    fn default() -> Self {
        Self {
            parallel_threshold: default_parallel_threshold(),
            shard_count: default_shard_count(),
            shuffle_seed: default_shuffle_seed(),
        }
    }
}

impl CentralityConfig {
    /// A configuration that always takes the sharded path.
    #[must_use]
    pub fn always_sharded(shard_count: usize) -> Self {
        Self {
            parallel_threshold: 0,
            shard_count,
            ..Self::default()
        }
    }

    /// A configuration that never takes the sharded path.
    #[must_use]
    pub fn sequential() -> Self {
        Self {
            parallel_threshold: usize::MAX,
            ..Self::default()
        }
    }

    /// Whether a graph of `node_count` nodes runs sharded.
    #[must_use]
    pub const fn is_sharded(&self, node_count: usize) -> bool {
        node_count >= self.parallel_threshold && node_count > 0
    }
}

const fn default_parallel_threshold() -> usize {
    1000
}

const fn default_shard_count() -> usize {
    4
}

const fn default_shuffle_seed() -> u64 {
    0x5EED_B0B5
}

/// Load configuration from a TOML file.
///
/// A missing file yields [`CentralityConfig::default`].
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_config(path: &Path) -> Result<CentralityConfig> {
    if !path.exists() {
        return Ok(CentralityConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<CentralityConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg = load_config(&dir.path().join("absent.toml")).expect("load");
        assert_eq!(cfg, CentralityConfig::default());
        assert_eq!(cfg.parallel_threshold, 1000);
        assert_eq!(cfg.shard_count, 4);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        writeln!(file, "shard_count = 8").expect("write");

        let cfg = load_config(file.path()).expect("load");
        assert_eq!(cfg.shard_count, 8);
        assert_eq!(cfg.parallel_threshold, 1000);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        writeln!(file, "shard_count = \"many\"").expect("write");

        let err = load_config(file.path()).expect_err("should fail");
        assert!(err.to_string().contains("Failed to parse"));
    }

    #[test]
    fn threshold_is_inclusive() {
        let cfg = CentralityConfig::default();
        assert!(!cfg.is_sharded(999));
        assert!(cfg.is_sharded(1000));
        assert!(!CentralityConfig::always_sharded(4).is_sharded(0));
        assert!(!CentralityConfig::sequential().is_sharded(1_000_000));
    }
}
