//! Benchmark session configuration.
//!
//! A session is described by the sizes to sweep, a per-measurement time
//! budget and an RNG seed. Configs load from YAML; every field has a
//! default so a partial document is a valid config.

use std::path::{Path, PathBuf};
use std::time::Duration;
use std::{fs, io};

use serde::Deserialize;
use thiserror::Error;

fn default_sizes() -> Vec<usize> {
    vec![4, 16, 64, 256]
}

fn default_budget_ms() -> u64 {
    100
}

fn default_seed() -> u64 {
    42
}

#[derive(Debug, Clone, Deserialize)]
pub struct BenchConfig {
    /// Test sizes (subscriber counts) to sweep, in order.
    #[serde(default = "default_sizes")]
    pub sizes: Vec<usize>,
    /// Wall-clock budget per measurement, in milliseconds.
    #[serde(default = "default_budget_ms")]
    pub budget_ms: u64,
    /// Seed for the access-pattern RNG.
    #[serde(default = "default_seed")]
    pub seed: u64,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            sizes: default_sizes(),
            budget_ms: default_budget_ms(),
            seed: default_seed(),
        }
    }
}

impl BenchConfig {
    pub fn budget(&self) -> Duration {
        Duration::from_millis(self.budget_ms)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Loads configs relative to a base directory.
pub struct ConfigLoader {
    base: PathBuf,
}

impl ConfigLoader {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    pub fn load(&self, path: impl AsRef<Path>) -> Result<BenchConfig, ConfigError> {
        let path = self.base.join(path.as_ref());
        let raw = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse { path, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_sane() {
        let config = BenchConfig::default();
        assert!(!config.sizes.is_empty());
        assert_eq!(config.budget(), Duration::from_millis(100));
        assert_eq!(config.seed, 42);
    }

    #[test]
    fn loads_yaml_with_partial_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bench.yaml");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "sizes: [8, 32]").unwrap();
        writeln!(file, "budget_ms: 5").unwrap();

        let loader = ConfigLoader::new(dir.path());
        let config = loader.load("bench.yaml").unwrap();
        assert_eq!(config.sizes, vec![8, 32]);
        assert_eq!(config.budget_ms, 5);
        // omitted field falls back to the default
        assert_eq!(config.seed, 42);
    }

    #[test]
    fn missing_file_reports_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let loader = ConfigLoader::new(dir.path());
        let err = loader.load("nope.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn malformed_yaml_reports_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.yaml");
        fs::write(&path, "sizes: {not a list").unwrap();

        let loader = ConfigLoader::new(dir.path());
        let err = loader.load("bad.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
