//! Testing utilities and fixtures for fstree
//!
//! This crate wraps `fstree-core` for use inside test suites: scratch trees
//! that survive stripped permissions on cleanup, a guard that runs a test
//! from inside a scratch tree, assertions over tree differences, and an
//! adapter that turns errors into test failures.

use anyhow::{Context, Result};
use fstree_core::Config;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub mod abort;
pub mod assertions;
pub mod fixtures;
pub mod logging;
pub mod temp;
pub mod workdir;

pub use abort::OrAbort;
pub use logging::init_test_logging;
pub use temp::TempTree;
pub use workdir::TempWorkdir;

/// Settings for the test harness
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TestConfig {
    /// Prefix of scratch directory names
    pub temp_prefix: String,
    /// Comparison settings used by tree assertions
    pub diff: Config,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            temp_prefix: "fstree-".to_string(),
            diff: Config::default(),
        }
    }
}

impl TestConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: TestConfig =
            toml::from_str(contents).context("Failed to parse test configuration")?;
        config.diff.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {:?}", path))?;
        Self::from_toml_str(&contents).with_context(|| format!("Failed to load {:?}", path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fstree_core::Rank;

    #[test]
    fn test_default_config() {
        let config = TestConfig::default();
        assert_eq!(config.temp_prefix, "fstree-");
        assert_eq!(config.diff, Config::default());
    }

    #[test]
    fn test_partial_toml() {
        let config = TestConfig::from_toml_str(
            r#"
            temp_prefix = "suite-"

            [diff]
            default_ranks = ["name", "content"]

            [diff.compare]
            time_tolerance_ms = 50
            "#,
        )
        .unwrap();

        assert_eq!(config.temp_prefix, "suite-");
        assert_eq!(config.diff.default_ranks, vec![Rank::Name, Rank::Content]);
        assert_eq!(config.diff.compare.time_tolerance_ms, 50);
        assert_eq!(config.diff.compare.mode_mask, 0o777);
    }

    #[test]
    fn test_invalid_mask_rejected() {
        let err = TestConfig::from_toml_str("[diff.compare]\nmode_mask = 65535\n").unwrap_err();
        assert!(err.to_string().contains("mode_mask"));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempTree::new().unwrap();
        let err = TestConfig::load(dir.path().join("absent.toml")).unwrap_err();
        assert!(err.to_string().contains("absent.toml"));
    }

    #[test]
    fn test_load_invalid_file_names_path() {
        let dir = TempTree::new().unwrap();
        let path = dir.path().join("harness.toml");
        std::fs::write(&path, "[diff.compare]\nmode_mask = 65535\n").unwrap();

        let err = TestConfig::load(&path).unwrap_err();
        assert!(err.to_string().contains("harness.toml"));
        assert!(format!("{:#}", err).contains("mode_mask"));
    }
}
