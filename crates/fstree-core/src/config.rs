//! Configuration module

use crate::rank::Rank;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Mask selecting the nine rwx permission bits
pub const PERM_MASK: u32 = 0o777;

/// Mask selecting permission bits plus setuid, setgid and sticky
pub const MODE_MASK: u32 = 0o7777;

/// Default tolerance for modification time comparisons, in milliseconds
pub const DEFAULT_TIME_TOLERANCE_MS: u64 = 5;

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Options consulted by rank predicates
    pub compare: CompareOptions,
    /// Rank chain used when a caller does not pass one explicitly
    pub default_ranks: Vec<Rank>,
}

/// Options consulted by rank predicates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompareOptions {
    /// Bits of the mode compared by [`Rank::Perm`]
    pub mode_mask: u32,
    /// Modification times closer than this are not ordered by [`Rank::Time`]
    pub time_tolerance_ms: u64,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            mode_mask: PERM_MASK,
            time_tolerance_ms: DEFAULT_TIME_TOLERANCE_MS,
        }
    }
}

impl CompareOptions {
    /// Options that compare exact timestamps and all twelve mode bits
    pub fn strict() -> Self {
        Self {
            mode_mask: MODE_MASK,
            time_tolerance_ms: 0,
        }
    }

    pub fn time_tolerance(&self) -> Duration {
        Duration::from_millis(self.time_tolerance_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            compare: CompareOptions::default(),
            default_ranks: vec![Rank::Name, Rank::Dir, Rank::Size],
        }
    }
}

impl Config {
    /// Parse configuration from TOML text; missing keys take their defaults
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from an explicit file path
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents =
            fs::read_to_string(path).map_err(|e| Error::io("read config", path, e))?;
        Self::from_toml_str(&contents).map_err(|e| Error::in_file(path, e))
    }

    /// Serialize configuration to TOML text
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))
    }

    /// Reject masks with bits outside the twelve mode bits
    pub fn validate(&self) -> Result<()> {
        if self.compare.mode_mask & !MODE_MASK != 0 {
            return Err(Error::Config(format!(
                "mode_mask {:#o} has bits outside {:#o}",
                self.compare.mode_mask, MODE_MASK
            )));
        }
        Ok(())
    }
}
