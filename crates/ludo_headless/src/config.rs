//! Engine configuration loaded from RON files.
//!
//! ```ron
//! (
//!     strategy: best_permutation,
//!     record_path: Some("match.bin"),
//!     dump_on_error: Some("crash_state.txt"),
//!     snapshots: true,
//! )
//! ```
//!
//! Every field is optional. Command-line flags take precedence over file
//! values.

use std::path::Path;

use ludo_core::strategy::DiceStrategy;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// File not found.
    #[error("Config file not found: {0}")]
    FileNotFound(String),
    /// Failed to read file.
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse RON.
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] ron::error::SpannedError),
}

/// Runtime options for a match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// How multi-die rolls are consumed.
    pub strategy: DiceStrategy,
    /// Save a match record here when the match ends.
    pub record_path: Option<String>,
    /// Write the board dump here on a fatal error.
    pub dump_on_error: Option<String>,
    /// Log a snapshot of the board after every applied batch.
    pub snapshots: bool,
}

impl EngineConfig {
    /// Load a configuration from a RON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }
        let contents = std::fs::read_to_string(path)?;
        Self::from_ron_str(&contents)
    }

    /// Load from a RON string.
    pub fn from_ron_str(ron: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = ron::from_str(ron)?;
        Ok(config)
    }

    /// Apply command-line overrides. Unset flags keep the file values.
    pub fn apply_overrides(
        &mut self,
        strategy: Option<DiceStrategy>,
        record_path: Option<String>,
        snapshots: bool,
    ) {
        if let Some(strategy) = strategy {
            self.strategy = strategy;
        }
        if record_path.is_some() {
            self.record_path = record_path;
        }
        self.snapshots |= snapshots;
    }
}
