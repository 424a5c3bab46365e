//! Exploration parameters, loadable from TOML.
//!
//! ```toml
//! exploration_size = 15
//! exploration_depth = 4
//! exploration_sample = 150
//! choice_exploration = 3
//! seed = 7
//! ```
//!
//! Every key is optional and falls back to the value shown (no seed).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sandbox::RolloutDepth;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("exploration_sample must be even, got {0}")]
    OddSampleCount(usize),

    #[error("exploration_sample must be at least 2")]
    ZeroSampleCount,

    #[error("exploration_size must be at least 1")]
    ZeroPoolSize,

    #[error("cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorationConfig {
    /// Candidates taken from the heuristic ranking.
    pub exploration_size: usize,
    /// Plies simulated after each candidate; negative plays to the end.
    pub exploration_depth: i32,
    /// Rollouts per candidate. Must be even.
    pub exploration_sample: usize,
    /// `top_n` handed to agents inside rollouts.
    pub choice_exploration: i32,
    /// Fixed seed for reproducible rollouts; entropy when absent.
    pub seed: Option<u64>,
}

impl Default for ExplorationConfig {
    fn default() -> Self {
        Self {
            exploration_size: 15,
            exploration_depth: 4,
            exploration_sample: 150,
            choice_exploration: 3,
            seed: None,
        }
    }
}

impl ExplorationConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: ExplorationConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.exploration_size == 0 {
            return Err(ConfigError::ZeroPoolSize);
        }
        if self.exploration_sample == 0 {
            return Err(ConfigError::ZeroSampleCount);
        }
        if self.exploration_sample % 2 != 0 {
            return Err(ConfigError::OddSampleCount(self.exploration_sample));
        }
        Ok(())
    }

    pub fn rollout_depth(&self) -> RolloutDepth {
        if self.exploration_depth < 0 {
            RolloutDepth::Unlimited
        } else {
            RolloutDepth::Plies(self.exploration_depth as u32)
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
