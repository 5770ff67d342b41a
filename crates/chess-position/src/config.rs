//! Game rule configuration.
//!
//! Loaded from TOML; every key is optional and falls back to the FIDE
//! defaults.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur when loading a [`GameConfig`].
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {0}")]
    Read(#[from] std::io::Error),
    /// Failed to parse the configuration file as valid TOML.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Draw thresholds and the illegal-move policy of a [`Game`](crate::Game).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct GameConfig {
    /// Occurrences of the same position that draw the game.
    pub repetition_limit: u32,
    /// Half-moves without capture or pawn move that draw the game.
    pub fifty_move_limit: u32,
    /// End the game as soon as a repetition or fifty-move draw is
    /// available. When false the draw has to be claimed.
    pub auto_draw: bool,
    /// An attempted illegal move loses the game for the side that tried it.
    /// The move is never recorded either way.
    pub illegal_move_forfeits: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            repetition_limit: 3,
            fifty_move_limit: 100,
            auto_draw: true,
            illegal_move_forfeits: false,
        }
    }
}

impl GameConfig {
    /// Parses a configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Loads a configuration file, or the defaults when `path` does not
    /// exist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] if the file exists but cannot be read,
    /// or [`ConfigError::Parse`] if it contains invalid TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no game config found, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!(path = %path.display(), ?config, "loaded game config");
        Ok(config)
    }
}
