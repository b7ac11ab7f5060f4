//! Game options
//!
//! Options are plain data with serde defaults so a host page can pass a JSON
//! blob (or nothing) and get a playable game.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{DEFAULT_COUNTDOWN_MS, DEFAULT_HOP_COUNT, DEFAULT_MIN_PLAYERS};
use crate::sim::RoundRules;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Countdown must be a positive number of milliseconds, got {0}")]
    InvalidCountdown(f64),

    #[error("At least one player is required, got min_players = {0}")]
    InvalidMinPlayers(usize),

    #[error("Could not parse options: {0}")]
    Parse(#[from] serde_json::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GameOptions {
    pub countdown_ms: f64,
    pub min_players: usize,
    /// Fixed RNG seed; the clock is used when absent
    pub seed: Option<u64>,
}

impl Default for GameOptions {
    fn default() -> Self {
        Self {
            countdown_ms: DEFAULT_COUNTDOWN_MS,
            min_players: DEFAULT_MIN_PLAYERS,
            seed: None,
        }
    }
}

impl GameOptions {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(self) -> ConfigResult<Self> {
        if !self.countdown_ms.is_finite() || self.countdown_ms <= 0.0 {
            return Err(ConfigError::InvalidCountdown(self.countdown_ms));
        }
        if self.min_players < 1 {
            return Err(ConfigError::InvalidMinPlayers(self.min_players));
        }
        Ok(self)
    }

    /// Parse and validate options from JSON. Missing fields take defaults.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let options: GameOptions = serde_json::from_str(json)?;
        options.validate()
    }

    pub fn rules(&self) -> RoundRules {
        RoundRules {
            countdown_ms: self.countdown_ms,
            min_players: self.min_players,
            hop_count: DEFAULT_HOP_COUNT,
        }
    }
}
