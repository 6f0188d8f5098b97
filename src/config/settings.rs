use crate::error::{BlockchainError, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

// Environment overrides, applied on top of defaults or a loaded file
const DIFFICULTY_ENV: &str = "QS_DIFFICULTY";
const MINING_REWARD_ENV: &str = "QS_MINING_REWARD";
const ANOMALY_THRESHOLD_ENV: &str = "QS_ANOMALY_THRESHOLD";
const HISTORY_WINDOW_ENV: &str = "QS_HISTORY_WINDOW";

/// Per-chain configuration, passed explicitly into chain construction so
/// multiple independent chains can coexist in one process.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainConfig {
    /// Required leading zero hex digits of every block hash
    pub difficulty: u32,
    /// Coinbase reward credited to the miner of each block
    pub mining_reward: f64,
    /// Admission gate: reject transactions whose anomaly score exceeds this
    pub anomaly_threshold: f64,
    /// How many recent transactions the scorer sees as history
    pub history_window: usize,
}

impl Default for ChainConfig {
    fn default() -> Self {
        ChainConfig {
            difficulty: 4,
            mining_reward: 10.0,
            anomaly_threshold: 0.75,
            history_window: 100,
        }
    }
}

impl ChainConfig {
    /// Defaults overridden by any QS_* environment variables present.
    pub fn from_env() -> Result<ChainConfig> {
        let mut config = ChainConfig::default();
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file, then apply environment overrides.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<ChainConfig> {
        let contents = fs::read_to_string(path.as_ref())?;
        let mut config: ChainConfig = toml::from_str(&contents)
            .map_err(|e| BlockchainError::Config(format!("Failed to parse config file: {e}")))?;
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(value) = env::var(DIFFICULTY_ENV) {
            self.difficulty = parse_env(DIFFICULTY_ENV, &value)?;
        }
        if let Ok(value) = env::var(MINING_REWARD_ENV) {
            self.mining_reward = parse_env(MINING_REWARD_ENV, &value)?;
        }
        if let Ok(value) = env::var(ANOMALY_THRESHOLD_ENV) {
            self.anomaly_threshold = parse_env(ANOMALY_THRESHOLD_ENV, &value)?;
        }
        if let Ok(value) = env::var(HISTORY_WINDOW_ENV) {
            self.history_window = parse_env(HISTORY_WINDOW_ENV, &value)?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        // A 256-bit hash has 64 hex digits, so that's the difficulty ceiling
        if self.difficulty > 64 {
            return Err(BlockchainError::Config(format!(
                "Difficulty {} exceeds maximum of 64 hex digits",
                self.difficulty
            )));
        }
        if self.mining_reward <= 0.0 {
            return Err(BlockchainError::Config(format!(
                "Mining reward must be positive, got {}",
                self.mining_reward
            )));
        }
        if !(0.0..=1.0).contains(&self.anomaly_threshold) {
            return Err(BlockchainError::Config(format!(
                "Anomaly threshold must be in [0, 1], got {}",
                self.anomaly_threshold
            )));
        }
        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| BlockchainError::Config(format!("Invalid value for {key}: {value}")))
}
