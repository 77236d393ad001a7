use crate::error::{CryptoflipError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the blockchain explorer read API.
    pub explorer_url: String,
    /// Deposit address all top-ups are sent to.
    pub deposit_address: String,
    /// Coins credited per whole TON transferred.
    pub conversion_rate: u64,
    pub poll_interval_secs: u64,
    /// How many recent transactions each poll fetches.
    pub tx_fetch_limit: usize,
    pub flip_delay_ms: u64,
    pub min_bet: u64,
    pub max_bet: u64,
    /// One-time starting balance granted on first run.
    pub welcome_bonus: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            explorer_url: "https://toncenter.com/api/v2".to_string(),
            deposit_address: "UQBGhqLAZseEqRXz4ByFPTGV7SVMlI4hrbs-Sps_Xzx01x8G".to_string(),
            conversion_rate: 1000,
            poll_interval_secs: 10,
            tx_fetch_limit: 20,
            flip_delay_ms: 2000,
            min_bet: 10,
            max_bet: 500,
            welcome_bonus: 1000,
        }
    }
}

impl Config {
    /// Load `config.json` from the data directory, falling back to defaults
    /// when the file does not exist.
    pub fn load(data_dir: &Path) -> Result<Self> {
        let path = data_dir.join("config.json");
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(&path)?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.explorer_url.is_empty() {
            return Err(CryptoflipError::config("Explorer URL cannot be empty"));
        }

        if self.deposit_address.is_empty() {
            return Err(CryptoflipError::config("Deposit address cannot be empty"));
        }

        if self.conversion_rate == 0 {
            return Err(CryptoflipError::config(
                "Conversion rate must be greater than 0",
            ));
        }

        if self.min_bet == 0 || self.min_bet > self.max_bet {
            return Err(CryptoflipError::config(
                "Bet range must satisfy 0 < min_bet <= max_bet",
            ));
        }

        Ok(())
    }

    pub fn flip_delay(&self) -> Duration {
        Duration::from_millis(self.flip_delay_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}
