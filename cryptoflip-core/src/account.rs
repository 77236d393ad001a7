use crate::config::Config;
use crate::error::{CryptoflipError, Result};
use crate::storage::{keys, StateStore};
use std::sync::Arc;

/// In-memory player state, write-through mirrored to the injected store.
///
/// The balance held here is the source of truth; the store is overwritten
/// after every mutation so a restart picks up where the last run left off.
pub struct PlayerAccount {
    store: Arc<dyn StateStore>,
    balance: u64,
    payout_tag: Option<String>,
}

impl PlayerAccount {
    /// Load persisted state, granting the one-time welcome bonus on first run.
    pub async fn open(store: Arc<dyn StateStore>, config: &Config) -> Result<Self> {
        let balance = match store.get(keys::BALANCE).await? {
            Some(raw) => raw.parse::<u64>().map_err(|e| {
                CryptoflipError::internal(format!("Corrupt balance entry: {}", e))
            })?,
            None => 0,
        };
        let payout_tag = store.get(keys::PAYOUT_TAG).await?;

        let mut account = Self {
            store,
            balance,
            payout_tag,
        };

        if account.store.get(keys::WELCOME_BONUS).await?.is_none() {
            account.balance += config.welcome_bonus;
            account.store.put(keys::WELCOME_BONUS, "granted").await?;
            account.mirror_balance().await?;
            tracing::info!("Granted welcome bonus of {} coins", config.welcome_bonus);
        }

        Ok(account)
    }

    pub fn balance(&self) -> u64 {
        self.balance
    }

    pub fn payout_tag(&self) -> Option<&str> {
        self.payout_tag.as_deref()
    }

    pub async fn deposit(&mut self, amount: u64) -> Result<u64> {
        self.balance += amount;
        self.mirror_balance().await?;
        Ok(self.balance)
    }

    pub async fn withdraw(&mut self, amount: u64) -> Result<u64> {
        if amount > self.balance {
            return Err(CryptoflipError::InsufficientFunds {
                need: amount,
                available: self.balance,
            });
        }

        self.balance -= amount;
        self.mirror_balance().await?;
        Ok(self.balance)
    }

    /// Register the memo identifier inbound transfers are matched against.
    pub async fn register_tag(&mut self, tag: &str) -> Result<()> {
        let tag = tag.trim();
        if tag.is_empty() {
            return Err(CryptoflipError::invalid_topup(
                "Payout tag must not be empty",
            ));
        }

        self.payout_tag = Some(tag.to_string());
        self.store.put(keys::PAYOUT_TAG, tag).await?;

        tracing::info!("Registered payout tag '{}'", tag);
        Ok(())
    }

    async fn mirror_balance(&self) -> Result<()> {
        self.store
            .put(keys::BALANCE, &self.balance.to_string())
            .await
    }
}
