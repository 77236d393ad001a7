use crate::error::{GameError, Result};
use crate::history::{GameResult, GameStats, History};
use crate::outcome::{CoinSide, OutcomeSource};
use chrono::Utc;
use cryptoflip_core::storage::{keys, StateStore};
use cryptoflip_core::{Config, PlayerAccount};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// A stake that has been debited but not yet settled.
#[derive(Debug, Clone, Copy)]
pub struct PendingFlip {
    pub side: CoinSide,
    pub amount: u64,
}

/// The settlement core: debit the stake up front, flip after the configured
/// delay, pay 2x on a win, and record every flip in the bounded history.
///
/// The account is shared with the top-up watcher behind an async mutex, so
/// concurrent credits serialize against the flip's debit and payout.
pub struct CoinFlipGame {
    account: Arc<Mutex<PlayerAccount>>,
    store: Arc<dyn StateStore>,
    history: History,
    in_flight: bool,
    flip_delay: Duration,
    min_bet: u64,
    max_bet: u64,
}

impl CoinFlipGame {
    /// Bind the shared account and load persisted history.
    pub async fn open(
        account: Arc<Mutex<PlayerAccount>>,
        store: Arc<dyn StateStore>,
        config: &Config,
    ) -> Result<Self> {
        let history = match store.get(keys::HISTORY).await.map_err(GameError::Core)? {
            Some(raw) => serde_json::from_str(&raw)?,
            None => History::default(),
        };

        Ok(Self {
            account,
            store,
            history,
            in_flight: false,
            flip_delay: config.flip_delay(),
            min_bet: config.min_bet,
            max_bet: config.max_bet,
        })
    }

    /// Clamp a requested stake to the playable range for the current
    /// balance. A balance below the minimum still yields the minimum; the
    /// flip itself then rejects on insufficient funds.
    pub async fn clamp_bet(&self, amount: u64) -> u64 {
        let balance = self.account.lock().await.balance();
        let ceiling = self.max_bet.min(balance);
        if ceiling < self.min_bet {
            self.min_bet
        } else {
            amount.clamp(self.min_bet, ceiling)
        }
    }

    /// Validate and debit the stake; the flip is now in flight.
    pub async fn begin(&mut self, side: CoinSide, amount: u64) -> Result<PendingFlip> {
        if self.in_flight {
            return Err(GameError::FlipInProgress);
        }
        if amount == 0 {
            return Err(GameError::InvalidBet("Stake must be positive".to_string()));
        }

        let mut account = self.account.lock().await;
        let available = account.balance();
        if amount > available {
            return Err(GameError::InsufficientBalance {
                need: amount,
                available,
            });
        }
        account.withdraw(amount).await?;
        drop(account);

        self.in_flight = true;
        tracing::debug!("Flip started: {} coins on {}", amount, side);

        Ok(PendingFlip { side, amount })
    }

    /// Apply an outcome to an in-flight flip: credit 2x the stake on a win,
    /// record the result win or lose, clear the in-flight flag.
    pub async fn settle(&mut self, pending: PendingFlip, outcome: CoinSide) -> Result<GameResult> {
        let won = outcome == pending.side;
        if won {
            self.account
                .lock()
                .await
                .deposit(pending.amount * 2)
                .await?;
        }

        let result = GameResult {
            bet: pending.side,
            result: outcome,
            won,
            amount: pending.amount,
            played_at: Utc::now(),
        };
        self.history.push(result.clone());
        self.mirror_history().await?;
        self.in_flight = false;

        tracing::info!(
            "Flip settled: bet {} on {}, landed {} ({})",
            pending.amount,
            pending.side,
            outcome,
            if won { "won" } else { "lost" }
        );

        Ok(result)
    }

    /// Full flip: debit, wait out the flip delay, draw an outcome, settle.
    /// There is no cancellation path; the delay always completes.
    pub async fn flip(
        &mut self,
        side: CoinSide,
        amount: u64,
        source: &mut dyn OutcomeSource,
    ) -> Result<GameResult> {
        let pending = self.begin(side, amount).await?;
        tokio::time::sleep(self.flip_delay).await;
        let outcome = source.next_side();
        self.settle(pending, outcome).await
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn stats(&self) -> GameStats {
        self.history.stats()
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    pub async fn balance(&self) -> u64 {
        self.account.lock().await.balance()
    }

    async fn mirror_history(&self) -> Result<()> {
        let raw = serde_json::to_string(&self.history)?;
        self.store
            .put(keys::HISTORY, &raw)
            .await
            .map_err(GameError::Core)
    }
}
