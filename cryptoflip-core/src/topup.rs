use crate::account::PlayerAccount;
use crate::error::{CryptoflipError, Result};
use crate::explorer::TransactionFeed;
use crate::storage::{keys, StateStore};
use crate::types::{coins_for_nanotons, Credit};
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;

/// A validated top-up request: payout tag plus requested amount.
///
/// Validation happens here, before any network traffic, so an empty tag or
/// zero amount never reaches the explorer.
#[derive(Debug, Clone)]
pub struct TopupRequest {
    pub tag: String,
    pub nanotons: u64,
}

impl TopupRequest {
    pub fn new(tag: &str, nanotons: u64) -> Result<Self> {
        let tag = tag.trim();
        if tag.is_empty() {
            return Err(CryptoflipError::invalid_topup(
                "Payout tag must not be empty",
            ));
        }
        if nanotons == 0 {
            return Err(CryptoflipError::invalid_topup(
                "Top-up amount must be positive",
            ));
        }

        Ok(Self {
            tag: tag.to_string(),
            nanotons,
        })
    }

    /// Deep link opened in an external wallet application.
    pub fn payment_uri(&self, deposit_address: &str) -> String {
        format!(
            "ton://transfer/{}?amount={}&text={}",
            deposit_address, self.nanotons, self.tag
        )
    }
}

/// Polls the explorer for inbound transfers carrying the registered payout
/// tag and credits the shared account for each one exactly once.
///
/// The last credited transaction sequence is persisted under
/// `last_seen_lt`, so a restarted watcher never double-credits a transfer
/// it already saw. Transfers that fall out of the fetched window while
/// nothing is polling are missed permanently.
pub struct TopupWatcher {
    account: Arc<Mutex<PlayerAccount>>,
    feed: Arc<dyn TransactionFeed>,
    store: Arc<dyn StateStore>,
    tag: String,
    rate: u64,
    fetch_limit: usize,
}

impl TopupWatcher {
    pub fn new(
        account: Arc<Mutex<PlayerAccount>>,
        feed: Arc<dyn TransactionFeed>,
        store: Arc<dyn StateStore>,
        tag: impl Into<String>,
        rate: u64,
        fetch_limit: usize,
    ) -> Self {
        Self {
            account,
            feed,
            store,
            tag: tag.into(),
            rate,
            fetch_limit,
        }
    }

    /// Run a single poll. Returns the credits applied this round.
    pub async fn poll_once(&self) -> Result<Vec<Credit>> {
        let marker = self.last_seen_lt().await?;
        let transactions = self.feed.recent_transactions(self.fetch_limit).await?;

        let mut credits = Vec::new();
        let mut newest = marker;

        for tx in transactions {
            if tx.lt <= marker || tx.message != self.tag {
                continue;
            }

            let coins = coins_for_nanotons(tx.value, self.rate);
            self.account.lock().await.deposit(coins).await?;

            newest = newest.max(tx.lt);
            self.store
                .put(keys::LAST_SEEN_LT, &newest.to_string())
                .await?;

            tracing::info!(
                "Credited {} coins for inbound transfer (lt={})",
                coins,
                tx.lt
            );
            credits.push(Credit {
                coins,
                lt: tx.lt,
                credited_at: Utc::now(),
            });
        }

        Ok(credits)
    }

    /// Spawn the periodic poll loop. Poll failures are logged and swallowed;
    /// the next tick retries unconditionally. Runs until the handle is
    /// stopped.
    pub fn spawn(self, interval: Duration) -> TopupHandle {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        if let Err(e) = self.poll_once().await {
                            tracing::warn!("Top-up poll failed: {}", e);
                        }
                    }
                    _ = shutdown_rx.changed() => {
                        tracing::debug!("Top-up watcher stopped");
                        break;
                    }
                }
            }
        });

        TopupHandle {
            shutdown: shutdown_tx,
            task,
        }
    }

    async fn last_seen_lt(&self) -> Result<u64> {
        match self.store.get(keys::LAST_SEEN_LT).await? {
            Some(raw) => raw.parse::<u64>().map_err(|e| {
                CryptoflipError::internal(format!("Corrupt sequence marker: {}", e))
            }),
            None => Ok(0),
        }
    }
}

/// Handle to a running watcher. Dropping it does NOT stop the poll loop;
/// cancellation is the explicit `stop` call.
pub struct TopupHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl TopupHandle {
    pub async fn stop(self) {
        let _ = self.shutdown.send(true);
        let _ = self.task.await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::storage::MemoryStore;
    use crate::types::TxRecord;
    use parking_lot::Mutex as SyncMutex;

    struct StaticFeed {
        transactions: SyncMutex<Vec<TxRecord>>,
    }

    impl StaticFeed {
        fn new(transactions: Vec<TxRecord>) -> Self {
            Self {
                transactions: SyncMutex::new(transactions),
            }
        }
    }

    #[async_trait::async_trait]
    impl TransactionFeed for StaticFeed {
        async fn recent_transactions(&self, _limit: usize) -> Result<Vec<TxRecord>> {
            Ok(self.transactions.lock().clone())
        }
    }

    async fn watcher_with(
        transactions: Vec<TxRecord>,
    ) -> (TopupWatcher, Arc<Mutex<PlayerAccount>>) {
        let config = Config {
            welcome_bonus: 0,
            ..Config::default()
        };
        let store: Arc<dyn StateStore> = Arc::new(MemoryStore::new());
        let account = Arc::new(Mutex::new(
            PlayerAccount::open(store.clone(), &config).await.unwrap(),
        ));
        let watcher = TopupWatcher::new(
            account.clone(),
            Arc::new(StaticFeed::new(transactions)),
            store,
            "flip-42",
            1000,
            20,
        );
        (watcher, account)
    }

    fn transfer(lt: u64, value: u64, message: &str) -> TxRecord {
        TxRecord {
            lt,
            value,
            message: message.to_string(),
        }
    }

    #[tokio::test]
    async fn credits_matching_transfer_exactly_once() {
        let (watcher, account) =
            watcher_with(vec![transfer(100, 1_500_000_000, "flip-42")]).await;

        let credits = watcher.poll_once().await.unwrap();
        assert_eq!(credits.len(), 1);
        assert_eq!(credits[0].coins, 1500);
        assert_eq!(credits[0].lt, 100);
        assert_eq!(account.lock().await.balance(), 1500);

        // A second poll over identical data is a no-op.
        let credits = watcher.poll_once().await.unwrap();
        assert!(credits.is_empty());
        assert_eq!(account.lock().await.balance(), 1500);
    }

    #[tokio::test]
    async fn ignores_foreign_memos_and_old_sequences() {
        let (watcher, account) = watcher_with(vec![
            transfer(300, 2_000_000_000, "someone-else"),
            transfer(200, 1_000_000_000, "flip-42"),
        ])
        .await;

        let credits = watcher.poll_once().await.unwrap();
        assert_eq!(credits.len(), 1);
        assert_eq!(account.lock().await.balance(), 1000);

        // Anything at or below the stored marker stays ignored.
        let credits = watcher.poll_once().await.unwrap();
        assert!(credits.is_empty());
    }

    #[tokio::test]
    async fn credits_multiple_new_transfers_in_one_poll() {
        let (watcher, account) = watcher_with(vec![
            transfer(202, 500_000_000, "flip-42"),
            transfer(201, 1_000_000_000, "flip-42"),
        ])
        .await;

        let credits = watcher.poll_once().await.unwrap();
        assert_eq!(credits.len(), 2);
        assert_eq!(account.lock().await.balance(), 1500);
    }

    #[tokio::test]
    async fn marker_survives_watcher_restart() {
        let config = Config {
            welcome_bonus: 0,
            ..Config::default()
        };
        let store: Arc<dyn StateStore> = Arc::new(MemoryStore::new());
        let account = Arc::new(Mutex::new(
            PlayerAccount::open(store.clone(), &config).await.unwrap(),
        ));
        let transactions = vec![transfer(100, 1_000_000_000, "flip-42")];

        let watcher = TopupWatcher::new(
            account.clone(),
            Arc::new(StaticFeed::new(transactions.clone())),
            store.clone(),
            "flip-42",
            1000,
            20,
        );
        watcher.poll_once().await.unwrap();
        drop(watcher);

        let watcher = TopupWatcher::new(
            account.clone(),
            Arc::new(StaticFeed::new(transactions)),
            store,
            "flip-42",
            1000,
            20,
        );
        let credits = watcher.poll_once().await.unwrap();
        assert!(credits.is_empty());
        assert_eq!(account.lock().await.balance(), 1000);
    }

    #[tokio::test]
    async fn spawned_watcher_stops_on_request() {
        let (watcher, account) = watcher_with(vec![transfer(100, 1_000_000_000, "flip-42")]).await;

        let handle = watcher.spawn(Duration::from_millis(10));
        // The first interval tick fires immediately.
        tokio::time::sleep(Duration::from_millis(50)).await;
        handle.stop().await;

        assert_eq!(account.lock().await.balance(), 1000);
    }

    #[test]
    fn request_validation_happens_before_any_network_call() {
        assert!(TopupRequest::new("", 1_000_000_000).is_err());
        assert!(TopupRequest::new("   ", 1_000_000_000).is_err());
        assert!(TopupRequest::new("flip-42", 0).is_err());
        assert!(TopupRequest::new("flip-42", 1).is_ok());
    }

    #[test]
    fn payment_uri_embeds_address_amount_and_memo() {
        let request = TopupRequest::new("flip-42", 1_500_000_000).unwrap();
        assert_eq!(
            request.payment_uri("UQDEMO"),
            "ton://transfer/UQDEMO?amount=1500000000&text=flip-42"
        );
    }
}
