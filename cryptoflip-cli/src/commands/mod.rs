pub mod game;
pub mod topup;

pub use topup::TopupCommands;

use anyhow::Result;
use cryptoflip_core::{Config, PlayerAccount, SqliteStore, StateStore};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Shared state every command operates on: config, store, and the account
/// the game and the top-up watcher both mutate.
pub struct GameContext {
    pub config: Config,
    pub store: Arc<dyn StateStore>,
    pub account: Arc<Mutex<PlayerAccount>>,
}

impl GameContext {
    pub async fn open(data_dir: &Path) -> Result<Self> {
        let config = Config::load(data_dir)?;
        let store: Arc<dyn StateStore> =
            Arc::new(SqliteStore::open(&data_dir.join("cryptoflip.db")).await?);
        let account = Arc::new(Mutex::new(
            PlayerAccount::open(store.clone(), &config).await?,
        ));

        Ok(Self {
            config,
            store,
            account,
        })
    }
}

pub async fn reset(ctx: &GameContext, yes: bool) -> Result<()> {
    if !yes {
        let confirmed = dialoguer::Confirm::new()
            .with_prompt("Wipe balance, history, and top-up state?")
            .default(false)
            .interact()?;
        if !confirmed {
            println!("Aborted.");
            return Ok(());
        }
    }

    ctx.store.clear().await?;
    println!("Local state cleared. The welcome bonus is granted again on the next run.");
    Ok(())
}
