use crate::commands::GameContext;
use anyhow::{anyhow, Result};
use clap::Subcommand;
use cryptoflip_core::storage::keys;
use cryptoflip_core::types::{format_ton, parse_ton};
use cryptoflip_core::{ExplorerClient, TopupRequest, TopupWatcher};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Subcommand)]
pub enum TopupCommands {
    /// Request a top-up: prints the payment link to open in a wallet
    Request {
        /// Amount in TON (e.g. 1.5)
        amount: String,
        /// Payout tag to attach as the transfer memo (generated if omitted)
        #[arg(short, long)]
        tag: Option<String>,
    },
    /// Watch the deposit address and credit matching transfers
    Watch,
    /// Run a single poll against the explorer
    Check,
    /// Show the registered tag and last seen transaction marker
    Status,
}

pub async fn handle_topup_command(cmd: TopupCommands, ctx: &GameContext) -> Result<()> {
    match cmd {
        TopupCommands::Request { amount, tag } => {
            let nanotons = parse_ton(&amount)?;
            let tag = match tag {
                Some(tag) => tag,
                None => Uuid::new_v4().to_string()[..8].to_string(),
            };

            let request = TopupRequest::new(&tag, nanotons)?;
            ctx.account.lock().await.register_tag(&request.tag).await?;

            println!("Send exactly {} TON using this link:", format_ton(nanotons));
            println!("  {}", request.payment_uri(&ctx.config.deposit_address));
            println!();
            println!("The transfer memo must be: {}", request.tag);
            println!("Then run 'cryptoflip topup watch' to detect the payment.");
        }

        TopupCommands::Watch => {
            let watcher = build_watcher(ctx).await?;
            let handle = watcher.spawn(ctx.config.poll_interval());

            println!(
                "Watching {} for transfers (poll every {}s, Ctrl-C to stop)...",
                ctx.config.deposit_address, ctx.config.poll_interval_secs
            );
            tokio::signal::ctrl_c().await?;
            handle.stop().await;

            println!();
            println!("Balance: {} coins", ctx.account.lock().await.balance());
        }

        TopupCommands::Check => {
            let watcher = build_watcher(ctx).await?;
            let credits = watcher.poll_once().await?;

            if credits.is_empty() {
                println!("No new transfers found.");
            } else {
                for credit in &credits {
                    println!("Credited {} coins (transaction lt={})", credit.coins, credit.lt);
                }
            }
            println!("Balance: {} coins", ctx.account.lock().await.balance());
        }

        TopupCommands::Status => {
            let account = ctx.account.lock().await;
            match account.payout_tag() {
                Some(tag) => println!("Payout tag: {}", tag),
                None => println!("Payout tag: not registered"),
            }

            let marker = ctx.store.get(keys::LAST_SEEN_LT).await?;
            println!(
                "Last seen transaction: {}",
                marker.as_deref().unwrap_or("none")
            );
            println!("Deposit address: {}", ctx.config.deposit_address);
            println!(
                "Conversion rate: {} coins per TON",
                ctx.config.conversion_rate
            );
        }
    }

    Ok(())
}

async fn build_watcher(ctx: &GameContext) -> Result<TopupWatcher> {
    let tag = ctx
        .account
        .lock()
        .await
        .payout_tag()
        .map(str::to_string)
        .ok_or_else(|| {
            anyhow!("No payout tag registered. Run 'cryptoflip topup request' first")
        })?;

    let client = Arc::new(ExplorerClient::new(
        &ctx.config.explorer_url,
        &ctx.config.deposit_address,
    ));

    Ok(TopupWatcher::new(
        ctx.account.clone(),
        client,
        ctx.store.clone(),
        tag,
        ctx.config.conversion_rate,
        ctx.config.tx_fetch_limit,
    ))
}
