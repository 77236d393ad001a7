use cryptoflip_core::{Config, PlayerAccount, SqliteStore, StateStore, TopupRequest};
use std::sync::Arc;
use tempfile::tempdir;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    // Create temp dir
    let temp_dir = tempdir()?;
    println!("Using temporary directory: {:?}", temp_dir.path());

    let config = Config::default();
    let store: Arc<dyn StateStore> =
        Arc::new(SqliteStore::open(&temp_dir.path().join("cryptoflip.db")).await?);

    println!("Opening account...");
    let mut account = PlayerAccount::open(store, &config).await?;
    println!("Balance after welcome bonus: {} coins", account.balance());

    // Simulate a round of betting
    account.withdraw(100).await?;
    println!("After staking 100 coins: {} coins", account.balance());
    account.deposit(200).await?;
    println!("After a winning payout: {} coins", account.balance());

    // Build a top-up payment link
    account.register_tag("demo-tag").await?;
    let request = TopupRequest::new("demo-tag", 1_500_000_000)?;
    println!("\nTop-up link for 1.5 TON:");
    println!("{}", request.payment_uri(&config.deposit_address));

    println!("\nExample completed successfully!");

    Ok(())
}
