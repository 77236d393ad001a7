use crate::commands::GameContext;
use anyhow::Result;
use comfy_table::{presets::UTF8_FULL, Table};
use cryptoflip_game::{CoinFlipGame, CoinSide, RandomOutcome};

pub async fn flip(ctx: &GameContext, side: &str, amount: u64) -> Result<()> {
    let side: CoinSide = side.parse()?;
    let mut game = CoinFlipGame::open(ctx.account.clone(), ctx.store.clone(), &ctx.config).await?;

    let stake = game.clamp_bet(amount).await;
    if stake != amount {
        println!(
            "Stake adjusted to {} coins (allowed range {}-{}, limited by balance)",
            stake, ctx.config.min_bet, ctx.config.max_bet
        );
    }

    println!("Flipping: {} coins on {}...", stake, side);

    let mut source = RandomOutcome;
    let result = game.flip(side, stake, &mut source).await?;

    if result.won {
        println!("The coin landed {}. You win +{} coins!", result.result, stake * 2);
    } else {
        println!("The coin landed {}. You lose {} coins.", result.result, stake);
    }
    println!("Balance: {} coins", game.balance().await);

    Ok(())
}

pub async fn balance(ctx: &GameContext) -> Result<()> {
    let account = ctx.account.lock().await;

    println!("Balance: {} coins", account.balance());
    match account.payout_tag() {
        Some(tag) => println!("Payout tag: {}", tag),
        None => println!("Payout tag: not registered"),
    }

    Ok(())
}

pub async fn history(ctx: &GameContext) -> Result<()> {
    let game = CoinFlipGame::open(ctx.account.clone(), ctx.store.clone(), &ctx.config).await?;

    if game.history().is_empty() {
        println!("No games played yet. Place your first bet!");
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Time", "Bet", "Result", "Outcome", "Coins"]);

    for entry in game.history().entries() {
        let coins = if entry.won {
            format!("+{}", entry.amount * 2)
        } else {
            format!("-{}", entry.amount)
        };

        table.add_row(vec![
            entry.played_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            entry.bet.to_string(),
            entry.result.to_string(),
            (if entry.won { "won" } else { "lost" }).to_string(),
            coins,
        ]);
    }

    println!("{}", table);
    Ok(())
}

pub async fn stats(ctx: &GameContext) -> Result<()> {
    let game = CoinFlipGame::open(ctx.account.clone(), ctx.store.clone(), &ctx.config).await?;
    let stats = game.stats();

    println!("Games played: {}", stats.played);
    println!("Wins: {}", stats.wins);
    println!("Losses: {}", stats.losses);
    println!("Balance: {} coins", game.balance().await);

    Ok(())
}
