mod commands;

use clap::{Parser, Subcommand};
use cryptoflip_game::GameError;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "cryptoflip")]
#[command(about = "Coin flip betting demo with TON top-ups")]
#[command(version)]
struct Cli {
    /// Data directory for local state
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Stake coins on a side and flip
    Flip {
        /// Side to bet on (heads or tails)
        side: String,
        /// Stake in coins
        amount: u64,
    },
    /// Show the coin balance
    Balance,
    /// Show recent game history
    History,
    /// Show aggregate win/loss stats
    Stats,
    /// Top-up the balance from a TON deposit
    #[command(subcommand)]
    Topup(commands::TopupCommands),
    /// Wipe all local state
    Reset {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(format!(
            "cryptoflip={level},cryptoflip_core={level},cryptoflip_game={level}",
            level = log_level
        )))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Get data directory
    let data_dir = cli.data_dir.unwrap_or_else(|| {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("cryptoflip")
    });

    // Ensure data directory exists
    tokio::fs::create_dir_all(&data_dir).await?;

    let ctx = commands::GameContext::open(&data_dir).await?;

    // Execute command
    let result = match cli.command {
        Commands::Flip { side, amount } => commands::game::flip(&ctx, &side, amount).await,
        Commands::Balance => commands::game::balance(&ctx).await,
        Commands::History => commands::game::history(&ctx).await,
        Commands::Stats => commands::game::stats(&ctx).await,
        Commands::Topup(cmd) => commands::topup::handle_topup_command(cmd, &ctx).await,
        Commands::Reset { yes } => commands::reset(&ctx, yes).await,
    };

    if let Err(e) = result {
        match e.downcast_ref::<GameError>() {
            Some(GameError::InsufficientBalance { need, available }) => {
                eprintln!("Error: Insufficient balance");
                eprintln!("Need: {} coins, Available: {} coins", need, available);
                eprintln!("Use 'cryptoflip topup request' to add coins");
            }
            Some(GameError::FlipInProgress) => {
                eprintln!("Error: A flip is already in progress");
            }
            _ => {
                eprintln!("Error: {}", e);
            }
        }
        std::process::exit(1);
    }

    Ok(())
}
