//! Coin flip betting rules for Cryptoflip.
//!
//! The player stakes coins on heads or tails; the stake is debited up
//! front, the flip resolves after a fixed delay, and a win pays double the
//! stake. Outcomes come from an injected source so tests can force results.

pub mod error;
pub mod game;
pub mod history;
pub mod outcome;

pub use error::{GameError, Result};
pub use game::{CoinFlipGame, PendingFlip};
pub use history::{GameResult, GameStats, History, HISTORY_CAP};
pub use outcome::{CoinSide, OutcomeSource, RandomOutcome, ScriptedOutcome};
