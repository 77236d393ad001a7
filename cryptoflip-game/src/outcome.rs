use crate::error::GameError;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The two mutually exclusive flip outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoinSide {
    Heads,
    Tails,
}

impl CoinSide {
    pub fn other(self) -> Self {
        match self {
            CoinSide::Heads => CoinSide::Tails,
            CoinSide::Tails => CoinSide::Heads,
        }
    }
}

impl fmt::Display for CoinSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoinSide::Heads => write!(f, "heads"),
            CoinSide::Tails => write!(f, "tails"),
        }
    }
}

impl FromStr for CoinSide {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "heads" | "h" => Ok(CoinSide::Heads),
            "tails" | "t" => Ok(CoinSide::Tails),
            other => Err(GameError::InvalidBet(format!(
                "Unknown side '{}'. Use 'heads' or 'tails'",
                other
            ))),
        }
    }
}

/// Source of flip outcomes, injected so tests can force results.
pub trait OutcomeSource: Send {
    fn next_side(&mut self) -> CoinSide;
}

/// Approximately fair coin backed by the thread RNG. Not seeded and not
/// verifiable by the player.
#[derive(Debug, Default)]
pub struct RandomOutcome;

impl OutcomeSource for RandomOutcome {
    fn next_side(&mut self) -> CoinSide {
        if rand::thread_rng().gen_bool(0.5) {
            CoinSide::Heads
        } else {
            CoinSide::Tails
        }
    }
}

/// Replays a fixed sequence of outcomes, cycling when exhausted.
pub struct ScriptedOutcome {
    sides: Vec<CoinSide>,
    next: usize,
}

impl ScriptedOutcome {
    pub fn new(sides: impl Into<Vec<CoinSide>>) -> Self {
        let sides = sides.into();
        assert!(!sides.is_empty(), "scripted outcome needs at least one side");
        Self { sides, next: 0 }
    }
}

impl OutcomeSource for ScriptedOutcome {
    fn next_side(&mut self) -> CoinSide {
        let side = self.sides[self.next % self.sides.len()];
        self.next += 1;
        side
    }
}
