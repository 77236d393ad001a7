use crate::outcome::CoinSide;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Most recent flips kept in the history; older entries are discarded.
pub const HISTORY_CAP: usize = 10;

/// One settled flip. Never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameResult {
    pub bet: CoinSide,
    pub result: CoinSide,
    pub won: bool,
    pub amount: u64,
    pub played_at: DateTime<Utc>,
}

/// Bounded, newest-first record of settled flips.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct History {
    entries: VecDeque<GameResult>,
}

impl History {
    pub fn push(&mut self, result: GameResult) {
        self.entries.push_front(result);
        self.entries.truncate(HISTORY_CAP);
    }

    pub fn entries(&self) -> impl Iterator<Item = &GameResult> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&GameResult> {
        self.entries.front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> GameStats {
        let wins = self.entries.iter().filter(|g| g.won).count();
        GameStats {
            played: self.entries.len(),
            wins,
            losses: self.entries.len() - wins,
        }
    }
}

/// Aggregate win/loss counts over the retained history.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct GameStats {
    pub played: usize,
    pub wins: usize,
    pub losses: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(amount: u64, won: bool) -> GameResult {
        GameResult {
            bet: CoinSide::Heads,
            result: if won { CoinSide::Heads } else { CoinSide::Tails },
            won,
            amount,
            played_at: Utc::now(),
        }
    }

    #[test]
    fn newest_entry_is_first() {
        let mut history = History::default();
        history.push(result(10, true));
        history.push(result(20, false));

        assert_eq!(history.latest().unwrap().amount, 20);
        let amounts: Vec<u64> = history.entries().map(|g| g.amount).collect();
        assert_eq!(amounts, vec![20, 10]);
    }

    #[test]
    fn length_never_exceeds_cap() {
        let mut history = History::default();
        for i in 0..(HISTORY_CAP as u64 + 5) {
            history.push(result(i, false));
        }

        assert_eq!(history.len(), HISTORY_CAP);
        // The oldest entries fell off the back.
        assert_eq!(history.latest().unwrap().amount, HISTORY_CAP as u64 + 4);
        assert_eq!(history.entries().last().unwrap().amount, 5);
    }

    #[test]
    fn stats_count_wins_and_losses() {
        let mut history = History::default();
        history.push(result(10, true));
        history.push(result(10, false));
        history.push(result(10, true));

        let stats = history.stats();
        assert_eq!(stats.played, 3);
        assert_eq!(stats.wins, 2);
        assert_eq!(stats.losses, 1);
    }

    #[test]
    fn serde_round_trip() {
        let mut history = History::default();
        history.push(result(10, true));

        let raw = serde_json::to_string(&history).unwrap();
        let restored: History = serde_json::from_str(&raw).unwrap();
        assert_eq!(restored.len(), 1);
        assert!(restored.latest().unwrap().won);
    }
}
