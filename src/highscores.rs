//! High score leaderboard system
//!
//! One leaderboard per game, persisted to LocalStorage, top 10 scores each.

use serde::{Deserialize, Serialize};

use crate::platform;
use crate::sim::GameKind;

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub score: u64,
    /// Critical hits (runner) or best combo (sorter)
    pub detail: u32,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

/// High score leaderboard
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    fn storage_key(game: GameKind) -> String {
        format!("status_arcade_highscores_{}", game.as_str())
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().is_none_or(|e| score > e.score)
    }

    /// Add a new score to the leaderboard (if it qualifies)
    /// Returns the rank achieved (1-indexed) or None if didn't qualify
    pub fn add_score(&mut self, score: u64, detail: u32, timestamp: f64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }

        let entry = HighScoreEntry {
            score,
            detail,
            timestamp,
        };

        // Sorted descending; ties go after earlier entries
        let rank = match self.entries.iter().position(|e| score > e.score) {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };
        self.entries.truncate(MAX_HIGH_SCORES);

        Some(rank)
    }

    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    pub fn load(game: GameKind) -> Self {
        match platform::load_json::<HighScores>(&Self::storage_key(game)) {
            Some(scores) => {
                log::info!("Loaded {} {} high scores", scores.entries.len(), game.as_str());
                scores
            }
            None => {
                log::info!("No {} high scores found, starting fresh", game.as_str());
                Self::new()
            }
        }
    }

    pub fn save(&self, game: GameKind) {
        platform::save_json(&Self::storage_key(game), self);
        log::info!("High scores saved ({} entries)", self.entries.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_never_qualifies() {
        let scores = HighScores::new();
        assert!(!scores.qualifies(0));
        assert!(scores.qualifies(1));
    }

    #[test]
    fn test_sorted_and_ranked() {
        let mut scores = HighScores::new();
        assert_eq!(scores.add_score(10, 0, 0.0), Some(1));
        assert_eq!(scores.add_score(30, 0, 0.0), Some(1));
        assert_eq!(scores.add_score(20, 0, 0.0), Some(2));
        assert_eq!(scores.add_score(20, 0, 0.0), Some(3));
        let values: Vec<u64> = scores.entries.iter().map(|e| e.score).collect();
        assert_eq!(values, vec![30, 20, 20, 10]);
        assert_eq!(scores.top_score(), Some(30));
    }

    #[test]
    fn test_capped_at_ten() {
        let mut scores = HighScores::new();
        for score in 1..=15 {
            scores.add_score(score, 0, 0.0);
        }
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(scores.entries.last().map(|e| e.score), Some(6));
        assert!(!scores.qualifies(6));
        assert!(scores.qualifies(7));
        assert_eq!(scores.add_score(3, 0, 0.0), None);
    }

    #[test]
    fn test_per_game_keys() {
        assert_ne!(
            HighScores::storage_key(GameKind::Runner),
            HighScores::storage_key(GameKind::Sorter)
        );
    }
}
