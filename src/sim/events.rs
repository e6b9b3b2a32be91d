//! Gameplay events reported to the shell

use serde::{Deserialize, Serialize};

use super::sorter::Verdict;

const VIBRATION_MS: u32 = 200;

/// Something the shell should react to (sound, vibration, HUD, saving)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Runner left the ground
    Jump,
    /// Runner touched an obstacle
    ObstacleHit {
        value: u16,
        /// A 200 was picked up
        collected: bool,
        /// 429 or worse
        critical: bool,
    },
    /// Score reached a new multiple of the achievement distance
    Achievement { score: u64 },
    /// Night mode switched on or off
    NightMode { active: bool },
    /// Runner budget or speed ran out
    GameOver { score: u64, new_high_score: bool },
    /// Runner restarted after a crash
    Restart,
    /// A page was kept or discarded
    PageSorted {
        verdict: Verdict,
        correct: bool,
        points: u32,
        combo: u32,
    },
    /// Sorter round clock hit zero
    TimeUp { score: u64, best_combo: u32 },
}

impl GameEvent {
    /// Buzz length for touch devices. Every hit counts, collected or not.
    pub fn vibration_ms(&self) -> Option<u32> {
        match self {
            GameEvent::ObstacleHit { .. } | GameEvent::GameOver { .. } => Some(VIBRATION_MS),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hits_and_game_over_vibrate() {
        let collected = GameEvent::ObstacleHit {
            value: 200,
            collected: true,
            critical: false,
        };
        let critical = GameEvent::ObstacleHit {
            value: 503,
            collected: false,
            critical: true,
        };
        let over = GameEvent::GameOver {
            score: 12,
            new_high_score: false,
        };
        assert_eq!(collected.vibration_ms(), Some(200));
        assert_eq!(critical.vibration_ms(), Some(200));
        assert_eq!(over.vibration_ms(), Some(200));
        assert_eq!(GameEvent::Jump.vibration_ms(), None);
        assert_eq!(GameEvent::Restart.vibration_ms(), None);
    }
}
