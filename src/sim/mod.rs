//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - No rendering or platform dependencies
//!
//! Side effects the shell cares about (sounds, vibration, saving a high score)
//! are reported as [`GameEvent`]s and drained after each frame.

pub mod collision;
pub mod events;
pub mod particles;
pub mod runner;
pub mod sorter;

pub use collision::{CollisionBox, boxes_overlap, check_detailed};
pub use events::GameEvent;
pub use particles::Particle;
pub use runner::{RunnerInput, RunnerPhase, RunnerState};
pub use sorter::{Page, PageState, Quality, SorterInput, SorterPhase, SorterState, Verdict};

use serde::{Deserialize, Serialize};

/// Which game a page hosts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameKind {
    Runner,
    Sorter,
}

impl GameKind {
    /// Parse the `data-game` attribute of the canvas
    pub fn from_attr(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "runner" => Some(GameKind::Runner),
            "sorter" | "indexing" => Some(GameKind::Sorter),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameKind::Runner => "runner",
            GameKind::Sorter => "sorter",
        }
    }
}
