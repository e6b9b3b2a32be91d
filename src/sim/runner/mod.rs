//! Endless runner: dodge bad status codes, collect 200s

pub mod horizon;
pub mod meter;
pub mod player;
pub mod state;
pub mod tick;

pub use horizon::{Cloud, Horizon, HorizonLine, NightMode, Obstacle};
pub use meter::DistanceMeter;
pub use player::{Runner, RunnerStatus};
pub use state::{FlashEffect, RunnerPhase, RunnerState, RunnerStats};
pub use tick::{RunnerInput, tick};
