//! Status Arcade - HTTP status code arcade games
//!
//! Core modules:
//! - `sim`: Deterministic simulation (endless runner, page sorter, collision, particles)
//! - `input`: Key/touch/swipe to game action mapping
//! - `renderer`: WebGPU rendering pipeline
//! - `platform`: Browser/native platform abstraction
//! - `tuning`: Data-driven game balance

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod highscores;
pub mod input;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use highscores::HighScores;
pub use settings::{QualityPreset, Settings};
pub use tuning::{RunnerTuning, SorterTuning, TuningError};

use serde::{Deserialize, Serialize};

/// Game configuration constants
pub mod consts {
    /// Simulation rate; both games were designed around 60 frames per second
    pub const SIM_HZ: f32 = 60.0;
    /// Fixed simulation timestep in seconds
    pub const SIM_DT: f32 = 1.0 / SIM_HZ;
    /// Fixed simulation timestep in milliseconds (runner physics work in ms)
    pub const SIM_DT_MS: f32 = 1000.0 / SIM_HZ;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Runner playfield
    pub const RUNNER_DEFAULT_WIDTH: f32 = 600.0;
    pub const RUNNER_DEFAULT_HEIGHT: f32 = 150.0;

    /// Sorter playfield before the canvas is resized to the window
    pub const SORTER_DEFAULT_WIDTH: f32 = 800.0;
    pub const SORTER_DEFAULT_HEIGHT: f32 = 450.0;
}

/// Linear interpolation between `a` and `b`
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Easing curves for intro/outro motion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    #[default]
    Linear,
    EaseOutQuad,
    EaseInOutCubic,
}

impl Easing {
    /// Map progress in [0, 1] onto the curve. Input is clamped.
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseOutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_easing_endpoints() {
        for easing in [Easing::Linear, Easing::EaseOutQuad, Easing::EaseInOutCubic] {
            assert_eq!(easing.apply(0.0), 0.0);
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-6);
            // Out-of-range progress is clamped
            assert!((easing.apply(1.7) - 1.0).abs() < 1e-6);
            assert_eq!(easing.apply(-0.3), 0.0);
        }
    }

    #[test]
    fn test_lerp() {
        assert_eq!(lerp(60.0, 310.0, 0.0), 60.0);
        assert_eq!(lerp(60.0, 310.0, 1.0), 310.0);
        assert_eq!(lerp(0.0, 10.0, 0.5), 5.0);
    }
}
