//! Data-driven game balance
//!
//! Every number the simulations use lives here with a default that matches the
//! shipped games. Tuning can be overridden from JSON (e.g. a `<script
//! type="application/json">` block on the page); invalid values are rejected
//! and the caller falls back to defaults.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Easing;
use crate::consts::{RUNNER_DEFAULT_HEIGHT, RUNNER_DEFAULT_WIDTH};

/// Errors from loading tuning or settings JSON
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to parse tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

fn invalid(field: &'static str, reason: impl Into<String>) -> TuningError {
    TuningError::Invalid {
        field,
        reason: reason.into(),
    }
}

fn check_status_codes(field: &'static str, codes: &[u16]) -> Result<(), TuningError> {
    if codes.is_empty() {
        return Err(invalid(field, "must contain at least one status code"));
    }
    if let Some(bad) = codes.iter().find(|c| !(100..=599).contains(*c)) {
        return Err(invalid(field, format!("{bad} is not an HTTP status code")));
    }
    Ok(())
}

/// Endless runner balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerTuning {
    /// Playfield width in pixels (narrower than 600 slows the game down)
    pub width: f32,
    /// Playfield height in pixels
    pub height: f32,
    /// Gap between the ground line and the bottom of the canvas
    pub bottom_pad: f32,
    /// Starting speed (pixels per 60 Hz frame)
    pub speed: f32,
    pub max_speed: f32,
    /// Extra slowdown applied on narrow (mobile) canvases
    pub mobile_speed_coefficient: f32,
    /// Time after the intro before obstacles start spawning (ms)
    pub clear_time_ms: f32,
    /// Time after a crash before a jump key restarts (ms)
    pub gameover_clear_time_ms: f32,
    pub gap_coefficient: f32,
    pub gravity: f32,
    /// Jump launch velocity (negative is up)
    pub initial_jump_velocity: f32,
    /// Velocity the jump is clamped to when the key is released early
    pub drop_velocity: f32,
    /// Height above the ground a jump must reach before it may be cut short
    pub min_jump_height: f32,
    /// Absolute y above which a jump is forced to end
    pub max_jump_height: f32,
    pub speed_drop_coefficient: f32,
    /// Distance the runner slides in during the intro
    pub start_x: f32,
    pub intro_duration_ms: f32,
    pub bg_cloud_speed: f32,
    /// Chance per frame of adding a cloud once the gap allows it
    pub cloud_frequency: f32,
    pub max_clouds: usize,
    /// Score interval that triggers night mode
    pub invert_distance: u64,
    pub invert_fade_duration_ms: f32,
    /// Score interval that flashes the meter
    pub achievement_distance: u64,
    pub starting_budget: f32,
    /// Obstacle values, drawn uniformly (duplicates weight the draw)
    pub status_codes: Vec<u16>,
}

impl Default for RunnerTuning {
    fn default() -> Self {
        Self {
            width: RUNNER_DEFAULT_WIDTH,
            height: RUNNER_DEFAULT_HEIGHT,
            bottom_pad: 10.0,
            speed: 6.0,
            max_speed: 13.0,
            mobile_speed_coefficient: 1.2,
            clear_time_ms: 3000.0,
            gameover_clear_time_ms: 750.0,
            gap_coefficient: 0.6,
            gravity: 0.6,
            initial_jump_velocity: -10.0,
            drop_velocity: -5.0,
            min_jump_height: 30.0,
            max_jump_height: 30.0,
            speed_drop_coefficient: 3.0,
            start_x: 50.0,
            intro_duration_ms: 1500.0,
            bg_cloud_speed: 0.2,
            cloud_frequency: 0.5,
            max_clouds: 6,
            invert_distance: 700,
            invert_fade_duration_ms: 12000.0,
            achievement_distance: 100,
            starting_budget: 100.0,
            status_codes: vec![200, 200, 200, 200, 301, 302, 404, 410, 418, 429, 500, 503],
        }
    }
}

impl RunnerTuning {
    /// Parse and validate tuning from JSON. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Parse tuning, logging and falling back to defaults on any error
    pub fn from_json_or_default(json: Option<&str>) -> Self {
        match json.map(Self::from_json) {
            Some(Ok(tuning)) => {
                log::info!("Loaded runner tuning overrides");
                tuning
            }
            Some(Err(e)) => {
                log::warn!("Ignoring runner tuning: {}", e);
                Self::default()
            }
            None => Self::default(),
        }
    }

    pub fn validate(&self) -> Result<(), TuningError> {
        if self.width <= 0.0 || self.height <= 0.0 {
            return Err(invalid("width/height", "playfield must have a positive size"));
        }
        if self.speed <= 0.0 {
            return Err(invalid("speed", "must be positive"));
        }
        if self.max_speed < self.speed {
            return Err(invalid("max_speed", "must not be below the starting speed"));
        }
        if self.gravity <= 0.0 {
            return Err(invalid("gravity", "must be positive"));
        }
        if self.initial_jump_velocity >= 0.0 {
            return Err(invalid("initial_jump_velocity", "must be negative (upwards)"));
        }
        if self.start_x < 0.0 {
            return Err(invalid("start_x", "must not be negative"));
        }
        if self.intro_duration_ms <= 0.0 {
            return Err(invalid("intro_duration_ms", "must be positive"));
        }
        if self.bg_cloud_speed < 0.0 {
            return Err(invalid("bg_cloud_speed", "must not be negative"));
        }
        if !(0.0..=1.0).contains(&self.cloud_frequency) {
            return Err(invalid("cloud_frequency", "must be a probability in [0, 1]"));
        }
        if self.invert_distance == 0 || self.achievement_distance == 0 {
            return Err(invalid("invert_distance/achievement_distance", "must be non-zero"));
        }
        if self.starting_budget <= 0.0 {
            return Err(invalid("starting_budget", "must be positive"));
        }
        check_status_codes("status_codes", &self.status_codes)
    }
}

/// Page sorter balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SorterTuning {
    /// Round length in seconds
    pub round_seconds: u32,
    /// Arm progress added per frame during the intro
    pub intro_speed: f32,
    pub intro_easing: Easing,
    /// Scale a page grows to while in focus
    pub focus_scale: f32,
    pub scale_step: f32,
    /// Frames a page is held at full scale before it waits for a decision
    pub focus_hold_frames: u32,
    /// Pixels per frame a sorted page travels
    pub scroll_speed: f32,
    /// Pages this far past the side edges are culled
    pub cull_margin: f32,
    pub error_page_chance: f64,
    /// Every `combo_step` correct decisions in a row adds one bonus point
    pub combo_step: u32,
    pub page_width: f32,
    pub page_height: f32,
    /// Confetti pieces tossed per sorted page
    pub confetti: usize,
    pub status_codes: Vec<u16>,
}

impl Default for SorterTuning {
    fn default() -> Self {
        Self {
            round_seconds: 100,
            intro_speed: 0.02,
            intro_easing: Easing::Linear,
            focus_scale: 1.2,
            scale_step: 0.01,
            focus_hold_frames: 60,
            scroll_speed: 6.0,
            cull_margin: 200.0,
            error_page_chance: 0.3,
            combo_step: 5,
            page_width: 180.0,
            page_height: 252.0,
            confetti: 12,
            status_codes: vec![200, 200, 200, 200, 301, 302, 404, 410, 418, 500, 503],
        }
    }
}

impl SorterTuning {
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn from_json_or_default(json: Option<&str>) -> Self {
        match json.map(Self::from_json) {
            Some(Ok(tuning)) => {
                log::info!("Loaded sorter tuning overrides");
                tuning
            }
            Some(Err(e)) => {
                log::warn!("Ignoring sorter tuning: {}", e);
                Self::default()
            }
            None => Self::default(),
        }
    }

    pub fn validate(&self) -> Result<(), TuningError> {
        if self.round_seconds == 0 {
            return Err(invalid("round_seconds", "must be non-zero"));
        }
        if self.intro_speed <= 0.0 {
            return Err(invalid("intro_speed", "must be positive"));
        }
        if self.focus_scale < 1.0 || self.scale_step <= 0.0 {
            return Err(invalid("focus_scale/scale_step", "page must grow toward focus"));
        }
        if self.scroll_speed <= 0.0 {
            return Err(invalid("scroll_speed", "must be positive"));
        }
        if self.page_width <= 0.0 || self.page_height <= 0.0 {
            return Err(invalid("page_width/page_height", "page must have a positive size"));
        }
        if self.cull_margin < 0.0 {
            return Err(invalid("cull_margin", "must not be negative"));
        }
        if !(0.0..=1.0).contains(&self.error_page_chance) {
            return Err(invalid("error_page_chance", "must be a probability in [0, 1]"));
        }
        if self.combo_step == 0 {
            return Err(invalid("combo_step", "must be non-zero"));
        }
        check_status_codes("status_codes", &self.status_codes)
    }
}
