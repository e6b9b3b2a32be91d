//! Runner game state
//!
//! Everything needed to reproduce a run lives here, including the RNG.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::horizon::Horizon;
use super::meter::DistanceMeter;
use super::player::{Runner, RunnerStatus};
use crate::consts::RUNNER_DEFAULT_WIDTH;
use crate::sim::events::GameEvent;
use crate::tuning::RunnerTuning;

/// Length of the red flash after a critical hit
pub const FLASH_DURATION_MS: f32 = 150.0;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunnerPhase {
    /// Before the first key press
    Waiting,
    /// First jump in progress, world not moving yet
    Starting,
    /// Runner sliding in from the left
    Intro,
    Running,
    /// Frozen while the page is hidden
    Paused,
    /// Budget or speed ran out
    Crashed,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlashEffect {
    pub active: bool,
    pub timer_ms: f32,
}

impl FlashEffect {
    pub fn trigger(&mut self) {
        self.active = true;
        self.timer_ms = 0.0;
    }

    pub fn update(&mut self, dt: f32) {
        if self.active {
            self.timer_ms += dt;
            if self.timer_ms >= FLASH_DURATION_MS {
                self.active = false;
            }
        }
    }

    /// Overlay alpha, fading out over the flash
    pub fn alpha(&self) -> f32 {
        if self.active {
            (1.0 - self.timer_ms / FLASH_DURATION_MS) * 0.7
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerStats {
    pub score: u64,
    pub high_score: u64,
    /// Health bar in percent
    pub budget: f32,
    pub total_hits: u32,
    pub critical_hits: u32,
    pub play_count: u32,
}

impl RunnerStats {
    fn new(budget: f32) -> Self {
        Self {
            score: 0,
            high_score: 0,
            budget,
            total_hits: 0,
            critical_hits: 0,
            play_count: 0,
        }
    }

    /// Game-over screen lines, keyed by HUD element id
    pub fn summary(&self) -> [(&'static str, String); 5] {
        [
            ("final-score", self.score.to_string()),
            ("final-high-score", self.high_score.to_string()),
            ("final-budget", format!("{}%", self.budget.max(0.0).round())),
            ("final-hits", self.total_hits.to_string()),
            ("final-critical", self.critical_hits.to_string()),
        ]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerState {
    pub tuning: RunnerTuning,
    pub phase: RunnerPhase,
    /// Phase to return to when resuming
    pub paused_from: Option<RunnerPhase>,
    pub runner: Runner,
    pub horizon: Horizon,
    pub meter: DistanceMeter,
    pub flash: FlashEffect,
    pub stats: RunnerStats,
    pub speed: f32,
    /// Time since the intro finished (ms)
    pub running_time: f32,
    /// Time since the crash (ms)
    pub crash_time: f32,
    pub inverted: bool,
    pub invert_timer: f32,
    /// Last night-mode multiple reached
    pub last_invert_milestone: u64,
    pub time_ticks: u64,
    pub rng: Pcg32,
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl RunnerState {
    pub fn new(seed: u64, tuning: RunnerTuning) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let horizon = Horizon::new(&tuning, &mut rng);
        let mut state = Self {
            runner: Runner::new(&tuning),
            horizon,
            meter: DistanceMeter::new(tuning.achievement_distance),
            flash: FlashEffect::default(),
            stats: RunnerStats::new(tuning.starting_budget),
            phase: RunnerPhase::Waiting,
            paused_from: None,
            speed: tuning.speed,
            running_time: 0.0,
            crash_time: 0.0,
            inverted: false,
            invert_timer: 0.0,
            last_invert_milestone: 0,
            time_ticks: 0,
            rng,
            events: Vec::new(),
            tuning,
        };
        state.set_speed(state.tuning.speed);
        state
    }

    /// Set the speed, scaled down on canvases narrower than the default
    pub fn set_speed(&mut self, speed: f32) {
        let width = self.tuning.width;
        self.speed = if width < RUNNER_DEFAULT_WIDTH {
            let mobile_speed = speed * width / RUNNER_DEFAULT_WIDTH * self.tuning.mobile_speed_coefficient;
            mobile_speed.min(speed)
        } else {
            speed
        };
    }

    /// Seed the stored best score (from persisted high scores)
    pub fn set_high_score(&mut self, high_score: u64) {
        self.stats.high_score = high_score;
        self.meter.high_score = high_score;
    }

    /// Start a fresh run after a crash. High score and play count carry over.
    pub fn restart(&mut self) {
        let stats = RunnerStats {
            high_score: self.stats.high_score,
            play_count: self.stats.play_count + 1,
            ..RunnerStats::new(self.tuning.starting_budget)
        };
        self.stats = stats;
        self.phase = RunnerPhase::Running;
        self.paused_from = None;
        self.running_time = 0.0;
        self.crash_time = 0.0;
        self.set_speed(self.tuning.speed);
        self.meter.reset();
        self.horizon.reset(&mut self.rng);
        self.flash = FlashEffect::default();
        self.runner.reset();
        self.runner.jump_count = 0;
        self.inverted = false;
        self.invert_timer = 0.0;
        self.last_invert_milestone = 0;
        self.events.push(GameEvent::Restart);
        log::info!("Runner restarted (play {})", self.stats.play_count);
    }

    pub(crate) fn game_over(&mut self) {
        self.phase = RunnerPhase::Crashed;
        self.crash_time = 0.0;
        self.runner.set_status(RunnerStatus::Crashed);

        let new_high_score = self.stats.score > self.stats.high_score;
        if new_high_score {
            self.stats.high_score = self.stats.score;
            self.meter.high_score = self.stats.score;
        }
        self.events.push(GameEvent::GameOver {
            score: self.stats.score,
            new_high_score,
        });
        log::info!(
            "Game over: score {} budget {:.1} speed {:.2} hits {} critical {}",
            self.stats.score,
            self.stats.budget,
            self.speed,
            self.stats.total_hits,
            self.stats.critical_hits
        );
    }

    /// Freeze a run in progress (tab hidden, window blurred)
    pub fn pause(&mut self) {
        if matches!(
            self.phase,
            RunnerPhase::Starting | RunnerPhase::Intro | RunnerPhase::Running
        ) {
            self.paused_from = Some(self.phase);
            self.phase = RunnerPhase::Paused;
        }
    }

    pub fn resume(&mut self) {
        if self.phase == RunnerPhase::Paused {
            self.phase = self.paused_from.take().unwrap_or(RunnerPhase::Running);
            if !self.runner.jumping && !self.runner.ducking {
                self.runner.set_status(RunnerStatus::Running);
            }
        }
    }

    pub fn is_playing(&self) -> bool {
        matches!(
            self.phase,
            RunnerPhase::Starting | RunnerPhase::Intro | RunnerPhase::Running
        )
    }

    /// Drain events for the shell
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::runner::horizon::Obstacle;

    #[test]
    fn test_new_state() {
        let state = RunnerState::new(1, RunnerTuning::default());
        assert_eq!(state.phase, RunnerPhase::Waiting);
        assert_eq!(state.runner.x, 0.0);
        assert_eq!(state.horizon.clouds.len(), 1);
        assert!(state.horizon.obstacles.is_empty());
        assert_eq!(state.stats.budget, 100.0);
        assert_eq!(state.speed, 6.0);
    }

    #[test]
    fn test_mobile_speed_scaling() {
        let tuning = RunnerTuning {
            width: 300.0,
            ..RunnerTuning::default()
        };
        let state = RunnerState::new(1, tuning);
        // 6 * 300/600 * 1.2
        assert!((state.speed - 3.6).abs() < 1e-5);

        let tuning = RunnerTuning {
            width: 580.0,
            mobile_speed_coefficient: 2.0,
            ..RunnerTuning::default()
        };
        let state = RunnerState::new(1, tuning);
        // Never faster than the requested speed
        assert_eq!(state.speed, 6.0);
    }

    #[test]
    fn test_flash_fades_out() {
        let mut flash = FlashEffect::default();
        flash.trigger();
        assert!((flash.alpha() - 0.7).abs() < 1e-6);
        flash.update(75.0);
        assert!((flash.alpha() - 0.35).abs() < 1e-6);
        flash.update(75.0);
        assert!(!flash.active);
        assert_eq!(flash.alpha(), 0.0);
    }

    #[test]
    fn test_restart_keeps_high_score() {
        let mut state = RunnerState::new(3, RunnerTuning::default());
        state.stats.score = 42;
        state.stats.budget = 0.0;
        state.game_over();
        assert_eq!(state.stats.high_score, 42);

        let obstacle = Obstacle::spawn(7, 503, state.speed, &state.tuning, &mut state.rng);
        state.horizon.obstacles.push(obstacle);
        state.speed = 11.0;
        state.inverted = true;
        state.invert_timer = 4000.0;
        state.horizon.night.opacity = 1.0;

        state.restart();
        assert!(state.horizon.obstacles.is_empty());
        assert!(!state.inverted);
        assert_eq!(state.invert_timer, 0.0);
        assert_eq!(state.horizon.night.opacity, 0.0);
        assert_eq!(state.speed, state.tuning.speed);
        assert_eq!(state.running_time, 0.0);
        assert_eq!(state.phase, RunnerPhase::Running);
        assert_eq!(state.stats.score, 0);
        assert_eq!(state.stats.budget, 100.0);
        assert_eq!(state.stats.high_score, 42);
        assert_eq!(state.meter.high_score, 42);
        assert_eq!(state.stats.play_count, 1);
        let events = state.take_events();
        assert!(matches!(events[0], GameEvent::GameOver { score: 42, new_high_score: true }));
        assert!(matches!(events[1], GameEvent::Restart));
    }

    #[test]
    fn test_game_over_summary() {
        let mut state = RunnerState::new(5, RunnerTuning::default());
        state.stats.score = 17;
        state.stats.high_score = 30;
        state.stats.budget = -0.4;
        state.stats.total_hits = 9;
        state.stats.critical_hits = 4;

        let summary = state.stats.summary();
        assert_eq!(summary[0], ("final-score", "17".to_string()));
        assert_eq!(summary[1], ("final-high-score", "30".to_string()));
        // Overdrawn budget reads as empty
        assert_eq!(summary[2], ("final-budget", "0%".to_string()));
        assert_eq!(summary[3], ("final-hits", "9".to_string()));
        assert_eq!(summary[4], ("final-critical", "4".to_string()));
    }
}
