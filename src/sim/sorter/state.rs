//! Page sorter game state

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::page::{Page, PageState, Quality, Verdict};
use crate::lerp;
use crate::sim::events::GameEvent;
use crate::sim::particles::{self, Particle};
use crate::tuning::SorterTuning;

/// Where the arm picks pages up, measured from the bottom-left
const PICKUP_X: f32 = 60.0;
const PICKUP_FROM_BOTTOM: f32 = 100.0;
/// Top edge of a page held in focus
const FOCUS_Y: f32 = 100.0;
/// Arm joint height when idle
pub const ARM_REST_Y: f32 = 110.0;

const CONFETTI_CORRECT: u32 = 0x4caf50;
const CONFETTI_WRONG: u32 = 0xe53935;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SorterPhase {
    /// Intro screen, waiting for start
    Ready,
    Playing,
    /// Clock ran out
    Finished,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SorterState {
    pub tuning: SorterTuning,
    pub width: f32,
    pub height: f32,
    pub phase: SorterPhase,
    pub score: u64,
    /// Correct decisions in a row
    pub combo: u32,
    pub best_combo: u32,
    pub pages_sorted: u32,
    /// Seconds left in the round
    pub time_left: u32,
    /// Frames into the current second
    pub second_frames: u32,
    pub page: Option<Page>,
    /// Raw intro progress in [0, 1]; eased when applied
    pub arm_progress: f32,
    pub particles: Vec<Particle>,
    pub time_ticks: u64,
    pub rng: Pcg32,
    next_page_id: u32,
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl SorterState {
    pub fn new(seed: u64, width: f32, height: f32, tuning: SorterTuning) -> Self {
        Self {
            width,
            height,
            phase: SorterPhase::Ready,
            score: 0,
            combo: 0,
            best_combo: 0,
            pages_sorted: 0,
            time_left: tuning.round_seconds,
            second_frames: 0,
            page: None,
            arm_progress: 0.0,
            particles: Vec::new(),
            time_ticks: 0,
            rng: Pcg32::seed_from_u64(seed),
            next_page_id: 1,
            events: Vec::new(),
            tuning,
        }
    }

    /// Begin a new round
    pub fn start(&mut self) {
        self.score = 0;
        self.combo = 0;
        self.best_combo = 0;
        self.pages_sorted = 0;
        self.time_left = self.tuning.round_seconds;
        self.second_frames = 0;
        self.page = None;
        self.arm_progress = 0.0;
        self.particles.clear();
        self.phase = SorterPhase::Playing;
        log::info!("Sorter round started ({} s)", self.time_left);
    }

    /// Canvas size changed (the shell grows the canvas when a round starts)
    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    pub fn keep(&mut self) -> bool {
        self.decide(Verdict::Keep)
    }

    pub fn discard(&mut self) -> bool {
        self.decide(Verdict::Discard)
    }

    /// Score the active page. Ignored without a page, once decided, or while
    /// it is already leaving. Returns whether the verdict was applied.
    pub fn decide(&mut self, verdict: Verdict) -> bool {
        if self.phase != SorterPhase::Playing {
            return false;
        }
        let Some(page) = self.page.as_mut() else {
            return false;
        };
        if page.decision.is_some() || page.state == PageState::ScrollOut {
            return false;
        }

        let correct = page.is_correct(verdict);
        let points = if correct {
            self.combo += 1;
            page.base_points(verdict) + self.combo / self.tuning.combo_step
        } else {
            self.combo = 0;
            0
        };
        self.score += u64::from(points);
        self.best_combo = self.best_combo.max(self.combo);
        self.pages_sorted += 1;

        page.decision = Some(verdict);
        page.state = PageState::ScrollOut;
        let origin = page.center();

        let color = if correct {
            CONFETTI_CORRECT
        } else {
            CONFETTI_WRONG
        };
        particles::toss(
            &mut self.particles,
            &mut self.rng,
            origin,
            verdict.direction(),
            self.tuning.confetti,
            color,
        );

        self.events.push(GameEvent::PageSorted {
            verdict,
            correct,
            points,
            combo: self.combo,
        });
        true
    }

    /// Bonus multiplier shown once the streak reaches the combo step
    pub fn combo_multiplier(&self) -> Option<u32> {
        let step = self.tuning.combo_step;
        (self.combo >= step).then(|| 1 + self.combo / step)
    }

    /// Where the page starts its intro
    pub fn pickup_point(&self) -> Vec2 {
        Vec2::new(PICKUP_X, self.height - PICKUP_FROM_BOTTOM)
    }

    /// Where the page rests while in focus
    pub fn focus_point(&self) -> Vec2 {
        Vec2::new(self.width / 2.0 - self.tuning.page_width / 2.0, FOCUS_Y)
    }

    /// Eased intro progress
    pub fn arm_t(&self) -> f32 {
        self.tuning.intro_easing.apply(self.arm_progress)
    }

    /// End of the robot arm, following the page during the intro
    pub fn arm_end(&self) -> Vec2 {
        let rest = Vec2::new(self.width / 2.0, ARM_REST_Y);
        match &self.page {
            Some(page) if page.state == PageState::Intro => {
                let start = self.pickup_point();
                let t = self.arm_t();
                Vec2::new(lerp(start.x, rest.x, t), lerp(start.y, rest.y, t))
            }
            _ => rest,
        }
    }

    /// Draw a new page and place it at the pickup point
    pub fn spawn_page(&mut self) {
        let codes = &self.tuning.status_codes;
        let status_code = codes[self.rng.random_range(0..codes.len())];
        let is_error_page = self.rng.random_bool(self.tuning.error_page_chance);
        let quality = if status_code == 200 {
            Quality::ALL[self.rng.random_range(0..Quality::ALL.len())]
        } else {
            Quality::Low
        };

        self.arm_progress = 0.0;
        let page = Page {
            id: self.next_page_id,
            status_code,
            is_error_page,
            quality,
            pos: self.pickup_point(),
            size: Vec2::new(self.tuning.page_width, self.tuning.page_height),
            state: PageState::Intro,
            state_timer: 0,
            scale: 1.0,
            decision: None,
        };
        log::debug!(
            "Spawned page {} ({}, error={}, {})",
            page.id,
            page.status_code,
            page.is_error_page,
            page.quality.as_str()
        );
        self.next_page_id += 1;
        self.page = Some(page);
    }

    pub(crate) fn finish(&mut self) {
        self.phase = SorterPhase::Finished;
        self.events.push(GameEvent::TimeUp {
            score: self.score,
            best_combo: self.best_combo,
        });
        log::info!(
            "Sorter round over: score {} sorted {} best combo {}",
            self.score,
            self.pages_sorted,
            self.best_combo
        );
    }

    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{SORTER_DEFAULT_HEIGHT, SORTER_DEFAULT_WIDTH};

    fn playing() -> SorterState {
        let mut state = SorterState::new(
            1,
            SORTER_DEFAULT_WIDTH,
            SORTER_DEFAULT_HEIGHT,
            SorterTuning::default(),
        );
        state.start();
        state
    }

    fn set_page(state: &mut SorterState, status_code: u16, is_error_page: bool, quality: Quality) {
        state.spawn_page();
        if let Some(page) = state.page.as_mut() {
            page.status_code = status_code;
            page.is_error_page = is_error_page;
            page.quality = quality;
            page.state = PageState::Decision;
        }
    }

    #[test]
    fn test_scoring_table() {
        // (status, error, quality, verdict, points, combo after)
        let table = [
            (200, false, Quality::High, Verdict::Keep, 3, 1),
            (200, false, Quality::Medium, Verdict::Keep, 2, 1),
            (200, false, Quality::Low, Verdict::Keep, 1, 1),
            (200, false, Quality::High, Verdict::Discard, 0, 0),
            (200, true, Quality::High, Verdict::Keep, 0, 0),
            (200, true, Quality::High, Verdict::Discard, 1, 1),
            (404, false, Quality::Low, Verdict::Keep, 0, 0),
            (404, false, Quality::Low, Verdict::Discard, 1, 1),
            (503, true, Quality::Low, Verdict::Discard, 1, 1),
            (301, false, Quality::Low, Verdict::Discard, 1, 1),
        ];

        for (status, error, quality, verdict, points, combo) in table {
            let mut state = playing();
            set_page(&mut state, status, error, quality);
            assert!(state.decide(verdict));
            assert_eq!(state.score, points, "{status} {error} {quality:?} {verdict:?}");
            assert_eq!(state.combo, combo);
        }
    }

    #[test]
    fn test_combo_bonus() {
        let mut state = playing();
        state.combo = 4;
        set_page(&mut state, 200, false, Quality::High);
        state.keep();
        // 3 + (4 + 1) / 5
        assert_eq!(state.score, 4);
        assert_eq!(state.combo_multiplier(), Some(2));

        state.combo = 9;
        set_page(&mut state, 410, false, Quality::Low);
        state.discard();
        // 4 + 1 + 10 / 5
        assert_eq!(state.score, 7);
        assert_eq!(state.best_combo, 10);

        set_page(&mut state, 410, false, Quality::Low);
        state.keep();
        assert_eq!(state.combo, 0);
        assert_eq!(state.combo_multiplier(), None);
        assert_eq!(state.best_combo, 10);
    }

    #[test]
    fn test_combo_multiplier_threshold() {
        let mut state = playing();
        state.combo = 4;
        assert_eq!(state.combo_multiplier(), None);
        state.combo = 5;
        assert_eq!(state.combo_multiplier(), Some(2));
        state.combo = 14;
        assert_eq!(state.combo_multiplier(), Some(3));
    }

    #[test]
    fn test_decision_guards() {
        let mut state = playing();
        assert!(!state.keep());

        set_page(&mut state, 200, false, Quality::High);
        assert!(state.keep());
        assert!(!state.keep());
        assert!(!state.discard());
        assert_eq!(state.score, 3);
        assert_eq!(state.page.as_ref().map(|p| p.state), Some(PageState::ScrollOut));

        let mut ready = SorterState::new(1, 800.0, 450.0, SorterTuning::default());
        ready.spawn_page();
        assert!(!ready.keep());
    }

    #[test]
    fn test_decision_during_intro() {
        let mut state = playing();
        state.spawn_page();
        assert!(state.discard());
        let page = state.page.as_ref().unwrap();
        assert_eq!(page.state, PageState::ScrollOut);
        assert_eq!(page.decision, Some(Verdict::Discard));
    }

    #[test]
    fn test_sorting_tosses_confetti() {
        let mut state = playing();
        set_page(&mut state, 200, false, Quality::High);
        state.keep();
        assert_eq!(state.particles.len(), state.tuning.confetti);
        assert!(matches!(
            state.take_events()[..],
            [GameEvent::PageSorted {
                verdict: Verdict::Keep,
                correct: true,
                points: 3,
                combo: 1
            }]
        ));
    }

    #[test]
    fn test_page_generation() {
        let mut state = playing();
        for _ in 0..500 {
            state.spawn_page();
            let page = state.page.as_ref().unwrap();
            assert!(state.tuning.status_codes.contains(&page.status_code));
            if page.status_code != 200 {
                assert_eq!(page.quality, Quality::Low);
            }
            assert_eq!(page.pos, state.pickup_point());
            assert_eq!(page.state, PageState::Intro);
        }
    }

    #[test]
    fn test_start_resets_round() {
        let mut state = playing();
        state.score = 12;
        state.combo = 3;
        state.time_left = 4;
        state.spawn_page();
        state.start();
        assert_eq!(state.score, 0);
        assert_eq!(state.combo, 0);
        assert_eq!(state.time_left, 100);
        assert!(state.page.is_none());
        assert_eq!(state.phase, SorterPhase::Playing);
    }
}
