//! Raw key, touch and swipe input mapped to game actions
//!
//! Pure functions so the mapping can be tested natively. The wasm shell calls
//! these from its DOM listeners and records the result into the next tick's
//! input.

use crate::sim::{RunnerInput, SorterInput, Verdict};

/// Horizontal travel (px) before a touch counts as a swipe
pub const SWIPE_THRESHOLD: f32 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerAction {
    JumpPress,
    JumpRelease,
    DuckPress,
    DuckRelease,
    Restart,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SorterAction {
    Keep,
    Discard,
}

impl From<SorterAction> for Verdict {
    fn from(action: SorterAction) -> Self {
        match action {
            SorterAction::Keep => Verdict::Keep,
            SorterAction::Discard => Verdict::Discard,
        }
    }
}

/// `KeyboardEvent.key` on key down
pub fn runner_key_down(key: &str) -> Option<RunnerAction> {
    match key {
        " " | "ArrowUp" => Some(RunnerAction::JumpPress),
        "ArrowDown" => Some(RunnerAction::DuckPress),
        "Enter" => Some(RunnerAction::Restart),
        _ => None,
    }
}

pub fn runner_key_up(key: &str) -> Option<RunnerAction> {
    match key {
        " " | "ArrowUp" => Some(RunnerAction::JumpRelease),
        "ArrowDown" => Some(RunnerAction::DuckRelease),
        _ => None,
    }
}

/// Left half of the canvas jumps, right half ducks (a speed drop in the air)
pub fn runner_touch_start(x: f32, width: f32) -> RunnerAction {
    if x < width / 2.0 {
        RunnerAction::JumpPress
    } else {
        RunnerAction::DuckPress
    }
}

/// Lifting the finger releases whatever the touch started
pub fn runner_touch_end(x: f32, width: f32) -> RunnerAction {
    match runner_touch_start(x, width) {
        RunnerAction::DuckPress => RunnerAction::DuckRelease,
        _ => RunnerAction::JumpRelease,
    }
}

pub fn sorter_key(key: &str) -> Option<SorterAction> {
    if key.eq_ignore_ascii_case("k") {
        Some(SorterAction::Keep)
    } else if key.eq_ignore_ascii_case("d") {
        Some(SorterAction::Discard)
    } else {
        None
    }
}

/// Tracks a single touch from start to end
#[derive(Debug, Clone, Default)]
pub struct SwipeTracker {
    start_x: Option<f32>,
}

impl SwipeTracker {
    pub fn touch_start(&mut self, x: f32) {
        self.start_x = Some(x);
    }

    /// Left swipes discard, right swipes keep. Short moves are ignored.
    pub fn touch_end(&mut self, x: f32) -> Option<SorterAction> {
        let dx = x - self.start_x.take()?;
        if dx.abs() <= SWIPE_THRESHOLD {
            return None;
        }
        Some(if dx < 0.0 {
            SorterAction::Discard
        } else {
            SorterAction::Keep
        })
    }
}

impl RunnerInput {
    /// Fold an action into this tick's input
    pub fn record(&mut self, action: RunnerAction) {
        match action {
            RunnerAction::JumpPress => self.jump_pressed = true,
            RunnerAction::JumpRelease => self.jump_released = true,
            RunnerAction::DuckPress => self.duck_pressed = true,
            RunnerAction::DuckRelease => self.duck_released = true,
            RunnerAction::Restart => self.restart = true,
        }
    }

    /// Clear one-shot inputs after they were processed
    pub fn clear_one_shots(&mut self) {
        let autoplay = self.autoplay;
        *self = Self {
            autoplay,
            ..Self::default()
        };
    }
}

impl SorterInput {
    pub fn record(&mut self, action: SorterAction) {
        self.verdict = Some(action.into());
    }

    pub fn clear_one_shots(&mut self) {
        self.verdict = None;
        self.start = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runner_keys() {
        assert_eq!(runner_key_down(" "), Some(RunnerAction::JumpPress));
        assert_eq!(runner_key_down("ArrowUp"), Some(RunnerAction::JumpPress));
        assert_eq!(runner_key_down("ArrowDown"), Some(RunnerAction::DuckPress));
        assert_eq!(runner_key_down("Enter"), Some(RunnerAction::Restart));
        assert_eq!(runner_key_down("x"), None);
        assert_eq!(runner_key_up("ArrowUp"), Some(RunnerAction::JumpRelease));
        assert_eq!(runner_key_up("ArrowDown"), Some(RunnerAction::DuckRelease));
        assert_eq!(runner_key_up("Enter"), None);
    }

    #[test]
    fn test_runner_touch_halves() {
        assert_eq!(runner_touch_start(100.0, 600.0), RunnerAction::JumpPress);
        assert_eq!(runner_touch_start(400.0, 600.0), RunnerAction::DuckPress);
        assert_eq!(runner_touch_end(100.0, 600.0), RunnerAction::JumpRelease);
        assert_eq!(runner_touch_end(400.0, 600.0), RunnerAction::DuckRelease);
    }

    #[test]
    fn test_sorter_keys_ignore_case() {
        assert_eq!(sorter_key("k"), Some(SorterAction::Keep));
        assert_eq!(sorter_key("K"), Some(SorterAction::Keep));
        assert_eq!(sorter_key("D"), Some(SorterAction::Discard));
        assert_eq!(sorter_key("Enter"), None);
    }

    #[test]
    fn test_swipe_threshold() {
        let mut swipe = SwipeTracker::default();
        swipe.touch_start(200.0);
        assert_eq!(swipe.touch_end(250.0), None);

        swipe.touch_start(200.0);
        assert_eq!(swipe.touch_end(120.0), Some(SorterAction::Discard));

        swipe.touch_start(200.0);
        assert_eq!(swipe.touch_end(260.0), Some(SorterAction::Keep));

        // End without a start
        assert_eq!(swipe.touch_end(500.0), None);
    }

    #[test]
    fn test_record_and_clear() {
        let mut input = RunnerInput {
            autoplay: true,
            ..Default::default()
        };
        input.record(RunnerAction::JumpPress);
        input.record(RunnerAction::DuckRelease);
        assert!(input.jump_pressed && input.duck_released);
        input.clear_one_shots();
        assert!(!input.jump_pressed && !input.duck_released);
        assert!(input.autoplay);

        let mut input = SorterInput::default();
        input.record(SorterAction::Discard);
        assert_eq!(input.verdict, Some(Verdict::Discard));
        input.clear_one_shots();
        assert_eq!(input.verdict, None);
    }
}
