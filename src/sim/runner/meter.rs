//! Score display with the achievement flash

use serde::{Deserialize, Serialize};

const DEFAULT_DIGITS: usize = 5;
const FLASH_DURATION_MS: f32 = 1000.0 / 4.0;
const FLASH_ITERATIONS: u32 = 3;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistanceMeter {
    /// Score currently shown (frozen while flashing)
    pub shown: u64,
    pub high_score: u64,
    pub max_digits: usize,
    /// Flashing after an achievement
    pub achievement: bool,
    /// False during the "off" half of a flash
    pub paint: bool,
    flash_timer: f32,
    flash_iterations: u32,
    /// Last achievement multiple reached
    last_milestone: u64,
    achievement_distance: u64,
}

impl DistanceMeter {
    pub fn new(achievement_distance: u64) -> Self {
        Self {
            shown: 0,
            high_score: 0,
            max_digits: DEFAULT_DIGITS,
            achievement: false,
            paint: true,
            flash_timer: 0.0,
            flash_iterations: 0,
            last_milestone: 0,
            achievement_distance,
        }
    }

    fn max_score(&self) -> u64 {
        10u64.pow(self.max_digits as u32) - 1
    }

    /// Update the display. Returns true when the score reached a new
    /// multiple of the achievement distance.
    pub fn update(&mut self, dt: f32, score: u64) -> bool {
        let mut reached = false;
        let milestone = score / self.achievement_distance;
        if milestone > self.last_milestone {
            self.last_milestone = milestone;
            self.achievement = true;
            self.flash_timer = 0.0;
            self.flash_iterations = 0;
            reached = true;
        }

        self.paint = true;
        if self.achievement {
            if self.flash_iterations <= FLASH_ITERATIONS {
                self.flash_timer += dt;
                if self.flash_timer < FLASH_DURATION_MS {
                    self.paint = false;
                } else if self.flash_timer > FLASH_DURATION_MS * 2.0 {
                    self.flash_timer = 0.0;
                    self.flash_iterations += 1;
                }
            } else {
                self.achievement = false;
                self.flash_iterations = 0;
                self.flash_timer = 0.0;
            }
        }

        if !self.achievement || reached {
            // One extra digit once the score outgrows the default width
            if score > self.max_score() && self.max_digits == DEFAULT_DIGITS {
                self.max_digits += 1;
            }
            self.shown = score;
        }
        reached
    }

    /// Zero-padded digits of the shown score
    pub fn digits(&self) -> String {
        format_padded(self.shown, self.max_digits)
    }

    pub fn high_score_digits(&self) -> String {
        format_padded(self.high_score, self.max_digits)
    }

    pub fn reset(&mut self) {
        let high_score = self.high_score;
        *self = Self::new(self.achievement_distance);
        self.high_score = high_score;
    }
}

fn format_padded(value: u64, digits: usize) -> String {
    let wrapped = value % 10u64.pow(digits as u32);
    format!("{wrapped:0digits$}")
}
