//! A web page waiting to be sorted

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Lifecycle of the active page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageState {
    /// Carried in by the arm
    Intro,
    /// Growing toward full size
    Focus,
    /// Held in place waiting for the player
    Decision,
    /// Sliding into the index (keep) or the garbage (discard)
    ScrollOut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Quality {
    High,
    Medium,
    Low,
}

impl Quality {
    pub const ALL: [Quality; 3] = [Quality::High, Quality::Medium, Quality::Low];

    /// Points for keeping a good page of this quality
    pub fn base_points(self) -> u32 {
        match self {
            Quality::High => 3,
            Quality::Medium => 2,
            Quality::Low => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Quality::High => "high",
            Quality::Medium => "medium",
            Quality::Low => "low",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Keep,
    Discard,
}

impl Verdict {
    /// Horizontal direction the page leaves in
    pub fn direction(self) -> f32 {
        match self {
            Verdict::Keep => 1.0,
            Verdict::Discard => -1.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    pub id: u32,
    pub status_code: u16,
    pub is_error_page: bool,
    pub quality: Quality,
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    pub state: PageState,
    /// Frames spent at full scale while in focus
    pub state_timer: u32,
    pub scale: f32,
    pub decision: Option<Verdict>,
}

impl Page {
    /// Only healthy 200 pages belong in the index
    pub fn should_keep(&self) -> bool {
        self.status_code == 200 && !self.is_error_page
    }

    pub fn is_correct(&self, verdict: Verdict) -> bool {
        match verdict {
            Verdict::Keep => self.should_keep(),
            Verdict::Discard => !self.should_keep(),
        }
    }

    /// Points before the combo bonus for a correct verdict
    pub fn base_points(&self, verdict: Verdict) -> u32 {
        match verdict {
            Verdict::Keep => self.quality.base_points(),
            Verdict::Discard => 1,
        }
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Drawn rectangle, scaled about the center
    pub fn scaled_rect(&self) -> (Vec2, Vec2) {
        let size = self.size * self.scale;
        (self.center() - size * 0.5, size)
    }

    /// Fully past the bottom or well past either side
    pub fn is_off_canvas(&self, width: f32, height: f32, margin: f32) -> bool {
        self.pos.y > height || self.pos.x < -margin || self.pos.x > width + margin
    }
}
