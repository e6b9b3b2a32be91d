//! The runner character: jump physics, ducking and animation status

use serde::{Deserialize, Serialize};

use crate::sim::collision::CollisionBox;
use crate::tuning::RunnerTuning;

pub const RUNNER_WIDTH: f32 = 44.0;
pub const RUNNER_HEIGHT: f32 = 47.0;

/// Reference frame length the jump physics is tuned for
const MS_PER_PHYSICS_FRAME: f32 = 1000.0 / 60.0;

/// Detailed boxes while upright, relative to the runner's top-left
pub const RUNNING_BOXES: [CollisionBox; 6] = [
    CollisionBox::new(22.0, 0.0, 17.0, 16.0),
    CollisionBox::new(1.0, 18.0, 30.0, 9.0),
    CollisionBox::new(10.0, 35.0, 14.0, 8.0),
    CollisionBox::new(1.0, 24.0, 29.0, 5.0),
    CollisionBox::new(5.0, 30.0, 21.0, 4.0),
    CollisionBox::new(9.0, 34.0, 15.0, 4.0),
];

/// Detailed box while ducking
pub const DUCKING_BOXES: [CollisionBox; 1] = [CollisionBox::new(1.0, 18.0, 55.0, 25.0)];

/// Animation status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunnerStatus {
    Waiting,
    Running,
    Jumping,
    Ducking,
    Crashed,
}

impl RunnerStatus {
    pub fn ms_per_frame(self) -> f32 {
        match self {
            RunnerStatus::Waiting => 1000.0 / 3.0,
            RunnerStatus::Running => 1000.0 / 12.0,
            RunnerStatus::Ducking => 1000.0 / 8.0,
            RunnerStatus::Jumping | RunnerStatus::Crashed => 1000.0 / 60.0,
        }
    }

    pub fn frame_count(self) -> usize {
        match self {
            RunnerStatus::Waiting | RunnerStatus::Running | RunnerStatus::Ducking => 2,
            RunnerStatus::Jumping | RunnerStatus::Crashed => 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Runner {
    pub x: f32,
    pub y: f32,
    pub ground_y: f32,
    /// A jump must rise above this y before it can be cut short
    pub min_jump_y: f32,
    pub jump_velocity: f32,
    pub jumping: bool,
    pub ducking: bool,
    pub speed_drop: bool,
    pub reached_min_height: bool,
    pub jump_count: u32,
    pub status: RunnerStatus,
    pub anim_frame: usize,
    pub anim_timer: f32,
}

impl Runner {
    pub fn new(tuning: &RunnerTuning) -> Self {
        let ground_y = tuning.height - RUNNER_HEIGHT - tuning.bottom_pad;
        Self {
            x: 0.0,
            y: ground_y,
            ground_y,
            min_jump_y: ground_y - tuning.min_jump_height,
            jump_velocity: 0.0,
            jumping: false,
            ducking: false,
            speed_drop: false,
            reached_min_height: false,
            jump_count: 0,
            status: RunnerStatus::Waiting,
            anim_frame: 0,
            anim_timer: 0.0,
        }
    }

    pub fn set_status(&mut self, status: RunnerStatus) {
        self.status = status;
        self.anim_frame = 0;
        self.anim_timer = 0.0;
    }

    /// Advance the animation frame. A speed drop that reached the ground
    /// turns into a duck.
    pub fn animate(&mut self, dt: f32) {
        self.anim_timer += dt;
        if self.anim_timer >= self.status.ms_per_frame() {
            self.anim_frame = (self.anim_frame + 1) % self.status.frame_count();
            self.anim_timer = 0.0;
        }

        if self.speed_drop && self.y == self.ground_y {
            self.speed_drop = false;
            self.set_duck(true);
        }
    }

    /// Slide in from the left edge during the intro.
    /// Returns true once the start position is reached.
    pub fn slide_in(&mut self, tuning: &RunnerTuning, dt: f32) -> bool {
        if self.x < tuning.start_x {
            self.x += (tuning.start_x / tuning.intro_duration_ms * dt).round().max(1.0);
            self.x = self.x.min(tuning.start_x);
        }
        self.x >= tuning.start_x
    }

    /// Launch a jump. Faster games jump a little higher.
    pub fn start_jump(&mut self, speed: f32, tuning: &RunnerTuning) -> bool {
        if self.jumping {
            return false;
        }
        self.set_status(RunnerStatus::Jumping);
        self.jump_velocity = tuning.initial_jump_velocity - speed / 10.0;
        self.jumping = true;
        self.reached_min_height = false;
        self.speed_drop = false;
        true
    }

    /// Cut the jump short once the minimum height was reached
    pub fn end_jump(&mut self, drop_velocity: f32) {
        if self.reached_min_height && self.jump_velocity < drop_velocity {
            self.jump_velocity = drop_velocity;
        }
    }

    /// Integrate one step of the jump. Returns true when the runner landed.
    pub fn update_jump(&mut self, dt: f32, tuning: &RunnerTuning) -> bool {
        let frames = dt / MS_PER_PHYSICS_FRAME;

        let coefficient = if self.speed_drop {
            tuning.speed_drop_coefficient
        } else {
            1.0
        };
        self.y += (self.jump_velocity * coefficient * frames).round();
        self.jump_velocity += tuning.gravity * frames;

        if self.y < self.min_jump_y || self.speed_drop {
            self.reached_min_height = true;
        }

        if self.y < tuning.max_jump_height || self.speed_drop {
            self.end_jump(tuning.drop_velocity);
        }

        if self.y > self.ground_y {
            self.reset();
            self.jump_count += 1;
            return true;
        }
        false
    }

    /// Fall fast while in the air
    pub fn set_speed_drop(&mut self) {
        self.speed_drop = true;
        self.jump_velocity = 1.0;
    }

    pub fn set_duck(&mut self, ducking: bool) {
        if ducking && self.status != RunnerStatus::Ducking {
            self.set_status(RunnerStatus::Ducking);
            self.ducking = true;
        } else if !ducking && self.status == RunnerStatus::Ducking {
            self.set_status(RunnerStatus::Running);
            self.ducking = false;
        }
    }

    /// Back on the ground, running. Jump count is kept.
    pub fn reset(&mut self) {
        self.y = self.ground_y;
        self.jump_velocity = 0.0;
        self.jumping = false;
        self.ducking = false;
        self.speed_drop = false;
        self.set_status(RunnerStatus::Running);
    }

    /// Outer bounds used for the coarse collision phase
    pub fn bounds(&self) -> CollisionBox {
        CollisionBox::new(self.x, self.y, RUNNER_WIDTH, RUNNER_HEIGHT).inset(1.0)
    }

    pub fn collision_boxes(&self) -> &'static [CollisionBox] {
        if self.ducking {
            &DUCKING_BOXES
        } else {
            &RUNNING_BOXES
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT_MS;

    #[test]
    fn test_ground_position() {
        let runner = Runner::new(&RunnerTuning::default());
        assert_eq!(runner.ground_y, 93.0);
        assert_eq!(runner.min_jump_y, 63.0);
        assert_eq!(runner.status, RunnerStatus::Waiting);
    }

    #[test]
    fn test_jump_arc_returns_to_ground() {
        let tuning = RunnerTuning::default();
        let mut runner = Runner::new(&tuning);
        assert!(runner.start_jump(tuning.speed, &tuning));
        assert!(!runner.start_jump(tuning.speed, &tuning));
        assert!((runner.jump_velocity + 10.6).abs() < 1e-5);

        let mut apex = runner.y;
        let mut landed = false;
        for _ in 0..200 {
            if runner.update_jump(SIM_DT_MS, &tuning) {
                landed = true;
                break;
            }
            apex = apex.min(runner.y);
        }
        assert!(landed);
        assert!(apex < runner.min_jump_y);
        assert_eq!(runner.y, runner.ground_y);
        assert_eq!(runner.jump_count, 1);
        assert!(!runner.jumping);
        assert_eq!(runner.status, RunnerStatus::Running);
    }

    #[test]
    fn test_early_release_clamps_to_drop_velocity() {
        let tuning = RunnerTuning::default();
        let mut runner = Runner::new(&tuning);
        runner.start_jump(tuning.speed, &tuning);

        // Releasing before min height has no effect
        runner.update_jump(SIM_DT_MS, &tuning);
        runner.end_jump(tuning.drop_velocity);
        assert!(runner.jump_velocity < tuning.drop_velocity);

        while !runner.reached_min_height {
            runner.update_jump(SIM_DT_MS, &tuning);
        }
        runner.end_jump(tuning.drop_velocity);
        assert!(runner.jump_velocity >= tuning.drop_velocity);
    }

    #[test]
    fn test_speed_drop_lands_into_duck() {
        let tuning = RunnerTuning::default();
        let mut runner = Runner::new(&tuning);
        runner.start_jump(tuning.speed, &tuning);
        for _ in 0..5 {
            runner.update_jump(SIM_DT_MS, &tuning);
        }
        runner.set_speed_drop();

        let mut steps = 0;
        while !runner.update_jump(SIM_DT_MS, &tuning) {
            steps += 1;
            assert!(steps < 50);
        }
        // The landing reset clears the drop; a drop still held at the ground ducks
        runner.speed_drop = true;
        runner.animate(SIM_DT_MS);
        assert!(runner.ducking);
        assert!(!runner.speed_drop);
        assert_eq!(runner.collision_boxes().len(), 1);
    }

    #[test]
    fn test_intro_slide_stops_at_start() {
        let tuning = RunnerTuning::default();
        let mut runner = Runner::new(&tuning);
        let mut steps = 0;
        while !runner.slide_in(&tuning, SIM_DT_MS) {
            steps += 1;
            assert!(steps < 200);
        }
        assert_eq!(runner.x, tuning.start_x);
    }

    #[test]
    fn test_slow_intro_still_advances() {
        let tuning = RunnerTuning {
            start_x: 5.0,
            intro_duration_ms: 60_000.0,
            ..RunnerTuning::default()
        };
        let mut runner = Runner::new(&tuning);
        let mut steps = 0;
        while !runner.slide_in(&tuning, SIM_DT_MS) {
            steps += 1;
            assert!(steps < 10);
        }
        assert_eq!(runner.x, 5.0);
    }
}
