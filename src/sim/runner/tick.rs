//! Fixed timestep runner tick

use super::horizon::Obstacle;
use super::player::RUNNER_WIDTH;
use super::state::{RunnerPhase, RunnerState};
use crate::sim::collision::check_detailed;
use crate::sim::events::GameEvent;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct RunnerInput {
    pub jump_pressed: bool,
    pub jump_released: bool,
    pub duck_pressed: bool,
    pub duck_released: bool,
    /// Restart after a crash without waiting for the clear time
    pub restart: bool,
    pub pause: bool,
    pub resume: bool,
    /// AI plays the game
    pub autoplay: bool,
}

/// Advance the runner by one step of `dt` milliseconds
pub fn tick(state: &mut RunnerState, input: &RunnerInput, dt: f32) {
    if input.pause {
        state.pause();
    }
    if state.phase == RunnerPhase::Paused && (input.jump_pressed || input.jump_released) {
        // A jump key wakes a paused run; the key itself is consumed
        state.resume();
        state.time_ticks += 1;
        return;
    }
    if input.resume {
        state.resume();
    }
    if state.phase == RunnerPhase::Paused {
        return;
    }

    let mut input = input.clone();
    if input.autoplay {
        autoplay(state, &mut input);
    }
    let input = &input;

    if state.phase == RunnerPhase::Crashed {
        state.crash_time += dt;
        let cleared = state.crash_time >= state.tuning.gameover_clear_time_ms;
        if input.restart || (cleared && (input.jump_pressed || input.jump_released)) {
            state.restart();
        }
        state.time_ticks += 1;
        return;
    }

    handle_controls(state, input);

    // World
    let running = state.phase == RunnerPhase::Running;
    let world_dt = if running { dt } else { 0.0 };
    if running {
        state.running_time += dt;
    }
    let has_obstacles = running && state.running_time > state.tuning.clear_time_ms;
    state.horizon.update(
        world_dt,
        state.speed,
        has_obstacles,
        state.inverted,
        &state.tuning,
        &mut state.rng,
    );

    // Runner
    let landed = state.runner.jumping && state.runner.update_jump(dt, &state.tuning);
    if landed && state.phase == RunnerPhase::Starting {
        state.phase = RunnerPhase::Intro;
    }
    if state.phase == RunnerPhase::Intro && state.runner.slide_in(&state.tuning, dt) {
        start_running(state);
    }
    state.runner.animate(dt);

    if has_obstacles {
        check_obstacle_hit(state);
    }

    state.flash.update(dt);
    if state.meter.update(dt, state.stats.score) {
        state.events.push(GameEvent::Achievement {
            score: state.stats.score,
        });
    }

    if state.stats.budget <= 0.0 || state.speed <= 0.0 {
        state.game_over();
        state.time_ticks += 1;
        return;
    }

    update_night_mode(state, dt);
    state.time_ticks += 1;
}

fn handle_controls(state: &mut RunnerState, input: &RunnerInput) {
    if input.jump_pressed {
        if state.phase == RunnerPhase::Waiting {
            state.phase = RunnerPhase::Starting;
            log::info!("Runner started");
        }
        let runner = &mut state.runner;
        if !runner.ducking && runner.start_jump(state.speed, &state.tuning) {
            state.events.push(GameEvent::Jump);
        }
    }

    if state.phase == RunnerPhase::Waiting {
        return;
    }

    if input.duck_pressed {
        if state.runner.jumping {
            state.runner.set_speed_drop();
        } else if !state.runner.ducking {
            state.runner.set_duck(true);
        }
    }

    if input.jump_released {
        state.runner.end_jump(state.tuning.drop_velocity);
    }

    if input.duck_released {
        state.runner.speed_drop = false;
        state.runner.set_duck(false);
    }
}

fn start_running(state: &mut RunnerState) {
    state.phase = RunnerPhase::Running;
    state.running_time = 0.0;
    state.stats.play_count += 1;
    log::info!("Intro finished, play {}", state.stats.play_count);
}

/// Test the runner against the nearest obstacle and apply the scoring table
fn check_obstacle_hit(state: &mut RunnerState) {
    let Some(obstacle) = state.horizon.obstacles.first() else {
        return;
    };
    let hit = check_detailed(
        &state.runner.bounds(),
        state.runner.collision_boxes(),
        &obstacle.bounds(),
        &obstacle.collision_boxes(),
    );
    if hit.is_none() {
        return;
    }
    if let Some(obstacle) = state.horizon.remove_first_obstacle() {
        apply_hit(state, &obstacle);
    }
}

fn apply_hit(state: &mut RunnerState, obstacle: &Obstacle) {
    let value = obstacle.value;
    let stats = &mut state.stats;
    stats.total_hits += 1;

    let critical = value >= 429;
    if (200..=399).contains(&value) {
        stats.budget -= 0.1;
    } else if critical {
        state.flash.trigger();
        stats.budget -= 1.0;
        stats.critical_hits += 1;
    }

    if value >= 500 {
        state.speed -= 0.5;
    } else if value == 200 {
        stats.score += 1;
        if state.speed < state.tuning.max_speed {
            state.speed += 0.05;
        }
    }

    state.events.push(GameEvent::ObstacleHit {
        value,
        collected: value == 200,
        critical,
    });
}

/// Invert the scene once per new multiple of the invert distance, then revert
/// after the fade duration
fn update_night_mode(state: &mut RunnerState, dt: f32) {
    if state.invert_timer > state.tuning.invert_fade_duration_ms {
        state.invert_timer = 0.0;
        state.inverted = false;
        state.events.push(GameEvent::NightMode { active: false });
    } else if state.invert_timer > 0.0 {
        state.invert_timer += dt;
    } else {
        let milestone = state.stats.score / state.tuning.invert_distance;
        if milestone > state.last_invert_milestone {
            state.last_invert_milestone = milestone;
            state.inverted = true;
            state.invert_timer = dt;
            state.events.push(GameEvent::NightMode { active: true });
        }
    }
}

/// Demo AI: start and restart on its own, duck under or jump over anything
/// that is not a 200
fn autoplay(state: &RunnerState, input: &mut RunnerInput) {
    match state.phase {
        RunnerPhase::Waiting => input.jump_pressed = true,
        RunnerPhase::Crashed => {
            input.jump_pressed = state.crash_time >= state.tuning.gameover_clear_time_ms;
        }
        RunnerPhase::Running => {
            let runner = &state.runner;
            let front = runner.x + RUNNER_WIDTH;
            let lookahead = state.speed * 12.0;
            let threat = state.horizon.obstacles.iter().find(|o| {
                o.value != 200 && o.x + o.width > runner.x && o.x - front < lookahead
            });

            match threat {
                Some(obstacle) => {
                    // The ducking box starts 18px below the top of the runner
                    let clears_duck = obstacle.y + obstacle.height <= runner.ground_y + 18.0;
                    if clears_duck {
                        if !runner.ducking && !runner.jumping {
                            input.duck_pressed = true;
                        }
                    } else if !runner.jumping && !runner.ducking {
                        input.jump_pressed = true;
                    } else if runner.ducking {
                        input.duck_released = true;
                    }
                }
                None if runner.ducking => input.duck_released = true,
                None => {}
            }
        }
        _ => {}
    }
}
