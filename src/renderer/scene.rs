//! Game state to triangle lists
//!
//! Pure functions of the simulation state and the player's settings, so the
//! layout can be checked without a GPU. Coordinates are canvas pixels.

use glam::Vec2;

use super::shapes::{self, TextStyle};
use super::vertex::{Vertex, colors, hex, invert, with_alpha};
use crate::settings::Settings;
use crate::sim::runner::horizon::{
    CLOUD_HEIGHT, CLOUD_WIDTH, DIGIT_HEIGHT, DIGIT_WIDTH, HORIZON_LINE_WIDTH, MOON_HEIGHT,
    STAR_SIZE,
};
use crate::sim::runner::player::RUNNER_HEIGHT;
use crate::sim::runner::RunnerStatus;
use crate::sim::{PageState, Quality, RunnerPhase, RunnerState, SorterState};

/// Width of one meter digit cell, spacing included
const METER_CELL: f32 = 11.0;
const METER_Y: f32 = 5.0;
const BUDGET_BAR_Y: f32 = 20.0;
const BUDGET_BAR_HEIGHT: f32 = 8.0;
/// Space kept on the ground line between bumps
const BUMP_SPACING: f32 = 97.0;

/// Sorting bins, measured from the bottom corners
const BIN_INSET: f32 = 30.0;
const BIN_FROM_BOTTOM: f32 = 100.0;
const BIN_WIDTH: f32 = 100.0;
const BIN_HEIGHT: f32 = 60.0;
const ARM_WIDTH: f32 = 8.0;
const CLAW_OFFSET: f32 = 15.0;
const CLAW_LENGTH: f32 = 30.0;

/// One frame worth of geometry
#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub clear_color: [f32; 4],
    pub vertices: Vec<Vertex>,
}

impl Scene {
    fn new(clear_color: [f32; 4]) -> Self {
        Self {
            clear_color,
            vertices: Vec::with_capacity(1024),
        }
    }

    fn push(&mut self, vertices: Vec<Vertex>) {
        self.vertices.extend(vertices);
    }
}

fn status_color(value: u16) -> [f32; 4] {
    match value {
        200..=299 => colors::OBSTACLE_OK,
        300..=399 => colors::OBSTACLE_REDIRECT,
        400..=499 => colors::OBSTACLE_CLIENT,
        _ => colors::OBSTACLE_SERVER,
    }
}

fn budget_color(budget: f32) -> [f32; 4] {
    if budget < 25.0 {
        colors::BUDGET_LOW
    } else if budget < 50.0 {
        colors::BUDGET_MID
    } else {
        colors::BUDGET_HIGH
    }
}

/// Endless runner: sky, ground, obstacles, the runner and the HUD
pub fn runner_scene(state: &RunnerState, settings: &Settings) -> Scene {
    let night = state.inverted && settings.effective_invert();
    let paint = |c: [f32; 4]| if night { invert(c) } else { c };

    let tuning = &state.tuning;
    let mut scene = Scene::new(paint(colors::RUNNER_BACKGROUND));
    let ink = paint(colors::RUNNER_INK);

    if settings.quality.sky_details() {
        draw_sky(&mut scene, state, paint);
    }

    // Ground line the runner stands on
    let ground = state.runner.ground_y + RUNNER_HEIGHT - 2.0;
    let line = &state.horizon.line;
    for i in 0..2 {
        let x = line.x[i];
        scene.push(shapes::rect(x, ground, HORIZON_LINE_WIDTH, 1.0, ink));
        if line.bumpy[i] {
            let mut bump = x + BUMP_SPACING / 2.0;
            while bump < x + HORIZON_LINE_WIDTH {
                scene.push(shapes::rect(bump, ground - 1.0, 6.0, 1.0, ink));
                bump += BUMP_SPACING;
            }
        }
    }

    let digit_style = TextStyle {
        char_width: DIGIT_WIDTH - 2.0,
        char_height: DIGIT_HEIGHT,
        spacing: 2.0,
        thickness: 2.0,
    };
    for obstacle in state.horizon.obstacles.iter().filter(|o| !o.remove) {
        scene.push(shapes::text(
            &obstacle.value.to_string(),
            obstacle.x,
            obstacle.y,
            digit_style,
            paint(status_color(obstacle.value)),
        ));
    }

    draw_runner(&mut scene, state, ink, paint(colors::RUNNER_BACKGROUND));
    draw_meter(&mut scene, state, ink);

    // Budget bar under the score
    let bar_x = tuning.width - METER_CELL * (state.meter.max_digits as f32 + 1.0);
    let bar_width = METER_CELL * state.meter.max_digits as f32;
    let budget = state.stats.budget.clamp(0.0, 100.0);
    scene.push(shapes::rect(
        bar_x,
        BUDGET_BAR_Y,
        budget / 100.0 * bar_width,
        BUDGET_BAR_HEIGHT,
        budget_color(budget),
    ));
    scene.push(shapes::rect_outline(
        bar_x,
        BUDGET_BAR_Y,
        bar_width,
        BUDGET_BAR_HEIGHT,
        1.0,
        ink,
    ));

    if state.phase == RunnerPhase::Crashed {
        draw_restart_button(&mut scene, tuning.width, tuning.height, ink);
    }

    if settings.effective_flash() && state.flash.active {
        scene.push(shapes::rect(
            0.0,
            0.0,
            tuning.width,
            tuning.height,
            with_alpha(colors::CRITICAL_FLASH, state.flash.alpha()),
        ));
    }

    scene
}

fn draw_sky(scene: &mut Scene, state: &RunnerState, paint: impl Fn([f32; 4]) -> [f32; 4]) {
    let night = &state.horizon.night;
    if night.opacity > 0.0 {
        // Drawn in the day palette so the inversion turns it light
        let moon = with_alpha(paint(colors::RUNNER_INK), night.opacity);
        let radius = MOON_HEIGHT / 2.0;
        let center = Vec2::new(night.moon_x + night.moon_width() / 2.0, night.moon_y + radius);
        scene.push(shapes::circle(center, radius, moon, 24));
        if night.phase != 3 {
            // Shadow slides across as the phases advance
            let offset = (night.phase as f32 - 3.0) * 6.0;
            let shadow = paint(colors::RUNNER_BACKGROUND);
            scene.push(shapes::circle(
                center + Vec2::new(offset, 0.0),
                radius,
                shadow,
                24,
            ));
        }
        if night.draw_stars {
            let star = with_alpha(paint(colors::RUNNER_INK), night.opacity);
            let size = STAR_SIZE / 3.0;
            for s in &night.stars {
                scene.push(shapes::rect(s.x + size, s.y, size, size * 3.0, star));
                scene.push(shapes::rect(s.x, s.y + size, size * 3.0, size, star));
            }
        }
    }

    let cloud = paint(colors::CLOUD);
    for c in state.horizon.clouds.iter().filter(|c| !c.remove) {
        scene.push(shapes::rect(
            c.x,
            c.y + CLOUD_HEIGHT / 2.0,
            CLOUD_WIDTH,
            CLOUD_HEIGHT / 2.0,
            cloud,
        ));
        scene.push(shapes::rect(
            c.x + CLOUD_WIDTH / 4.0,
            c.y,
            CLOUD_WIDTH / 2.0,
            CLOUD_HEIGHT / 2.0,
            cloud,
        ));
    }
}

fn draw_runner(scene: &mut Scene, state: &RunnerState, ink: [f32; 4], background: [f32; 4]) {
    let runner = &state.runner;
    for part in runner.collision_boxes() {
        scene.push(shapes::rect(
            runner.x + part.x,
            runner.y + part.y,
            part.width,
            part.height,
            ink,
        ));
    }

    // Legs alternate while running or ducking
    let (legs_x, legs_y) = if runner.ducking {
        (runner.x + 20.0, runner.y + 43.0)
    } else {
        (runner.x + 10.0, runner.y + 43.0)
    };
    let stride = matches!(
        runner.status,
        RunnerStatus::Running | RunnerStatus::Ducking
    );
    let lift = |leg: usize| {
        if stride && runner.anim_frame % 2 == leg {
            2.0
        } else {
            0.0
        }
    };
    scene.push(shapes::rect(legs_x, legs_y, 3.0, 4.0 - lift(0), ink));
    scene.push(shapes::rect(legs_x + 8.0, legs_y, 3.0, 4.0 - lift(1), ink));

    // Eye, bigger once crashed
    let eye = if runner.status == RunnerStatus::Crashed {
        4.0
    } else {
        2.0
    };
    let (eye_x, eye_y) = if runner.ducking {
        (runner.x + 44.0, runner.y + 21.0)
    } else {
        (runner.x + 26.0, runner.y + 3.0)
    };
    scene.push(shapes::rect(eye_x, eye_y, eye, eye, background));
}

fn draw_meter(scene: &mut Scene, state: &RunnerState, ink: [f32; 4]) {
    let meter = &state.meter;
    let style = TextStyle {
        char_width: METER_CELL - 3.0,
        char_height: DIGIT_HEIGHT,
        spacing: 3.0,
        thickness: 2.0,
    };
    let score_x = state.tuning.width - METER_CELL * (meter.max_digits as f32 + 1.0);

    if meter.paint {
        scene.push(shapes::text(&meter.digits(), score_x, METER_Y, style, ink));
    }
    if meter.high_score > 0 {
        let high = format!("HI {}", meter.high_score_digits());
        let x = score_x - METER_CELL * (meter.max_digits as f32 + 4.0);
        scene.push(shapes::text(
            &high,
            x,
            METER_Y,
            style,
            with_alpha(ink, 0.8),
        ));
    }
}

/// Boxed play arrow in the middle of the playfield
fn draw_restart_button(scene: &mut Scene, width: f32, height: f32, ink: [f32; 4]) {
    let (w, h) = (36.0, 32.0);
    let x = (width - w) / 2.0;
    let y = (height - h) / 2.0;
    scene.push(shapes::rect_outline(x, y, w, h, 2.0, ink));
    let tip = Vec2::new(x + w * 0.7, y + h / 2.0);
    scene.push(shapes::line(Vec2::new(x + w * 0.35, y + 7.0), tip, 3.0, ink));
    scene.push(shapes::line(
        Vec2::new(x + w * 0.35, y + h - 7.0),
        tip,
        3.0,
        ink,
    ));
}

/// Page sorter: bins, the arm, the current page, confetti and the clock
pub fn sorter_scene(state: &SorterState, settings: &Settings) -> Scene {
    let mut scene = Scene::new(colors::SORTER_BACKGROUND);
    let (w, h) = (state.width, state.height);

    // Discard on the left, keep on the right
    let bin_y = h - BIN_FROM_BOTTOM;
    let discard_x = BIN_INSET;
    let keep_x = w - BIN_INSET - BIN_WIDTH;
    scene.push(shapes::rect(discard_x, bin_y, BIN_WIDTH, BIN_HEIGHT, colors::BIN));
    scene.push(shapes::rect(keep_x, bin_y, BIN_WIDTH, BIN_HEIGHT, colors::BIN));
    draw_cross(
        &mut scene,
        Vec2::new(discard_x + BIN_WIDTH / 2.0, bin_y + BIN_HEIGHT / 2.0),
        colors::BIN_LABEL_DISCARD,
    );
    draw_check(
        &mut scene,
        Vec2::new(keep_x + BIN_WIDTH / 2.0, bin_y + BIN_HEIGHT / 2.0),
        colors::BIN_LABEL_KEEP,
    );

    if let Some(page) = &state.page {
        let (origin, size) = page.scaled_rect();
        scene.push(shapes::rect(origin.x, origin.y, size.x, size.y, colors::PAGE));

        let s = page.scale;
        let style = TextStyle::with_height(18.0 * s);
        let left = origin.x + 20.0 * s;
        scene.push(shapes::text(
            &page.status_code.to_string(),
            left,
            origin.y + 20.0 * s,
            style,
            colors::PAGE_TEXT,
        ));
        if page.is_error_page {
            scene.push(shapes::text(
                "Err",
                left,
                origin.y + 50.0 * s,
                style,
                colors::BIN_LABEL_DISCARD,
            ));
        }
        // One bar per quality level
        let bars = match page.quality {
            Quality::High => 3,
            Quality::Medium => 2,
            Quality::Low => 1,
        };
        for i in 0..bars {
            scene.push(shapes::rect(
                left + i as f32 * 14.0 * s,
                origin.y + 84.0 * s,
                10.0 * s,
                12.0 * s,
                colors::PAGE_TEXT,
            ));
        }
    }

    // Arm hangs from the top center and holds the page in its claws
    let base = Vec2::new(w / 2.0, 0.0);
    let end = state.arm_end();
    let holding = state
        .page
        .as_ref()
        .is_some_and(|p| p.state != PageState::ScrollOut);
    scene.push(shapes::line(base, end, ARM_WIDTH, colors::ARM));
    let claw_spread = if holding {
        CLAW_OFFSET
    } else {
        CLAW_OFFSET + 5.0
    };
    for side in [-1.0, 1.0] {
        let top = end + Vec2::new(side * claw_spread, 0.0);
        scene.push(shapes::line(
            top,
            top + Vec2::new(0.0, CLAW_LENGTH),
            4.0,
            colors::ARM,
        ));
    }

    let limit = settings.quality.confetti_limit();
    for p in state.particles.iter().rev().take(limit) {
        scene.push(shapes::rect(
            p.pos.x - p.size / 2.0,
            p.pos.y - p.size / 2.0,
            p.size,
            p.size,
            hex(p.color, p.life.clamp(0.0, 1.0)),
        ));
    }

    // Clock and streak multiplier
    let style = TextStyle::with_height(20.0);
    scene.push(shapes::text(
        &state.time_left.to_string(),
        16.0,
        16.0,
        style,
        colors::TIMER,
    ));
    if let Some(multiplier) = state.combo_multiplier() {
        let label = format!("x{multiplier}");
        scene.push(shapes::text(
            &label,
            w - 16.0 - style.width_of(&label),
            16.0,
            style,
            colors::BIN_LABEL_KEEP,
        ));
    }

    scene
}

fn draw_cross(scene: &mut Scene, center: Vec2, color: [f32; 4]) {
    let r = 12.0;
    scene.push(shapes::line(
        center + Vec2::new(-r, -r),
        center + Vec2::new(r, r),
        4.0,
        color,
    ));
    scene.push(shapes::line(
        center + Vec2::new(-r, r),
        center + Vec2::new(r, -r),
        4.0,
        color,
    ));
}

fn draw_check(scene: &mut Scene, center: Vec2, color: [f32; 4]) {
    let corner = center + Vec2::new(-4.0, 10.0);
    scene.push(shapes::line(center + Vec2::new(-14.0, 0.0), corner, 4.0, color));
    scene.push(shapes::line(corner, center + Vec2::new(14.0, -12.0), 4.0, color));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::QualityPreset;
    use crate::sim::{SorterInput, Verdict, sorter};
    use crate::tuning::{RunnerTuning, SorterTuning};

    fn has_color(scene: &Scene, color: [f32; 4]) -> bool {
        scene.vertices.iter().any(|v| v.color == color)
    }

    #[test]
    fn test_runner_scene_waiting() {
        let state = RunnerState::new(1, RunnerTuning::default());
        let scene = runner_scene(&state, &Settings::default());
        assert_eq!(scene.clear_color, colors::RUNNER_BACKGROUND);
        assert!(!scene.vertices.is_empty());
        assert_eq!(scene.vertices.len() % 3, 0);
        assert!(has_color(&scene, colors::RUNNER_INK));
    }

    #[test]
    fn test_night_respects_reduced_motion() {
        let mut state = RunnerState::new(1, RunnerTuning::default());
        state.inverted = true;

        let scene = runner_scene(&state, &Settings::default());
        assert_eq!(scene.clear_color, invert(colors::RUNNER_BACKGROUND));

        let calm = Settings {
            reduced_motion: true,
            ..Settings::default()
        };
        let scene = runner_scene(&state, &calm);
        assert_eq!(scene.clear_color, colors::RUNNER_BACKGROUND);
    }

    #[test]
    fn test_flash_overlay() {
        let mut state = RunnerState::new(1, RunnerTuning::default());
        state.flash.trigger();
        let overlay = with_alpha(colors::CRITICAL_FLASH, state.flash.alpha());

        assert!(has_color(&runner_scene(&state, &Settings::default()), overlay));

        let calm = Settings {
            reduced_motion: true,
            ..Settings::default()
        };
        assert!(!has_color(&runner_scene(&state, &calm), overlay));
    }

    #[test]
    fn test_low_quality_skips_clouds() {
        let state = RunnerState::new(1, RunnerTuning::default());
        assert!(!state.horizon.clouds.is_empty());
        let low = Settings {
            quality: QualityPreset::Low,
            ..Settings::default()
        };
        assert!(!has_color(&runner_scene(&state, &low), colors::CLOUD));
        assert!(has_color(
            &runner_scene(&state, &Settings::default()),
            colors::CLOUD
        ));
    }

    #[test]
    fn test_sorter_scene_draws_page() {
        let mut state = SorterState::new(5, 800.0, 450.0, SorterTuning::default());
        let empty = sorter_scene(&state, &Settings::default());
        assert!(!has_color(&empty, colors::PAGE));

        state.start();
        sorter::tick(&mut state, &SorterInput::default());
        let scene = sorter_scene(&state, &Settings::default());
        assert!(has_color(&scene, colors::PAGE));
        assert!(has_color(&scene, colors::ARM));
        assert_eq!(scene.vertices.len() % 3, 0);
    }

    #[test]
    fn test_confetti_follows_quality() {
        let mut state = SorterState::new(5, 800.0, 450.0, SorterTuning::default());
        state.start();
        sorter::tick(&mut state, &SorterInput::default());
        sorter::tick(
            &mut state,
            &SorterInput {
                verdict: Some(Verdict::Keep),
                ..Default::default()
            },
        );
        assert!(!state.particles.is_empty());

        let low = Settings {
            quality: QualityPreset::Low,
            ..Settings::default()
        };
        let count = |settings: &Settings| sorter_scene(&state, settings).vertices.len();
        assert!(count(&low) < count(&Settings::default()));
    }
}
