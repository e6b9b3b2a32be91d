//! The scrolling world: ground line, clouds, night sky and status-code obstacles

use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::player::RUNNER_HEIGHT;
use crate::consts::SIM_HZ;
use crate::sim::collision::CollisionBox;
use crate::tuning::RunnerTuning;

/// Size of one digit of an obstacle or the distance meter
pub const DIGIT_WIDTH: f32 = 10.0;
pub const DIGIT_HEIGHT: f32 = 13.0;

pub const MAX_GAP_COEFFICIENT: f32 = 1.5;

pub const CLOUD_WIDTH: f32 = 46.0;
pub const CLOUD_HEIGHT: f32 = 14.0;
const MIN_CLOUD_GAP: i32 = 100;
const MAX_CLOUD_GAP: i32 = 400;
/// Sky band clouds are placed in (y grows downward)
const MAX_SKY_LEVEL: i32 = 30;
const MIN_SKY_LEVEL: i32 = 71;

pub const HORIZON_LINE_WIDTH: f32 = 600.0;
pub const HORIZON_LINE_HEIGHT: f32 = 12.0;
const BUMP_THRESHOLD: f32 = 0.5;

pub const MOON_WIDTH: f32 = 20.0;
pub const MOON_HEIGHT: f32 = 40.0;
pub const STAR_SIZE: f32 = 9.0;
const FADE_SPEED: f32 = 0.035;
const MOON_SPEED: f32 = 0.25;
const STAR_SPEED: f32 = 0.3;
const STAR_MAX_Y: i32 = 70;
pub const NUM_STARS: usize = 2;
/// Crescent offsets for each moon phase; phase 3 is the full moon
pub const MOON_PHASES: [f32; 7] = [140.0, 120.0, 100.0, 60.0, 40.0, 20.0, 0.0];

/// Uniform integer in `[min, max]`, as a float
fn random_int(rng: &mut Pcg32, min: i32, max: i32) -> f32 {
    if max <= min {
        return min as f32;
    }
    rng.random_range(min..=max) as f32
}

/// An HTTP status code scrolling toward the runner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub value: u16,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Distance to keep clear behind this obstacle before the next spawns
    pub gap: f32,
    pub remove: bool,
    pub following_created: bool,
}

impl Obstacle {
    /// Create an obstacle at the right edge of the playfield
    pub fn spawn(id: u32, value: u16, speed: f32, tuning: &RunnerTuning, rng: &mut Pcg32) -> Self {
        let width = digit_count(value) as f32 * DIGIT_WIDTH;
        let height = DIGIT_HEIGHT;

        let ground_level = tuning.height - tuning.bottom_pad;
        // Top of the runner's head at the peak of a jump
        let highest = ground_level - RUNNER_HEIGHT - tuning.max_jump_height;
        let y = random_int(rng, highest as i32, (ground_level - height) as i32);

        let min_gap = (width * speed + 120.0 * tuning.gap_coefficient).round();
        let max_gap = (min_gap * MAX_GAP_COEFFICIENT).round();
        let gap = random_int(rng, min_gap as i32, max_gap as i32);

        Self {
            id,
            value,
            x: tuning.width,
            y,
            width,
            height,
            gap,
            remove: false,
            following_created: false,
        }
    }

    pub fn update(&mut self, dt: f32, speed: f32) {
        if !self.remove {
            self.x -= speed * SIM_HZ / 1000.0 * dt;
            if !self.is_visible() {
                self.remove = true;
            }
        }
    }

    pub fn is_visible(&self) -> bool {
        self.x + self.width > 0.0
    }

    pub fn bounds(&self) -> CollisionBox {
        CollisionBox::new(self.x, self.y, self.width, self.height).inset(1.0)
    }

    /// The whole number is one collision box
    pub fn collision_boxes(&self) -> [CollisionBox; 1] {
        [CollisionBox::new(0.0, 0.0, self.width, self.height)]
    }
}

pub fn digit_count(value: u16) -> u32 {
    value.checked_ilog10().unwrap_or(0) + 1
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cloud {
    pub x: f32,
    pub y: f32,
    pub gap: f32,
    pub remove: bool,
}

impl Cloud {
    pub fn new(x: f32, rng: &mut Pcg32) -> Self {
        Self {
            x,
            y: random_int(rng, MAX_SKY_LEVEL, MIN_SKY_LEVEL),
            gap: random_int(rng, MIN_CLOUD_GAP, MAX_CLOUD_GAP),
            remove: false,
        }
    }

    pub fn update(&mut self, speed: f32) {
        if !self.remove {
            self.x -= speed.ceil();
            if !self.is_visible() {
                self.remove = true;
            }
        }
    }

    pub fn is_visible(&self) -> bool {
        self.x + CLOUD_WIDTH > 0.0
    }
}

/// Two ground segments leapfrogging each other
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HorizonLine {
    pub x: [f32; 2],
    pub bumpy: [bool; 2],
}

impl Default for HorizonLine {
    fn default() -> Self {
        Self {
            x: [0.0, HORIZON_LINE_WIDTH],
            bumpy: [false, true],
        }
    }
}

impl HorizonLine {
    pub fn update(&mut self, dt: f32, speed: f32, rng: &mut Pcg32) {
        let increment = speed * (SIM_HZ / 1000.0) * dt;
        if self.x[0] <= 0.0 {
            self.scroll(0, increment, rng);
        } else {
            self.scroll(1, increment, rng);
        }
    }

    fn scroll(&mut self, lead: usize, increment: f32, rng: &mut Pcg32) {
        let trail = 1 - lead;
        self.x[lead] -= increment;
        self.x[trail] = self.x[lead] + HORIZON_LINE_WIDTH;

        if self.x[lead] <= -HORIZON_LINE_WIDTH {
            self.x[lead] += HORIZON_LINE_WIDTH * 2.0;
            self.x[trail] = self.x[lead] - HORIZON_LINE_WIDTH;
            self.bumpy[lead] = rng.random::<f32>() > BUMP_THRESHOLD;
        }
    }

    pub fn reset(&mut self) {
        self.x = [0.0, HORIZON_LINE_WIDTH];
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Star {
    pub x: f32,
    pub y: f32,
}

/// Moon and stars that fade in while the scene is inverted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NightMode {
    pub opacity: f32,
    pub moon_x: f32,
    pub moon_y: f32,
    pub phase: usize,
    pub stars: [Star; NUM_STARS],
    pub draw_stars: bool,
    container_width: f32,
}

impl NightMode {
    pub fn new(container_width: f32, rng: &mut Pcg32) -> Self {
        let mut night = Self {
            opacity: 0.0,
            moon_x: container_width - 50.0,
            moon_y: 30.0,
            phase: 0,
            stars: [Star::default(); NUM_STARS],
            draw_stars: false,
            container_width,
        };
        night.place_stars(rng);
        night
    }

    pub fn update(&mut self, activated: bool, rng: &mut Pcg32) {
        // Each night starts on the next moon phase
        if activated && self.opacity == 0.0 {
            self.phase = (self.phase + 1) % MOON_PHASES.len();
        }

        if activated && self.opacity < 1.0 {
            self.opacity = (self.opacity + FADE_SPEED).min(1.0);
        } else if !activated && self.opacity > 0.0 {
            self.opacity -= FADE_SPEED;
        }

        if self.opacity > 0.0 {
            let width = self.container_width;
            self.moon_x = wrap_x(self.moon_x, MOON_SPEED, width);
            if self.draw_stars {
                for star in self.stars.iter_mut() {
                    star.x = wrap_x(star.x, STAR_SPEED, width);
                }
            }
        } else {
            self.opacity = 0.0;
            self.place_stars(rng);
        }
        self.draw_stars = true;
    }

    fn place_stars(&mut self, rng: &mut Pcg32) {
        let segment = (self.container_width / NUM_STARS as f32).round() as i32;
        for (i, star) in self.stars.iter_mut().enumerate() {
            let i = i as i32;
            star.x = random_int(rng, segment * i, segment * (i + 1));
            star.y = random_int(rng, 0, STAR_MAX_Y);
        }
    }

    /// Moon width for the current phase (the full moon is twice as wide)
    pub fn moon_width(&self) -> f32 {
        if self.phase == 3 {
            MOON_WIDTH * 2.0
        } else {
            MOON_WIDTH
        }
    }

    pub fn reset(&mut self, rng: &mut Pcg32) {
        self.phase = 0;
        self.opacity = 0.0;
        self.update(false, rng);
    }
}

/// Drift left, wrapping back to the right edge once fully off-screen
fn wrap_x(x: f32, speed: f32, container_width: f32) -> f32 {
    if x < -MOON_WIDTH {
        container_width
    } else {
        x - speed
    }
}

/// Everything that scrolls behind and toward the runner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Horizon {
    pub obstacles: Vec<Obstacle>,
    pub clouds: Vec<Cloud>,
    pub line: HorizonLine,
    pub night: NightMode,
    next_obstacle_id: u32,
}

impl Horizon {
    /// The line and a single cloud, no obstacles
    pub fn new(tuning: &RunnerTuning, rng: &mut Pcg32) -> Self {
        let mut horizon = Self {
            obstacles: Vec::new(),
            clouds: Vec::new(),
            line: HorizonLine::default(),
            night: NightMode::new(tuning.width, rng),
            next_obstacle_id: 1,
        };
        horizon.add_cloud(tuning, rng);
        horizon
    }

    /// `update_obstacles` is false until the clear time has passed after the intro.
    pub fn update(
        &mut self,
        dt: f32,
        speed: f32,
        update_obstacles: bool,
        show_night: bool,
        tuning: &RunnerTuning,
        rng: &mut Pcg32,
    ) {
        self.line.update(dt, speed, rng);
        self.night.update(show_night, rng);
        self.update_clouds(dt, speed, tuning, rng);

        if update_obstacles {
            self.update_obstacles(dt, speed, tuning, rng);
        }
    }

    fn update_clouds(&mut self, dt: f32, speed: f32, tuning: &RunnerTuning, rng: &mut Pcg32) {
        if self.clouds.is_empty() {
            self.add_cloud(tuning, rng);
            return;
        }

        let cloud_speed = tuning.bg_cloud_speed / 1000.0 * dt * speed;
        for cloud in self.clouds.iter_mut() {
            cloud.update(cloud_speed);
        }

        let last_clear = self
            .clouds
            .last()
            .is_some_and(|last| tuning.width - last.x > last.gap);

        if self.clouds.len() < tuning.max_clouds
            && last_clear
            && tuning.cloud_frequency > rng.random::<f32>()
        {
            self.add_cloud(tuning, rng);
        }

        self.clouds.retain(|c| !c.remove);
    }

    fn update_obstacles(&mut self, dt: f32, speed: f32, tuning: &RunnerTuning, rng: &mut Pcg32) {
        for obstacle in self.obstacles.iter_mut() {
            obstacle.update(dt, speed);
        }
        self.obstacles.retain(|o| !o.remove);

        match self.obstacles.last_mut() {
            Some(last) => {
                if !last.following_created
                    && last.is_visible()
                    && last.x + last.width + last.gap < tuning.width
                {
                    last.following_created = true;
                    self.add_obstacle(speed, tuning, rng);
                }
            }
            None => self.add_obstacle(speed, tuning, rng),
        }
    }

    fn add_obstacle(&mut self, speed: f32, tuning: &RunnerTuning, rng: &mut Pcg32) {
        let value = tuning.status_codes[rng.random_range(0..tuning.status_codes.len())];
        let obstacle = Obstacle::spawn(self.next_obstacle_id, value, speed, tuning, rng);
        log::debug!(
            "Spawned obstacle {} ({}) at y={} gap={}",
            obstacle.id,
            obstacle.value,
            obstacle.y,
            obstacle.gap
        );
        self.next_obstacle_id += 1;
        self.obstacles.push(obstacle);
    }

    fn add_cloud(&mut self, tuning: &RunnerTuning, rng: &mut Pcg32) {
        self.clouds.push(Cloud::new(tuning.width, rng));
    }

    pub fn remove_first_obstacle(&mut self) -> Option<Obstacle> {
        if self.obstacles.is_empty() {
            None
        } else {
            Some(self.obstacles.remove(0))
        }
    }

    /// Clear obstacles and reposition the line and night sky
    pub fn reset(&mut self, rng: &mut Pcg32) {
        self.obstacles.clear();
        self.line.reset();
        self.night.reset(rng);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT_MS;
    use rand::SeedableRng;

    #[test]
    fn test_obstacle_dimensions_and_range() {
        let tuning = RunnerTuning::default();
        let mut rng = Pcg32::seed_from_u64(11);
        for _ in 0..200 {
            let obstacle = Obstacle::spawn(1, 503, tuning.speed, &tuning, &mut rng);
            assert_eq!(obstacle.width, 30.0);
            assert_eq!(obstacle.height, 13.0);
            assert_eq!(obstacle.x, tuning.width);
            assert!((63.0..=127.0).contains(&obstacle.y));
            assert_eq!(obstacle.y.fract(), 0.0);

            // minGap = round(30 * 6 + 72) = 252, maxGap = 378
            assert!((252.0..=378.0).contains(&obstacle.gap));
        }
    }

    #[test]
    fn test_digit_count() {
        assert_eq!(digit_count(0), 1);
        assert_eq!(digit_count(7), 1);
        assert_eq!(digit_count(200), 3);
        assert_eq!(digit_count(10000), 5);
    }

    #[test]
    fn test_obstacle_removed_once_off_screen() {
        let tuning = RunnerTuning::default();
        let mut rng = Pcg32::seed_from_u64(5);
        let mut obstacle = Obstacle::spawn(1, 200, tuning.speed, &tuning, &mut rng);
        obstacle.x = -26.0;
        obstacle.update(SIM_DT_MS, tuning.speed);
        assert!(obstacle.x + obstacle.width <= 0.0);
        assert!(obstacle.remove);
    }

    #[test]
    fn test_obstacles_follow_and_cull() {
        let tuning = RunnerTuning::default();
        let mut rng = Pcg32::seed_from_u64(99);
        let mut horizon = Horizon::new(&tuning, &mut rng);

        horizon.update(SIM_DT_MS, tuning.speed, true, false, &tuning, &mut rng);
        assert_eq!(horizon.obstacles.len(), 1);

        let mut max_seen = 0;
        for _ in 0..3000 {
            horizon.update(SIM_DT_MS, tuning.speed, true, false, &tuning, &mut rng);
            max_seen = max_seen.max(horizon.obstacles.len());
            for obstacle in &horizon.obstacles {
                assert!(obstacle.is_visible());
            }
            for cloud in &horizon.clouds {
                assert!(cloud.is_visible());
            }
            assert!(horizon.clouds.len() <= tuning.max_clouds);
        }
        assert!(max_seen >= 2);
        // Ids keep increasing as obstacles are recycled
        assert!(horizon.next_obstacle_id > 10);
    }

    #[test]
    fn test_horizon_line_leapfrogs() {
        let mut rng = Pcg32::seed_from_u64(2);
        let mut line = HorizonLine::default();
        for _ in 0..500 {
            line.update(SIM_DT_MS, 13.0, &mut rng);
            assert!(((line.x[0] - line.x[1]).abs() - HORIZON_LINE_WIDTH).abs() < 1e-2);
            assert!(line.x[0].min(line.x[1]) > -HORIZON_LINE_WIDTH);
        }
    }

    #[test]
    fn test_night_mode_fades_and_cycles_phase() {
        let mut rng = Pcg32::seed_from_u64(8);
        let mut night = NightMode::new(600.0, &mut rng);
        night.update(true, &mut rng);
        assert_eq!(night.phase, 1);
        assert!(night.opacity > 0.0);

        for _ in 0..100 {
            night.update(true, &mut rng);
        }
        assert_eq!(night.opacity, 1.0);
        assert_eq!(night.phase, 1);

        for _ in 0..100 {
            night.update(false, &mut rng);
        }
        assert_eq!(night.opacity, 0.0);
        for star in &night.stars {
            assert!((0.0..=70.0).contains(&star.y));
        }
    }
}
