//! Confetti tossed when a page is sorted
//!
//! Visual only; particles never affect scoring.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

/// Maximum live particles
pub const MAX_PARTICLES: usize = 128;
/// Downward acceleration in pixels per frame²
pub const PARTICLE_GRAVITY: f32 = 0.35;
/// Horizontal velocity kept per frame
const DRAG: f32 = 0.99;
/// Life lost per frame (1.0 = one second at 60 Hz)
const LIFE_STEP: f32 = 1.0 / 60.0;

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Remaining life in seconds
    pub life: f32,
    pub size: f32,
    /// 0xRRGGBB
    pub color: u32,
}

/// Toss `count` particles upward from `origin`, biased toward `direction`
/// (-1 left, +1 right). Oldest particles are dropped past `MAX_PARTICLES`.
pub fn toss(
    particles: &mut Vec<Particle>,
    rng: &mut Pcg32,
    origin: Vec2,
    direction: f32,
    count: usize,
    color: u32,
) {
    for _ in 0..count {
        let vx = direction * rng.random_range(1.0..5.0) + rng.random_range(-1.5..1.5);
        let vy = -rng.random_range(4.0..9.0);
        particles.push(Particle {
            pos: origin,
            vel: Vec2::new(vx, vy),
            life: rng.random_range(0.8..1.4),
            size: rng.random_range(3.0..7.0),
            color,
        });
    }

    if particles.len() > MAX_PARTICLES {
        let excess = particles.len() - MAX_PARTICLES;
        particles.drain(..excess);
    }
}

/// Advance one frame and cull expired or fallen particles
pub fn update(particles: &mut Vec<Particle>, floor_y: f32) {
    for p in particles.iter_mut() {
        p.pos += p.vel;
        p.vel.y += PARTICLE_GRAVITY;
        p.vel.x *= DRAG;
        p.life -= LIFE_STEP;
    }
    particles.retain(|p| p.life > 0.0 && p.pos.y <= floor_y);
}
