//! Cash confetti particle simulation
//!
//! A short-lived burst spawned around the winner's circle. Particles are
//! plain values; each advance produces the surviving set.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

const MIN_PARTICLE_COUNT: usize = 20;
const MAX_PARTICLE_COUNT: usize = 40;
const MIN_SPEED: f32 = 260.0;
const MAX_SPEED: f32 = 780.0;
const MIN_GRAVITY: f32 = 700.0;
const MAX_GRAVITY: f32 = 1200.0;
const MIN_LIFETIME_MS: f64 = 1000.0;
const MAX_LIFETIME_MS: f64 = 1800.0;
const MIN_DRAG: f32 = 0.08;
const MAX_DRAG: f32 = 0.22;
const MIN_SPIN: f32 = 1.6;
const MAX_SPIN: f32 = 5.5;
const MIN_SIZE_RATIO: f32 = 0.35;
const MAX_SIZE_RATIO: f32 = 0.6;
const SPAWN_RADIUS_RATIO: f32 = 0.45;
const MIN_SPAWN_RADIUS: f32 = 6.0;
const MIN_SIZE_PX: f32 = 18.0;
const FRONT_LAYER_PROBABILITY: f64 = 0.5;

/// Longest step integrated at once (seconds); longer gaps are clamped
pub const MAX_DELTA_SECONDS: f32 = 0.05;

/// Fade-in lasts for this fraction of a particle's life
const FADE_IN_PORTION: f32 = 0.12;
/// Fade-out starts at this fraction of a particle's life
const FADE_OUT_START: f32 = 0.72;

/// Draw order of a particle relative to the highlighted circle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfettiLayer {
    Back,
    Front,
}

/// A single confetti bill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfettiParticle {
    pub pos: Vec2,
    /// Velocity in px/s
    pub vel: Vec2,
    /// Downward acceleration in px/s²
    pub gravity: f32,
    /// Fraction of velocity lost per second
    pub drag: f32,
    /// Radians
    pub rotation: f32,
    /// Radians per second
    pub rotation_vel: f32,
    /// Glyph size in px
    pub size: f32,
    pub born_at_ms: f64,
    pub lifetime_ms: f64,
    pub layer: ConfettiLayer,
}

impl ConfettiParticle {
    pub fn age_ms(&self, now: f64) -> f64 {
        now - self.born_at_ms
    }

    pub fn is_alive(&self, now: f64) -> bool {
        self.age_ms(now) < self.lifetime_ms
    }

    /// Draw opacity: fade in over the first 12% of life, hold, fade out after 72%
    pub fn opacity(&self, now: f64) -> f32 {
        let progress = (self.age_ms(now) / self.lifetime_ms).clamp(0.0, 1.0) as f32;
        if progress < FADE_IN_PORTION {
            progress / FADE_IN_PORTION
        } else if progress > FADE_OUT_START {
            (1.0 - progress) / (1.0 - FADE_OUT_START)
        } else {
            1.0
        }
    }

    fn integrate(&mut self, dt: f32) {
        if dt <= 0.0 {
            return;
        }
        self.vel.y += self.gravity * dt;
        self.vel *= (1.0 - self.drag * dt).max(0.0);
        self.pos += self.vel * dt;
        self.rotation += self.rotation_vel * dt;
    }
}

/// Outcome of one simulation step
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfettiStep {
    pub particles: Vec<ConfettiParticle>,
    /// `None` once nothing is left to simulate
    pub last_updated_at_ms: Option<f64>,
}

/// Spawn a burst around `origin`, scaled to a circle of `circle_radius`
pub fn spawn_confetti<R: Rng>(
    rng: &mut R,
    now: f64,
    origin: Vec2,
    circle_radius: f32,
) -> Vec<ConfettiParticle> {
    let count = rng.random_range(MIN_PARTICLE_COUNT..=MAX_PARTICLE_COUNT);
    let circle_radius = circle_radius.max(MIN_SPAWN_RADIUS);
    let spawn_radius = (circle_radius * SPAWN_RADIUS_RATIO).max(MIN_SPAWN_RADIUS);
    let min_size = (circle_radius * MIN_SIZE_RATIO).max(MIN_SIZE_PX);
    let max_size = (circle_radius * MAX_SIZE_RATIO).max(min_size);

    (0..count)
        .map(|_| {
            let angle = rng.random_range(0.0..TAU);
            let speed = rng.random_range(MIN_SPEED..MAX_SPEED);
            let offset_angle = rng.random_range(0.0..TAU);
            let offset_radius = random_between(rng, 0.0, spawn_radius);
            let spin_sign = if rng.random_bool(0.5) { 1.0 } else { -1.0 };

            ConfettiParticle {
                pos: origin + Vec2::from_angle(offset_angle) * offset_radius,
                vel: Vec2::from_angle(angle) * speed,
                gravity: rng.random_range(MIN_GRAVITY..MAX_GRAVITY),
                drag: rng.random_range(MIN_DRAG..MAX_DRAG),
                rotation: rng.random_range(0.0..TAU),
                rotation_vel: rng.random_range(MIN_SPIN..MAX_SPIN) * spin_sign,
                size: random_between(rng, min_size, max_size),
                born_at_ms: now,
                lifetime_ms: rng.random_range(MIN_LIFETIME_MS..MAX_LIFETIME_MS),
                layer: if rng.random_bool(FRONT_LAYER_PROBABILITY) {
                    ConfettiLayer::Front
                } else {
                    ConfettiLayer::Back
                },
            }
        })
        .collect()
}

/// Advance every particle to `now`, dropping the ones past their lifetime
pub fn advance_confetti(
    now: f64,
    particles: &[ConfettiParticle],
    last_updated_at_ms: Option<f64>,
) -> ConfettiStep {
    if particles.is_empty() {
        return ConfettiStep::default();
    }

    let dt = delta_seconds(now, last_updated_at_ms.unwrap_or(now));
    let particles: Vec<ConfettiParticle> = particles
        .iter()
        .filter(|p| p.is_alive(now))
        .cloned()
        .map(|mut p| {
            p.integrate(dt);
            p
        })
        .collect();

    let last_updated_at_ms = if particles.is_empty() { None } else { Some(now) };
    ConfettiStep {
        particles,
        last_updated_at_ms,
    }
}

fn delta_seconds(now: f64, last_updated_at_ms: f64) -> f32 {
    let dt = ((now - last_updated_at_ms) / 1000.0) as f32;
    if dt <= 0.0 { 0.0 } else { dt.min(MAX_DELTA_SECONDS) }
}

// random_range panics on an empty range, which a degenerate radius can produce
fn random_between<R: Rng>(rng: &mut R, min: f32, max: f32) -> f32 {
    min + rng.random::<f32>() * (max - min)
}
