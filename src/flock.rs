//! Birds circling the valley.
//!
//! Each bird orbits the world origin at its own radius and angular speed,
//! bobbing gently with elapsed time. Orbit parameters are drawn once from a
//! seeded `ChaCha8Rng`, so the same seed always yields the same flock.

use std::f32::consts::{FRAC_PI_2, TAU};

use bevy::prelude::Resource;
use glam::Vec3;
use log::info;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::numeric::index_to_f32;

/// Half-open interval `[min, max)` a parameter is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Span {
    /// Inclusive lower bound.
    pub min: f32,
    /// Exclusive upper bound.
    pub max: f32,
}

impl Span {
    /// Creates a span.
    #[must_use]
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Draws a value, never panicking on an empty or inverted span.
    pub fn sample(self, rng: &mut impl Rng) -> f32 {
        self.min + rng.gen::<f32>() * (self.max - self.min)
    }

    /// Whether both bounds are finite and `min <= max`.
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min <= self.max
    }
}

/// Flock size and the spans orbit parameters are drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlockParams {
    /// Number of birds.
    pub count: usize,
    /// Orbit radius.
    pub radius: Span,
    /// Angular speed multiplier.
    pub speed: Span,
    /// Cruising altitude.
    pub height: Span,
    /// Radians per tick at unit speed.
    pub angular_step: f32,
    /// Vertical bob amplitude.
    pub bob_amplitude: f32,
    /// Vertical bob rate in radians per second.
    pub bob_rate: f32,
}

impl Default for FlockParams {
    fn default() -> Self {
        Self {
            count: 5,
            radius: Span::new(20.0, 50.0),
            speed: Span::new(0.3, 0.7),
            height: Span::new(15.0, 25.0),
            angular_step: 0.02,
            bob_amplitude: 0.5,
            bob_rate: 2.0,
        }
    }
}

/// One circling bird.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrbitAgent {
    /// Current orbit angle in radians.
    pub angle: f32,
    /// Orbit radius.
    pub radius: f32,
    /// Angular speed multiplier.
    pub speed: f32,
    /// Cruising altitude.
    pub height: f32,
    /// Phase offset of the bob.
    pub phase: f32,
    /// Position written by the last tick.
    pub position: Vec3,
}

impl OrbitAgent {
    /// Yaw facing along the orbit.
    #[must_use]
    pub const fn heading(&self) -> f32 {
        self.angle + FRAC_PI_2
    }
}

/// All birds plus the shared motion constants.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct Flock {
    birds: Vec<OrbitAgent>,
    angular_step: f32,
    bob_amplitude: f32,
    bob_rate: f32,
}

impl Flock {
    /// Draws `params.count` birds from a generator seeded with `seed`.
    #[must_use]
    pub fn new(params: &FlockParams, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let birds = (0..params.count)
            .map(|i| {
                let mut bird = OrbitAgent {
                    angle: rng.gen::<f32>() * TAU,
                    radius: params.radius.sample(&mut rng),
                    speed: params.speed.sample(&mut rng),
                    height: params.height.sample(&mut rng),
                    phase: index_to_f32(i),
                    position: Vec3::ZERO,
                };
                bird.position = Self::place(&bird, params.bob_amplitude, params.bob_rate, 0.0);
                bird
            })
            .collect::<Vec<_>>();
        info!("flock of {} birds seeded with {seed}", birds.len());
        Self {
            birds,
            angular_step: params.angular_step,
            bob_amplitude: params.bob_amplitude,
            bob_rate: params.bob_rate,
        }
    }

    fn place(bird: &OrbitAgent, amplitude: f32, rate: f32, t: f32) -> Vec3 {
        Vec3::new(
            bird.angle.cos() * bird.radius,
            bird.height + (t * rate + bird.phase).sin() * amplitude,
            bird.angle.sin() * bird.radius,
        )
    }

    /// Advances every orbit by one tick.
    ///
    /// `scale` multiplies the angular step; `t` is elapsed seconds and only
    /// drives the bob.
    pub fn tick(&mut self, scale: f32, t: f32) {
        for bird in &mut self.birds {
            bird.angle += self.angular_step * bird.speed * scale;
            bird.position = Self::place(bird, self.bob_amplitude, self.bob_rate, t);
        }
    }

    /// Birds in spawn order.
    #[must_use]
    pub fn birds(&self) -> &[OrbitAgent] {
        &self.birds
    }
}
