//! Avatar movement.
//!
//! The avatar has no physics: every tick its planar velocity is rebuilt
//! from the held keys and the joystick and added straight onto the
//! position. Diagonal key input is not normalised and the world has no
//! boundary, so the avatar roams freely.

use glam::{Vec2, Vec3};
use log::trace;
use serde::{Deserialize, Serialize};

use crate::input::InputState;
use crate::{AVATAR_SPAWN, AVATAR_SPEED};

/// Receives the avatar position after every integration step.
pub trait PositionObserver {
    /// Called with the freshly integrated position.
    fn position_changed(&mut self, position: Vec3);
}

impl<F> PositionObserver for F
where
    F: FnMut(Vec3),
{
    fn position_changed(&mut self, position: Vec3) {
        self(position);
    }
}

/// Avatar tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MoverParams {
    /// Displacement per tick for each held key, and for a saturated
    /// joystick axis.
    pub speed: f32,
    /// Initial position.
    pub spawn: Vec3,
}

impl Default for MoverParams {
    fn default() -> Self {
        Self {
            speed: AVATAR_SPEED,
            spawn: Vec3::from_array(AVATAR_SPAWN),
        }
    }
}

/// Avatar state: where it is and how it moved on the last tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Mover {
    position: Vec3,
    speed: f32,
    velocity: Vec2,
}

impl Default for Mover {
    fn default() -> Self {
        Self::new(MoverParams::default())
    }
}

impl Mover {
    /// Places a resting avatar at `params.spawn`.
    #[must_use]
    pub const fn new(params: MoverParams) -> Self {
        Self {
            position: params.spawn,
            speed: params.speed,
            velocity: Vec2::ZERO,
        }
    }

    /// Current position.
    #[must_use]
    pub const fn position(&self) -> Vec3 {
        self.position
    }

    /// Planar velocity `(x, z)` applied on the last tick.
    #[must_use]
    pub const fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Per-key speed.
    #[must_use]
    pub const fn speed(&self) -> f32 {
        self.speed
    }

    /// Planar velocity `(x, z)` the given input asks for.
    ///
    /// Each held key adds `speed` along its own axis, so two perpendicular
    /// keys move faster than one. The joystick adds its vector scaled by the
    /// same speed.
    #[must_use]
    pub fn velocity_intent(&self, input: &InputState) -> Vec2 {
        let keys: Vec2 = input.held().map(|key| key.direction()).sum();
        (keys + input.joystick()) * self.speed
    }

    /// Integrates one tick and reports the new position to `observer`.
    ///
    /// `scale` multiplies the displacement; pass the throttle's compensation
    /// factor, or `1.0` when ticking every frame.
    pub fn tick(
        &mut self,
        input: &InputState,
        scale: f32,
        observer: &mut impl PositionObserver,
    ) -> Vec3 {
        self.velocity = self.velocity_intent(input);
        let step = self.velocity * scale;
        self.position.x += step.x;
        self.position.z += step.y;
        trace!("avatar at {:?}", self.position);
        observer.position_changed(self.position);
        self.position
    }
}
