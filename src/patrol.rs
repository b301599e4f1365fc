//! Scripted patrol agents: traffic lanes and drifting clouds.
//!
//! An agent moves at constant speed along its lane and, once the tracked
//! coordinate passes the far end of the lane, teleports back to the near
//! end. Lanes are one-way loops; nothing ever bounces or collides.

use std::f32::consts::{FRAC_PI_2, FRAC_PI_6, PI};

use glam::{Vec2, Vec3};
use log::trace;
use serde::{Deserialize, Serialize};

use crate::vector_math::heading_step;

/// Horizontal world axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    /// East-west.
    X,
    /// North-south.
    Z,
}

impl Axis {
    const fn of(self, position: Vec3) -> f32 {
        match self {
            Self::X => position.x,
            Self::Z => position.z,
        }
    }

    /// Component of a planar `(x, z)` vector along this axis.
    const fn of_planar(self, planar: Vec2) -> f32 {
        match self {
            Self::X => planar.x,
            Self::Z => planar.y,
        }
    }

    const fn set(self, position: &mut Vec3, value: f32) {
        match self {
            Self::X => position.x = value,
            Self::Z => position.z = value,
        }
    }

    const fn other(self) -> Self {
        match self {
            Self::X => Self::Z,
            Self::Z => Self::X,
        }
    }
}

/// Path shape of a lane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Travel {
    /// Straight along one axis.
    Axis {
        /// Axis of travel, also the wrap axis.
        axis: Axis,
    },
    /// Straight along a fixed heading, wrapped on one axis.
    Heading {
        /// Radians from `+z` towards `+x`.
        angle: f32,
        /// Axis whose coordinate is compared against the lane bounds.
        tracked: Axis,
    },
}

/// Which way along the lane the agent drives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Along the axis or heading.
    #[default]
    Forward,
    /// Against it.
    Backward,
}

impl Direction {
    const fn sign(self) -> f32 {
        match self {
            Self::Forward => 1.0,
            Self::Backward => -1.0,
        }
    }
}

/// A one-way loop on the closed interval `[min, max]` of the tracked axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Lane {
    /// Path shape.
    pub travel: Travel,
    /// Lower bound of the tracked coordinate.
    pub min: f32,
    /// Upper bound of the tracked coordinate.
    pub max: f32,
    /// Distance covered per tick.
    pub speed: f32,
    /// Driving direction.
    #[serde(default)]
    pub direction: Direction,
    /// Cross-axis coordinate restored on re-entry, for lanes that drift
    /// sideways while travelling.
    #[serde(default)]
    pub reentry_cross: Option<f32>,
}

impl Lane {
    /// Lane along `axis` on `[min, max]`.
    #[must_use]
    pub const fn along(axis: Axis, min: f32, max: f32, speed: f32, direction: Direction) -> Self {
        Self {
            travel: Travel::Axis { axis },
            min,
            max,
            speed,
            direction,
            reentry_cross: None,
        }
    }

    /// Axis compared against `min` and `max`.
    #[must_use]
    pub const fn tracked_axis(&self) -> Axis {
        match self.travel {
            Travel::Axis { axis } | Travel::Heading { tracked: axis, .. } => axis,
        }
    }

    /// Planar displacement `(x, z)` for one unscaled tick.
    #[must_use]
    pub fn step(&self) -> Vec2 {
        let distance = self.speed * self.direction.sign();
        match self.travel {
            Travel::Axis { axis: Axis::X } => Vec2::new(distance, 0.0),
            Travel::Axis { axis: Axis::Z } => Vec2::new(0.0, distance),
            Travel::Heading { angle, .. } => heading_step(angle, distance),
        }
    }

    /// Signed distance covered along the tracked axis in one unscaled tick.
    ///
    /// A lane whose heading is perpendicular to its tracked axis never
    /// reaches either bound, so this is what decides whether it loops.
    #[must_use]
    pub fn tracked_progress(&self) -> f32 {
        self.tracked_axis().of_planar(self.step())
    }

    /// Yaw of an agent on this lane, radians from `+z` towards `+x`.
    #[must_use]
    pub const fn heading(&self) -> f32 {
        let forward = match self.travel {
            Travel::Axis { axis: Axis::X } => FRAC_PI_2,
            Travel::Axis { axis: Axis::Z } => 0.0,
            Travel::Heading { angle, .. } => angle,
        };
        match self.direction {
            Direction::Forward => forward,
            Direction::Backward => forward + PI,
        }
    }

    /// Returns the re-entry coordinate when `coord`, moving with
    /// `velocity` along the tracked axis, has left the lane.
    ///
    /// Comparison is strict: sitting exactly on a bound is still inside.
    const fn reentry(&self, coord: f32, velocity: f32) -> Option<f32> {
        if velocity > 0.0 && coord > self.max {
            Some(self.min)
        } else if velocity < 0.0 && coord < self.min {
            Some(self.max)
        } else {
            None
        }
    }
}

/// One patrolling actor: position plus the lane it loops on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PatrolAgent {
    /// Current position.
    pub position: Vec3,
    /// Fixed lane.
    pub lane: Lane,
}

impl PatrolAgent {
    /// Places an agent on `lane`.
    #[must_use]
    pub const fn new(position: Vec3, lane: Lane) -> Self {
        Self { position, lane }
    }

    /// Advances one tick with displacement multiplied by `scale`.
    ///
    /// Returns `true` when the agent wrapped back to the start of its lane.
    pub fn tick(&mut self, scale: f32) -> bool {
        let step = self.lane.step() * scale;
        self.position.x += step.x;
        self.position.z += step.y;

        let tracked = self.lane.tracked_axis();
        let velocity = tracked.of_planar(step);
        let Some(entry) = self.lane.reentry(tracked.of(self.position), velocity) else {
            return false;
        };
        tracked.set(&mut self.position, entry);
        if let Some(cross) = self.lane.reentry_cross {
            tracked.other().set(&mut self.position, cross);
        }
        trace!("patrol agent wrapped to {:?}", self.position);
        true
    }
}

/// Agents sharing one lane, e.g. the cars of one traffic lane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatrolGroup {
    /// Label used in logs.
    pub name: String,
    /// Lane shared by every member.
    pub lane: Lane,
    /// Starting positions, one agent each.
    pub members: Vec<Vec3>,
}

impl PatrolGroup {
    /// Builds the agents of this group.
    pub fn agents(&self) -> impl Iterator<Item = PatrolAgent> + '_ {
        self.members
            .iter()
            .map(|&position| PatrolAgent::new(position, self.lane))
    }
}

/// Traffic of the valley: both main-road lanes, both cross-road lanes, one
/// car on each bridge and the clouds drifting east.
#[must_use]
pub fn default_patrols() -> Vec<PatrolGroup> {
    let group = |name: &str, lane: Lane, members: &[[f32; 3]]| PatrolGroup {
        name: name.to_owned(),
        lane,
        members: members.iter().copied().map(Vec3::from_array).collect(),
    };
    vec![
        group(
            "main-road-southbound",
            Lane::along(Axis::Z, -50.0, 50.0, 0.35, Direction::Forward),
            &[[-2.0, 2.8, -25.0], [-2.0, 2.8, 10.0]],
        ),
        group(
            "main-road-northbound",
            Lane::along(Axis::Z, -50.0, 50.0, 0.3, Direction::Backward),
            &[[2.0, 2.8, 20.0], [2.0, 2.8, -15.0]],
        ),
        group(
            "cross-road-eastbound",
            Lane::along(Axis::X, -25.0, 25.0, 0.32, Direction::Forward),
            &[[-10.0, 3.0, 2.0]],
        ),
        group(
            "cross-road-westbound",
            Lane::along(Axis::X, -25.0, 25.0, 0.28, Direction::Backward),
            &[[15.0, 3.3, -2.0]],
        ),
        group(
            "north-bridge",
            Lane::along(Axis::Z, -70.0, -10.0, 0.3, Direction::Forward),
            &[[-2.0, 5.0, -45.0]],
        ),
        group(
            "south-bridge",
            Lane {
                travel: Travel::Heading {
                    angle: FRAC_PI_6,
                    tracked: Axis::Z,
                },
                min: 5.0,
                max: 65.0,
                speed: 0.32,
                direction: Direction::Forward,
                reentry_cross: Some(-12.0),
            },
            &[[-10.0, 6.5, 20.0]],
        ),
        group(
            "clouds",
            Lane::along(Axis::X, -100.0, 100.0, 0.06, Direction::Forward),
            &[
                [30.0, 40.0, -50.0],
                [-40.0, 45.0, -30.0],
                [50.0, 42.0, 20.0],
                [-30.0, 38.0, 50.0],
                [20.0, 44.0, -70.0],
            ],
        ),
    ]
}
