//! ECS marker components linking rendered entities to simulation state.
//!
//! Simulation state lives in plain arrays held by resources; entities only
//! carry the index of the record they display.
use bevy::prelude::*;

/// Entity displaying the player avatar.
#[derive(Component, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PlayerAvatar;

/// Entity displaying `Traffic::agents()[index]`.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash, Deref)]
pub struct TrafficVehicle(pub usize);

/// Entity displaying `Buildings[index]`.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash, Deref)]
pub struct BuildingBlock(pub usize);

/// Entity displaying `Flock::birds()[index]`.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash, Deref)]
pub struct Bird(pub usize);
