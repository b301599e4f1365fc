#![cfg_attr(docsrs, feature(doc_cfg))]
//! Core of a small drivable river-valley scene.
//!
//! The crate computes everything that moves or is placed in the world: the
//! analytic terrain and its sampled grid, the animated river surface, the
//! player avatar driven by keys or a touch joystick, looping traffic, circling
//! birds and scattered props. Rendering is left to the host engine; the
//! [`WorldPlugin`] exposes the simulation to Bevy as resources and marker
//! components.
#[cfg(feature = "render")]
mod capture;
pub mod components;
pub mod config;
pub mod constants;
pub mod flock;
pub mod input;
pub mod logging;
pub mod movement;
pub mod numeric;
pub mod patrol;
pub mod props;
pub mod terrain;
pub mod throttle;
pub mod vector_math;
pub mod water;
pub mod world;
pub use constants::*;

// Re-export commonly used items
pub use components::{Bird, BuildingBlock, PlayerAvatar, TrafficVehicle};
pub use config::{ConfigError, SceneConfig};
pub use flock::{Flock, FlockParams, OrbitAgent};
pub use input::{InputError, InputState, InputSubscription, InputSurface, MoveKey};
pub use logging::init as init_logging;
pub use movement::{Mover, MoverParams, PositionObserver};
pub use patrol::{Lane, PatrolAgent, PatrolGroup};
pub use props::{Appearance, Building, PlacedBuilding, TextureCatalog};
pub use terrain::{HeightField, HeightFieldParams, HeightGrid, TerrainMesh};
pub use throttle::{FrameThrottle, TickPolicy, TickStep};
pub use water::{WaveParams, WaveSurface};
pub use world::{
    Avatar, Buildings, PlayerMoved, PlayerPosition, SceneSettings, Traffic, WorldPlugin,
    WorldSetupError,
};

pub mod prelude {
    //! Prelude exports used in documentation examples.
    //!
    //! ```rust,no_run
    //! use syzran::prelude::*;
    //! ```

    pub use crate::config::SceneConfig;
    pub use crate::input::{InputState, InputSurface};
    pub use crate::movement::Mover;
    pub use crate::patrol::PatrolAgent;
    pub use crate::terrain::HeightField;
    pub use crate::throttle::TickPolicy;
    pub use crate::world::WorldPlugin;
}
