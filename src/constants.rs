//! Scene constants shared by the default configuration.
//!
//! These values describe the default valley layout. Everything here can be
//! overridden through [`crate::config::SceneConfig`]; the constants only seed
//! its defaults.

/// Half-width of the river channel measured from the central axis (`x = 0`).
pub const RIVER_HALF_WIDTH: f32 = 18.0;
/// Elevation of the river bed at the central axis.
pub const RIVER_BED_HEIGHT: f32 = -2.5;
/// Elevation reached at the edge of the river channel.
pub const RIVER_BANK_HEIGHT: f32 = 2.0;
/// Base elevation of the land outside the river channel.
pub const LAND_BASE_HEIGHT: f32 = 2.0;

/// Width and depth, in vertices, of the memoised terrain grid.
pub const TERRAIN_GRID_SIZE: u32 = 100;
/// Distance between neighbouring terrain grid vertices.
pub const TERRAIN_CELL_SIZE: f32 = 2.0;

/// Per-tick displacement of the avatar for each held movement key.
pub const AVATAR_SPEED: f32 = 0.1;
/// Where the avatar enters the world.
pub const AVATAR_SPAWN: [f32; 3] = [0.0, 8.0, 50.0];

/// Drag distance, in pixels, at which the touch joystick saturates.
pub const JOYSTICK_RADIUS_PX: f32 = 50.0;

/// Logic updates run on every `TICK_DIVISOR`-th frame.
pub const TICK_DIVISOR: u32 = 3;
/// Largest accepted throttle divisor: about eighteen minutes at 60 fps.
pub const MAX_TICK_DIVISOR: u32 = 65_535;

/// Seed for prop scattering and flock parameters.
pub const DEFAULT_SEED: u64 = 42;
