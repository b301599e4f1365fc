//! Bevy plugin assembling the scene and driving it every frame.
//!
//! The plugin builds the terrain, water, avatar, traffic and flock from a
//! [`SceneConfig`] and registers the per-frame systems. Logic runs on the
//! frames chosen by the shared [`FrameThrottle`]; the simulation systems of
//! one tick do not share mutable state and may run in any order.

use bevy::ecs::prelude::On;
use bevy::prelude::*;
use log::{debug, error, info, warn};
use thiserror::Error;

use crate::components::{Bird, BuildingBlock, PlayerAvatar, TrafficVehicle};
use crate::config::SceneConfig;
use crate::flock::Flock;
use crate::input::{InputState, InputSubscription, InputSurface};
use crate::movement::Mover;
use crate::patrol::{PatrolAgent, PatrolGroup};
use crate::props::{place_buildings, PlacedBuilding, Props, TextureCatalog};
use crate::terrain::{HeightField, HeightGrid, TerrainMesh};
use crate::throttle::FrameThrottle;
use crate::water::WaveSurface;

/// The configuration the world was built from.
#[derive(Resource, Debug, Clone, PartialEq, Deref)]
pub struct SceneSettings(pub SceneConfig);

/// Static ground: the analytic field, its memoised grid and mesh buffers.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct Terrain {
    /// Analytic height field.
    pub field: HeightField,
    /// Field sampled once at build time.
    pub grid: HeightGrid,
    /// Mesh buffers built from `grid`.
    pub mesh: TerrainMesh,
}

/// Trees and rocks placed on the terrain.
#[derive(Resource, Debug, Clone, Default, PartialEq, Deref)]
pub struct Scenery(pub Props);

/// Town buildings with the appearance each one will be drawn with.
#[derive(Resource, Debug, Clone, Default, PartialEq, Deref)]
pub struct Buildings(pub Vec<PlacedBuilding>);

impl Buildings {
    /// Buildings whose texture was unavailable and fell back to flat colour.
    #[must_use]
    pub fn fallbacks(&self) -> usize {
        self.0.iter().filter(|placed| placed.fell_back()).count()
    }
}

/// Animated river surface.
#[derive(Resource, Debug, Clone, PartialEq, Deref, DerefMut)]
pub struct WaterSurface(pub WaveSurface);

/// Player avatar state.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Deref, DerefMut)]
pub struct Avatar(pub Mover);

/// Last avatar position reported through [`PlayerMoved`], the minimap feed.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Deref)]
pub struct PlayerPosition(pub Vec3);

/// Every patrolling agent, indexed by [`TrafficVehicle`].
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct Traffic {
    agents: Vec<PatrolAgent>,
}

impl Traffic {
    /// Flattens the groups into one agent array, group by group.
    #[must_use]
    pub fn new(groups: &[PatrolGroup]) -> Self {
        Self {
            agents: groups.iter().flat_map(PatrolGroup::agents).collect(),
        }
    }

    /// Agents in spawn order.
    #[must_use]
    pub fn agents(&self) -> &[PatrolAgent] {
        &self.agents
    }

    /// Advances every agent; returns how many wrapped.
    pub fn tick(&mut self, scale: f32) -> usize {
        self.agents
            .iter_mut()
            .map(|agent| agent.tick(scale))
            .filter(|&wrapped| wrapped)
            .count()
    }
}

/// Triggered after every avatar integration step.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct PlayerMoved {
    /// Position after the step.
    pub position: Vec3,
}

/// Where [`WorldSetupError`] arose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorldSetupErrorContext {
    /// The configuration failed validation.
    Config,
    /// Input listeners could not be attached.
    Input,
}

/// Triggered when the plugin cannot complete world setup.
#[derive(Event, Debug, Clone, Error)]
#[error("{context:?}: {detail}")]
pub struct WorldSetupError {
    /// Failing stage.
    pub context: WorldSetupErrorContext,
    /// Description of the underlying error.
    pub detail: String,
}

impl WorldSetupError {
    /// Convenience constructor.
    #[must_use]
    pub fn new(context: WorldSetupErrorContext, detail: impl Into<String>) -> Self {
        Self {
            context,
            detail: detail.into(),
        }
    }
}

/// Frame phases, run in declaration order.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorldSet {
    /// Input events are folded into [`InputState`].
    Input,
    /// The throttle decides whether this frame runs logic.
    Throttle,
    /// Water, avatar, traffic and flock advance.
    Simulate,
    /// Marker transforms copy simulation positions.
    Sync,
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must accept On<T> by value."
)]
fn log_setup_error(event: On<WorldSetupError>) {
    let WorldSetupError { context, detail } = event.event();
    error!("world setup failed during {context:?}: {detail}");
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must accept On<T> by value."
)]
fn record_player_position(event: On<PlayerMoved>, mut position: ResMut<PlayerPosition>) {
    position.0 = event.event().position;
}

fn advance_throttle(mut throttle: ResMut<FrameThrottle>) {
    throttle.advance();
}

/// Copies the listener-side state into the per-tick snapshot.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy systems require parameters by value."
)]
fn snapshot_input(listener: Option<Res<InputSubscription>>, mut input: ResMut<InputState>) {
    if let Some(subscription) = listener {
        let snapshot = subscription.snapshot();
        if *input != snapshot {
            *input = snapshot;
        }
    }
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy systems require parameters by value."
)]
fn animate_water(throttle: Res<FrameThrottle>, time: Res<Time>, mut water: ResMut<WaterSurface>) {
    if throttle.current().is_some() {
        water.update(time.elapsed_secs());
    }
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy systems require parameters by value."
)]
fn move_avatar(
    throttle: Res<FrameThrottle>,
    input: Res<InputState>,
    mut avatar: ResMut<Avatar>,
    mut commands: Commands,
) {
    let Some(step) = throttle.current() else {
        return;
    };
    avatar.tick(&input, step.scale, &mut |position: Vec3| {
        commands.trigger(PlayerMoved { position });
    });
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy systems require parameters by value."
)]
fn drive_traffic(throttle: Res<FrameThrottle>, mut traffic: ResMut<Traffic>) {
    let Some(step) = throttle.current() else {
        return;
    };
    let wrapped = traffic.tick(step.scale);
    if wrapped > 0 {
        debug!("tick {}: {wrapped} patrol agents wrapped", step.tick);
    }
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy systems require parameters by value."
)]
fn drive_flock(throttle: Res<FrameThrottle>, time: Res<Time>, mut flock: ResMut<Flock>) {
    if let Some(step) = throttle.current() {
        flock.tick(step.scale, time.elapsed_secs());
    }
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy systems require parameters by value."
)]
fn spawn_markers(
    mut commands: Commands,
    avatar: Res<Avatar>,
    traffic: Res<Traffic>,
    flock: Res<Flock>,
    buildings: Res<Buildings>,
) {
    commands.spawn((PlayerAvatar, Transform::from_translation(avatar.position())));
    for (index, placed) in buildings.iter().enumerate() {
        commands.spawn((
            BuildingBlock(index),
            Transform::from_translation(placed.building.position),
        ));
    }
    for (index, agent) in traffic.agents().iter().enumerate() {
        commands.spawn((TrafficVehicle(index), agent_transform(agent)));
    }
    for (index, bird) in flock.birds().iter().enumerate() {
        commands.spawn((
            Bird(index),
            Transform::from_translation(bird.position)
                .with_rotation(Quat::from_rotation_y(bird.heading())),
        ));
    }
    info!(
        "spawned avatar, {} buildings, {} vehicles and {} birds",
        buildings.len(),
        traffic.agents().len(),
        flock.birds().len()
    );
}

fn agent_transform(agent: &PatrolAgent) -> Transform {
    Transform::from_translation(agent.position)
        .with_rotation(Quat::from_rotation_y(agent.lane.heading()))
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy systems require parameters by value."
)]
fn sync_transforms(
    avatar: Res<Avatar>,
    traffic: Res<Traffic>,
    flock: Res<Flock>,
    mut players: Query<&mut Transform, (With<PlayerAvatar>, Without<TrafficVehicle>, Without<Bird>)>,
    mut vehicles: Query<(&TrafficVehicle, &mut Transform), Without<Bird>>,
    mut birds: Query<(&Bird, &mut Transform), Without<TrafficVehicle>>,
) {
    for mut transform in &mut players {
        transform.translation = avatar.position();
    }
    for (vehicle, mut transform) in &mut vehicles {
        if let Some(agent) = traffic.agents().get(vehicle.0) {
            transform.translation = agent.position;
        }
    }
    for (bird, mut transform) in &mut birds {
        if let Some(state) = flock.birds().get(bird.0) {
            transform.translation = state.position;
            transform.rotation = Quat::from_rotation_y(state.heading());
        }
    }
}

/// Installs the scene resources and per-frame systems.
///
/// The plugin attaches to its [`InputSurface`] while building; the resulting
/// [`InputSubscription`] resource detaches when the app is dropped. Building
/// textures missing from its [`TextureCatalog`] are drawn in flat colour.
#[derive(Debug, Default)]
pub struct WorldPlugin {
    config: SceneConfig,
    surface: InputSurface,
    textures: TextureCatalog,
}

impl WorldPlugin {
    /// Builds the world described by `config`.
    #[must_use]
    pub fn new(config: SceneConfig) -> Self {
        Self {
            config,
            surface: InputSurface::default(),
            textures: TextureCatalog::default(),
        }
    }

    /// Listens on `surface` instead of a private one.
    #[must_use]
    pub fn with_surface(mut self, surface: InputSurface) -> Self {
        self.surface = surface;
        self
    }

    /// Treats the textures in `catalog` as loadable.
    #[must_use]
    pub fn with_textures(mut self, catalog: TextureCatalog) -> Self {
        self.textures = catalog;
        self
    }

    fn insert_resources(&self, app: &mut App) {
        let config = &self.config;
        let field = HeightField::new(config.terrain);
        let grid = HeightGrid::sample(&field, config.grid);
        let mesh = TerrainMesh::build(&grid);
        let props = Props::scatter(&grid, &config.props, config.seed);
        let traffic = Traffic::new(&config.traffic);
        let buildings = Buildings(place_buildings(&config.buildings, &self.textures));
        if buildings.fallbacks() > 0 {
            warn!(
                "{} of {} buildings drawn without their texture",
                buildings.fallbacks(),
                buildings.len()
            );
        }
        info!(
            "world built: {} patrol lanes, {} agents, {} water vertices",
            config.traffic.len(),
            traffic.agents().len(),
            (config.water.columns as usize + 1) * (config.water.rows as usize + 1)
        );

        app.insert_resource(Terrain { field, grid, mesh })
            .insert_resource(Scenery(props))
            .insert_resource(buildings)
            .insert_resource(WaterSurface(WaveSurface::new(&config.water)))
            .insert_resource(Avatar(Mover::new(config.player)))
            .insert_resource(PlayerPosition(config.player.spawn))
            .insert_resource(traffic)
            .insert_resource(Flock::new(&config.flock, config.seed))
            .insert_resource(FrameThrottle::new(config.tick))
            .insert_resource(SceneSettings(config.clone()))
            .init_resource::<InputState>();
    }
}

impl Plugin for WorldPlugin {
    fn build(&self, app: &mut App) {
        app.add_observer(log_setup_error);

        if let Err(e) = self.config.validate() {
            app.world_mut().trigger(WorldSetupError::new(
                WorldSetupErrorContext::Config,
                e.to_string(),
            ));
            return;
        }

        self.insert_resources(app);
        app.add_observer(record_player_position);

        match self.surface.attach() {
            Ok(subscription) => {
                app.insert_resource(subscription);
            }
            Err(e) => {
                app.world_mut().trigger(WorldSetupError::new(
                    WorldSetupErrorContext::Input,
                    e.to_string(),
                ));
            }
        }

        app.configure_sets(
            Update,
            (
                WorldSet::Input,
                WorldSet::Throttle,
                WorldSet::Simulate,
                WorldSet::Sync,
            )
                .chain(),
        );
        app.add_systems(Startup, spawn_markers);
        app.add_systems(Update, snapshot_input.in_set(WorldSet::Input));
        app.add_systems(Update, advance_throttle.in_set(WorldSet::Throttle));
        app.add_systems(
            Update,
            (animate_water, move_avatar, drive_traffic, drive_flock).in_set(WorldSet::Simulate),
        );
        app.add_systems(Update, sync_transforms.in_set(WorldSet::Sync));

        #[cfg(feature = "render")]
        crate::capture::add_capture_systems(app);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::props::Appearance;
    use crate::throttle::TickPolicy;
    use approx::assert_relative_eq;
    use rstest::{fixture, rstest};

    fn config(divisor: u32) -> SceneConfig {
        SceneConfig {
            tick: TickPolicy::every_nth(divisor),
            ..SceneConfig::default()
        }
    }

    #[fixture]
    fn app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_plugins(WorldPlugin::new(config(1)));
        app
    }

    #[rstest]
    fn plugin_initialises_resources(mut app: App) {
        for present in [
            app.world().contains_resource::<SceneSettings>(),
            app.world().contains_resource::<Terrain>(),
            app.world().contains_resource::<Scenery>(),
            app.world().contains_resource::<Buildings>(),
            app.world().contains_resource::<WaterSurface>(),
            app.world().contains_resource::<Avatar>(),
            app.world().contains_resource::<Traffic>(),
            app.world().contains_resource::<Flock>(),
            app.world().contains_resource::<InputState>(),
            app.world().contains_resource::<FrameThrottle>(),
            app.world().contains_resource::<PlayerPosition>(),
            app.world().contains_resource::<InputSubscription>(),
        ] {
            assert!(present);
        }
        app.update();
        let vehicles = app
            .world_mut()
            .query::<&TrafficVehicle>()
            .iter(app.world())
            .count();
        assert_eq!(vehicles, app.world().resource::<Traffic>().agents().len());
    }

    #[rstest]
    fn held_key_moves_avatar_and_reports_position(mut app: App) {
        app.world().resource::<InputSubscription>().key_down("W");
        app.update();
        app.update();
        let position = app.world().resource::<Avatar>().position();
        assert_relative_eq!(position.z, 50.0 - 0.2, epsilon = 1e-5);
        assert_eq!(app.world().resource::<PlayerPosition>().0, position);

        let mut transforms = app
            .world_mut()
            .query_filtered::<&Transform, With<PlayerAvatar>>();
        let synced = transforms
            .iter(app.world())
            .next()
            .map(|t| t.translation);
        assert_eq!(synced, Some(position));
    }

    #[test]
    fn throttled_world_keeps_apparent_speed() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_plugins(WorldPlugin::new(config(3)));
        app.world().resource::<InputSubscription>().key_down("d");

        app.update();
        app.update();
        assert_relative_eq!(app.world().resource::<Avatar>().position().x, 0.0);
        app.update();
        assert_relative_eq!(
            app.world().resource::<Avatar>().position().x,
            0.3,
            epsilon = 1e-5
        );
    }

    #[rstest]
    #[case::no_textures(TextureCatalog::default(), 2)]
    #[case::panel_only(TextureCatalog::from_paths(["textures/facade_panel.jpeg"]), 1)]
    fn missing_textures_fall_back_without_failing(
        #[case] catalog: TextureCatalog,
        #[case] fallbacks: usize,
    ) {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_plugins(WorldPlugin::new(config(1)).with_textures(catalog));
        app.update();

        let buildings = app.world().resource::<Buildings>();
        assert_eq!(buildings.len(), 5);
        assert_eq!(buildings.fallbacks(), fallbacks);
        assert_eq!(
            buildings.get(2).map(|placed| placed.appearance.clone()),
            Some(Appearance::Flat("#d1d5db".to_owned()))
        );
        assert!(app.world().contains_resource::<Avatar>());

        let blocks = app
            .world_mut()
            .query::<&BuildingBlock>()
            .iter(app.world())
            .count();
        assert_eq!(blocks, 5);
    }

    #[test]
    fn buildings_come_from_the_configuration() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_plugins(WorldPlugin::new(SceneConfig {
            buildings: Vec::new(),
            ..config(1)
        }));
        assert!(app.world().resource::<Buildings>().is_empty());
    }

    #[test]
    fn invalid_config_builds_nothing() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_plugins(WorldPlugin::new(config(0)));
        assert!(!app.world().contains_resource::<Avatar>());
    }

    #[test]
    fn second_world_on_same_surface_is_refused() {
        let surface = InputSurface::default();
        let mut first = App::new();
        first.add_plugins(MinimalPlugins);
        first.add_plugins(WorldPlugin::new(config(1)).with_surface(surface.clone()));

        let mut second = App::new();
        second.add_plugins(MinimalPlugins);
        second.add_plugins(WorldPlugin::new(config(1)).with_surface(surface.clone()));
        assert!(!second.world().contains_resource::<InputSubscription>());

        drop(first);
        assert!(!surface.is_attached());
    }
}
