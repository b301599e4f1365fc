//! Headless Bevy harness for the world plugin.

use bevy::prelude::*;
use syzran::{Avatar, InputSubscription, SceneConfig, Traffic, WorldPlugin};

/// App with `MinimalPlugins` and a [`WorldPlugin`] built from `config`.
#[must_use]
pub fn headless_app(config: SceneConfig) -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.add_plugins(WorldPlugin::new(config));
    app
}

/// Sends a key-down through the app's input subscription.
///
/// # Panics
/// Panics if the plugin failed to attach its input listeners.
pub fn press(app: &App, key: &str) {
    subscription(app).key_down(key);
}

/// Sends a key-up through the app's input subscription.
///
/// # Panics
/// Panics if the plugin failed to attach its input listeners.
pub fn release(app: &App, key: &str) {
    subscription(app).key_up(key);
}

fn subscription(app: &App) -> &InputSubscription {
    app.world()
        .get_resource::<InputSubscription>()
        .unwrap_or_else(|| panic!("world plugin has no input subscription"))
}

/// Runs `frames` updates.
pub fn run_frames(app: &mut App, frames: usize) {
    for _ in 0..frames {
        app.update();
    }
}

/// Current avatar position.
///
/// # Panics
/// Panics if the world was not built.
#[must_use]
pub fn avatar_position(app: &App) -> Vec3 {
    app.world()
        .get_resource::<Avatar>()
        .map(|avatar| avatar.position())
        .unwrap_or_else(|| panic!("world plugin did not build an avatar"))
}

/// Position of traffic agent `index`.
///
/// # Panics
/// Panics if the agent does not exist.
#[must_use]
pub fn agent_position(app: &App, index: usize) -> Vec3 {
    app.world()
        .get_resource::<Traffic>()
        .and_then(|traffic| traffic.agents().get(index).map(|agent| agent.position))
        .unwrap_or_else(|| panic!("no traffic agent {index}"))
}
