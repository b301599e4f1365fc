//! Command-line runner for the river-valley scene.
//!
//! Without the `render` feature the world is simulated headless for a fixed
//! number of frames and the final positions are logged.
use std::path::PathBuf;

use anyhow::Context;
use bevy::prelude::*;
use clap::Parser;
use syzran::{init_logging, SceneConfig, TextureCatalog, WorldPlugin};

/// River-valley scene simulation
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
    /// Scene configuration file (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Frames to simulate when running headless
    #[arg(short, long, default_value_t = 600)]
    frames: u32,
    /// Seed for prop scattering and the flock, overriding the configuration
    #[arg(short, long)]
    seed: Option<u64>,
    /// Asset directory searched for building textures
    #[arg(short, long)]
    assets: Option<PathBuf>,
}

fn load_config(args: &Args) -> anyhow::Result<SceneConfig> {
    let mut config = match &args.config {
        Some(path) => SceneConfig::load(path)
            .with_context(|| format!("loading scene configuration {}", path.display()))?,
        None => SceneConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    Ok(config)
}

fn world_plugin(args: &Args, config: SceneConfig) -> WorldPlugin {
    let textures = args.assets.as_deref().map_or_else(TextureCatalog::default, |root| {
        TextureCatalog::scan(
            root,
            config.buildings.iter().filter_map(|b| b.texture.as_deref()),
        )
    });
    WorldPlugin::new(config).with_textures(textures)
}

#[cfg(not(feature = "render"))]
fn run(plugin: WorldPlugin, frames: u32) {
    use log::info;
    use syzran::{Avatar, Traffic};

    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .add_plugins(plugin);
    for _ in 0..frames {
        app.update();
    }

    if let Some(avatar) = app.world().get_resource::<Avatar>() {
        info!("avatar after {frames} frames: {:?}", avatar.position());
    }
    if let Some(traffic) = app.world().get_resource::<Traffic>() {
        for (index, agent) in traffic.agents().iter().enumerate() {
            info!("vehicle {index}: {:?}", agent.position);
        }
    }
}

#[cfg(feature = "render")]
fn run(plugin: WorldPlugin, _frames: u32) {
    use bevy::log::LogPlugin;

    App::new()
        .add_plugins(DefaultPlugins.build().disable::<LogPlugin>())
        .add_plugins(plugin)
        .run();
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = load_config(&args)?;
    run(world_plugin(&args, config), args.frames);
    Ok(())
}
