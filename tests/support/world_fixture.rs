//! Shared fixture for world plugin behavioural tests.
//!
//! The rspec suites tick a Bevy `App` and need to:
//! - share that `App` safely across rspec closures, and
//! - finish plugin setup exactly once before the first tick.

use std::sync::{Arc, Mutex, MutexGuard};

use bevy::prelude::*;
use syzran::SceneConfig;

use crate::thread_safe_app::{lock_app, SharedApp, ThreadSafeApp};

#[derive(Resource, Debug, Default)]
struct PluginsFinalized;

/// A headless world wrapped for use as rspec state.
#[derive(Debug, Clone)]
pub struct WorldFixture {
    app: SharedApp,
}

impl WorldFixture {
    /// Builds a world from `config` on `MinimalPlugins`.
    #[must_use]
    pub fn new(config: SceneConfig) -> Self {
        let app = test_utils::app::headless_app(config);
        Self {
            app: Arc::new(Mutex::new(ThreadSafeApp(app))),
        }
    }

    /// Locks the underlying `App` for direct inspection or mutation.
    pub fn app_guard(&self) -> MutexGuard<'_, ThreadSafeApp> {
        lock_app(&self.app)
    }

    /// Advances the application by `frames` updates.
    pub fn run(&self, frames: usize) {
        let mut app = self.app_guard();
        if app.world().get_resource::<PluginsFinalized>().is_none() {
            app.finish();
            app.cleanup();
            app.insert_resource(PluginsFinalized);
        }
        test_utils::app::run_frames(&mut app, frames);
    }
}
