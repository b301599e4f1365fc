//! Behavioural test: the avatar follows keyboard input through the world
//! plugin and reports each step to the minimap feed.

#[path = "support/thread_safe_app.rs"]
mod thread_safe_app;

#[path = "support/rspec_runner.rs"]
mod rspec_runner;

#[path = "support/world_fixture.rs"]
mod world_fixture;

use bevy::prelude::*;
use rspec::block::Context as Scenario;
use rspec_runner::run_serial;
use syzran::{PlayerPosition, SceneConfig};
use test_utils::app::{avatar_position, press, release};
use test_utils::assert_vec3_near;
use world_fixture::WorldFixture;

const SPAWN: Vec3 = Vec3::new(0.0, 8.0, 50.0);

#[derive(Debug, Clone)]
struct AvatarFixture {
    world: WorldFixture,
}

impl AvatarFixture {
    fn bootstrap(config: SceneConfig) -> Self {
        Self {
            world: WorldFixture::new(config),
        }
    }

    fn press(&self, key: &str) {
        press(&self.world.app_guard(), key);
    }

    fn release(&self, key: &str) {
        release(&self.world.app_guard(), key);
    }

    fn run(&self, frames: usize) {
        self.world.run(frames);
    }

    fn position(&self) -> Vec3 {
        avatar_position(&self.world.app_guard())
    }

    fn reported(&self) -> Vec3 {
        self.world.app_guard().world().resource::<PlayerPosition>().0
    }
}

#[test]
fn avatar_follows_held_keys() {
    let fixture = AvatarFixture::bootstrap(test_utils::scene::with_divisor(1));

    run_serial(&rspec::given(
        "a world ticking every frame",
        fixture,
        |scenario: &mut Scenario<AvatarFixture>| {
            scenario.then("the avatar waits at its spawn point", |state| {
                state.run(5);
                assert_vec3_near(state.position(), SPAWN, 0.0);
            });

            scenario.when("forward is held for ten frames", |ctx| {
                ctx.before_all(|state| {
                    state.press("w");
                    state.run(10);
                });

                ctx.then("the avatar moves one unit towards -z", |state| {
                    assert_vec3_near(state.position(), SPAWN - Vec3::Z, 1e-4);
                });

                ctx.then("the minimap feed matches the avatar", |state| {
                    assert_eq!(state.reported(), state.position());
                });
            });

            scenario.when("forward is released and right pressed in Cyrillic", |ctx| {
                ctx.before_all(|state| {
                    state.release("W");
                    state.press("В");
                    state.run(10);
                    state.release("в");
                });

                ctx.then("the avatar moves one unit towards +x", |state| {
                    assert_vec3_near(
                        state.position(),
                        SPAWN - Vec3::Z + Vec3::X,
                        1e-4,
                    );
                });

                ctx.then("idle frames leave it in place", |state| {
                    let before = state.position();
                    state.run(10);
                    assert_eq!(state.position(), before);
                });
            });
        },
    ));
}
