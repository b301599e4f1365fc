//! Scene builders for tests.

use glam::Vec3;
use syzran::patrol::{Lane, PatrolGroup};
use syzran::{SceneConfig, TickPolicy};

/// Default scene with the given throttle divisor.
///
/// # Examples
/// ```
/// use test_utils::scene::with_divisor;
/// assert_eq!(with_divisor(2).tick.divisor, 2);
/// ```
#[must_use]
pub fn with_divisor(divisor: u32) -> SceneConfig {
    SceneConfig {
        tick: TickPolicy::every_nth(divisor),
        ..SceneConfig::default()
    }
}

/// Scene with a single patrol agent on `lane`, ticking every frame.
#[must_use]
pub fn single_patrol(lane: Lane, start: Vec3) -> SceneConfig {
    SceneConfig {
        traffic: vec![PatrolGroup {
            name: "probe".to_owned(),
            lane,
            members: vec![start],
        }],
        ..with_divisor(1)
    }
}
