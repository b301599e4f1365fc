//! Utility helpers for tests.
//!
//! Vector assertions with a tolerance, scene builders and a headless Bevy
//! harness shared by the integration tests.

pub mod app;
pub mod scene;

use glam::{Vec2, Vec3};

/// Assert that `actual` lies within `epsilon` of `expected` on every axis.
///
/// # Panics
/// Panics naming the first axis that differs.
///
/// # Examples
/// ```
/// use glam::Vec3;
/// use test_utils::assert_vec3_near;
/// assert_vec3_near(Vec3::new(1.0, 2.0, 3.0), Vec3::new(1.0, 2.0, 3.000_001), 1e-5);
/// ```
pub fn assert_vec3_near(actual: Vec3, expected: Vec3, epsilon: f32) {
    for (axis, a, e) in [
        ("x", actual.x, expected.x),
        ("y", actual.y, expected.y),
        ("z", actual.z, expected.z),
    ] {
        assert!(
            (a - e).abs() <= epsilon,
            "{axis}: {a} differs from {e} by more than {epsilon} ({actual:?} vs {expected:?})"
        );
    }
}

/// Two-dimensional counterpart of [`assert_vec3_near`].
///
/// # Panics
/// Panics naming the first axis that differs.
pub fn assert_vec2_near(actual: Vec2, expected: Vec2, epsilon: f32) {
    assert_vec3_near(actual.extend(0.0), expected.extend(0.0), epsilon);
}
