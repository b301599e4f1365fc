//! Basic vector math helper functions.
//! Small helpers for surface normals and planar headings.
use glam::{Vec2, Vec3};

/// Returns the unit normal of a height surface with the given slopes.
///
/// `slope_a` and `slope_b` are the partial derivatives of the height along
/// the two in-plane axes. The normal points along `+up` for a flat surface.
/// Non-finite slopes yield the flat normal.
///
/// # Examples
///
/// ```
/// use glam::Vec3;
/// use syzran::vector_math::surface_normal;
/// assert_eq!(surface_normal(0.0, 0.0, Vec3::Y), Vec3::Y);
/// let tilted = surface_normal(1.0, 0.0, Vec3::Y);
/// assert!((tilted.length() - 1.0).abs() < 1e-6);
/// assert!(tilted.x < 0.0);
/// ```
#[must_use]
pub fn surface_normal(slope_a: f32, slope_b: f32, up: Vec3) -> Vec3 {
    if !slope_a.is_finite() || !slope_b.is_finite() {
        return up;
    }
    let normal = if up == Vec3::Z {
        Vec3::new(-slope_a, -slope_b, 1.0)
    } else {
        Vec3::new(-slope_a, 1.0, -slope_b)
    };
    normal.try_normalize().unwrap_or(up)
}

/// Returns the planar `(x, z)` step for travelling `distance` along a
/// heading measured from the `+z` axis towards `+x`.
///
/// # Examples
///
/// ```
/// use syzran::vector_math::heading_step;
/// let step = heading_step(0.0, 2.0);
/// assert!((step.x).abs() < 1e-6);
/// assert!((step.y - 2.0).abs() < 1e-6);
/// ```
#[must_use]
pub fn heading_step(heading: f32, distance: f32) -> Vec2 {
    let (sin, cos) = heading.sin_cos();
    Vec2::new(sin * distance, cos * distance)
}
