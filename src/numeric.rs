//! Numeric conversion helpers used across the project.
//!
//! These utilities guard conversions between floating-point and integer
//! domains so grid lookups never index out of bounds.

/// Floor `value` and clamp it into `0..len`, returning `None` for an empty
/// range.
///
/// Non-finite input maps onto the nearest end of the range (`NaN` to zero).
///
/// # Examples
///
/// ```
/// use syzran::numeric::clamped_index;
/// assert_eq!(clamped_index(3.7, 10), Some(3));
/// assert_eq!(clamped_index(-4.0, 10), Some(0));
/// assert_eq!(clamped_index(42.0, 10), Some(9));
/// assert_eq!(clamped_index(1.0, 0), None);
/// ```
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    reason = "The floored value is clamped to the index range before casting."
)]
#[must_use]
pub fn clamped_index(value: f32, len: usize) -> Option<usize> {
    let last = len.checked_sub(1)?;
    if value.is_nan() {
        return Some(0);
    }
    let floored = value.floor().clamp(0.0, last as f32);
    Some((floored as usize).min(last))
}

/// Convert a grid index or count into `f32`.
#[expect(
    clippy::cast_precision_loss,
    reason = "Grid dimensions stay far below the f32 mantissa limit."
)]
#[must_use]
pub const fn index_to_f32(value: usize) -> f32 {
    value as f32
}
