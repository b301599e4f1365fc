//! Analytic river-valley height field.
//!
//! The valley is carved along the `z` axis: inside the channel the bank rises
//! linearly from the river bed, outside it two low-frequency sinusoids roll
//! the land and coarse regional offsets lift the far edges.

use serde::{Deserialize, Serialize};

use crate::{LAND_BASE_HEIGHT, RIVER_BANK_HEIGHT, RIVER_BED_HEIGHT, RIVER_HALF_WIDTH};

/// One sinusoidal relief term.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReliefTerm {
    /// Peak contribution in world units.
    pub amplitude: f32,
    /// Spatial frequency in radians per world unit.
    pub frequency: f32,
}

/// Elevation bonus applied once a coordinate passes a threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EdgeBonus {
    /// Coordinate the sample must pass (strictly) to receive the bonus.
    pub threshold: f32,
    /// Added elevation.
    pub bonus: f32,
}

/// Parameters of [`HeightField`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeightFieldParams {
    /// Half-width of the river channel around `x = 0`.
    pub river_half_width: f32,
    /// Elevation at the channel axis.
    pub bed_height: f32,
    /// Elevation at the channel edge.
    pub bank_height: f32,
    /// Base elevation of the land outside the channel.
    pub base_height: f32,
    /// Checkerboard relief: `sin(x f) * cos(z f)`.
    pub broad_relief: ReliefTerm,
    /// Diagonal ridges: `sin(x f + z f)`.
    pub ridge_relief: ReliefTerm,
    /// Applied when `z` is below the threshold.
    pub north_edge: EdgeBonus,
    /// Applied when `z` is above the threshold.
    pub south_edge: EdgeBonus,
    /// Applied when `|x|` is above the threshold.
    pub flank_edge: EdgeBonus,
}

impl Default for HeightFieldParams {
    fn default() -> Self {
        Self {
            river_half_width: RIVER_HALF_WIDTH,
            bed_height: RIVER_BED_HEIGHT,
            bank_height: RIVER_BANK_HEIGHT,
            base_height: LAND_BASE_HEIGHT,
            broad_relief: ReliefTerm {
                amplitude: 2.0,
                frequency: 0.03,
            },
            ridge_relief: ReliefTerm {
                amplitude: 1.5,
                frequency: 0.08,
            },
            north_edge: EdgeBonus {
                threshold: -40.0,
                bonus: 1.5,
            },
            south_edge: EdgeBonus {
                threshold: 40.0,
                bonus: 2.0,
            },
            flank_edge: EdgeBonus {
                threshold: 40.0,
                bonus: 1.0,
            },
        }
    }
}

/// Deterministic terrain elevation as a pure function of planar position.
///
/// # Examples
///
/// ```
/// use syzran::terrain::HeightField;
/// let field = HeightField::default();
/// assert!((field.height(0.0, 0.0) - -2.5).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HeightField {
    params: HeightFieldParams,
}

impl HeightField {
    /// Creates a field from validated parameters.
    #[must_use]
    pub const fn new(params: HeightFieldParams) -> Self {
        Self { params }
    }

    /// Parameters the field was built from.
    #[must_use]
    pub const fn params(&self) -> &HeightFieldParams {
        &self.params
    }

    /// Elevation at `(x, z)`.
    #[must_use]
    pub fn height(&self, x: f32, z: f32) -> f32 {
        let p = &self.params;
        let distance = x.abs();
        if distance < p.river_half_width {
            return p.bed_height + (distance / p.river_half_width) * (p.bank_height - p.bed_height);
        }

        let broad = p.broad_relief;
        let ridge = p.ridge_relief;
        let mut height = p.base_height
            + broad.amplitude * (x * broad.frequency).sin() * (z * broad.frequency).cos()
            + ridge.amplitude * (x * ridge.frequency + z * ridge.frequency).sin();

        if z < p.north_edge.threshold {
            height += p.north_edge.bonus;
        }
        if z > p.south_edge.threshold {
            height += p.south_edge.bonus;
        }
        if distance > p.flank_edge.threshold {
            height += p.flank_edge.bonus;
        }
        height
    }

    /// Returns `true` when `x` lies inside the river channel.
    #[must_use]
    pub const fn in_channel(&self, x: f32) -> bool {
        x.abs() < self.params.river_half_width
    }
}
