//! Animated river surface.
//!
//! A flat plane of fixed resolution whose out-of-plane coordinate is a sum
//! of travelling sinusoids. Every update recomputes displacement from the
//! static base positions, so the surface at time `t` never depends on the
//! update history.

use glam::Vec3;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::numeric::index_to_f32;
use crate::vector_math::surface_normal;

/// Periodic function used by a [`WaveTerm`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaveShape {
    /// `sin(phase)`
    Sine,
    /// `cos(phase)`
    Cosine,
}

/// One travelling wave: `amplitude * shape(kx * x + ky * y + omega * t)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaveTerm {
    /// Periodic function applied to the phase.
    pub shape: WaveShape,
    /// Peak displacement.
    pub amplitude: f32,
    /// Spatial frequency along the plane's `x`.
    pub kx: f32,
    /// Spatial frequency along the plane's `y`.
    pub ky: f32,
    /// Temporal frequency in radians per second.
    pub omega: f32,
}

impl WaveTerm {
    /// Contribution of this term at plane position `(x, y)` and time `t`.
    #[must_use]
    pub fn eval(&self, x: f32, y: f32, t: f32) -> f32 {
        let phase = self.kx * x + self.ky * y + self.omega * t;
        let wave = match self.shape {
            WaveShape::Sine => phase.sin(),
            WaveShape::Cosine => phase.cos(),
        };
        self.amplitude * wave
    }
}

/// Plane dimensions and wave terms of the river surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveParams {
    /// Extent along the plane's `x` (across the river).
    pub width: f32,
    /// Extent along the plane's `y` (along the river).
    pub height: f32,
    /// Segment count along `x`; the grid has `columns + 1` vertices per row.
    pub columns: u32,
    /// Segment count along `y`; the grid has `rows + 1` rows.
    pub rows: u32,
    /// Summed wave terms.
    pub terms: Vec<WaveTerm>,
}

impl Default for WaveParams {
    fn default() -> Self {
        Self {
            width: 35.0,
            height: 200.0,
            columns: 50,
            rows: 80,
            terms: vec![
                WaveTerm {
                    shape: WaveShape::Sine,
                    amplitude: 0.15,
                    kx: 0.4,
                    ky: 0.0,
                    omega: 1.5,
                },
                WaveTerm {
                    shape: WaveShape::Sine,
                    amplitude: 0.12,
                    kx: 0.0,
                    ky: 0.25,
                    omega: 1.2,
                },
                WaveTerm {
                    shape: WaveShape::Cosine,
                    amplitude: 0.08,
                    kx: 0.2,
                    ky: 0.2,
                    omega: 0.8,
                },
            ],
        }
    }
}

/// A vertex of the water plane: base position plus current displacement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WaterVertex {
    /// In-plane `x`, fixed at construction.
    pub x: f32,
    /// In-plane `y`, fixed at construction.
    pub y: f32,
    /// Out-of-plane displacement, rewritten on every update.
    pub z: f32,
}

/// Fixed-size vertex grid animated by [`WaveParams::terms`].
#[derive(Debug, Clone, PartialEq)]
pub struct WaveSurface {
    stride: usize,
    rows: usize,
    terms: Vec<WaveTerm>,
    vertices: Vec<WaterVertex>,
    normals: Vec<[f32; 3]>,
    time: f32,
}

impl WaveSurface {
    /// Lays out the flat grid, top row first, and applies the waves at `t = 0`.
    #[must_use]
    pub fn new(params: &WaveParams) -> Self {
        let columns = params.columns.max(1) as usize;
        let rows = params.rows.max(1) as usize;
        let (stride, row_count) = (columns + 1, rows + 1);
        let segment_w = params.width / index_to_f32(columns);
        let segment_h = params.height / index_to_f32(rows);

        let mut vertices = Vec::with_capacity(stride * row_count);
        for iy in 0..row_count {
            let y = params.height / 2.0 - index_to_f32(iy) * segment_h;
            for ix in 0..stride {
                let x = index_to_f32(ix) * segment_w - params.width / 2.0;
                vertices.push(WaterVertex { x, y, z: 0.0 });
            }
        }

        let mut surface = Self {
            stride,
            rows: row_count,
            terms: params.terms.clone(),
            normals: vec![[0.0, 0.0, 1.0]; vertices.len()],
            vertices,
            time: 0.0,
        };
        surface.update(0.0);
        surface
    }

    /// Closed-form displacement at plane position `(x, y)` and time `t`.
    #[must_use]
    pub fn displacement_at(&self, x: f32, y: f32, t: f32) -> f32 {
        self.terms.iter().map(|term| term.eval(x, y, t)).sum()
    }

    /// Rewrites every vertex for elapsed time `t` and recomputes normals.
    pub fn update(&mut self, t: f32) {
        let terms = &self.terms;
        for vertex in &mut self.vertices {
            vertex.z = terms.iter().map(|term| term.eval(vertex.x, vertex.y, t)).sum();
        }
        self.time = t;
        self.recompute_normals();
        debug!("water surface updated for t={t:.3}");
    }

    /// Time of the last update.
    #[must_use]
    pub const fn time(&self) -> f32 {
        self.time
    }

    /// Vertices per row.
    #[must_use]
    pub const fn stride(&self) -> usize {
        self.stride
    }

    /// Number of rows.
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Current vertices in row-major order.
    #[must_use]
    pub fn vertices(&self) -> &[WaterVertex] {
        &self.vertices
    }

    /// Unit normals in the plane's frame (`+z` out of plane).
    #[must_use]
    pub fn normals(&self) -> &[[f32; 3]] {
        &self.normals
    }

    /// Vertex positions as `[x, y, z]` arrays for upload.
    pub fn positions(&self) -> impl Iterator<Item = [f32; 3]> + '_ {
        self.vertices.iter().map(|v| [v.x, v.y, v.z])
    }

    fn vertex(&self, col: usize, row: usize) -> Option<&WaterVertex> {
        if col >= self.stride {
            return None;
        }
        self.vertices.get(row * self.stride + col)
    }

    fn recompute_normals(&mut self) {
        let mut normals = Vec::with_capacity(self.vertices.len());
        for row in 0..self.rows {
            for col in 0..self.stride {
                let left = self.vertex(col.saturating_sub(1), row);
                let right = self.vertex((col + 1).min(self.stride - 1), row);
                let up = self.vertex(col, row.saturating_sub(1));
                let down = self.vertex(col, (row + 1).min(self.rows - 1));
                let slope_x = slope(left, right, |v| v.x);
                let slope_y = slope(up, down, |v| v.y);
                normals.push(surface_normal(slope_x, slope_y, Vec3::Z).to_array());
            }
        }
        self.normals = normals;
    }
}

fn slope(
    from: Option<&WaterVertex>,
    to: Option<&WaterVertex>,
    axis: impl Fn(&WaterVertex) -> f32,
) -> f32 {
    match (from, to) {
        (Some(a), Some(b)) => {
            let run = axis(b) - axis(a);
            if run.abs() > f32::EPSILON {
                (b.z - a.z) / run
            } else {
                0.0
            }
        }
        _ => 0.0,
    }
}
