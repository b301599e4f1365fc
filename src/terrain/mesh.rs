//! Terrain mesh buffers handed to the host renderer.

use glam::Vec3;

use super::HeightGrid;
use crate::vector_math::surface_normal;

/// Vertex and index buffers for a height grid, `y` up.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TerrainMesh {
    /// Vertex positions in row-major grid order.
    pub positions: Vec<[f32; 3]>,
    /// Unit normals matching `positions`.
    pub normals: Vec<[f32; 3]>,
    /// Two counter-clockwise triangles per grid cell.
    pub indices: Vec<u32>,
}

impl TerrainMesh {
    /// Builds the mesh for `grid`.
    ///
    /// Normals come from central differences over neighbouring samples,
    /// falling back to one-sided differences along the border.
    #[must_use]
    pub fn build(grid: &HeightGrid) -> Self {
        let (width, depth) = (grid.width(), grid.depth());
        let mut mesh = Self {
            positions: Vec::with_capacity(width * depth),
            normals: Vec::with_capacity(width * depth),
            indices: Vec::with_capacity(width.saturating_sub(1) * depth.saturating_sub(1) * 6),
        };

        for row in 0..depth {
            for col in 0..width {
                mesh.positions.push(grid.vertex(col, row).to_array());
                mesh.normals.push(vertex_normal(grid, col, row).to_array());
            }
        }

        let stride = u32::try_from(width).unwrap_or(u32::MAX);
        let cells = |count: usize| 0..u32::try_from(count.saturating_sub(1)).unwrap_or(0);
        for row in cells(depth) {
            for col in cells(width) {
                let top_left = row * stride + col;
                let bottom_left = top_left + stride;
                mesh.indices.extend_from_slice(&[
                    top_left,
                    bottom_left,
                    top_left + 1,
                    top_left + 1,
                    bottom_left,
                    bottom_left + 1,
                ]);
            }
        }
        mesh
    }
}

fn vertex_normal(grid: &HeightGrid, col: usize, row: usize) -> Vec3 {
    let left = col.saturating_sub(1);
    let right = (col + 1).min(grid.width().saturating_sub(1));
    let up = row.saturating_sub(1);
    let down = (row + 1).min(grid.depth().saturating_sub(1));

    let dx = grid.column_x(right) - grid.column_x(left);
    let dz = grid.row_z(down) - grid.row_z(up);
    let slope_x = slope(grid.get(left, row), grid.get(right, row), dx);
    let slope_z = slope(grid.get(col, up), grid.get(col, down), dz);
    surface_normal(slope_x, slope_z, Vec3::Y)
}

const fn slope(from: Option<f32>, to: Option<f32>, run: f32) -> f32 {
    match (from, to) {
        (Some(a), Some(b)) if run.abs() > f32::EPSILON => (b - a) / run,
        _ => 0.0,
    }
}
