//! Memoised height field sampled on a regular grid.
//!
//! The grid is built once at world-build time and serves both the terrain
//! mesh and elevation lookups for prop placement, so props always sit on the
//! same heights the mesh shows.

use glam::Vec3;
use log::info;
use serde::{Deserialize, Serialize};

use super::HeightField;
use crate::numeric::{clamped_index, index_to_f32};
use crate::{TERRAIN_CELL_SIZE, TERRAIN_GRID_SIZE};

/// Dimensions of the memoised terrain grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridParams {
    /// Vertex count along `x`.
    pub width: u32,
    /// Vertex count along `z`.
    pub depth: u32,
    /// Spacing between neighbouring vertices.
    pub cell_size: f32,
}

impl Default for GridParams {
    fn default() -> Self {
        Self {
            width: TERRAIN_GRID_SIZE,
            depth: TERRAIN_GRID_SIZE,
            cell_size: TERRAIN_CELL_SIZE,
        }
    }
}

/// Height samples stored row-major (`row * width + col`), rows along `z`.
#[derive(Debug, Clone, PartialEq)]
pub struct HeightGrid {
    width: usize,
    depth: usize,
    cell_size: f32,
    heights: Vec<f32>,
    fallback: f32,
}

impl HeightGrid {
    /// Samples `field` at every grid vertex.
    #[must_use]
    pub fn sample(field: &HeightField, params: GridParams) -> Self {
        let width = params.width as usize;
        let depth = params.depth as usize;
        let mut grid = Self {
            width,
            depth,
            cell_size: params.cell_size,
            heights: Vec::with_capacity(width * depth),
            fallback: field.params().base_height,
        };
        for row in 0..depth {
            for col in 0..width {
                let x = grid.column_x(col);
                let z = grid.row_z(row);
                grid.heights.push(field.height(x, z));
            }
        }
        info!("sampled terrain grid {width}x{depth} (cell {})", params.cell_size);
        grid
    }

    /// Vertex count along `x`.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Vertex count along `z`.
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.depth
    }

    /// Spacing between neighbouring vertices.
    #[must_use]
    pub const fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Raw samples in row-major order.
    #[must_use]
    pub fn heights(&self) -> &[f32] {
        &self.heights
    }

    /// World `x` of grid column `col`.
    #[must_use]
    pub const fn column_x(&self, col: usize) -> f32 {
        (index_to_f32(col) - index_to_f32(self.width) / 2.0) * self.cell_size
    }

    /// World `z` of grid row `row`.
    #[must_use]
    pub const fn row_z(&self, row: usize) -> f32 {
        (index_to_f32(row) - index_to_f32(self.depth) / 2.0) * self.cell_size
    }

    /// Stored sample at `(col, row)`, if inside the grid.
    #[must_use]
    pub fn get(&self, col: usize, row: usize) -> Option<f32> {
        if col >= self.width {
            return None;
        }
        self.heights.get(row * self.width + col).copied()
    }

    /// World position of vertex `(col, row)`, `y` up.
    #[must_use]
    pub fn vertex(&self, col: usize, row: usize) -> Vec3 {
        let height = self.get(col, row).unwrap_or(self.fallback);
        Vec3::new(self.column_x(col), height, self.row_z(row))
    }

    /// Elevation stored for the cell containing `(x, z)`.
    ///
    /// The cell is found with `floor((coord + halfExtent) / cellSize)` and
    /// clamped into the grid, so positions beyond the edge reuse the border
    /// samples. An empty grid yields the land base height.
    #[must_use]
    pub fn height_at(&self, x: f32, z: f32) -> f32 {
        let half_width = index_to_f32(self.width) / 2.0 * self.cell_size;
        let half_depth = index_to_f32(self.depth) / 2.0 * self.cell_size;
        match (
            clamped_index((x + half_width) / self.cell_size, self.width),
            clamped_index((z + half_depth) / self.cell_size, self.depth),
        ) {
            (Some(col), Some(row)) => self.get(col, row).unwrap_or(self.fallback),
            _ => self.fallback,
        }
    }
}
