//! Procedural terrain: the analytic height field, its memoised grid and the
//! mesh buffers built from that grid.

mod field;
mod grid;
mod mesh;

pub use field::{EdgeBonus, HeightField, HeightFieldParams, ReliefTerm};
pub use grid::{GridParams, HeightGrid};
pub use mesh::TerrainMesh;
