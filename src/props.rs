//! Decorative props: trees, rocks and buildings.
//!
//! Scattered props sit on the memoised [`HeightGrid`] so they agree with the
//! rendered terrain. Random placement uses a seeded `ChaCha8Rng`.

use std::f32::consts::TAU;
use std::path::Path;

use glam::Vec3;
use hashbrown::HashSet;
use log::{info, warn};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::flock::Span;
use crate::terrain::HeightGrid;

/// A placed decoration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prop {
    /// Base position on the ground.
    pub position: Vec3,
    /// Uniform scale.
    pub scale: f32,
    /// Euler rotation in radians.
    pub rotation: Vec3,
}

impl Prop {
    const fn upright(position: Vec3, scale: f32) -> Self {
        Self {
            position,
            scale,
            rotation: Vec3::ZERO,
        }
    }
}

/// A straight row of evenly spaced trees mirrored across an axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TreeRow {
    /// `true` for rows running along `z` (river banks), `false` along `x`.
    pub along_z: bool,
    /// Distance of both mirrored rows from the axis.
    pub offset: f32,
    /// Ground height of the row.
    pub height: f32,
    /// Extent along the row, `max` exclusive.
    pub span: Span,
    /// Distance between trees.
    pub spacing: f32,
    /// Positions closer than this to the crossing are left empty.
    pub gap: f32,
    /// Tree scale.
    pub scale: f32,
}

impl TreeRow {
    fn plant(&self, out: &mut Vec<Prop>) {
        if self.spacing.is_nan() || self.spacing <= 0.0 || !self.span.is_valid() {
            return;
        }
        let mut along = self.span.min;
        while along < self.span.max {
            if along.abs() >= self.gap {
                for side in [self.offset, -self.offset] {
                    let position = if self.along_z {
                        Vec3::new(side, self.height, along)
                    } else {
                        Vec3::new(along, self.height, side)
                    };
                    out.push(Prop::upright(position, self.scale));
                }
            }
            along += self.spacing;
        }
    }
}

/// Placement rules for scattered vegetation and rocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScatterParams {
    /// Fixed rows of trees.
    pub tree_rows: Vec<TreeRow>,
    /// Random tree candidates.
    pub tree_candidates: usize,
    /// Side of the square random trees are drawn from.
    pub tree_extent: f32,
    /// Trees are rejected when `|x|` is below this (river corridor).
    pub river_clearance: f32,
    /// Trees are rejected inside this `(|x|, |z|)` box (cross road).
    pub road_clearance: [f32; 2],
    /// Random tree scale.
    pub tree_scale: Span,
    /// Rock candidates.
    pub rock_candidates: usize,
    /// Side of the square rocks are drawn from.
    pub rock_extent: f32,
    /// Rocks are rejected when `|x|` is below this.
    pub rock_clearance: f32,
    /// Rocks need ground strictly higher than this.
    pub rock_min_height: f32,
    /// Random rock scale.
    pub rock_scale: Span,
    /// Maximum tilt of a rock about `x` and `z`.
    pub rock_tilt: f32,
}

impl Default for ScatterParams {
    fn default() -> Self {
        Self {
            tree_rows: vec![
                TreeRow {
                    along_z: true,
                    offset: 12.0,
                    height: 2.8,
                    span: Span::new(-50.0, 50.0),
                    spacing: 6.0,
                    gap: 2.0,
                    scale: 0.9,
                },
                TreeRow {
                    along_z: false,
                    offset: 8.0,
                    height: 3.0,
                    span: Span::new(-25.0, 25.0),
                    spacing: 6.0,
                    gap: 2.0,
                    scale: 0.85,
                },
            ],
            tree_candidates: 60,
            tree_extent: 180.0,
            river_clearance: 20.0,
            road_clearance: [30.0, 12.0],
            tree_scale: Span::new(0.7, 1.2),
            rock_candidates: 20,
            rock_extent: 160.0,
            rock_clearance: 30.0,
            rock_min_height: 4.0,
            rock_scale: Span::new(0.5, 2.0),
            rock_tilt: 0.3,
        }
    }
}

/// Scattered props of one world build.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Props {
    /// Trees, fixed rows first.
    pub trees: Vec<Prop>,
    /// Rocks.
    pub rocks: Vec<Prop>,
}

impl Props {
    /// Places rows and random props on `grid` using a generator seeded with
    /// `seed`.
    #[must_use]
    pub fn scatter(grid: &HeightGrid, params: &ScatterParams, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut trees = Vec::new();
        for row in &params.tree_rows {
            row.plant(&mut trees);
        }

        let [road_x, road_z] = params.road_clearance;
        for _ in 0..params.tree_candidates {
            let x = centred(&mut rng, params.tree_extent);
            let z = centred(&mut rng, params.tree_extent);
            if x.abs() < params.river_clearance || (z.abs() < road_z && x.abs() < road_x) {
                continue;
            }
            let scale = params.tree_scale.sample(&mut rng);
            trees.push(Prop::upright(Vec3::new(x, grid.height_at(x, z), z), scale));
        }

        let mut rocks = Vec::new();
        for _ in 0..params.rock_candidates {
            let x = centred(&mut rng, params.rock_extent);
            let z = centred(&mut rng, params.rock_extent);
            if x.abs() < params.rock_clearance {
                continue;
            }
            let height = grid.height_at(x, z);
            if height <= params.rock_min_height {
                continue;
            }
            let scale = params.rock_scale.sample(&mut rng);
            let rotation = Vec3::new(
                rng.gen::<f32>() * params.rock_tilt,
                rng.gen::<f32>() * TAU,
                rng.gen::<f32>() * params.rock_tilt,
            );
            rocks.push(Prop {
                position: Vec3::new(x, height, z),
                scale,
                rotation,
            });
        }

        info!("scattered {} trees and {} rocks", trees.len(), rocks.len());
        Self { trees, rocks }
    }
}

fn centred(rng: &mut impl Rng, extent: f32) -> f32 {
    (rng.gen::<f32>() - 0.5) * extent
}

/// How a building surface is drawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Appearance {
    /// Texture map under a white base colour.
    Textured(String),
    /// Plain colour.
    Flat(String),
}

/// A box building with an optional facade texture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Building {
    /// Centre of the base.
    pub position: Vec3,
    /// Width, height and depth.
    pub size: Vec3,
    /// Colour used when untextured, as a CSS hex string.
    pub color: String,
    /// Asset path of the facade texture.
    #[serde(default)]
    pub texture: Option<String>,
}

impl Building {
    /// Chooses the appearance, falling back to the flat colour when the
    /// texture is missing from `available`.
    pub fn appearance(&self, available: impl Fn(&str) -> bool) -> Appearance {
        match &self.texture {
            Some(texture) if available(texture) => Appearance::Textured(texture.clone()),
            Some(texture) => {
                warn!("texture {texture} unavailable, using flat colour {}", self.color);
                Appearance::Flat(self.color.clone())
            }
            None => Appearance::Flat(self.color.clone()),
        }
    }
}

/// Texture assets known to be loadable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextureCatalog {
    paths: HashSet<String>,
}

impl TextureCatalog {
    /// Catalog listing exactly `paths`.
    #[must_use]
    pub fn from_paths<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }

    /// Keeps the `wanted` asset paths that exist as files under `root`.
    #[must_use]
    pub fn scan<'a>(root: &Path, wanted: impl IntoIterator<Item = &'a str>) -> Self {
        let catalog = Self::from_paths(wanted.into_iter().filter(|path| root.join(path).is_file()));
        info!(
            "found {} textures under {}",
            catalog.paths.len(),
            root.display()
        );
        catalog
    }

    /// Whether `path` can be loaded.
    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.paths.contains(path)
    }
}

/// A building together with the appearance chosen for it.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedBuilding {
    /// Layout and requested texture.
    pub building: Building,
    /// What will actually be drawn.
    pub appearance: Appearance,
}

impl PlacedBuilding {
    /// Whether a requested texture was replaced by the flat colour.
    #[must_use]
    pub const fn fell_back(&self) -> bool {
        self.building.texture.is_some() && matches!(self.appearance, Appearance::Flat(_))
    }
}

/// Resolves every building against `catalog`. Missing textures degrade to
/// flat colours; nothing here fails.
#[must_use]
pub fn place_buildings(buildings: &[Building], catalog: &TextureCatalog) -> Vec<PlacedBuilding> {
    buildings
        .iter()
        .map(|building| PlacedBuilding {
            appearance: building.appearance(|path| catalog.contains(path)),
            building: building.clone(),
        })
        .collect()
}

/// The town blocks around the river.
#[must_use]
pub fn default_buildings() -> Vec<Building> {
    let building = |position: [f32; 3], size: [f32; 3], color: &str, texture: Option<&str>| Building {
        position: Vec3::from_array(position),
        size: Vec3::from_array(size),
        color: color.to_owned(),
        texture: texture.map(str::to_owned),
    };
    vec![
        building(
            [-30.0, 5.0, -50.0],
            [8.0, 15.0, 8.0],
            "#e5e7eb",
            Some("textures/facade_panel.jpeg"),
        ),
        building([-45.0, 4.0, -45.0], [6.0, 12.0, 6.0], "#f3f4f6", None),
        building(
            [40.0, 6.0, 50.0],
            [10.0, 20.0, 10.0],
            "#d1d5db",
            Some("textures/facade_brick.jpeg"),
        ),
        building([50.0, 5.0, 35.0], [7.0, 18.0, 7.0], "#e5e7eb", None),
        building([-50.0, 5.0, 40.0], [9.0, 16.0, 9.0], "#f3f4f6", None),
    ]
}
