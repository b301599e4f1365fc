//! Scene configuration.
//!
//! Every tunable of the world lives in [`SceneConfig`]. Missing JSON fields
//! fall back to the built-in scene, and a loaded configuration is validated
//! before any world is built from it.

use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::flock::{FlockParams, Span};
use crate::movement::MoverParams;
use crate::patrol::{default_patrols, PatrolGroup, Travel};
use crate::props::{default_buildings, Building, ScatterParams};
use crate::terrain::{GridParams, HeightFieldParams};
use crate::throttle::TickPolicy;
use crate::water::WaveParams;
use crate::{DEFAULT_SEED, MAX_TICK_DIVISOR};

/// Errors raised while loading a [`SceneConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// File that was requested.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The document is not valid configuration JSON.
    #[error("malformed configuration: {0}")]
    Parse(#[from] serde_json::Error),
    /// A value is outside its allowed range.
    #[error("invalid {field}: {reason}")]
    Invalid {
        /// Dotted path of the offending field.
        field: String,
        /// What is wrong with it.
        reason: &'static str,
    },
}

impl ConfigError {
    fn invalid(field: impl Into<String>, reason: &'static str) -> Self {
        Self::Invalid {
            field: field.into(),
            reason,
        }
    }
}

/// Complete description of a scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// River-valley height field.
    pub terrain: HeightFieldParams,
    /// Memoised terrain grid.
    pub grid: GridParams,
    /// River surface.
    pub water: WaveParams,
    /// Player avatar.
    pub player: MoverParams,
    /// Patrol lanes and the agents on them.
    pub traffic: Vec<PatrolGroup>,
    /// Circling birds.
    pub flock: FlockParams,
    /// Vegetation and rock scattering.
    pub props: ScatterParams,
    /// Town buildings.
    pub buildings: Vec<Building>,
    /// Shared tick-rate policy.
    pub tick: TickPolicy,
    /// Seed for every random draw of the world build.
    pub seed: u64,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            terrain: HeightFieldParams::default(),
            grid: GridParams::default(),
            water: WaveParams::default(),
            player: MoverParams::default(),
            traffic: default_patrols(),
            flock: FlockParams::default(),
            props: ScatterParams::default(),
            buildings: default_buildings(),
            tick: TickPolicy::default(),
            seed: DEFAULT_SEED,
        }
    }
}

type Check = Result<(), ConfigError>;

/// Smallest share of a lane's speed that must fall on its tracked axis.
const MIN_TRACKED_SHARE: f32 = 1e-3;

fn finite(field: &str, value: f32) -> Check {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, "must be finite"))
    }
}

fn positive(field: &str, value: f32) -> Check {
    finite(field, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, "must be positive"))
    }
}

fn all_finite(field: &str, values: &[f32]) -> Check {
    values.iter().try_for_each(|&v| finite(field, v))
}

fn span(field: &str, value: Span) -> Check {
    if value.is_valid() {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, "bounds must be finite and ordered"))
    }
}

impl SceneConfig {
    /// Parses and validates a JSON document.
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] for malformed JSON and
    /// [`ConfigError::Invalid`] when a value is out of range.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates the JSON file at `path`.
    ///
    /// # Errors
    /// Returns [`ConfigError::Io`] when the file cannot be read, otherwise as
    /// [`Self::from_json_str`].
    pub fn load(file: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = file.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&json).inspect_err(|err| {
            warn!("rejected configuration {}: {err}", path.display());
        })?;
        info!("loaded scene configuration from {}", path.display());
        Ok(config)
    }

    /// Checks every value the world build and tick loop rely on.
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_terrain()?;
        self.validate_water()?;
        self.validate_actors()?;
        self.validate_props()?;
        match self.tick.divisor {
            0 => Err(ConfigError::invalid("tick.divisor", "must be at least 1")),
            d if d > MAX_TICK_DIVISOR => {
                Err(ConfigError::invalid("tick.divisor", "must not exceed 65535"))
            }
            _ => Ok(()),
        }
    }

    fn validate_terrain(&self) -> Check {
        let t = &self.terrain;
        positive("terrain.river_half_width", t.river_half_width)?;
        all_finite(
            "terrain",
            &[
                t.bed_height,
                t.bank_height,
                t.base_height,
                t.broad_relief.amplitude,
                t.broad_relief.frequency,
                t.ridge_relief.amplitude,
                t.ridge_relief.frequency,
                t.north_edge.threshold,
                t.north_edge.bonus,
                t.south_edge.threshold,
                t.south_edge.bonus,
                t.flank_edge.threshold,
                t.flank_edge.bonus,
            ],
        )?;
        if self.grid.width == 0 || self.grid.depth == 0 {
            return Err(ConfigError::invalid("grid", "dimensions must be non-zero"));
        }
        positive("grid.cell_size", self.grid.cell_size)
    }

    fn validate_water(&self) -> Check {
        positive("water.width", self.water.width)?;
        positive("water.height", self.water.height)?;
        if self.water.columns == 0 || self.water.rows == 0 {
            return Err(ConfigError::invalid("water", "segment counts must be non-zero"));
        }
        self.water.terms.iter().try_for_each(|term| {
            all_finite(
                "water.terms",
                &[term.amplitude, term.kx, term.ky, term.omega],
            )
        })
    }

    fn validate_actors(&self) -> Check {
        finite("player.speed", self.player.speed)?;
        all_finite("player.spawn", &self.player.spawn.to_array())?;

        for group in &self.traffic {
            let field = format!("traffic.{}", group.name);
            let lane = &group.lane;
            all_finite(&field, &[lane.min, lane.max, lane.speed])?;
            if lane.min >= lane.max {
                return Err(ConfigError::invalid(field, "lane interval is empty"));
            }
            if lane.speed < 0.0 {
                return Err(ConfigError::invalid(field, "speed must not be negative"));
            }
            if let Travel::Heading { angle, .. } = lane.travel {
                finite(&field, angle)?;
            }
            if lane.speed > 0.0 && lane.tracked_progress().abs() < lane.speed * MIN_TRACKED_SHARE {
                return Err(ConfigError::invalid(
                    field,
                    "heading makes no progress along the tracked axis",
                ));
            }
            if let Some(cross) = lane.reentry_cross {
                finite(&field, cross)?;
            }
            for member in &group.members {
                all_finite(&field, &member.to_array())?;
            }
        }

        let flock = &self.flock;
        span("flock.radius", flock.radius)?;
        span("flock.speed", flock.speed)?;
        span("flock.height", flock.height)?;
        all_finite(
            "flock",
            &[flock.angular_step, flock.bob_amplitude, flock.bob_rate],
        )
    }

    fn validate_props(&self) -> Check {
        let p = &self.props;
        for row in &p.tree_rows {
            positive("props.tree_rows.spacing", row.spacing)?;
            span("props.tree_rows.span", row.span)?;
            all_finite("props.tree_rows", &[row.offset, row.height, row.gap, row.scale])?;
        }
        positive("props.tree_extent", p.tree_extent)?;
        positive("props.rock_extent", p.rock_extent)?;
        span("props.tree_scale", p.tree_scale)?;
        span("props.rock_scale", p.rock_scale)?;
        all_finite(
            "props",
            &[
                p.river_clearance,
                p.road_clearance[0],
                p.road_clearance[1],
                p.rock_clearance,
                p.rock_min_height,
                p.rock_tilt,
            ],
        )?;
        for building in &self.buildings {
            all_finite("buildings.position", &building.position.to_array())?;
            all_finite("buildings.size", &building.size.to_array())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patrol::Axis;
    use rstest::rstest;

    fn invalid_field(result: Result<(), ConfigError>) -> Option<String> {
        match result {
            Err(ConfigError::Invalid { field, .. }) => Some(field),
            _ => None,
        }
    }

    #[test]
    fn default_scene_is_valid() {
        assert!(SceneConfig::default().validate().is_ok());
    }

    #[test]
    fn empty_document_yields_default_scene() {
        let config = SceneConfig::from_json_str("{}")
            .unwrap_or_else(|err| panic!("default config rejected: {err}"));
        assert_eq!(config, SceneConfig::default());
    }

    #[test]
    fn partial_document_overrides_named_fields() {
        let config =
            SceneConfig::from_json_str(r#"{ "tick": { "divisor": 1 }, "player": { "speed": 0.25 } }"#)
                .unwrap_or_else(|err| panic!("partial config rejected: {err}"));
        assert_eq!(config.tick, TickPolicy::every_frame());
        assert!((config.player.speed - 0.25).abs() < f32::EPSILON);
        assert_eq!(config.player.spawn, MoverParams::default().spawn);
        assert_eq!(config.traffic, default_patrols());
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(
            SceneConfig::from_json_str("{ tick: 3 "),
            Err(ConfigError::Parse(_))
        ));
    }

    #[rstest]
    #[case::zero(0)]
    #[case::beyond_limit(70_000)]
    fn divisor_out_of_range_is_rejected(#[case] divisor: u32) {
        let json = format!(r#"{{ "tick": {{ "divisor": {divisor} }} }}"#);
        let result = SceneConfig::from_json_str(&json).map(|_| ());
        assert_eq!(invalid_field(result), Some("tick.divisor".to_owned()));
    }

    #[test]
    fn largest_divisor_is_accepted_and_compensated() {
        let config = SceneConfig {
            tick: TickPolicy::every_nth(MAX_TICK_DIVISOR),
            ..SceneConfig::default()
        };
        assert!(config.validate().is_ok());
        assert!((config.tick.displacement_scale() - 65_535.0).abs() < f32::EPSILON);
    }

    #[rstest]
    #[case::grid(|c: &mut SceneConfig| c.grid.width = 0, "grid")]
    #[case::cell(|c: &mut SceneConfig| c.grid.cell_size = 0.0, "grid.cell_size")]
    #[case::river(|c: &mut SceneConfig| c.terrain.river_half_width = -1.0, "terrain.river_half_width")]
    #[case::nan(|c: &mut SceneConfig| c.terrain.bed_height = f32::NAN, "terrain")]
    #[case::water(|c: &mut SceneConfig| c.water.rows = 0, "water")]
    #[case::flock(|c: &mut SceneConfig| c.flock.radius = Span::new(50.0, 20.0), "flock.radius")]
    #[case::spacing(
        |c: &mut SceneConfig| {
            if let Some(row) = c.props.tree_rows.first_mut() {
                row.spacing = 0.0;
            }
        },
        "props.tree_rows.spacing"
    )]
    #[case::stalled_heading(
        |c: &mut SceneConfig| {
            if let Some(group) = c.traffic.iter_mut().find(|g| g.name == "south-bridge") {
                group.lane.travel = Travel::Heading {
                    angle: std::f32::consts::FRAC_PI_2,
                    tracked: Axis::Z,
                };
            }
        },
        "traffic.south-bridge"
    )]
    fn out_of_range_values_are_named(#[case] mutate: fn(&mut SceneConfig), #[case] field: &str) {
        let mut config = SceneConfig::default();
        mutate(&mut config);
        assert_eq!(invalid_field(config.validate()), Some(field.to_owned()));
    }

    #[test]
    fn empty_lane_is_rejected() {
        let mut config = SceneConfig::default();
        if let Some(group) = config.traffic.first_mut() {
            group.lane.max = group.lane.min;
        }
        assert_eq!(
            invalid_field(config.validate()),
            Some("traffic.main-road-southbound".to_owned())
        );
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = SceneConfig::load("/nonexistent/syzran/scene.json")
            .err()
            .unwrap_or_else(|| panic!("missing file accepted"));
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/syzran/scene.json"));
    }

    #[test]
    fn serialised_default_reloads_unchanged() {
        let json = serde_json::to_string_pretty(&SceneConfig::default())
            .unwrap_or_else(|err| panic!("serialise config: {err}"));
        let config = SceneConfig::from_json_str(&json)
            .unwrap_or_else(|err| panic!("reload config: {err}"));
        assert_eq!(config, SceneConfig::default());
    }
}
