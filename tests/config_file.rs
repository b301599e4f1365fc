//! Tests for loading scene configuration files and building worlds from them.

use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use rstest::{fixture, rstest};
use syzran::{Avatar, ConfigError, SceneConfig, TickPolicy};
use test_utils::app::{headless_app, press, run_frames};

static NEXT_FILE: AtomicUsize = AtomicUsize::new(0);

/// A file in the temp directory removed when dropped.
struct ScratchFile(PathBuf);

impl ScratchFile {
    fn with_contents(name: &str, contents: &str) -> Self {
        let unique = NEXT_FILE.fetch_add(1, Ordering::Relaxed);
        let path = std::env::temp_dir().join(format!(
            "syzran-{}-{unique}-{name}",
            std::process::id()
        ));
        fs::write(&path, contents).unwrap_or_else(|err| panic!("write {}: {err}", path.display()));
        Self(path)
    }
}

impl Drop for ScratchFile {
    fn drop(&mut self) {
        fs::remove_file(&self.0).ok();
    }
}

#[fixture]
fn fast_player() -> ScratchFile {
    ScratchFile::with_contents(
        "fast-player.json",
        r#"{
            "player": { "speed": 0.5, "spawn": [1.0, 2.0, 3.0] },
            "tick": { "divisor": 2 },
            "seed": 7
        }"#,
    )
}

#[rstest]
fn loads_overrides_and_keeps_defaults(fast_player: ScratchFile) {
    let config = SceneConfig::load(&fast_player.0)
        .unwrap_or_else(|err| panic!("load config: {err}"));
    assert_eq!(config.tick, TickPolicy::every_nth(2));
    assert_eq!(config.seed, 7);
    assert_eq!(config.water, SceneConfig::default().water);
    assert_eq!(config.traffic.len(), 7);
}

#[rstest]
fn loaded_config_drives_the_world(fast_player: ScratchFile) {
    let config = SceneConfig::load(&fast_player.0)
        .unwrap_or_else(|err| panic!("load config: {err}"));
    let mut app = headless_app(config);
    press(&app, "a");
    run_frames(&mut app, 4);

    // Two ticks at divisor 2, each moving 0.5 * 2 towards -x.
    let position = app.world().resource::<Avatar>().position();
    assert!((position.x - (1.0 - 2.0)).abs() < 1e-5);
    assert!((position.z - 3.0).abs() < f32::EPSILON);
}

#[rstest]
#[case::syntax("broken.json", "{ \"tick\": ")]
#[case::type_mismatch("mistyped.json", r#"{ "tick": { "divisor": "three" } }"#)]
fn malformed_files_are_parse_errors(#[case] name: &str, #[case] contents: &str) {
    let file = ScratchFile::with_contents(name, contents);
    assert!(matches!(
        SceneConfig::load(&file.0),
        Err(ConfigError::Parse(_))
    ));
}

#[test]
fn out_of_range_file_names_the_field() {
    let file = ScratchFile::with_contents("zero-grid.json", r#"{ "grid": { "width": 0 } }"#);
    let err = SceneConfig::load(&file.0)
        .err()
        .unwrap_or_else(|| panic!("zero-width grid accepted"));
    assert_eq!(err.to_string(), "invalid grid: dimensions must be non-zero");
}
