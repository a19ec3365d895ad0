//! Loading tuning files from disk and feeding them to a monster.

use std::fs;
use std::path::PathBuf;

use skitter::{ConfigError, MonsterConfig, StateKind};
use test_utils::Arena;

fn scratch_file(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("skitter-{}-{name}", std::process::id()));
    fs::write(&path, contents).unwrap_or_else(|e| panic!("write {}: {e}", path.display()));
    path
}

#[test]
fn partial_file_keeps_defaults() {
    let path = scratch_file(
        "partial.json",
        r#"{ "max_health": 80.0, "combat": { "kamikaze_threshold": 0.5 } }"#,
    );
    let config = MonsterConfig::load(&path).expect("config loads");
    fs::remove_file(&path).ok();

    assert_eq!(config.max_health, 80.0);
    assert_eq!(config.combat.kamikaze_threshold, 0.5);
    assert_eq!(config.timing, MonsterConfig::default().timing);
}

#[test]
fn loaded_threshold_drives_behaviour() {
    let path = scratch_file("threshold.json", r#"{ "combat": { "kamikaze_threshold": 0.5 } }"#);
    let config = MonsterConfig::load(&path).expect("config loads");
    fs::remove_file(&path).ok();

    let mut arena = Arena::flat(config);
    arena.tick();
    arena.damage(80.0);
    assert_eq!(arena.monster.state(), StateKind::Kamikaze);
}

#[test]
fn missing_file_reports_path() {
    let path = std::env::temp_dir().join("skitter-does-not-exist.json");
    let err = MonsterConfig::load(&path).expect_err("missing file");
    match err {
        ConfigError::Io { path: reported, .. } => assert_eq!(reported, path),
        other => panic!("unexpected error {other}"),
    }
}

#[test]
fn out_of_range_values_are_rejected() {
    let path = scratch_file("invalid.json", r#"{ "combat": { "attack_range": 40.0 } }"#);
    let err = MonsterConfig::load(&path).expect_err("attack range beyond chase range");
    fs::remove_file(&path).ok();
    assert!(matches!(
        err,
        ConfigError::Invalid {
            field: "combat.attack_range",
            ..
        }
    ));
}
