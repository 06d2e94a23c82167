//! Integration tests for Configuration System loading
//!
//! Exercises file and environment layering through `ControllerConfig::load`,
//! not just struct round-trips.

use gitdeck::config::ControllerConfig;
use parking_lot::Mutex;
use tempfile::TempDir;

// Environment variables are process-global; tests that read or write
// GITDECK_* must not interleave.
static ENV_GUARD: Mutex<()> = Mutex::new(());

#[test]
fn test_load_from_toml_file() {
    let _guard = ENV_GUARD.lock();
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.path().join("config.toml");

    std::fs::write(
        &config_file,
        r#"
[confirmations]
push = false
stash_pop = true

[logging]
level = "debug"
format = "json"
"#,
    )
    .unwrap();

    let config = ControllerConfig::load(Some(config_file.as_path())).unwrap();
    assert!(!config.confirmations.push);
    assert!(config.confirmations.stash_pop);
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.logging.format, "json");
    // Unset fields keep their defaults.
    assert!(config.settings_path.is_none());
    assert!(config.logging.color);
}

#[test]
fn test_env_override_wins_over_file() {
    let _guard = ENV_GUARD.lock();
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.path().join("config.toml");

    std::fs::write(
        &config_file,
        r#"
[confirmations]
push = true
stash_pop = true
"#,
    )
    .unwrap();

    std::env::set_var("GITDECK_CONFIRMATIONS__PUSH", "false");
    let config = ControllerConfig::load(Some(config_file.as_path()));
    std::env::remove_var("GITDECK_CONFIRMATIONS__PUSH");

    let config = config.unwrap();
    assert!(!config.confirmations.push);
    // Fields without an override keep the file's value.
    assert!(config.confirmations.stash_pop);
}

#[test]
fn test_missing_explicit_file_is_an_error() {
    let _guard = ENV_GUARD.lock();
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("nope.toml");

    assert!(ControllerConfig::load(Some(missing.as_path())).is_err());
}
