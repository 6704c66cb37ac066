//! Environment variable layer of Settings loading.
//!
//! Kept in its own test binary: it mutates the process environment.

use std::fs;

use tempfile::TempDir;

use seltree::config::Settings;

#[test]
fn given_env_vars_when_loading_then_override_explicit_file() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("custom.toml");
    fs::write(&path, "[labels]\nenvironment_prefix = \"Stage \"\n").unwrap();
    std::env::set_var("SELTREE_LABELS__ENVIRONMENT_PREFIX", "Env ");
    std::env::set_var("SELTREE_RENDER__SHOW_IDS", "true");

    // Act
    let settings = Settings::load(Some(&path));
    std::env::remove_var("SELTREE_LABELS__ENVIRONMENT_PREFIX");
    std::env::remove_var("SELTREE_RENDER__SHOW_IDS");

    // Assert
    let settings = settings.expect("load settings");
    assert_eq!(settings.labels.environment_prefix, "Env ");
    assert!(settings.render.show_ids);
}
