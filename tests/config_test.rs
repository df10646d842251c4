//! Tests for layered settings loading

use std::fs;

use tempfile::TempDir;

use weakside::application::ApplicationError;
use weakside::config::Settings;
use weakside::domain::{AscendMode, Placement};

#[test]
fn given_explicit_config_when_loading_then_values_override_defaults() {
    // Arrange
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("weakside.toml");
    fs::write(
        &path,
        r#"
parent_field = "sponsor"
starting_parent_id = -1
ascend = "to_level"
natural = true
"#,
    )
    .unwrap();

    // Act
    let settings = Settings::load(Some(&path)).unwrap();

    // Assert
    assert_eq!(settings.parent_field, "sponsor");
    assert_eq!(settings.label_field, "name", "unspecified keys keep defaults");
    assert_eq!(settings.starting_parent_id, -1);
    assert!(settings.sort_first);
    assert_eq!(settings.ascend_mode().unwrap(), AscendMode::ToLevel);
    assert_eq!(settings.placement(), Placement::Natural);

    let options = settings.build_options().unwrap();
    assert_eq!(options.starting_parent_id, -1);
    assert_eq!(settings.record_fields().parent_field, "sponsor");
}

#[test]
fn given_invalid_ascend_mode_when_loading_then_config_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("weakside.toml");
    fs::write(&path, "ascend = \"sideways\"\n").unwrap();

    let result = Settings::load(Some(&path));

    assert!(matches!(result, Err(ApplicationError::Config { .. })));
}

#[test]
fn given_malformed_config_when_loading_then_config_error_names_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.toml");
    fs::write(&path, "sort_first = maybe\n").unwrap();

    let result = Settings::load(Some(&path));

    match result {
        Err(ApplicationError::Config { message }) => assert!(message.contains("broken.toml")),
        other => panic!("expected config error, got {:?}", other),
    }
}

#[test]
fn given_missing_explicit_config_when_loading_then_error() {
    let dir = TempDir::new().unwrap();

    let result = Settings::load(Some(&dir.path().join("nope.toml")));

    assert!(result.is_err());
}

#[test]
fn given_settings_when_rendering_then_toml_reloads() {
    let settings = Settings::default();

    let rendered = settings.to_toml().unwrap();
    let reparsed: Settings = toml::from_str(&rendered).unwrap();

    assert_eq!(reparsed, settings);
}
