//! Integration tests for configuration resolution and graceful degradation
//!
//! Note: Uses serial_test crate to prevent ENV variable race conditions.
//! Tests that manipulate HYMNAL_CONFIG are marked with #[serial].

use hymnal_common::config::{ConfigResolver, TomlConfig, CONFIG_ENV_VAR};
use hymnal_common::{Error, ScoringProfile, Sensitivity};
use serial_test::serial;
use std::env;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn write_config(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("config.toml");
    fs::write(&path, content).unwrap();
    path
}

#[test]
#[serial]
fn test_cli_path_takes_priority_over_env() {
    let dir = TempDir::new().unwrap();
    let cli_path = write_config(&dir, "profile = \"legacy\"");
    env::set_var(CONFIG_ENV_VAR, "/nonexistent/hymnal.toml");

    let resolver = ConfigResolver::new(Some(cli_path.clone()));
    assert_eq!(resolver.resolve_path(), Some(cli_path));

    let config = resolver.load().unwrap();
    assert_eq!(config.profile, ScoringProfile::Legacy);

    env::remove_var(CONFIG_ENV_VAR);
}

#[test]
#[serial]
fn test_env_var_used_without_cli() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
        [analysis]
        sensitivity = "conservative"
        "#,
    );
    env::set_var(CONFIG_ENV_VAR, &path);

    let config = ConfigResolver::new(None).load().unwrap();
    assert_eq!(config.analysis.sensitivity, Sensitivity::Conservative);

    env::remove_var(CONFIG_ENV_VAR);
}

#[test]
#[serial]
fn test_missing_explicit_file_falls_back_to_defaults() {
    env::remove_var(CONFIG_ENV_VAR);
    let resolver = ConfigResolver::new(Some(PathBuf::from("/nonexistent/hymnal/config.toml")));

    let config = resolver.load().unwrap();
    assert_eq!(config, TomlConfig::default());
}

#[test]
fn test_invalid_weights_are_fatal() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
        [analysis.weights]
        drugs = -1.0
        "#,
    );

    let err = TomlConfig::load(&path).unwrap_err();
    assert!(matches!(err, Error::Config(_)));
    assert!(err.to_string().contains("weights.drugs"));
}

#[test]
fn test_logging_level_override() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
        [logging]
        level = "hymnal_analyzer=debug"
        "#,
    );

    let config = TomlConfig::load(&path).unwrap();
    assert_eq!(config.logging.level, "hymnal_analyzer=debug");
    assert_eq!(config.profile, ScoringProfile::ContextAware);
}
