//! Configuration resolution tests
//!
//! Covers the CLI → ENV → TOML → defaults priority order and graceful
//! fallback when no config file exists.
//!
//! Note: Uses serial_test crate to prevent ENV variable race conditions.
//! Tests that manipulate FOOTPRINT_* variables are marked with #[serial].

use footprint_common::config::{ScanConfig, CONFIG_PATH_ENV};
use serial_test::serial;
use std::env;
use std::fs;
use tempfile::TempDir;

fn clear_env() {
    env::remove_var(CONFIG_PATH_ENV);
    env::remove_var("FOOTPRINT_PORT");
    env::remove_var("FOOTPRINT_LOG_LEVEL");
    env::remove_var("CORS_ORIGINS");
    env::remove_var("GITHUB_TOKEN");
}

#[test]
#[serial]
fn test_cli_path_takes_priority_over_env_path() {
    clear_env();
    let dir = TempDir::new().unwrap();
    let cli_file = dir.path().join("cli.toml");
    let env_file = dir.path().join("env.toml");
    fs::write(&cli_file, "port = 7001\n").unwrap();
    fs::write(&env_file, "port = 7002\n").unwrap();

    env::set_var(CONFIG_PATH_ENV, &env_file);
    let config = ScanConfig::load(Some(&cli_file)).unwrap();
    assert_eq!(config.port, 7001);

    let config = ScanConfig::load(None).unwrap();
    assert_eq!(config.port, 7002);

    clear_env();
}

#[test]
#[serial]
fn test_env_overrides_beat_toml_values() {
    clear_env();
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("config.toml");
    fs::write(
        &file,
        r#"
        port = 7001
        log_level = "debug"
        cors_origins = ["http://a.example"]
        "#,
    )
    .unwrap();

    env::set_var("FOOTPRINT_PORT", "7100");
    env::set_var("CORS_ORIGINS", "http://b.example, http://c.example");
    env::set_var("GITHUB_TOKEN", "ghp_test");

    let config = ScanConfig::load(Some(&file)).unwrap();
    assert_eq!(config.port, 7100);
    assert_eq!(config.log_level, "debug");
    assert_eq!(
        config.cors_origins,
        vec!["http://b.example".to_string(), "http://c.example".to_string()]
    );
    assert_eq!(config.github.token.as_deref(), Some("ghp_test"));

    clear_env();
}

#[test]
#[serial]
fn test_invalid_port_env_is_config_error() {
    clear_env();
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("config.toml");
    fs::write(&file, "").unwrap();

    env::set_var("FOOTPRINT_PORT", "not-a-port");
    let result = ScanConfig::load(Some(&file));
    assert!(result.is_err());

    clear_env();
}

#[test]
#[serial]
fn test_explicit_missing_file_is_error() {
    clear_env();
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope.toml");

    let result = ScanConfig::load(Some(&missing));
    assert!(result.is_err(), "An explicitly named config file must exist");
}

#[test]
#[serial]
fn test_malformed_toml_is_error() {
    clear_env();
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("bad.toml");
    fs::write(&file, "port = \"eight thousand\"\n").unwrap();

    assert!(ScanConfig::from_file(&file).is_err());
}
