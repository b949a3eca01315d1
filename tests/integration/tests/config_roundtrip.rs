//! Config save/load roundtrip integration tests.
//!
//! These tests verify that configuration can be serialized, written to disk,
//! and loaded back with identical field values.

use credstash_core::config::{Config, ConfigBuilder, LogLevel};
use std::path::Path;
use tempfile::TempDir;

#[test]
fn test_config_save_and_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("credstash.json5");

    let config = Config::default();
    config.save(&path).unwrap();

    let loaded = Config::load(&path).unwrap();
    assert_eq!(loaded.table, config.table);
    assert_eq!(loaded.logging.level, config.logging.level);
}

#[test]
fn test_config_modify_and_reload() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("credstash.json5");

    let config = ConfigBuilder::new()
        .table_name("team-secrets")
        .region("eu-west-1")
        .endpoint_url("http://localhost:8000")
        .log_level(LogLevel::Debug)
        .build();
    config.save(&path).unwrap();

    let loaded = Config::load(&path).unwrap();
    assert_eq!(loaded.table.name, "team-secrets");
    assert_eq!(loaded.table.region.as_deref(), Some("eu-west-1"));
    assert_eq!(loaded.table.endpoint_url.as_deref(), Some("http://localhost:8000"));
    assert_eq!(loaded.logging.level, LogLevel::Debug);
    assert!(loaded.validate().is_ok());
}

#[test]
fn test_save_leaves_no_temp_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("credstash.json5");
    Config::default().save(&path).unwrap();

    assert!(path.exists());
    assert!(!path.with_extension("tmp").exists());
}

#[test]
fn test_config_load_nonexistent() {
    let result = Config::load(Path::new("/nonexistent/credstash.json5"));
    assert!(result.is_err());
}

#[test]
fn test_config_parse_invalid() {
    let result = Config::parse("not valid json");
    assert!(result.is_err());
}
