//! Routing tests against the built `credstash` binary.
//!
//! None of these touch AWS; they exercise argument parsing and the
//! local configuration commands.

use std::path::Path;
use std::process::{Command, Output};

fn credstash(home: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_credstash"))
        .args(args)
        .env("CREDSTASH_HOME", home)
        .env_remove("CREDSTASH_CONFIG")
        .env_remove("CREDSTASH_TABLE")
        .env_remove("CREDSTASH_ENDPOINT_URL")
        .env_remove("AWS_REGION")
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run credstash binary")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_help_lists_commands() {
    let home = tempfile::tempdir().unwrap();
    let output = credstash(home.path(), &["--help"]);
    assert!(output.status.success());

    let text = stdout(&output);
    for command in ["setup", "list", "versions", "latest", "delete", "config"] {
        assert!(text.contains(command), "help is missing '{command}'");
    }
}

#[test]
fn test_unknown_command_fails() {
    let home = tempfile::tempdir().unwrap();
    let output = credstash(home.path(), &["rotate-everything"]);
    assert!(!output.status.success());
}

#[test]
fn test_version_command() {
    let home = tempfile::tempdir().unwrap();
    let output = credstash(home.path(), &["version"]);
    assert!(output.status.success());
    assert!(stdout(&output).starts_with("credstash "));
}

#[test]
fn test_config_path_under_home() {
    let home = tempfile::tempdir().unwrap();
    let output = credstash(home.path(), &["config", "path"]);
    assert!(output.status.success());

    let expected = home.path().join("credstash.json5");
    assert_eq!(stdout(&output).trim(), expected.display().to_string());
}

#[test]
fn test_table_flag_reaches_config_show() {
    let home = tempfile::tempdir().unwrap();
    let output = credstash(home.path(), &["--table", "team-secrets", "config", "show"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("team-secrets"));
}

#[test]
fn test_invalid_config_file_is_reported() {
    let home = tempfile::tempdir().unwrap();
    std::fs::write(
        home.path().join("credstash.json5"),
        "{ table: { name: \"t\", read_capacity: 0 } }",
    )
    .unwrap();

    let output = credstash(home.path(), &["config", "show"]);
    assert!(!output.status.success());
}

#[test]
fn test_config_env_var_selects_file() {
    let home = tempfile::tempdir().unwrap();
    let path = home.path().join("elsewhere.json5");
    std::fs::write(&path, "{ table: { name: \"from-env-file\" } }").unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_credstash"))
        .args(["config", "show"])
        .env("CREDSTASH_HOME", home.path())
        .env("CREDSTASH_CONFIG", &path)
        .env_remove("CREDSTASH_TABLE")
        .env_remove("CREDSTASH_ENDPOINT_URL")
        .env_remove("AWS_REGION")
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run credstash binary");
    assert!(output.status.success());
    assert!(stdout(&output).contains("from-env-file"));
}
