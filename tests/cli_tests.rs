//! CLI Integration Tests for Portal
//!
//! Tests the command-line interface functionality including the init and
//! config commands.

use std::fs;
use std::process::Command;
use tempfile::TempDir;

/// Helper to run portal-server with arguments
fn run_portal(args: &[&str], working_dir: Option<&str>) -> std::process::Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_portal-server"));
    cmd.args(args).arg("--no-color");

    if let Some(dir) = working_dir {
        cmd.current_dir(dir);
    }

    cmd.output().expect("Failed to execute command")
}

// =============================================================================
// Help and Version Tests
// =============================================================================

#[test]
fn test_help_command() {
    let output = run_portal(&["--help"], None);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(stdout.contains("Portal"));
    assert!(stdout.contains("init"));
    assert!(stdout.contains("config"));
}

#[test]
fn test_version_command() {
    let output = run_portal(&["--version"], None);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("portal-server"));
}

// =============================================================================
// Init Command Tests
// =============================================================================

#[test]
fn test_init_creates_portal_toml() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let temp_path = temp_dir.path().to_str().unwrap();

    let output = run_portal(&["init", temp_path, "--port", "4100"], None);

    assert!(output.status.success());
    let config = fs::read_to_string(temp_dir.path().join("portal.toml")).unwrap();
    assert!(config.contains("port = 4100"));
    assert!(config.contains("jwt_secret_env = \"SECRET\""));
    assert!(temp_dir.path().join(".env.example").exists());
}

#[test]
fn test_init_twice_keeps_existing_config() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let temp_path = temp_dir.path().to_str().unwrap();

    assert!(run_portal(&["init", temp_path, "--port", "4200"], None)
        .status
        .success());
    let output = run_portal(&["init", temp_path, "--port", "4300"], None);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("already exists"));
    let config = fs::read_to_string(temp_dir.path().join("portal.toml")).unwrap();
    assert!(config.contains("port = 4200"));
}

// =============================================================================
// Config Command Tests
// =============================================================================

#[test]
fn test_config_validate_requires_secret() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let temp_path = temp_dir.path().to_str().unwrap();
    assert!(run_portal(&["init", temp_path], None).status.success());

    let output = Command::new(env!("CARGO_BIN_EXE_portal-server"))
        .args(["config", "--validate", "--no-color"])
        .current_dir(temp_path)
        .env_remove("SECRET")
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("SECRET"));
}

#[test]
fn test_config_validate_with_secret() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let temp_path = temp_dir.path().to_str().unwrap();
    assert!(run_portal(&["init", temp_path], None).status.success());

    let output = Command::new(env!("CARGO_BIN_EXE_portal-server"))
        .args(["config", "--no-color"])
        .current_dir(temp_path)
        .env("SECRET", "cli-test-secret-0123456789")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("food"));
    assert!(stdout.contains("clothes"));
}

#[test]
fn test_server_refuses_to_start_without_secret() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let temp_path = temp_dir.path().to_str().unwrap();
    assert!(run_portal(&["init", temp_path], None).status.success());

    let output = Command::new(env!("CARGO_BIN_EXE_portal-server"))
        .arg("--no-color")
        .current_dir(temp_path)
        .env_remove("SECRET")
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
}

#[test]
fn test_scaffolded_env_file_does_not_start_server() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let temp_path = temp_dir.path().to_str().unwrap();
    assert!(run_portal(&["init", temp_path], None).status.success());
    fs::copy(
        temp_dir.path().join(".env.example"),
        temp_dir.path().join(".env"),
    )
    .unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_portal-server"))
        .args(["config", "--validate", "--no-color"])
        .current_dir(temp_path)
        .env_remove("SECRET")
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("SECRET"));
}
