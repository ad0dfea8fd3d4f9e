//! Integration tests for the `kbdlight` binary's command-line paths.
//!
//! These tests exercise the binary via `assert_cmd` against a fake device
//! directory. The control panel (no arguments) is not launched here.

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

fn cli() -> assert_cmd::Command {
    cargo_bin_cmd!("kbdlight")
}

/// Fake device directory with both attributes present.
fn writable_device() -> TempDir {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("brightness"), "128").unwrap();
    std::fs::write(dir.path().join("multi_intensity"), "255 255 255").unwrap();
    dir
}

fn read_attr(dir: &Path, attr: &str) -> String {
    std::fs::read_to_string(dir.join(attr)).unwrap()
}

#[test]
fn cli_help_succeeds() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--set-backlight"));
}

#[test]
fn cli_version_prints_version() {
    cli()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

// ── --set-backlight ──

#[test]
fn set_backlight_writes_device() {
    let dev = writable_device();
    cli()
        .arg("--device")
        .arg(dev.path())
        .args(["--set-backlight", "100", "255,0,0"])
        .assert()
        .success();

    assert_eq!(read_attr(dev.path(), "brightness"), "100");
    assert_eq!(read_attr(dev.path(), "multi_intensity"), "255 0 0");
}

#[test]
fn set_backlight_device_flag_after_values() {
    let dev = writable_device();
    cli()
        .args(["--set-backlight", "0", "0,0,0", "--device"])
        .arg(dev.path())
        .assert()
        .success();

    assert_eq!(read_attr(dev.path(), "brightness"), "0");
    assert_eq!(read_attr(dev.path(), "multi_intensity"), "0 0 0");
}

#[test]
fn set_backlight_unwritable_device_exits_2_with_io_error() {
    // Attribute files missing: the write fails even when run as root.
    let dev = TempDir::new().unwrap();
    cli()
        .arg("--device")
        .arg(dev.path())
        .args(["--set-backlight", "100", "255,0,0"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("No such file or directory"));

    assert!(!dev.path().join("brightness").exists());
}

#[test]
fn set_backlight_out_of_range_exits_2() {
    let dev = writable_device();
    cli()
        .arg("--device")
        .arg(dev.path())
        .args(["--set-backlight", "300", "1,2,3"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid argument"));

    assert_eq!(read_attr(dev.path(), "brightness"), "128");
}

#[test]
fn set_backlight_bad_color_exits_2() {
    let dev = writable_device();
    cli()
        .arg("--device")
        .arg(dev.path())
        .args(["--set-backlight", "10", "255,0"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Color error"));
}

#[test]
fn set_backlight_with_device_ignores_broken_config() {
    let dev = writable_device();
    let config_dir = TempDir::new().unwrap();
    let config_path = config_dir.path().join("config.toml");
    std::fs::write(&config_path, "device_path = [not toml").unwrap();

    cli()
        .arg("--config")
        .arg(&config_path)
        .arg("--device")
        .arg(dev.path())
        .args(["--set-backlight", "5", "1,2,3"])
        .assert()
        .success()
        .stderr(predicate::str::is_empty());

    assert_eq!(read_attr(dev.path(), "brightness"), "5");
}

#[test]
fn status_warns_about_broken_config() {
    let dev = writable_device();
    let config_dir = TempDir::new().unwrap();
    let config_path = config_dir.path().join("config.toml");
    std::fs::write(&config_path, "device_path = [not toml").unwrap();

    cli()
        .arg("--config")
        .arg(&config_path)
        .arg("--device")
        .arg(dev.path())
        .arg("--status")
        .assert()
        .success()
        .stderr(predicate::str::contains("config parse error"));
}

#[test]
fn set_backlight_missing_value_is_usage_error() {
    cli().args(["--set-backlight", "100"]).assert().code(2);
}

// ── --status ──

#[test]
fn status_json_reports_device_state() {
    let dev = writable_device();
    std::fs::write(dev.path().join("brightness"), "42\n").unwrap();
    std::fs::write(dev.path().join("multi_intensity"), "10 20 30\n").unwrap();
    let config_dir = TempDir::new().unwrap();

    let output = cli()
        .arg("--device")
        .arg(dev.path())
        .arg("--config")
        .arg(config_dir.path().join("config.toml"))
        .args(["--status", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json: serde_json::Value =
        serde_json::from_slice(&output).expect("--status --json should produce valid JSON");
    assert_eq!(json["device"]["present"], true);
    assert_eq!(json["device"]["brightness"], 42);
    assert_eq!(json["device"]["color_hex"], "#0A141E");
    assert_eq!(json["config"]["config_file_exists"], false);
    assert_eq!(json["config"]["settings"]["elevation_helper"], "pkexec");
}

#[test]
fn status_absent_device() {
    let dev = TempDir::new().unwrap();
    let missing = dev.path().join("gone");
    cli()
        .arg("--device")
        .arg(&missing)
        .arg("--status")
        .assert()
        .success()
        .stdout(predicate::str::contains("(not found)"));
}

#[test]
fn status_uses_config_device_path() {
    let dev = writable_device();
    let config_dir = TempDir::new().unwrap();
    let config_path = config_dir.path().join("config.toml");
    std::fs::write(
        &config_path,
        format!("device_path = \"{}\"\n", dev.path().display()),
    )
    .unwrap();

    cli()
        .arg("--config")
        .arg(&config_path)
        .arg("--status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Brightness:"))
        .stdout(predicate::str::contains("#FFFFFF (255 255 255)"));
}

#[test]
fn json_requires_status() {
    cli().arg("--json").assert().code(2);
}

#[test]
fn status_conflicts_with_set_backlight() {
    cli()
        .args(["--status", "--set-backlight", "1", "1,1,1"])
        .assert()
        .code(2);
}

// ── --verbose flag ──

#[test]
fn verbose_flag_accepted() {
    let dev = writable_device();
    cli()
        .arg("-v")
        .arg("--device")
        .arg(dev.path())
        .arg("--status")
        .assert()
        .success();
}
