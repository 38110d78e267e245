//! End-to-end tests of the `konto` binary.
//!
//! Only offline paths are exercised: rendering snapshot files, argument
//! validation and the missing-token short circuit.

use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// The binary with a private config directory and no token.
fn konto(config_home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("konto").unwrap();
    cmd.env("XDG_CONFIG_HOME", config_home.path())
        .env("HOME", config_home.path())
        .env_remove("KONTO_TOKEN")
        .env_remove("KONTO_CONFIG")
        .env_remove("KONTO_SERVER")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_show_users_select_all() {
    let home = TempDir::new().unwrap();
    konto(&home)
        .arg("show")
        .arg(fixture_path("admin_snapshot.json"))
        .args(["-S", "benutzer", "--select-all"])
        .assert()
        .success()
        .stdout(predicate::str::contains("> [2] Benutzer"))
        .stdout(predicate::str::contains("* Anna Muster"))
        .stdout(predicate::str::contains("2 rows shown, 2 selected"));
}

#[test]
fn test_show_json_view() {
    let home = TempDir::new().unwrap();
    let output = konto(&home)
        .arg("--json")
        .arg("show")
        .arg(fixture_path("admin_snapshot.json"))
        .args(["-S", "1", "-f", "erbfall"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let view: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(view["role"], "admin");
    assert_eq!(view["section"], "zugriffe");
    assert_eq!(view["filter"], "erbfall");
    assert_eq!(view["table"]["rows"][0]["id"], "17");
}

#[test]
fn test_show_unknown_section_is_usage_error() {
    let home = TempDir::new().unwrap();
    konto(&home)
        .arg("show")
        .arg(fixture_path("admin_snapshot.json"))
        .args(["-S", "meine-grundbuchblaetter"])
        .assert()
        .code(64)
        .stderr(predicate::str::contains("not a section for admin"));
}

#[test]
fn test_show_missing_file() {
    let home = TempDir::new().unwrap();
    konto(&home)
        .args(["show", "does-not-exist.json"])
        .assert()
        .code(3);
}

#[test]
fn test_send_without_token_is_not_sent() {
    let home = TempDir::new().unwrap();
    konto(&home)
        .args(["--server", "http://127.0.0.1:9", "send", "delete-users", "a@b.com"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("no auth token"));
}

#[test]
fn test_send_rejects_bad_sheet_number() {
    let home = TempDir::new().unwrap();
    konto(&home)
        .args(["--token", "tok", "send", "subscribe", "--type", "email"])
        .args(["--court", "Köln", "--district", "Deutz", "--sheet", "12a"])
        .args(["--target", "a@b.com"])
        .assert()
        .code(64)
        .stderr(predicate::str::contains("blatt"));
}

#[test]
fn test_config_path_uses_config_home() {
    let home = TempDir::new().unwrap();
    konto(&home)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("konto-console"))
        .stdout(predicate::str::contains("config.toml"));
}
