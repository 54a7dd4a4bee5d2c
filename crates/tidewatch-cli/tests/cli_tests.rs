//! End-to-end tests for the `tidewatch` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn tidewatch() -> Command {
    let mut cmd = Command::cargo_bin("tidewatch").unwrap();
    cmd.env_remove("TIDEWATCH_CONFIG").env_remove("RUST_LOG");
    cmd
}

/// Write an empty options file so the user's own config never leaks in.
fn empty_config(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("tidewatch.toml");
    fs::write(&path, "").unwrap();
    path
}

#[test]
fn test_version() {
    tidewatch()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("tidewatch"));
}

#[test]
fn test_extensions_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let config = empty_config(&temp_dir);

    tidewatch()
        .arg("-C")
        .arg(&config)
        .arg("extensions")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("extensions: .go, .py, .yaml"))
        .stdout(predicate::str::contains("*.py"));
}

#[test]
fn test_extensions_from_setup_cfg() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join("setup.cfg"),
        "[appengine:file_watcher]\nwatched_extensions = html, .CSS\n",
    )
    .unwrap();
    let nested = temp_dir.path().join("src").join("pages");
    fs::create_dir_all(&nested).unwrap();
    let config = empty_config(&temp_dir);

    tidewatch()
        .arg("-C")
        .arg(&config)
        .arg("extensions")
        .arg(&nested)
        .assert()
        .success()
        .stdout(predicate::str::contains("extensions: .css, .html"))
        .stdout(predicate::str::contains("setup.cfg"));
}

#[test]
fn test_extensions_multi_line_setup_cfg() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join("setup.cfg"),
        "[options]\ninstall_requires =\n    requests\n    six\n\n[appengine:file_watcher]\nwatched_extensions =\n    .html\n    .css\n",
    )
    .unwrap();
    let config = empty_config(&temp_dir);

    tidewatch()
        .arg("-C")
        .arg(&config)
        .arg("extensions")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("extensions: .css, .html"));
}

#[test]
fn test_extensions_honour_options_file() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join("setup.cfg"),
        "[appengine:file_watcher]\nwatched_extensions = .html\n",
    )
    .unwrap();
    let config = temp_dir.path().join("tidewatch.toml");
    fs::write(&config, "extensions = [\".rs\", \"toml\"]\n").unwrap();

    tidewatch()
        .arg("--config")
        .arg(&config)
        .arg("extensions")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("extensions: .rs, .toml"))
        .stdout(predicate::str::contains("source: options file"));
}

#[test]
fn test_extensions_missing_dir_fails() {
    let temp_dir = TempDir::new().unwrap();

    tidewatch()
        .arg("extensions")
        .arg(temp_dir.path().join("missing"))
        .assert()
        .failure();
}

#[test]
fn test_watch_once_on_idle_tree() {
    let temp_dir = TempDir::new().unwrap();
    let config = empty_config(&temp_dir);

    tidewatch()
        .arg("-C")
        .arg(&config)
        .args(["watch", "--once", "--window-ms", "100"])
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_watch_missing_root_fails() {
    let temp_dir = TempDir::new().unwrap();
    let config = empty_config(&temp_dir);

    tidewatch()
        .arg("-C")
        .arg(&config)
        .args(["watch", "--once", "--window-ms", "100"])
        .arg(temp_dir.path().join("does-not-exist"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("does-not-exist"));
}

#[test]
fn test_watch_rejects_bad_config() {
    let temp_dir = TempDir::new().unwrap();
    let config = temp_dir.path().join("bad.toml");
    fs::write(&config, "poll_interval_ms = 0\n").unwrap();

    tidewatch()
        .arg("--config")
        .arg(&config)
        .args(["watch", "--once"])
        .arg(temp_dir.path())
        .assert()
        .failure();
}

#[test]
fn test_watch_requires_roots() {
    tidewatch().arg("watch").assert().failure();
}
