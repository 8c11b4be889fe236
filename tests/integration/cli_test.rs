//! Integration tests for the tsr binary

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

use super::helpers::{fixture, temp_file};
use tsr::Document;

/// A `tsr` command isolated from the user's config file.
fn tsr(config_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("tsr").unwrap();
    cmd.env("TSR_CONFIG", config_dir.path().join("config.toml"));
    cmd.env_remove("TSR_LOG");
    cmd
}

#[test]
fn state_prints_final_json() {
    let config = TempDir::new().unwrap();
    tsr(&config)
        .arg("state")
        .arg(fixture("typing.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("\"text\": \"Yo!\""))
        .stdout(predicate::str::contains("\"cursorPosition\": 2"))
        .stdout(predicate::str::contains("\"isComposing\": false"));
}

#[test]
fn state_at_time_is_annotated() {
    let config = TempDir::new().unwrap();
    tsr(&config)
        .args(["state", "--at", "950", "--annotate"])
        .arg(fixture("typing.json"))
        .assert()
        .success()
        .stdout("Hi!‹に›|\n");

    tsr(&config)
        .args(["state", "--at", "1550", "--annotate"])
        .arg(fixture("typing.json"))
        .assert()
        .success()
        .stdout("[Hi]!\n");
}

#[test]
fn state_before_first_event_is_initial_text() {
    let config = TempDir::new().unwrap();
    let (_dir, path) = temp_file(
        "late.json",
        r#"{"version":"0.1","session":{"id":"x"},"initial_text":"seed","events":[{"time":500,"type":"input","inputType":"insertText","data":"!","pos":4}]}"#,
    );
    tsr(&config)
        .args(["state", "--annotate", "--at", "100"])
        .arg(&path)
        .assert()
        .success()
        .stdout("|seed\n");
}

#[test]
fn info_lists_session_and_markers() {
    let config = TempDir::new().unwrap();
    tsr(&config)
        .arg("info")
        .arg(fixture("typing.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("demo-typing"))
        .stdout(predicate::str::contains("Events:    15"))
        .stdout(predicate::str::contains("00:02 (2000 ms)"))
        .stdout(predicate::str::contains("pointermove"))
        .stdout(predicate::str::contains("00:00 greeting-done"));
}

#[test]
fn convert_to_ndjson_file() {
    let config = TempDir::new().unwrap();
    let out_dir = TempDir::new().unwrap();
    let out = out_dir.path().join("typing.jsonl");

    tsr(&config)
        .args(["convert", "--to", "ndjson", "-o"])
        .arg(&out)
        .arg(fixture("typing.json"))
        .assert()
        .success();

    let original = Document::parse(fixture("typing.json")).unwrap();
    let converted = Document::parse(&out).unwrap();
    assert_eq!(converted, original);
}

#[test]
fn convert_to_json_stdout() {
    let config = TempDir::new().unwrap();
    tsr(&config)
        .args(["convert", "--to", "json"])
        .arg(fixture("session.ndjson"))
        .assert()
        .success()
        .stdout(predicate::str::contains("\"initial_text\": \"abc\""))
        .stdout(predicate::str::contains("\"midpoint\""));
}

#[test]
fn unsupported_version_fails() {
    let config = TempDir::new().unwrap();
    let (_dir, path) = temp_file(
        "future.json",
        r#"{"version":"9.9","session":{"id":"x"},"initial_text":"","events":[]}"#,
    );
    tsr(&config)
        .arg("state")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Only document version 0.1 is supported"));
}

#[test]
fn missing_file_fails() {
    let config = TempDir::new().unwrap();
    tsr(&config)
        .args(["info", "no-such-session.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to open file"));
}

#[test]
fn config_shows_defaults_when_missing() {
    let config = TempDir::new().unwrap();
    tsr(&config)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("not found, defaults"))
        .stdout(predicate::str::contains("speed = 1.0"))
        .stdout(predicate::str::contains("seek_step_ms = 5000"));
}

#[test]
fn invalid_config_is_reported() {
    let config = TempDir::new().unwrap();
    std::fs::write(
        config.path().join("config.toml"),
        "[playback]\nspeed = -1.0\n",
    )
    .unwrap();
    tsr(&config)
        .arg("config")
        .assert()
        .failure()
        .stderr(predicate::str::contains("playback.speed must be positive"));
}

#[test]
fn play_without_events_exits_cleanly() {
    let config = TempDir::new().unwrap();
    let (_dir, path) = temp_file(
        "empty.json",
        r#"{"version":"0.1","session":{"id":"x"},"initial_text":"","events":[]}"#,
    );
    tsr(&config)
        .arg("play")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing to play"));
}
