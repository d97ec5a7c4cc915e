use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use std::{fs, path::Path};
use tempfile::TempDir;
use tracing::info;

fn write_recording(dir: &Path) -> std::path::PathBuf {
    let recording = json!({
        "fonts": [{
            "font": { "name": "Helvetica", "loadedName": "g_d0_f1", "type": "Type1" },
            "css": "@font-face { src: url(\"blob:font-1\") }"
        }],
        "pages": [
            {
                "fnArray": [10, 44, 11, 22],
                "argsArray": [null, [[{ "fontChar": "H", "unicode": "H" }, -120]], null, null]
            },
            { "fnArray": [10, 11], "argsArray": [null, null] }
        ]
    });
    let path = dir.join("recording.json");
    fs::write(&path, recording.to_string()).unwrap();
    path
}

fn write_config(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("pdfbug.toml");
    fs::write(&path, "tools = \"all\"\n\n[session]\npersist = false\n").unwrap();
    path
}

#[test]
fn test_help_command() {
    pdfbug_common::logging::ensure_test_logging(None);
    info!("Testing CLI help command");

    let mut cmd = Command::cargo_bin("pdfbug").unwrap();
    cmd.arg("--help").assert().success().stdout(predicate::str::contains("operator lists"));
}

#[test]
fn test_version_command() {
    pdfbug_common::logging::ensure_test_logging(None);
    info!("Running test");
    let mut cmd = Command::cargo_bin("pdfbug").unwrap();
    cmd.arg("--version").assert().success().stdout(predicate::str::contains("pdfbug"));
}

#[test]
fn test_missing_recording_argument() {
    pdfbug_common::logging::ensure_test_logging(None);
    info!("Running test");
    let mut cmd = Command::cargo_bin("pdfbug").unwrap();
    cmd.assert().failure().stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_invalid_breakpoint_location() {
    pdfbug_common::logging::ensure_test_logging(None);
    info!("Running test");
    let mut cmd = Command::cargo_bin("pdfbug").unwrap();
    cmd.args(["recording.json", "--break", "three"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--break"));
}

#[test]
fn test_headless_missing_recording_file() {
    pdfbug_common::logging::ensure_test_logging(None);
    info!("Running test");
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path());

    let mut cmd = Command::cargo_bin("pdfbug").unwrap();
    cmd.arg(dir.path().join("missing.json"))
        .arg("--config")
        .arg(&config)
        .arg("--headless")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read recording"));
}

#[test]
fn test_headless_run_continues_through_breakpoints() {
    pdfbug_common::logging::ensure_test_logging(None);
    info!("Running test");
    let dir = TempDir::new().unwrap();
    let recording = write_recording(dir.path());
    let config = write_config(dir.path());

    let mut cmd = Command::cargo_bin("pdfbug").unwrap();
    cmd.arg(&recording)
        .arg("--config")
        .arg(&config)
        .args(["--headless", "--break", "0:1", "--break", "1:0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Breakpoint hit on page 1 before operation 1"))
        .stdout(predicate::str::contains("Breakpoint hit on page 2 before operation 0"))
        .stdout(predicate::str::contains("Page 1: completed, 4 operations"))
        .stdout(predicate::str::contains("Page 2: completed, 2 operations"))
        .stdout(predicate::str::contains("Font Helvetica (g_d0_f1, Type1)"))
        .stdout(predicate::str::contains("Overall"));
}

#[test]
fn test_headless_persists_breakpoints_in_session() {
    pdfbug_common::logging::ensure_test_logging(None);
    info!("Running test");
    let dir = TempDir::new().unwrap();
    let recording = write_recording(dir.path());
    let config = dir.path().join("persist.toml");
    fs::write(&config, "tools = \"Stepper\"\n").unwrap();
    let storage = dir.path().join("sessions");

    let mut cmd = Command::cargo_bin("pdfbug").unwrap();
    cmd.arg(&recording)
        .arg("--config")
        .arg(&config)
        .arg("--storage-dir")
        .arg(&storage)
        .args(["--session", "cli", "--headless", "--break", "0:2"])
        .assert()
        .success();

    let saved = fs::read_to_string(storage.join("cli").join("pdfbugBreakPoints.json")).unwrap();
    let saved: serde_json::Value = serde_json::from_str(&saved).unwrap();
    assert_eq!(saved, json!({ "0": [2] }));
}
