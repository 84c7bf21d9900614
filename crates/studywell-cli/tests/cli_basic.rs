//! Basic CLI E2E tests.
//!
//! Tests invoke CLI commands via cargo run against the dev data directory
//! and verify outputs.

use std::process::Command;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(args: &[&str]) -> (String, String, i32) {
    let output = Command::new("cargo")
        .args(["run", "-p", "studywell-cli", "--"])
        .args(args)
        .env("STUDYWELL_ENV", "dev")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

#[test]
fn timer_status_reports_a_snapshot() {
    let (stdout, _, code) = run_cli(&["timer", "status"]);
    assert_eq!(code, 0, "timer status failed");
    let json: serde_json::Value =
        serde_json::from_str(&stdout).expect("status output is not JSON");
    assert_eq!(json["type"], "StateSnapshot");
}

#[test]
fn subject_add_and_list() {
    let (stdout, _, code) = run_cli(&["subject", "add", "E2E Subject", "--color", "#22c55e"]);
    assert_eq!(code, 0, "subject add failed");
    let created: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let id = created["id"].as_str().unwrap().to_string();

    let (stdout, _, code) = run_cli(&["subject", "list"]);
    assert_eq!(code, 0, "subject list failed");
    assert!(stdout.contains("E2E Subject"));

    let (stdout, _, code) = run_cli(&["subject", "remove", &id]);
    assert_eq!(code, 0, "subject remove failed");
    let removed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(removed["type"], "SubjectRemoved");
    assert_eq!(removed["id"], id.as_str());
}

#[test]
fn invalid_color_is_rejected() {
    let (_, stderr, code) = run_cli(&["subject", "add", "Bad Color", "--color", "green"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("hex color"));
}

#[test]
fn config_path_points_at_dev_dir() {
    let (stdout, _, code) = run_cli(&["config", "path"]);
    assert_eq!(code, 0, "config path failed");
    assert!(stdout.contains("studywell-dev"));
}
