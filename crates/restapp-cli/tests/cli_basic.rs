//! Basic CLI E2E tests.
//!
//! Tests invoke the built binary with RESTAPP_HOME pointed at a temp dir.

use std::path::Path;
use std::process::Command;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(home: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_restapp"))
        .env("RESTAPP_HOME", home)
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

#[test]
fn test_config_get_default() {
    let home = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(home.path(), &["config", "get", "timer.max_minutes"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "240");
    assert!(home.path().join("config.toml").exists());
}

#[test]
fn test_config_set_and_get() {
    let home = tempfile::tempdir().unwrap();
    let (_, _, code) = run_cli(home.path(), &["config", "set", "timer.terminal_action", "shutdown"]);
    assert_eq!(code, 0);
    let (stdout, _, _) = run_cli(home.path(), &["config", "get", "timer.terminal_action"]);
    assert_eq!(stdout.trim(), "shutdown");
}

#[test]
fn test_config_rejects_bad_values() {
    let home = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(home.path(), &["config", "set", "timer.max_minutes", "0"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("error:"));

    let (_, _, code) = run_cli(home.path(), &["config", "get", "timer.nope"]);
    assert_ne!(code, 0);
}

#[test]
fn test_config_list_is_json() {
    let home = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(home.path(), &["config", "list"]);
    assert_eq!(code, 0);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed["gestures"]["enter_breathing_clicks"], 5);
}

#[test]
fn test_scenes_lists_discovered() {
    let home = tempfile::tempdir().unwrap();
    let scene = home.path().join("scenes").join("rain");
    std::fs::create_dir_all(&scene).unwrap();
    std::fs::write(scene.join("loop.ogg"), b"").unwrap();
    std::fs::write(scene.join("animation.gif"), b"").unwrap();

    let (stdout, _, code) = run_cli(home.path(), &["scenes", "--json"]);
    assert_eq!(code, 0);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed[0]["id"], "rain");
}

#[test]
fn test_phase_reports_exhale() {
    let home = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(home.path(), &["phase", "10"]);
    assert_eq!(code, 0);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed["stage"], "exhale");
    assert_eq!(parsed["radius_fraction"], 0.5);
}

#[test]
fn test_run_quits_on_command() {
    use std::io::Write;
    use std::process::Stdio;

    let home = tempfile::tempdir().unwrap();
    let mut child = Command::new(env!("CARGO_BIN_EXE_restapp"))
        .env("RESTAPP_HOME", home.path())
        .args(["run", "--dry-run", "--minutes", "30"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("Failed to spawn CLI");
    child
        .stdin
        .as_mut()
        .unwrap()
        .write_all(b"status\nquit\n")
        .unwrap();
    let output = child.wait_with_output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let events: Vec<serde_json::Value> = stdout
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert!(events.iter().any(|e| e["type"] == "TimerStarted"));
    let snapshot = events
        .iter()
        .find(|e| e["type"] == "StateSnapshot")
        .expect("snapshot printed");
    assert_eq!(snapshot["state"], "running");
    assert_eq!(snapshot["configured_secs"], 1800);
}
