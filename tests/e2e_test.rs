/// End-to-end tests driving the compiled binary.
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn reconciler() -> Command {
    Command::cargo_bin("findings-reconciler").unwrap()
}

#[test]
fn test_help_describes_the_tool() {
    reconciler()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--event"))
        .stdout(predicate::str::contains("--dry-run"));
}

#[test]
fn test_unknown_flag_exits_with_usage_error() {
    reconciler().arg("--bogus").assert().code(2);
}

#[test]
fn test_empty_findings_event_is_a_benign_no_op() {
    let dir = TempDir::new().unwrap();
    let event_path = dir.path().join("event.json");
    fs::write(&event_path, r#"{"detail": {"findings": []}}"#).unwrap();

    // No service call happens for an empty batch, so unreachable
    // endpoints are fine here.
    reconciler()
        .current_dir(dir.path())
        .args(["--event", event_path.to_str().unwrap()])
        .args(["--scanner-url", "http://127.0.0.1:1"])
        .args(["--aggregator-url", "http://127.0.0.1:1"])
        .assert()
        .success()
        .stderr(predicate::str::contains("nothing to reconcile"));
}

#[test]
fn test_missing_endpoint_configuration_fails() {
    let dir = TempDir::new().unwrap();
    let event_path = dir.path().join("event.json");
    fs::write(&event_path, r#"{"detail": {"findings": []}}"#).unwrap();

    reconciler()
        .current_dir(dir.path())
        .args(["--event", event_path.to_str().unwrap()])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("--scanner-url"));
}

#[test]
fn test_missing_event_file_fails() {
    let dir = TempDir::new().unwrap();

    reconciler()
        .current_dir(dir.path())
        .args(["--event", "no-such-event.json"])
        .args(["--scanner-url", "http://127.0.0.1:1"])
        .args(["--aggregator-url", "http://127.0.0.1:1"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Failed to read event payload"));
}

#[test]
fn test_malformed_event_json_fails() {
    let dir = TempDir::new().unwrap();
    let event_path = dir.path().join("event.json");
    fs::write(&event_path, "{not json").unwrap();

    reconciler()
        .current_dir(dir.path())
        .args(["--event", event_path.to_str().unwrap()])
        .args(["--scanner-url", "http://127.0.0.1:1"])
        .args(["--aggregator-url", "http://127.0.0.1:1"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("not valid JSON"));
}

#[test]
fn test_event_from_stdin() {
    let dir = TempDir::new().unwrap();

    reconciler()
        .current_dir(dir.path())
        .args(["--scanner-url", "http://127.0.0.1:1"])
        .args(["--aggregator-url", "http://127.0.0.1:1"])
        .write_stdin(r#"{"detail": {"findings": []}}"#)
        .assert()
        .success()
        .stderr(predicate::str::contains("nothing to reconcile"));
}

#[test]
fn test_endpoints_from_config_file() {
    let dir = TempDir::new().unwrap();
    let event_path = dir.path().join("event.json");
    fs::write(&event_path, r#"{"detail": {"findings": []}}"#).unwrap();
    fs::write(
        dir.path().join("reconciler.config.yml"),
        "scanner_url: http://127.0.0.1:1\naggregator_url: http://127.0.0.1:1\n",
    )
    .unwrap();

    reconciler()
        .current_dir(dir.path())
        .args(["--event", event_path.to_str().unwrap()])
        .assert()
        .success();
}

#[test]
fn test_unknown_config_field_warns_but_runs() {
    let dir = TempDir::new().unwrap();
    let event_path = dir.path().join("event.json");
    fs::write(&event_path, r#"{"detail": {"findings": []}}"#).unwrap();
    fs::write(
        dir.path().join("reconciler.config.yml"),
        "scanner_url: http://127.0.0.1:1\naggregator_url: http://127.0.0.1:1\nretries: 3\n",
    )
    .unwrap();

    reconciler()
        .current_dir(dir.path())
        .args(["--event", event_path.to_str().unwrap()])
        .assert()
        .success()
        .stderr(predicate::str::contains("Unknown config field 'retries'"));
}
