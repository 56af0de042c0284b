//! Integration tests for the `icinga2` CLI binary.
//!
//! Argument parsing, help output, shell completions and error handling run
//! without a server; the request tests point the binary at a wiremock
//! instance.
#![allow(clippy::unwrap_used)]

use std::io::Write;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `icinga2` binary with env isolation.
///
/// Clears all `ICINGA2_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn icinga2_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("icinga2");
    cmd.env("HOME", "/tmp/icinga2-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/icinga2-cli-test-nonexistent")
        .env_remove("ICINGA2_CONFIG")
        .env_remove("ICINGA2_OUTPUT")
        .env_remove("ICINGA2_API_URL")
        .env_remove("ICINGA2_API_USERNAME")
        .env_remove("ICINGA2_API_PASSWORD")
        .env_remove("ICINGA2_API_CERTIFICATE")
        .env_remove("ICINGA2_API_KEY")
        .env_remove("ICINGA2_API_CA_CERTIFICATE")
        .env_remove("ICINGA2_API_TIMEOUT")
        .env_remove("RUST_LOG");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

/// Run the binary against `server` with basic auth, off the async runtime.
async fn run_against(server: &MockServer, args: &[&str]) -> std::process::Output {
    let mut cmd = icinga2_cmd();
    cmd.args(["--url", &server.uri(), "--username", "root", "--password", "icinga"])
        .args(args);
    tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap()
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = icinga2_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    icinga2_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("Icinga 2")
            .and(predicate::str::contains("objects"))
            .and(predicate::str::contains("actions"))
            .and(predicate::str::contains("events"))
            .and(predicate::str::contains("status")),
    );
}

#[test]
fn test_version_flag() {
    icinga2_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("icinga2"));
}

#[test]
fn test_actions_help_lists_every_verb() {
    let mut expected = predicate::str::contains("process-check-result").boxed();
    for verb in [
        "reschedule-check",
        "send-custom-notification",
        "delay-notification",
        "acknowledge-problem",
        "remove-acknowledgement",
        "add-comment",
        "remove-comment",
        "schedule-downtime",
        "remove-downtime",
        "shutdown-process",
        "restart-process",
    ] {
        expected = expected.and(predicate::str::contains(verb)).boxed();
    }
    icinga2_cmd()
        .args(["actions", "--help"])
        .assert()
        .success()
        .stdout(expected);
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    icinga2_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    icinga2_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Argument validation ─────────────────────────────────────────────

#[test]
fn test_unknown_object_type_is_a_usage_error() {
    let output = icinga2_cmd()
        .args(["objects", "list", "Satellite"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(
        text.contains("\"Satellite\" does not exist"),
        "Expected object type rejection in output:\n{text}"
    );
}

#[test]
fn test_object_type_is_case_sensitive() {
    icinga2_cmd()
        .args(["objects", "list", "host"])
        .assert()
        .code(2);
}

#[test]
fn test_remove_comment_needs_name_or_filter() {
    icinga2_cmd()
        .args(["actions", "remove-comment", "Comment"])
        .assert()
        .code(2);
}

// ── Configuration ───────────────────────────────────────────────────

#[test]
fn test_missing_url_is_reported() {
    let output = icinga2_cmd().arg("status").output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(
        text.contains("no API url configured"),
        "Expected missing url message in output:\n{text}"
    );
}

#[test]
fn test_explicit_missing_config_file() {
    let output = icinga2_cmd()
        .args(["--config", "/tmp/icinga2-cli-test-nonexistent/config.toml", "status"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(
        text.contains("doesn't exist"),
        "Expected not-found message in output:\n{text}"
    );
}

#[test]
fn test_config_show_masks_password() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "[api]\nurl = \"https://icinga.example:5665\"\nusername = \"root\"\npassword = \"hunter2\""
    )
    .unwrap();

    icinga2_cmd()
        .args(["--config", file.path().to_str().unwrap(), "config", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("https://icinga.example:5665")
                .and(predicate::str::contains("root"))
                .and(predicate::str::contains("hunter2").not()),
        );
}

#[test]
fn test_flags_override_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[api]\nurl = \"https://from-file:5665\"").unwrap();

    icinga2_cmd()
        .args([
            "--config",
            file.path().to_str().unwrap(),
            "--url",
            "https://from-flag:5665",
            "config",
            "show",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("https://from-flag:5665"));
}

#[test]
fn test_environment_overrides_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[api]\nurl = \"https://from-file:5665\"\ntimeout = 5").unwrap();

    icinga2_cmd()
        .env("ICINGA2_API_URL", "https://from-env:5665")
        .args(["--config", file.path().to_str().unwrap(), "config", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("https://from-env:5665")
                .and(predicate::str::contains("timeout = 5")),
        );
}

#[test]
fn test_numeric_password_from_environment() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[api]\nurl = \"https://icinga:5665\"\nusername = \"root\"").unwrap();

    icinga2_cmd()
        .env("ICINGA2_API_PASSWORD", "123456")
        .args(["--config", file.path().to_str().unwrap(), "config", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("password = \"********\"")
                .and(predicate::str::contains("123456").not()),
        );
}

// ── Requests ────────────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_objects_list_prints_results() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(header("X-HTTP-Method-Override", "GET"))
        .and(path("/v1/objects/hosts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{"name": "web01", "type": "Host"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let output = run_against(&server, &["-o", "json-compact", "objects", "list", "Host"]).await;
    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        r#"[{"name":"web01","type":"Host"}]"#
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_not_found_exits_with_4() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/objects/hosts/ghost"))
        .respond_with(ResponseTemplate::new(404).set_body_string(r#"{"error": "not found"}"#))
        .mount(&server)
        .await;

    let output = run_against(&server, &["objects", "get", "Host", "ghost"]).await;
    assert_eq!(output.status.code(), Some(4), "{}", combined_output(&output));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_process_check_result_sends_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/actions/process-check-result"))
        .and(body_json(json!({
            "service": "host1!ping4",
            "exit_status": 2,
            "plugin_output": "PING CRITICAL",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{"code": 200.0, "status": "Successfully processed check result"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let output = run_against(
        &server,
        &[
            "actions",
            "process-check-result",
            "Service",
            "host1!ping4",
            "--exit-status",
            "2",
            "--plugin-output",
            "PING CRITICAL",
        ],
    )
    .await;
    assert!(output.status.success(), "{}", combined_output(&output));
    assert!(String::from_utf8_lossy(&output.stdout).contains("Successfully processed"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_events_subscribe_stops_after_count() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/events"))
        .and(body_json(json!({"types": ["CheckResult"], "queue": "cli"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("{\"n\":1}\n{\"n\":2}\n{\"n\":3}\n"),
        )
        .mount(&server)
        .await;

    let output = run_against(
        &server,
        &[
            "-o",
            "json-compact",
            "events",
            "subscribe",
            "--type",
            "CheckResult",
            "--queue",
            "cli",
            "--count",
            "2",
        ],
    )
    .await;
    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).lines().collect::<Vec<_>>(),
        vec![r#"{"n":1}"#, r#"{"n":2}"#]
    );
}
