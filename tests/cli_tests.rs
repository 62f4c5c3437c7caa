//! CLI integration tests for study-assistant
//!
//! Tests the command-line interface behavior including:
//! - Help and version output
//! - Configuration commands
//! - Login and status against a mock backend
//! - Refusing to open the shell while signed out

mod common;

use assert_cmd::Command;
use common::login_json;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Get the study-assistant command, isolated in `dir`
fn study_cmd(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("study-assistant").unwrap();
    cmd.current_dir(dir)
        .env_remove("RUST_LOG")
        .env_remove("STUDY_ASSISTANT_PASSWORD")
        .env_remove("STUDY_ASSISTANT__SERVER__BASE_URL")
        .arg("--no-color");
    cmd
}

// ============================================================================
// Help & Version Tests
// ============================================================================

#[test]
fn test_help_output() {
    let dir = TempDir::new().unwrap();
    study_cmd(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Study Assistant"))
        .stdout(predicate::str::contains("login"))
        .stdout(predicate::str::contains("register"))
        .stdout(predicate::str::contains("logout"))
        .stdout(predicate::str::contains("status"))
        .stdout(predicate::str::contains("config"))
        .stdout(predicate::str::contains("shell"));
}

#[test]
fn test_version_output() {
    let dir = TempDir::new().unwrap();
    study_cmd(dir.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("study-assistant"))
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_unknown_subcommand_fails() {
    let dir = TempDir::new().unwrap();
    study_cmd(dir.path())
        .arg("frobnicate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

// ============================================================================
// Configuration Tests
// ============================================================================

#[test]
fn test_config_init_writes_file() {
    let dir = TempDir::new().unwrap();
    study_cmd(dir.path())
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("study-assistant.toml"));

    let content = fs::read_to_string(dir.path().join("study-assistant.toml")).unwrap();
    assert!(content.contains("[server]"));
    assert!(content.contains("http://localhost:8000"));
    assert!(dir.path().join(".env.example").exists());
}

#[test]
fn test_config_init_does_not_overwrite() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("study-assistant.toml"), "# keep me\n").unwrap();

    study_cmd(dir.path())
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));

    let content = fs::read_to_string(dir.path().join("study-assistant.toml")).unwrap();
    assert_eq!(content, "# keep me\n");
}

#[test]
fn test_config_show_applies_overrides() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("study-assistant.toml"),
        "[server]\nbase_url = \"https://study.example.com\"\n",
    )
    .unwrap();

    study_cmd(dir.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("https://study.example.com"));

    study_cmd(dir.path())
        .env("STUDY_ASSISTANT__SESSIONS__SELECTION", "revalidate")
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("revalidate"));
}

#[test]
fn test_invalid_config_fails() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("study-assistant.toml"),
        "[server]\nbase_url = \"not a url\"\n",
    )
    .unwrap();

    study_cmd(dir.path())
        .arg("status")
        .assert()
        .failure()
        .stderr(predicate::str::contains("base_url"));
}

// ============================================================================
// Account Tests
// ============================================================================

#[test]
fn test_status_when_signed_out() {
    let dir = TempDir::new().unwrap();
    study_cmd(dir.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("not signed in"));
}

#[test]
fn test_shell_requires_login() {
    let dir = TempDir::new().unwrap();
    study_cmd(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not signed in"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_login_status_logout() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(login_json("cli-token")))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let base_url = server.uri();

    study_cmd(dir.path())
        .args(["--base-url", &base_url, "login", "-e", "a@b.com", "-p", "pw"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Signed in as Ada Byron"));

    let stored = fs::read_to_string(dir.path().join(".study-assistant/storage.json")).unwrap();
    assert!(stored.contains("cli-token"));

    study_cmd(dir.path())
        .args(["--base-url", &base_url, "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Ada Byron"))
        .stdout(predicate::str::contains("a@b.com"));

    study_cmd(dir.path())
        .arg("logout")
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged out"));

    study_cmd(dir.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("not signed in"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_login_failure_exits_non_zero() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(serde_json::json!({"detail": "Incorrect email or password"})),
        )
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    study_cmd(dir.path())
        .args(["--base-url", &server.uri(), "login", "-e", "a@b.com", "-p", "bad"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Incorrect email or password"));

    assert!(!dir.path().join(".study-assistant/storage.json").exists());
}
