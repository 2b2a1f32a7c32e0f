//! CLI tests for garage-provider
//!
//! Runs the built binary with assert_cmd and covers:
//! - Schema and resource listing without a cluster
//! - Configuration errors and exit codes
//! - Plan output
//! - A create round-trip against a mock admin API

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{json, Value};
use std::io::Write;
use tempfile::NamedTempFile;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// Helper to get a command isolated from the caller's environment
fn garage_cmd(config: &NamedTempFile) -> Command {
    let mut cmd = Command::cargo_bin("garage-provider").unwrap();
    for var in ["GARAGE_HOST", "GARAGE_SCHEME", "GARAGE_TOKEN", "GARAGE_TIMEOUT", "RUST_LOG"] {
        cmd.env_remove(var);
    }
    cmd.arg("--config").arg(config.path());
    cmd
}

// Helper to create an empty config file
fn empty_config() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "# no settings").unwrap();
    file
}

#[test]
fn test_help() {
    Command::cargo_bin("garage-provider")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Garage"));
}

#[test]
fn test_resources_lists_every_type() {
    let config = empty_config();
    garage_cmd(&config)
        .arg("resources")
        .assert()
        .success()
        .stdout("garage_access_key\ngarage_bucket\ngarage_permission\n");
}

#[test]
fn test_schema_is_json() {
    let config = empty_config();
    let output = garage_cmd(&config).arg("schema").output().unwrap();
    assert!(output.status.success());

    let schema: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(schema["provider"]["type"], json!("garage"));
    assert!(schema["resources"]["garage_bucket"]["attributes"].is_array());
    assert!(schema["resources"]["garage_permission"].is_object());
}

#[test]
fn test_schema_of_unknown_resource_fails() {
    let config = empty_config();
    garage_cmd(&config)
        .args(["schema", "-r", "garage_cluster"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("unknown resource type"));
}

#[test]
fn test_missing_config_file_fails() {
    Command::cargo_bin("garage-provider")
        .unwrap()
        .args(["--config", "/definitely/not/here.toml", "resources"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("not/here.toml"));
}

#[test]
fn test_invalid_scheme_fails() {
    let config = empty_config();
    garage_cmd(&config)
        .args(["read", "garage_bucket", "--state", r#"{"id":"b1"}"#])
        .args(["--host", "localhost:3903", "--token", "tok", "--scheme", "gopher"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("invalid scheme value"));
}

#[test]
fn test_missing_token_fails() {
    let config = empty_config();
    garage_cmd(&config)
        .args(["delete", "garage_bucket", "--state", r#"{"id":"b1"}"#])
        .args(["--host", "localhost:3903"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("token"));
}

#[test]
fn test_plan_reports_replacement() {
    let config = empty_config();
    let output = garage_cmd(&config)
        .args(["plan", "garage_bucket"])
        .args(["--prior", r#"{"id":"b1","name":"old"}"#])
        .args(["--state", r#"{"name":"new"}"#])
        .args(["--host", "localhost:3903", "--token", "tok"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let plan: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(plan["requires_replace"], json!(["name"]));
}

#[test]
fn test_plan_rejects_invalid_state() {
    let config = empty_config();
    garage_cmd(&config)
        .args(["plan", "garage_bucket", "--prior", "{}", "--state", "[]"])
        .args(["--host", "localhost:3903", "--token", "tok"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("JSON object"));
}

#[tokio::test]
async fn test_create_bucket_against_mock_api() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v2/CreateBucket"))
        .and(header("authorization", "Bearer tok"))
        .and(body_json(json!({"globalAlias": "assets"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"id": "b1", "globalAliases": ["assets"]})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut state = NamedTempFile::new().unwrap();
    write!(state, r#"{{"name": "assets"}}"#).unwrap();

    let config = empty_config();
    let output = garage_cmd(&config)
        .args(["create", "garage_bucket"])
        .arg("--state")
        .arg(format!("@{}", state.path().display()))
        .args(["--host", &server.address().to_string(), "--scheme", "http", "--token", "tok"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let created: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(created, json!({"id": "b1", "name": "assets"}));
}
