//! Integration tests for provider configuration
//!
//! These tests cover:
//! - Loading configuration from TOML files
//! - Environment variable overrides
//! - Validation of host, token and scheme
//! - Building the admin client from configuration

use garage_provider::config::ProviderConfig;
use garage_provider::Error;
use pretty_assertions::assert_eq;
use serial_test::serial;
use std::time::Duration;
use tempfile::tempdir;

const ENV_VARS: &[&str] = &["GARAGE_HOST", "GARAGE_SCHEME", "GARAGE_TOKEN", "GARAGE_TIMEOUT"];

fn clear_env() {
    for var in ENV_VARS {
        std::env::remove_var(var);
    }
}

fn write_config(content: &str) -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempdir().unwrap();
    let path = dir.path().join("garage-provider.toml");
    std::fs::write(&path, content).unwrap();
    (dir, path)
}

// ============================================================================
// File Loading
// ============================================================================

#[test]
#[serial]
fn test_load_toml_file() {
    clear_env();
    let (_dir, path) = write_config(
        r#"
host = "garage.internal:3903"
scheme = "http"
token = "from-file"
timeout = "5s"
"#,
    );

    let config = ProviderConfig::load(Some(path.as_path())).unwrap();
    assert_eq!(config.host.as_deref(), Some("garage.internal:3903"));
    assert_eq!(config.scheme(), "http");
    assert_eq!(config.timeout(), Duration::from_secs(5));
    assert_eq!(config.endpoint().unwrap(), "http://garage.internal:3903");
}

#[test]
#[serial]
fn test_missing_explicit_file_is_an_error() {
    clear_env();
    let dir = tempdir().unwrap();
    let err = ProviderConfig::load(Some(dir.path().join("absent.toml").as_path())).unwrap_err();
    assert!(matches!(err, Error::ConfigLoad { .. }));
}

#[test]
fn test_malformed_file_is_an_error() {
    let (_dir, path) = write_config("host = [not toml");
    let err = ProviderConfig::from_file(&path).unwrap_err();
    assert!(matches!(err, Error::ConfigLoad { .. }));
}

#[test]
fn test_unreadable_file_reports_io_cause() {
    let dir = tempdir().unwrap();
    let err = ProviderConfig::from_file(dir.path()).unwrap_err();
    match &err {
        Error::ConfigLoad { path, message } => {
            assert_eq!(path, dir.path());
            assert!(!message.is_empty());
        }
        other => panic!("unexpected error {:?}", other),
    }
    assert!(err.to_string().starts_with("Failed to load config from"));
}

#[test]
fn test_unset_fields_use_defaults() {
    let (_dir, path) = write_config("host = \"localhost:3903\"\n");
    let config = ProviderConfig::from_file(&path).unwrap();
    assert_eq!(config.scheme(), "https");
    assert_eq!(config.timeout(), Duration::from_secs(30));
    assert!(config.token.is_none());
}

// ============================================================================
// Environment Overrides
// ============================================================================

#[test]
#[serial]
fn test_env_overrides_file() {
    clear_env();
    let (_dir, path) = write_config("host = \"file-host\"\ntoken = \"file-token\"\n");

    std::env::set_var("GARAGE_HOST", "env-host:3903");
    std::env::set_var("GARAGE_TOKEN", "env-token");
    std::env::set_var("GARAGE_TIMEOUT", "1m");
    let config = ProviderConfig::load(Some(path.as_path())).unwrap();
    clear_env();

    assert_eq!(config.host.as_deref(), Some("env-host:3903"));
    assert_eq!(config.token.as_deref(), Some("env-token"));
    assert_eq!(config.timeout(), Duration::from_secs(60));
}

#[test]
#[serial]
fn test_invalid_env_timeout_is_ignored() {
    clear_env();
    let (_dir, path) = write_config("timeout = \"10s\"\n");

    std::env::set_var("GARAGE_TIMEOUT", "soon");
    let config = ProviderConfig::load(Some(path.as_path())).unwrap();
    clear_env();

    assert_eq!(config.timeout(), Duration::from_secs(10));
}

// ============================================================================
// Validation
// ============================================================================

#[test]
fn test_missing_host_and_token() {
    let err = ProviderConfig::default().validate().unwrap_err();
    assert!(matches!(err, Error::MissingSetting("host")));

    let mut config = ProviderConfig::new("localhost:3903", "tok");
    config.token = Some("   ".to_string());
    assert!(matches!(
        config.validate().unwrap_err(),
        Error::MissingSetting("token")
    ));
}

#[test]
fn test_unsupported_scheme() {
    let config = ProviderConfig::new("localhost:3903", "tok").with_scheme("ftp");
    let err = config.client().unwrap_err();
    assert_eq!(
        err.to_string(),
        "invalid scheme value: scheme must be one of: http, https, got ftp"
    );
}

#[test]
fn test_client_uses_endpoint() {
    let config = ProviderConfig::new("garage:3903", "tok")
        .with_scheme("http")
        .with_timeout(Duration::from_secs(2));
    let client = config.client().unwrap();
    assert_eq!(client.base_url(), "http://garage:3903");
    assert!(!format!("{:?}", config).contains("tok\""));
}
