//! Provider configuration
//!
//! Handles loading and merging configuration from multiple sources:
//! - Default values
//! - User configuration (`~/.config/garage-provider/config.toml`)
//! - Project configuration (`./garage-provider.toml`)
//! - Environment variables (`GARAGE_HOST`, `GARAGE_SCHEME`, `GARAGE_TOKEN`,
//!   `GARAGE_TIMEOUT`)
//!
//! Later sources override earlier ones field by field. Command-line flags
//! are applied on top by the binary.

use crate::client::{AdminClient, DEFAULT_TIMEOUT_SECS};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

/// Scheme used when none is configured
pub const DEFAULT_SCHEME: &str = "https";

/// Schemes the admin API can be reached over
pub const SUPPORTED_SCHEMES: &[&str] = &["http", "https"];

/// Provider configuration: where the admin API lives and how to authenticate
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Hostname/ip (and optional port) of the admin API
    pub host: Option<String>,

    /// `http` or `https`, defaults to https
    pub scheme: Option<String>,

    /// Admin API bearer token
    pub token: Option<String>,

    /// Request timeout, e.g. "30s"
    #[serde(with = "humantime_serde")]
    pub timeout: Option<Duration>,
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("host", &self.host)
            .field("scheme", &self.scheme)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ProviderConfig {
    pub fn new(host: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            host: Some(host.into()),
            token: Some(token.into()),
            ..Self::default()
        }
    }

    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = Some(scheme.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Load configuration from all sources
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut config = ProviderConfig::default();

        for path in Self::get_config_paths(config_path) {
            if path.exists() {
                debug!(path = %path.display(), "loading provider config");
                config = config.merge(Self::from_file(&path)?);
            } else if config_path.is_some() {
                return Err(Error::ConfigLoad {
                    path,
                    message: "file does not exist".to_string(),
                });
            }
        }

        config.apply_env_overrides();
        Ok(config)
    }

    /// Get the list of configuration file paths to check
    fn get_config_paths(explicit_path: Option<&Path>) -> Vec<PathBuf> {
        if let Some(path) = explicit_path {
            return vec![path.to_path_buf()];
        }

        let mut paths = Vec::new();
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("garage-provider").join("config.toml"));
        }
        paths.push(PathBuf::from("garage-provider.toml"));
        paths
    }

    /// Parse a single TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| Error::ConfigLoad {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        toml::from_str(&content).map_err(|e| Error::ConfigLoad {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Overlay the fields `other` sets onto `self`
    pub fn merge(self, other: ProviderConfig) -> ProviderConfig {
        ProviderConfig {
            host: other.host.or(self.host),
            scheme: other.scheme.or(self.scheme),
            token: other.token.or(self.token),
            timeout: other.timeout.or(self.timeout),
        }
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("GARAGE_HOST") {
            self.host = Some(host);
        }
        if let Ok(scheme) = std::env::var("GARAGE_SCHEME") {
            self.scheme = Some(scheme);
        }
        if let Ok(token) = std::env::var("GARAGE_TOKEN") {
            self.token = Some(token);
        }
        if let Ok(timeout) = std::env::var("GARAGE_TIMEOUT") {
            match humantime_serde::re::humantime::parse_duration(&timeout) {
                Ok(t) => self.timeout = Some(t),
                Err(e) => {
                    warn!(value = %timeout, error = %e, "ignoring invalid GARAGE_TIMEOUT");
                }
            }
        }
    }

    /// Configured scheme, or the default
    pub fn scheme(&self) -> &str {
        self.scheme
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_SCHEME)
    }

    /// Configured timeout, or the default
    pub fn timeout(&self) -> Duration {
        self.timeout
            .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    fn required(value: &Option<String>, name: &'static str) -> Result<String> {
        value
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .ok_or(Error::MissingSetting(name))
    }

    /// `{scheme}://{host}` after validating every setting
    pub fn endpoint(&self) -> Result<String> {
        let host = Self::required(&self.host, "host")?;
        Self::required(&self.token, "token")?;

        let scheme = self.scheme();
        if !SUPPORTED_SCHEMES.contains(&scheme) {
            return Err(Error::InvalidScheme(scheme.to_string()));
        }

        let endpoint = format!("{}://{}", scheme, host);
        url::Url::parse(&endpoint).map_err(|source| Error::InvalidEndpoint {
            endpoint: endpoint.clone(),
            source,
        })?;
        Ok(endpoint)
    }

    /// Validate every setting without building a client
    pub fn validate(&self) -> Result<()> {
        self.endpoint().map(|_| ())
    }

    /// Build the admin API client this configuration describes
    pub fn client(&self) -> Result<AdminClient> {
        let endpoint = self.endpoint()?;
        let token = Self::required(&self.token, "token")?;
        AdminClient::with_timeout(endpoint, token, self.timeout())
    }
}
