//! Garage admin API client
//!
//! A thin typed client over the admin API v2. Every call is a single
//! request: bearer authorization, JSON bodies, and any status above 299
//! turned into [`Error::Status`] with the response body kept verbatim.
//! There is no retry or backoff anywhere in the call path.
//!
//! Endpoint groups live in their own files:
//!
//! - [`access_keys`]: `GetKeyInfo`, `CreateKey`, `UpdateKey`, `DeleteKey`
//! - [`buckets`]: `GetBucketInfo`, `CreateBucket`, `DeleteBucket`
//! - [`permissions`]: `AllowBucketKey`, `DenyBucketKey` and grant lookup

pub mod access_keys;
pub mod buckets;
pub mod permissions;

pub use access_keys::{AccessKey, KeyRequest};
pub use buckets::{Bucket, BucketKey};
pub use permissions::{BucketKeyRequest, Permission, Permissions};

use crate::error::{Error, Result};
use reqwest::{header, redirect, Client, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::time::Duration;
use tracing::debug;

/// Default timeout in seconds for admin API requests
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Field names whose values are masked before a body is logged
const REDACTED_FIELDS: &[&str] = &["secretAccessKey"];

/// Client for the Garage admin API
#[derive(Clone)]
pub struct AdminClient {
    http: Client,
    base_url: String,
    token: String,
}

impl fmt::Debug for AdminClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminClient")
            .field("base_url", &self.base_url)
            .field("token", &"<redacted>")
            .finish()
    }
}

impl AdminClient {
    /// Create a client for `base_url` (e.g. `https://garage.example:3903`)
    /// using the default request timeout.
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        Self::with_timeout(base_url, token, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a client with an explicit request timeout.
    pub fn with_timeout(
        base_url: impl Into<String>,
        token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        // 3xx must surface as a status error, never be followed
        let http = Client::builder()
            .timeout(timeout)
            .redirect(redirect::Policy::none())
            .build()
            .map_err(|source| Error::Transport {
                operation: "build client",
                source,
            })?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    /// Base URL every request path is appended to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send one request and return the raw response body.
    ///
    /// Statuses above 299 are errors carrying the body verbatim.
    async fn send<B>(
        &self,
        operation: &'static str,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&B>,
    ) -> Result<Vec<u8>>
    where
        B: Serialize + ?Sized,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!(%method, url = %url, operation, "admin api request");

        let mut request = self
            .http
            .request(method, &url)
            .header(header::CONTENT_TYPE, "application/json")
            .bearer_auth(&self.token);

        if !query.is_empty() {
            request = request.query(query);
        }

        if let Some(body) = body {
            let bytes =
                serde_json::to_vec(body).map_err(|source| Error::Encode { operation, source })?;
            request = request.body(bytes);
        }

        let response = request
            .send()
            .await
            .map_err(|source| Error::Transport { operation, source })?;
        let status = response.status();
        let out = response
            .bytes()
            .await
            .map_err(|source| Error::Transport { operation, source })?;

        if !out.is_empty() {
            debug!(
                operation,
                status = status.as_u16(),
                body = %redact(&out),
                "got response body"
            );
        }

        if status.as_u16() > 299 {
            return Err(Error::Status {
                operation,
                status: status.as_u16(),
                body: String::from_utf8_lossy(&out).into_owned(),
            });
        }

        Ok(out.to_vec())
    }

    /// Send a request and decode the response body when there is one.
    pub(crate) async fn call<B, T>(
        &self,
        operation: &'static str,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&B>,
    ) -> Result<Option<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let out = self.send(operation, method, path, query, body).await?;
        if out.is_empty() {
            return Ok(None);
        }
        serde_json::from_slice(&out)
            .map(Some)
            .map_err(|source| Error::Decode { operation, source })
    }

    /// Like [`call`](Self::call) but an empty body is an error.
    pub(crate) async fn fetch<B, T>(
        &self,
        operation: &'static str,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&B>,
    ) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.call(operation, method, path, query, body)
            .await?
            .ok_or(Error::EmptyResponse(operation))
    }

    /// Send a request whose response body is ignored.
    pub(crate) async fn execute<B>(
        &self,
        operation: &'static str,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&B>,
    ) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        self.send(operation, method, path, query, body).await?;
        Ok(())
    }
}

/// Render a response body for logging with secret fields masked.
fn redact(body: &[u8]) -> String {
    match serde_json::from_slice::<serde_json::Value>(body) {
        Ok(mut value) => {
            if let Some(obj) = value.as_object_mut() {
                for field in REDACTED_FIELDS {
                    if let Some(v) = obj.get_mut(*field) {
                        if !v.is_null() {
                            *v = serde_json::Value::String("<redacted>".to_string());
                        }
                    }
                }
            }
            value.to_string()
        }
        Err(_) => String::from_utf8_lossy(body).into_owned(),
    }
}
