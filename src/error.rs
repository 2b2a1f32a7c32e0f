//! Error types for garage-provider.
//!
//! Every failure the provider can surface is a variant of [`Error`]. Remote
//! failures keep the admin API status code and response body verbatim so the
//! host runtime can show them to the operator unchanged.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for provider operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for garage-provider.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// A required provider setting is missing or empty.
    #[error("Missing provider setting '{0}'")]
    MissingSetting(&'static str),

    /// Scheme is neither http nor https.
    #[error("invalid scheme value: scheme must be one of: http, https, got {0}")]
    InvalidScheme(String),

    /// The endpoint built from scheme and host is not a valid URL.
    #[error("Invalid admin endpoint '{endpoint}': {source}")]
    InvalidEndpoint {
        /// Endpoint that failed to parse
        endpoint: String,
        /// Parse error
        #[source]
        source: url::ParseError,
    },

    /// Error loading a configuration file.
    #[error("Failed to load config from '{path}': {message}")]
    ConfigLoad {
        /// Path to the config file
        path: PathBuf,
        /// Error message
        message: String,
    },

    // ========================================================================
    // Resource Errors
    // ========================================================================
    /// Resource type is not registered.
    #[error("Resource type '{0}' not found")]
    ResourceNotFound(String),

    /// A required attribute is absent from the planned state.
    #[error("Missing required attribute '{attribute}' for '{resource}'")]
    MissingAttribute {
        /// Resource type name
        resource: String,
        /// Attribute name
        attribute: String,
    },

    /// Local validation failed before any network call.
    #[error("invalid input for '{resource}': {message}")]
    InvalidInput {
        /// Resource type name
        resource: String,
        /// Error message
        message: String,
    },

    /// State could not be converted to or from the resource model.
    #[error("Invalid state for '{resource}': {source}")]
    InvalidState {
        /// Resource type name
        resource: String,
        /// Conversion error
        #[source]
        source: serde_json::Error,
    },

    /// Permission id is not `{keyId}:{bucketId}`.
    #[error("invalid permission id: needs id in format {{keyId}}:{{bucketId}}, got {0}")]
    InvalidPermissionId(String),

    /// The key has no entry in the bucket's key list.
    #[error("could not find permission for key '{key_id}' on bucket '{bucket_id}'")]
    PermissionNotFound {
        /// Access key id
        key_id: String,
        /// Bucket id
        bucket_id: String,
    },

    /// The bucket has no global alias to use as its name.
    #[error("Bucket '{0}' has no global alias")]
    MissingAlias(String),

    // ========================================================================
    // Admin API Errors
    // ========================================================================
    /// The admin API answered with a status above 299.
    #[error("{operation}: got status code {status}: {body}")]
    Status {
        /// Operation that failed, e.g. "create key"
        operation: &'static str,
        /// HTTP status code
        status: u16,
        /// Response body, verbatim
        body: String,
    },

    /// The request could not be built, sent or read.
    #[error("{operation}: {source}")]
    Transport {
        /// Operation that failed
        operation: &'static str,
        /// Underlying HTTP error
        #[source]
        source: reqwest::Error,
    },

    /// Request body could not be serialized.
    #[error("{operation}: marshal request body: {source}")]
    Encode {
        /// Operation that failed
        operation: &'static str,
        /// Underlying JSON error
        #[source]
        source: serde_json::Error,
    },

    /// Response body could not be deserialized.
    #[error("{operation}: unmarshal body: {source}")]
    Decode {
        /// Operation that failed
        operation: &'static str,
        /// Underlying JSON error
        #[source]
        source: serde_json::Error,
    },

    /// The admin API returned an empty body where one was required.
    #[error("{0}: empty response body")]
    EmptyResponse(&'static str),
}

impl Error {
    /// Creates a new invalid input error.
    pub fn invalid_input(resource: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            resource: resource.into(),
            message: message.into(),
        }
    }

    /// Creates a new missing attribute error.
    pub fn missing_attribute(resource: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self::MissingAttribute {
            resource: resource.into(),
            attribute: attribute.into(),
        }
    }

    /// Returns the HTTP status for errors reported by the admin API.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns true if the admin API reported the object as missing.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Returns true if the error was raised locally, before any network call.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::InvalidInput { .. }
                | Error::MissingAttribute { .. }
                | Error::InvalidPermissionId(_)
                | Error::InvalidState { .. }
                | Error::MissingSetting(_)
                | Error::InvalidScheme(_)
                | Error::InvalidEndpoint { .. }
        )
    }
}
