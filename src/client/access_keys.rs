//! Access key endpoints

use super::AdminClient;
use crate::error::Result;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{info, instrument};

/// An access key as returned by the admin API
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessKey {
    /// Human-friendly key name
    #[serde(default)]
    pub name: String,
    /// Access key id (`GK...`)
    pub access_key_id: String,
    /// Secret, only present in the create response
    #[serde(default)]
    pub secret_access_key: Option<String>,
    /// RFC 3339 expiration, absent when the key never expires
    #[serde(default)]
    pub expiration: Option<String>,
}

impl fmt::Debug for AccessKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessKey")
            .field("name", &self.name)
            .field("access_key_id", &self.access_key_id)
            .field(
                "secret_access_key",
                &self.secret_access_key.as_ref().map(|_| "<redacted>"),
            )
            .field("expiration", &self.expiration)
            .finish()
    }
}

/// Body of `CreateKey` and `UpdateKey`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyRequest {
    /// Key name
    pub name: String,
    /// RFC 3339 expiration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration: Option<String>,
    /// Remove any expiration
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub never_expires: bool,
}

impl KeyRequest {
    /// Request carrying only a name
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

impl AdminClient {
    /// Fetch a key by id.
    #[instrument(skip(self))]
    pub async fn get_access_key(&self, id: &str) -> Result<AccessKey> {
        self.fetch::<(), _>("get key", Method::GET, "/v2/GetKeyInfo", &[("id", id)], None)
            .await
    }

    /// Create a key. The response is the only place the secret is returned.
    #[instrument(skip(self, req), fields(name = %req.name))]
    pub async fn create_access_key(&self, req: &KeyRequest) -> Result<AccessKey> {
        let key: AccessKey = self
            .fetch("create key", Method::POST, "/v2/CreateKey", &[], Some(req))
            .await?;
        info!(access_key_id = %key.access_key_id, "created access key");
        Ok(key)
    }

    /// Update a key's name and expiration.
    #[instrument(skip(self, req), fields(name = %req.name))]
    pub async fn update_access_key(&self, id: &str, req: &KeyRequest) -> Result<AccessKey> {
        let key: AccessKey = self
            .fetch(
                "update key",
                Method::POST,
                "/v2/UpdateKey",
                &[("id", id)],
                Some(req),
            )
            .await?;
        info!(access_key_id = %key.access_key_id, "updated access key");
        Ok(key)
    }

    /// Delete a key.
    #[instrument(skip(self))]
    pub async fn delete_access_key(&self, id: &str) -> Result<()> {
        self.execute::<()>("delete key", Method::POST, "/v2/DeleteKey", &[("id", id)], None)
            .await?;
        info!(access_key_id = %id, "deleted access key");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_key_request_omits_empty_fields() {
        let body = serde_json::to_value(KeyRequest::named("bongo")).unwrap();
        assert_eq!(body, json!({"name": "bongo"}));
    }

    #[test]
    fn test_key_request_never_expires() {
        let req = KeyRequest {
            never_expires: true,
            ..KeyRequest::named("bongo")
        };
        let body = serde_json::to_value(req).unwrap();
        assert_eq!(body, json!({"name": "bongo", "neverExpires": true}));
    }

    #[test]
    fn test_access_key_decodes_garage_response() {
        let key: AccessKey = serde_json::from_value(json!({
            "name": "bongo",
            "accessKeyId": "GK31c2f218a2e44f485b94239e",
            "secretAccessKey": null,
            "expiration": null,
            "expired": false,
            "permissions": {"createBucket": false},
            "buckets": []
        }))
        .unwrap();
        assert_eq!(key.name, "bongo");
        assert!(key.secret_access_key.is_none());
        assert!(key.expiration.is_none());
    }

    #[test]
    fn test_access_key_debug_hides_secret() {
        let key = AccessKey {
            name: "k".into(),
            access_key_id: "GK1".into(),
            secret_access_key: Some("hunter2".into()),
            expiration: None,
        };
        assert!(!format!("{:?}", key).contains("hunter2"));
    }
}
