//! Access key resource - `garage_access_key`
//!
//! ```hcl
//! resource "garage_access_key" "app" {
//!   name          = "app"
//!   never_expires = true
//! }
//! ```
//!
//! `expiration` and `never_expires` are mutually exclusive; setting both is
//! rejected before any request is sent. The secret is only returned by the
//! admin API when the key is created, so it is carried over from prior
//! state on every later read or update.

use super::{decode, encode, Attribute, Resource, ResourceState, Schema};
use crate::client::{AccessKey, AdminClient, KeyRequest};
use crate::error::{Error, Result};
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::trace;

/// Type name of the access key resource
pub const ACCESS_KEY_TYPE: &str = "garage_access_key";

#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessKeyModel {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub access_key_id: Option<String>,
    #[serde(default)]
    pub secret_access_key: Option<String>,
    #[serde(default)]
    pub expiration: Option<String>,
    #[serde(default)]
    pub never_expires: Option<bool>,
}

fn parse_expiration(value: &str) -> Result<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(value).map_err(|e| {
        Error::invalid_input(ACCESS_KEY_TYPE, format!("invalid expiration value: {}", e))
    })
}

/// True when both strings are RFC 3339 timestamps of the same instant.
fn same_instant(a: &str, b: &str) -> bool {
    match (DateTime::parse_from_rfc3339(a), DateTime::parse_from_rfc3339(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

impl AccessKeyModel {
    fn expiration(&self) -> Option<&str> {
        self.expiration.as_deref().filter(|e| !e.is_empty())
    }

    fn check(&self) -> Result<()> {
        if self.never_expires == Some(true) && self.expiration().is_some() {
            return Err(Error::invalid_input(
                ACCESS_KEY_TYPE,
                "cannot set never_expires and expiration together",
            ));
        }
        if let Some(exp) = self.expiration() {
            parse_expiration(exp)?;
        }
        Ok(())
    }

    fn request(&self) -> Result<KeyRequest> {
        self.check()?;
        Ok(KeyRequest {
            name: self.name.clone(),
            expiration: self.expiration().map(str::to_string),
            never_expires: self.never_expires.unwrap_or(false),
        })
    }

    fn id(&self) -> Result<&str> {
        self.access_key_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| Error::missing_attribute(ACCESS_KEY_TYPE, "access_key_id"))
    }

    /// Merge the remote key into the model.
    fn apply(&mut self, key: &AccessKey) {
        self.name = key.name.clone();
        self.access_key_id = Some(key.access_key_id.clone());
        if let Some(secret) = &key.secret_access_key {
            self.secret_access_key = Some(secret.clone());
        }

        let keep_local = match (self.expiration(), key.expiration.as_deref()) {
            (Some(local), Some(remote)) => same_instant(local, remote),
            _ => false,
        };
        if !keep_local {
            self.expiration = key.expiration.clone();
        }

        if self.never_expires == Some(true) {
            self.never_expires = Some(key.expiration.is_none());
        }
    }
}

/// Attribute layout of `garage_access_key`
pub fn schema() -> Schema {
    Schema::new(
        "Access key resource",
        vec![
            Attribute::string("name")
                .required()
                .description("The name of the access key"),
            Attribute::string("access_key_id")
                .computed()
                .sensitive()
                .description("The access key id"),
            Attribute::string("secret_access_key")
                .computed()
                .sensitive()
                .description("The secret access key"),
            Attribute::string("expiration")
                .optional()
                .description("The time in RFC 3339 format that the key should expire"),
            Attribute::bool("never_expires")
                .optional()
                .description("Whether the key should expire or not"),
        ],
    )
}

/// Manages an access key through the admin API
pub struct AccessKeyResource {
    client: Arc<AdminClient>,
}

impl AccessKeyResource {
    pub fn new(client: Arc<AdminClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Resource for AccessKeyResource {
    fn type_name(&self) -> &'static str {
        ACCESS_KEY_TYPE
    }

    fn schema(&self) -> Schema {
        schema()
    }

    fn validate(&self, plan: &ResourceState) -> Result<()> {
        decode::<AccessKeyModel>(ACCESS_KEY_TYPE, plan)?.check()
    }

    async fn create(&self, plan: &ResourceState) -> Result<ResourceState> {
        let mut model: AccessKeyModel = decode(ACCESS_KEY_TYPE, plan)?;
        let key = self.client.create_access_key(&model.request()?).await?;
        model.apply(&key);
        trace!("created an access key");
        encode(ACCESS_KEY_TYPE, &model)
    }

    async fn read(&self, state: &ResourceState) -> Result<ResourceState> {
        let mut model: AccessKeyModel = decode(ACCESS_KEY_TYPE, state)?;
        let key = self.client.get_access_key(model.id()?).await?;
        model.apply(&key);
        encode(ACCESS_KEY_TYPE, &model)
    }

    async fn update(&self, prior: &ResourceState, plan: &ResourceState) -> Result<ResourceState> {
        let prior: AccessKeyModel = decode(ACCESS_KEY_TYPE, prior)?;
        let mut model: AccessKeyModel = decode(ACCESS_KEY_TYPE, plan)?;
        let mut request = model.request()?;

        // Garage keeps an expiration unless told the key never expires
        if prior.expiration().is_some()
            && model.expiration().is_none()
            && model.never_expires.is_none()
        {
            request.never_expires = true;
        }

        model.access_key_id = prior.access_key_id.clone();
        model.secret_access_key = prior.secret_access_key.clone();

        let key = self
            .client
            .update_access_key(model.id()?, &request)
            .await?;
        model.apply(&key);
        encode(ACCESS_KEY_TYPE, &model)
    }

    async fn delete(&self, state: &ResourceState) -> Result<()> {
        let model: AccessKeyModel = decode(ACCESS_KEY_TYPE, state)?;
        self.client.delete_access_key(model.id()?).await
    }

    fn import_state(&self, id: &str) -> Result<ResourceState> {
        let mut state = ResourceState::new();
        state.insert("access_key_id".to_string(), Value::String(id.to_string()));
        Ok(state)
    }
}
