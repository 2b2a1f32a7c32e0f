//! Permission resource - `garage_permission`
//!
//! A grant of owner/read/write flags to one access key on one bucket. The
//! admin API has no object for this, so the resource id is the pair
//! `{accessKeyId}:{bucketId}` and state is read back from the bucket's key
//! list.
//!
//! ```hcl
//! resource "garage_permission" "app_assets" {
//!   access_key_id = garage_access_key.app.access_key_id
//!   bucket_id     = garage_bucket.assets.id
//!   read          = true
//!   write         = true
//! }
//! ```
//!
//! Updates only send the flags that actually change (see
//! [`AdminClient::set_permission`]); destroying the resource denies all
//! three flags.

use super::{decode, encode, Attribute, Resource, ResourceState, Schema};
use crate::client::{AdminClient, BucketKeyRequest, Permission, Permissions};
use crate::error::{Error, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::trace;

/// Type name of the permission resource
pub const PERMISSION_TYPE: &str = "garage_permission";

/// Identifier of a grant: `{accessKeyId}:{bucketId}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionId {
    pub access_key_id: String,
    pub bucket_id: String,
}

impl FromStr for PermissionId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split(':').collect();
        match parts.as_slice() {
            [key, bucket] if !key.is_empty() && !bucket.is_empty() => Ok(Self {
                access_key_id: (*key).to_string(),
                bucket_id: (*bucket).to_string(),
            }),
            _ => Err(Error::InvalidPermissionId(s.to_string())),
        }
    }
}

impl fmt::Display for PermissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.access_key_id, self.bucket_id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionModel {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub access_key_id: String,
    #[serde(default)]
    pub bucket_id: String,
    #[serde(default)]
    pub owner: Option<bool>,
    #[serde(default)]
    pub read: Option<bool>,
    #[serde(default)]
    pub write: Option<bool>,
}

impl PermissionModel {
    fn request(&self) -> BucketKeyRequest {
        BucketKeyRequest::new(
            self.access_key_id.as_str(),
            self.bucket_id.as_str(),
            Permissions::new(
                self.owner.unwrap_or(false),
                self.read.unwrap_or(false),
                self.write.unwrap_or(false),
            ),
        )
    }

    /// Grant identity, from `id` when set, else from the key and bucket.
    fn permission_id(&self) -> Result<PermissionId> {
        match self.id.as_deref() {
            Some(id) if !id.is_empty() => id.parse(),
            _ if !self.access_key_id.is_empty() && !self.bucket_id.is_empty() => {
                Ok(PermissionId {
                    access_key_id: self.access_key_id.clone(),
                    bucket_id: self.bucket_id.clone(),
                })
            }
            _ => Err(Error::missing_attribute(PERMISSION_TYPE, "id")),
        }
    }

    /// Flags left out of the plan keep their prior value.
    fn inherit_flags(&mut self, prior: &PermissionModel) {
        self.owner = self.owner.or(prior.owner);
        self.read = self.read.or(prior.read);
        self.write = self.write.or(prior.write);
    }

    fn apply(&mut self, perm: &Permission) {
        let id = PermissionId {
            access_key_id: perm.access_key_id.clone(),
            bucket_id: perm.bucket_id.clone(),
        };
        self.id = Some(id.to_string());
        self.access_key_id = perm.access_key_id.clone();
        self.bucket_id = perm.bucket_id.clone();
        self.owner = Some(perm.permissions.owner);
        self.read = Some(perm.permissions.read);
        self.write = Some(perm.permissions.write);
    }
}

/// Attribute layout of `garage_permission`
pub fn schema() -> Schema {
    Schema::new(
        "Bucket permission resource",
        vec![
            Attribute::string("id")
                .computed()
                .sensitive()
                .description("The id of the permission in format {accessKeyId}:{bucketId}"),
            Attribute::string("access_key_id")
                .required()
                .requires_replace()
                .description("The access key id"),
            Attribute::string("bucket_id")
                .required()
                .requires_replace()
                .description("The bucket id"),
            Attribute::bool("owner")
                .optional()
                .computed()
                .description("Whether the key is the owner of the bucket"),
            Attribute::bool("read")
                .optional()
                .computed()
                .description("Whether the key can read from the bucket"),
            Attribute::bool("write")
                .optional()
                .computed()
                .description("Whether the key can write to the bucket"),
        ],
    )
}

/// Manages a bucket/key grant through the admin API
pub struct PermissionResource {
    client: Arc<AdminClient>,
}

impl PermissionResource {
    pub fn new(client: Arc<AdminClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Resource for PermissionResource {
    fn type_name(&self) -> &'static str {
        PERMISSION_TYPE
    }

    fn schema(&self) -> Schema {
        schema()
    }

    fn validate(&self, plan: &ResourceState) -> Result<()> {
        let model: PermissionModel = decode(PERMISSION_TYPE, plan)?;
        for (name, value) in [
            ("access_key_id", &model.access_key_id),
            ("bucket_id", &model.bucket_id),
        ] {
            if value.contains(':') {
                return Err(Error::invalid_input(
                    PERMISSION_TYPE,
                    format!("{} must not contain ':'", name),
                ));
            }
        }
        Ok(())
    }

    async fn create(&self, plan: &ResourceState) -> Result<ResourceState> {
        let mut model: PermissionModel = decode(PERMISSION_TYPE, plan)?;
        let perm = self.client.create_permission(&model.request()).await?;
        model.apply(&perm);
        trace!("created a permission");
        encode(PERMISSION_TYPE, &model)
    }

    async fn read(&self, state: &ResourceState) -> Result<ResourceState> {
        let mut model: PermissionModel = decode(PERMISSION_TYPE, state)?;
        let id = model.permission_id()?;
        let perm = self
            .client
            .get_permission(&id.access_key_id, &id.bucket_id)
            .await?;
        model.apply(&perm);
        encode(PERMISSION_TYPE, &model)
    }

    async fn update(&self, prior: &ResourceState, plan: &ResourceState) -> Result<ResourceState> {
        let prior: PermissionModel = decode(PERMISSION_TYPE, prior)?;
        let mut model: PermissionModel = decode(PERMISSION_TYPE, plan)?;
        model.inherit_flags(&prior);
        let perm = self.client.set_permission(&model.request()).await?;
        model.apply(&perm);
        encode(PERMISSION_TYPE, &model)
    }

    async fn delete(&self, state: &ResourceState) -> Result<()> {
        let model: PermissionModel = decode(PERMISSION_TYPE, state)?;
        let id = model.permission_id()?;
        self.client
            .revoke_permission(&id.access_key_id, &id.bucket_id)
            .await
    }

    fn import_state(&self, id: &str) -> Result<ResourceState> {
        let id: PermissionId = id.parse()?;
        let mut state = ResourceState::new();
        state.insert("id".to_string(), Value::String(id.to_string()));
        Ok(state)
    }
}
