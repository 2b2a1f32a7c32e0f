//! Bucket/key permission grants
//!
//! Grants are not first-class objects in the admin API. They are read back
//! by scanning a bucket's key list, granted with `AllowBucketKey` and
//! revoked with `DenyBucketKey`. Both calls only touch the flags set to
//! `true` in their body; flags set to `false` are left as they are.

use super::AdminClient;
use crate::error::{Error, Result};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, instrument};

/// Owner/read/write flags of a grant
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permissions {
    /// Key owns the bucket
    #[serde(default)]
    pub owner: bool,
    /// Key can read objects
    #[serde(default)]
    pub read: bool,
    /// Key can write objects
    #[serde(default)]
    pub write: bool,
}

impl Permissions {
    pub fn new(owner: bool, read: bool, write: bool) -> Self {
        Self { owner, read, write }
    }

    /// Every flag set
    pub fn all() -> Self {
        Self::new(true, true, true)
    }

    pub fn is_empty(&self) -> bool {
        !(self.owner || self.read || self.write)
    }

    /// Flags set in `self` that are not set in `other`.
    pub fn without(&self, other: Permissions) -> Self {
        Self {
            owner: self.owner && !other.owner,
            read: self.read && !other.read,
            write: self.write && !other.write,
        }
    }
}

impl fmt::Display for Permissions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let flag = |set: bool, c: char| if set { c } else { '-' };
        write!(
            f,
            "{}{}{}",
            flag(self.owner, 'o'),
            flag(self.read, 'r'),
            flag(self.write, 'w')
        )
    }
}

/// A key's grant on a bucket
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Permission {
    pub access_key_id: String,
    pub bucket_id: String,
    pub permissions: Permissions,
}

/// Body of `AllowBucketKey` and `DenyBucketKey`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketKeyRequest {
    pub access_key_id: String,
    pub bucket_id: String,
    pub permissions: Permissions,
}

impl BucketKeyRequest {
    pub fn new(
        access_key_id: impl Into<String>,
        bucket_id: impl Into<String>,
        permissions: Permissions,
    ) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            bucket_id: bucket_id.into(),
            permissions,
        }
    }
}

impl AdminClient {
    /// Look up the grant of `key_id` on `bucket_id`, `None` if the key is
    /// absent from the bucket's key list.
    #[instrument(skip(self))]
    pub async fn find_permission(&self, key_id: &str, bucket_id: &str) -> Result<Option<Permission>> {
        let bucket = self.get_bucket(bucket_id).await?;
        Ok(bucket.key(key_id).map(|key| Permission {
            access_key_id: key_id.to_string(),
            bucket_id: bucket_id.to_string(),
            permissions: key.permissions,
        }))
    }

    /// Look up the grant of `key_id` on `bucket_id`.
    pub async fn get_permission(&self, key_id: &str, bucket_id: &str) -> Result<Permission> {
        self.find_permission(key_id, bucket_id)
            .await?
            .ok_or_else(|| Error::PermissionNotFound {
                key_id: key_id.to_string(),
                bucket_id: bucket_id.to_string(),
            })
    }

    /// Grant the flags set in `req`.
    #[instrument(skip(self, req), fields(key = %req.access_key_id, bucket = %req.bucket_id, flags = %req.permissions))]
    pub async fn allow_bucket_key(&self, req: &BucketKeyRequest) -> Result<()> {
        self.execute(
            "grant bucket permissions",
            Method::POST,
            "/v2/AllowBucketKey",
            &[],
            Some(req),
        )
        .await
    }

    /// Revoke the flags set in `req`.
    #[instrument(skip(self, req), fields(key = %req.access_key_id, bucket = %req.bucket_id, flags = %req.permissions))]
    pub async fn deny_bucket_key(&self, req: &BucketKeyRequest) -> Result<()> {
        self.execute(
            "remove bucket permissions",
            Method::POST,
            "/v2/DenyBucketKey",
            &[],
            Some(req),
        )
        .await
    }

    /// Grant `req.permissions` and read the resulting grant back.
    pub async fn create_permission(&self, req: &BucketKeyRequest) -> Result<Permission> {
        self.allow_bucket_key(req).await?;
        info!(key = %req.access_key_id, bucket = %req.bucket_id, "granted bucket permissions");
        self.get_permission(&req.access_key_id, &req.bucket_id).await
    }

    /// Make the grant equal `req.permissions`.
    ///
    /// The current grant is read first; flags that must turn on are sent in
    /// one allow call and flags that must turn off in one deny call. Flags
    /// already in the desired state are never part of either body.
    #[instrument(skip(self, req), fields(key = %req.access_key_id, bucket = %req.bucket_id, flags = %req.permissions))]
    pub async fn set_permission(&self, req: &BucketKeyRequest) -> Result<Permission> {
        let current = self
            .find_permission(&req.access_key_id, &req.bucket_id)
            .await?
            .map(|p| p.permissions)
            .unwrap_or_default();

        let grant = req.permissions.without(current);
        let revoke = current.without(req.permissions);
        debug!(%current, %grant, %revoke, "reconciling bucket permissions");

        if !grant.is_empty() {
            self.allow_bucket_key(&BucketKeyRequest::new(
                req.access_key_id.as_str(),
                req.bucket_id.as_str(),
                grant,
            ))
            .await?;
        }
        if !revoke.is_empty() {
            self.deny_bucket_key(&BucketKeyRequest::new(
                req.access_key_id.as_str(),
                req.bucket_id.as_str(),
                revoke,
            ))
            .await?;
        }
        if !(grant.is_empty() && revoke.is_empty()) {
            info!(key = %req.access_key_id, bucket = %req.bucket_id, "updated bucket permissions");
        }

        self.get_permission(&req.access_key_id, &req.bucket_id).await
    }

    /// Revoke every flag of a grant.
    pub async fn revoke_permission(&self, key_id: &str, bucket_id: &str) -> Result<()> {
        self.deny_bucket_key(&BucketKeyRequest::new(key_id, bucket_id, Permissions::all()))
            .await?;
        info!(key = %key_id, bucket = %bucket_id, "revoked bucket permissions");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_without() {
        let desired = Permissions::new(false, true, true);
        let current = Permissions::new(true, true, false);
        assert_eq!(desired.without(current), Permissions::new(false, false, true));
        assert_eq!(current.without(desired), Permissions::new(true, false, false));
        assert!(desired.without(desired).is_empty());
    }

    #[test]
    fn test_display() {
        assert_eq!(Permissions::new(true, false, true).to_string(), "o-w");
        assert_eq!(Permissions::default().to_string(), "---");
    }

    #[test]
    fn test_request_body() {
        let body = serde_json::to_value(BucketKeyRequest::new(
            "GK1",
            "b1",
            Permissions::new(false, true, false),
        ))
        .unwrap();
        assert_eq!(
            body,
            json!({
                "accessKeyId": "GK1",
                "bucketId": "b1",
                "permissions": {"owner": false, "read": true, "write": false}
            })
        );
    }
}
