//! Bucket endpoints

use super::{AdminClient, Permissions};
use crate::error::{Error, Result};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

/// A bucket as returned by `GetBucketInfo`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bucket {
    /// Opaque bucket id
    pub id: String,
    /// Global aliases; the first one is the bucket's name
    #[serde(default)]
    pub global_aliases: Vec<String>,
    /// Keys holding a grant on this bucket
    #[serde(default)]
    pub keys: Vec<BucketKey>,
}

impl Bucket {
    /// The bucket's name, i.e. its first global alias.
    pub fn name(&self) -> Result<&str> {
        self.global_aliases
            .first()
            .map(String::as_str)
            .ok_or_else(|| Error::MissingAlias(self.id.clone()))
    }

    /// Grant held by `access_key_id`, if any.
    pub fn key(&self, access_key_id: &str) -> Option<&BucketKey> {
        self.keys.iter().find(|k| k.access_key_id == access_key_id)
    }
}

/// One entry of a bucket's key list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketKey {
    /// Access key id
    pub access_key_id: String,
    /// Key name
    #[serde(default)]
    pub name: String,
    /// Flags granted to the key on this bucket
    #[serde(default)]
    pub permissions: Permissions,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateBucketRequest<'a> {
    global_alias: &'a str,
}

impl AdminClient {
    /// Fetch a bucket by id.
    #[instrument(skip(self))]
    pub async fn get_bucket(&self, id: &str) -> Result<Bucket> {
        self.fetch::<(), _>(
            "get bucket",
            Method::GET,
            "/v2/GetBucketInfo",
            &[("id", id)],
            None,
        )
        .await
    }

    /// Fetch a bucket by one of its global aliases.
    #[instrument(skip(self))]
    pub async fn get_bucket_by_alias(&self, alias: &str) -> Result<Bucket> {
        self.fetch::<(), _>(
            "get bucket",
            Method::GET,
            "/v2/GetBucketInfo",
            &[("globalAlias", alias)],
            None,
        )
        .await
    }

    /// Create a bucket whose global alias is `name`.
    #[instrument(skip(self))]
    pub async fn create_bucket(&self, name: &str) -> Result<Bucket> {
        let bucket: Bucket = self
            .fetch(
                "create bucket",
                Method::POST,
                "/v2/CreateBucket",
                &[],
                Some(&CreateBucketRequest { global_alias: name }),
            )
            .await?;
        info!(bucket_id = %bucket.id, "created bucket");
        Ok(bucket)
    }

    /// Delete a bucket by id.
    #[instrument(skip(self))]
    pub async fn delete_bucket(&self, id: &str) -> Result<()> {
        self.execute::<()>(
            "delete bucket",
            Method::POST,
            "/v2/DeleteBucket",
            &[("id", id)],
            None,
        )
        .await?;
        info!(bucket_id = %id, "deleted bucket");
        Ok(())
    }
}
