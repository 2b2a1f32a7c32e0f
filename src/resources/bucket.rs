//! Bucket resource - `garage_bucket`
//!
//! A bucket is created from its name, which becomes the bucket's global
//! alias. Renames are not supported in place: `name` forces replacement,
//! so update only persists the plan.
//!
//! ```hcl
//! resource "garage_bucket" "assets" {
//!   name = "assets"
//! }
//! ```

use super::{decode, encode, Attribute, Resource, ResourceState, Schema};
use crate::client::{AdminClient, Bucket};
use crate::error::{Error, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::trace;

/// Type name of the bucket resource
pub const BUCKET_TYPE: &str = "garage_bucket";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketModel {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
}

impl BucketModel {
    fn apply(&mut self, bucket: &Bucket) -> Result<()> {
        self.id = Some(bucket.id.clone());
        self.name = bucket.name()?.to_string();
        Ok(())
    }

    fn id(&self) -> Result<&str> {
        self.id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| Error::missing_attribute(BUCKET_TYPE, "id"))
    }
}

/// Attribute layout of `garage_bucket`
pub fn schema() -> Schema {
    Schema::new(
        "Bucket resource",
        vec![
            Attribute::string("id")
                .computed()
                .description("The id of the bucket"),
            Attribute::string("name")
                .required()
                .requires_replace()
                .description("Name of the bucket"),
        ],
    )
}

/// Manages a bucket through the admin API
pub struct BucketResource {
    client: Arc<AdminClient>,
}

impl BucketResource {
    pub fn new(client: Arc<AdminClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Resource for BucketResource {
    fn type_name(&self) -> &'static str {
        BUCKET_TYPE
    }

    fn schema(&self) -> Schema {
        schema()
    }

    fn validate(&self, plan: &ResourceState) -> Result<()> {
        let model: BucketModel = decode(BUCKET_TYPE, plan)?;
        if model.name.is_empty() {
            return Err(Error::invalid_input(BUCKET_TYPE, "name must not be empty"));
        }
        Ok(())
    }

    async fn create(&self, plan: &ResourceState) -> Result<ResourceState> {
        let mut model: BucketModel = decode(BUCKET_TYPE, plan)?;
        let bucket = self.client.create_bucket(&model.name).await?;
        model.apply(&bucket)?;
        trace!("created a bucket");
        encode(BUCKET_TYPE, &model)
    }

    async fn read(&self, state: &ResourceState) -> Result<ResourceState> {
        let mut model: BucketModel = decode(BUCKET_TYPE, state)?;
        let bucket = self.client.get_bucket(model.id()?).await?;
        model.apply(&bucket)?;
        encode(BUCKET_TYPE, &model)
    }

    async fn update(&self, prior: &ResourceState, plan: &ResourceState) -> Result<ResourceState> {
        let prior: BucketModel = decode(BUCKET_TYPE, prior)?;
        let mut model: BucketModel = decode(BUCKET_TYPE, plan)?;
        if model.id.is_none() {
            model.id = prior.id;
        }
        encode(BUCKET_TYPE, &model)
    }

    async fn delete(&self, state: &ResourceState) -> Result<()> {
        let model: BucketModel = decode(BUCKET_TYPE, state)?;
        self.client.delete_bucket(model.id()?).await
    }
}
