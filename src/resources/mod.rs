//! Resource system for garage-provider
//!
//! This module provides the [`Resource`] trait implemented by each managed
//! object kind, the [`Schema`] types describing their attributes, and the
//! [`ResourceRegistry`] the host runtime dispatches lifecycle calls through.
//!
//! State crosses the host boundary as [`ResourceState`], a flat map of
//! attribute name to JSON value. Each resource converts it to its own typed
//! model with [`decode`] and back with [`encode`].

pub mod access_key;
pub mod bucket;
pub mod permission;

pub use access_key::AccessKeyResource;
pub use bucket::BucketResource;
pub use permission::PermissionResource;

use crate::error::{Error, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

/// Attribute values of one resource instance
pub type ResourceState = HashMap<String, Value>;

/// Value type of an attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeType {
    String,
    Bool,
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeType::String => write!(f, "string"),
            AttributeType::Bool => write!(f, "bool"),
        }
    }
}

/// Description of a single attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: AttributeType,
    pub description: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub optional: bool,
    /// Set by the provider rather than the configuration
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub computed: bool,
    /// Value must be hidden from plan output and logs
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub sensitive: bool,
    /// A change to this attribute destroys and recreates the object
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub requires_replace: bool,
}

impl Attribute {
    fn new(name: &str, kind: AttributeType) -> Self {
        Self {
            name: name.to_string(),
            kind,
            description: String::new(),
            required: false,
            optional: false,
            computed: false,
            sensitive: false,
            requires_replace: false,
        }
    }

    pub fn string(name: &str) -> Self {
        Self::new(name, AttributeType::String)
    }

    pub fn bool(name: &str) -> Self {
        Self::new(name, AttributeType::Bool)
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn computed(mut self) -> Self {
        self.computed = true;
        self
    }

    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    pub fn requires_replace(mut self) -> Self {
        self.requires_replace = true;
        self
    }
}

/// Attribute layout of a resource or of the provider configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    pub description: String,
    pub attributes: Vec<Attribute>,
}

impl Schema {
    pub fn new(description: impl Into<String>, attributes: Vec<Attribute>) -> Self {
        Self {
            description: description.into(),
            attributes,
        }
    }

    /// Look up an attribute by name
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Names of required attributes missing (absent or null) from `state`.
    pub fn missing_required(&self, state: &ResourceState) -> Vec<&str> {
        self.attributes
            .iter()
            .filter(|a| a.required)
            .filter(|a| state.get(&a.name).map_or(true, Value::is_null))
            .map(|a| a.name.as_str())
            .collect()
    }

    /// Names of replace-on-change attributes whose planned value differs
    /// from the prior state.
    pub fn requires_replace(&self, prior: &ResourceState, planned: &ResourceState) -> Vec<&str> {
        self.attributes
            .iter()
            .filter(|a| a.requires_replace)
            .filter(|a| {
                let before = prior.get(&a.name).unwrap_or(&Value::Null);
                let after = planned.get(&a.name).unwrap_or(&Value::Null);
                before != after
            })
            .map(|a| a.name.as_str())
            .collect()
    }
}

/// Convert state into a resource's typed model.
pub fn decode<T: DeserializeOwned>(resource: &str, state: &ResourceState) -> Result<T> {
    let object: serde_json::Map<String, Value> =
        state.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
    serde_json::from_value(Value::Object(object)).map_err(|source| Error::InvalidState {
        resource: resource.to_string(),
        source,
    })
}

/// Convert a resource's typed model into state.
pub fn encode<T: Serialize>(resource: &str, model: &T) -> Result<ResourceState> {
    match serde_json::to_value(model) {
        Ok(Value::Object(object)) => Ok(object.into_iter().collect()),
        Ok(other) => Err(Error::invalid_input(
            resource,
            format!("model encoded to {} instead of an object", other),
        )),
        Err(source) => Err(Error::InvalidState {
            resource: resource.to_string(),
            source,
        }),
    }
}

/// Trait that all managed resources implement
///
/// The host runtime owns planning and diffing; a resource only reconciles
/// one instance against the admin API per call.
#[async_trait]
pub trait Resource: Send + Sync {
    /// Full type name, e.g. `garage_bucket`
    fn type_name(&self) -> &'static str;

    /// Attribute layout of this resource
    fn schema(&self) -> Schema;

    /// Validate planned state before any network call
    fn validate(&self, plan: &ResourceState) -> Result<()> {
        let _ = plan;
        Ok(())
    }

    /// Create the remote object and return the resulting state
    async fn create(&self, plan: &ResourceState) -> Result<ResourceState>;

    /// Refresh state from the remote object
    async fn read(&self, state: &ResourceState) -> Result<ResourceState>;

    /// Apply an in-place change and return the resulting state
    async fn update(&self, prior: &ResourceState, plan: &ResourceState) -> Result<ResourceState>;

    /// Remove the remote object
    async fn delete(&self, state: &ResourceState) -> Result<()>;

    /// Seed state from an import id; the registry reads it afterwards.
    ///
    /// The default passes the id through to the `id` attribute.
    fn import_state(&self, id: &str) -> Result<ResourceState> {
        let mut state = ResourceState::new();
        state.insert("id".to_string(), Value::String(id.to_string()));
        Ok(state)
    }
}

/// Registry for looking up resources by type name
pub struct ResourceRegistry {
    resources: HashMap<String, Arc<dyn Resource>>,
}

impl ResourceRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            resources: HashMap::new(),
        }
    }

    /// Register a resource under its type name
    pub fn register(&mut self, resource: Arc<dyn Resource>) {
        self.resources
            .insert(resource.type_name().to_string(), resource);
    }

    /// Get a resource by type name
    pub fn get(&self, type_name: &str) -> Option<Arc<dyn Resource>> {
        self.resources.get(type_name).cloned()
    }

    /// Check if a resource type exists
    pub fn contains(&self, type_name: &str) -> bool {
        self.resources.contains_key(type_name)
    }

    /// All registered type names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.resources.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Schemas of every registered resource keyed by type name
    pub fn schemas(&self) -> HashMap<String, Schema> {
        self.resources
            .iter()
            .map(|(name, r)| (name.clone(), r.schema()))
            .collect()
    }

    fn lookup(&self, type_name: &str) -> Result<Arc<dyn Resource>> {
        self.get(type_name)
            .ok_or_else(|| Error::ResourceNotFound(type_name.to_string()))
    }

    /// Required-attribute check followed by the resource's own validation
    pub fn validate(&self, type_name: &str, plan: &ResourceState) -> Result<()> {
        let resource = self.lookup(type_name)?;
        if let Some(missing) = resource.schema().missing_required(plan).first() {
            return Err(Error::missing_attribute(type_name, *missing));
        }
        resource.validate(plan)
    }

    /// Attributes whose change forces replacement
    pub fn requires_replace(
        &self,
        type_name: &str,
        prior: &ResourceState,
        planned: &ResourceState,
    ) -> Result<Vec<String>> {
        let resource = self.lookup(type_name)?;
        let schema = resource.schema();
        Ok(schema
            .requires_replace(prior, planned)
            .into_iter()
            .map(str::to_string)
            .collect())
    }

    pub async fn create(&self, type_name: &str, plan: &ResourceState) -> Result<ResourceState> {
        self.validate(type_name, plan)?;
        debug!(resource = type_name, "create");
        self.lookup(type_name)?.create(plan).await
    }

    pub async fn read(&self, type_name: &str, state: &ResourceState) -> Result<ResourceState> {
        debug!(resource = type_name, "read");
        self.lookup(type_name)?.read(state).await
    }

    pub async fn update(
        &self,
        type_name: &str,
        prior: &ResourceState,
        plan: &ResourceState,
    ) -> Result<ResourceState> {
        self.validate(type_name, plan)?;
        debug!(resource = type_name, "update");
        self.lookup(type_name)?.update(prior, plan).await
    }

    pub async fn delete(&self, type_name: &str, state: &ResourceState) -> Result<()> {
        debug!(resource = type_name, "delete");
        self.lookup(type_name)?.delete(state).await
    }

    /// Seed state from `id` and refresh it from the admin API
    pub async fn import(&self, type_name: &str, id: &str) -> Result<ResourceState> {
        let resource = self.lookup(type_name)?;
        let seeded = resource.import_state(id)?;
        trace!(resource = type_name, id, "imported, reading");
        resource.read(&seeded).await
    }
}

impl Default for ResourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}
