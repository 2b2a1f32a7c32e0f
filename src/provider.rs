//! Provider bootstrap
//!
//! [`GarageProvider`] is what the host runtime loads. It describes its own
//! configuration schema and, once configured, hands back a
//! [`ResourceRegistry`] holding the three resources wired to one shared
//! [`AdminClient`].

use crate::client::AdminClient;
use crate::config::ProviderConfig;
use crate::error::Result;
use crate::resources::{
    access_key, bucket, permission, AccessKeyResource, Attribute, BucketResource,
    PermissionResource, Resource, ResourceRegistry, Schema,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;

/// Provider type name; resource type names are prefixed with it
pub const PROVIDER_TYPE: &str = "garage";

/// The Garage provider
#[derive(Debug, Clone)]
pub struct GarageProvider {
    /// Set on release, "dev" for local builds and "test" in tests
    version: String,
}

impl GarageProvider {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
        }
    }

    pub fn type_name(&self) -> &'static str {
        PROVIDER_TYPE
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Schema of the provider configuration block
    pub fn schema(&self) -> Schema {
        Schema::new(
            "Manage buckets, access keys and permissions of a Garage cluster",
            vec![
                Attribute::string("host")
                    .required()
                    .description("Hostname/ip to access the garage api"),
                Attribute::string("scheme")
                    .optional()
                    .description("The scheme to use, i.e.: http or https"),
                Attribute::string("token")
                    .required()
                    .sensitive()
                    .description("The token to authenticate with the garage api"),
            ],
        )
    }

    /// Schemas of every resource type, keyed by type name. Needs no client.
    pub fn resource_schemas(&self) -> BTreeMap<&'static str, Schema> {
        BTreeMap::from([
            (access_key::ACCESS_KEY_TYPE, access_key::schema()),
            (bucket::BUCKET_TYPE, bucket::schema()),
            (permission::PERMISSION_TYPE, permission::schema()),
        ])
    }

    /// Build the admin client from `config` and register every resource.
    pub fn configure(&self, config: &ProviderConfig) -> Result<ResourceRegistry> {
        let client = Arc::new(config.client()?);
        info!(
            endpoint = client.base_url(),
            version = %self.version,
            "configured garage provider"
        );
        Ok(Self::registry(client))
    }

    /// Registry of every resource, all sharing `client`.
    pub fn registry(client: Arc<AdminClient>) -> ResourceRegistry {
        let mut registry = ResourceRegistry::new();
        for resource in Self::resources(client) {
            registry.register(resource);
        }
        registry
    }

    fn resources(client: Arc<AdminClient>) -> Vec<Arc<dyn Resource>> {
        vec![
            Arc::new(BucketResource::new(client.clone())),
            Arc::new(AccessKeyResource::new(client.clone())),
            Arc::new(PermissionResource::new(client)),
        ]
    }
}

impl Default for GarageProvider {
    fn default() -> Self {
        Self::new(env!("CARGO_PKG_VERSION"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_metadata() {
        let provider = GarageProvider::new("test");
        assert_eq!(provider.type_name(), "garage");
        assert_eq!(provider.version(), "test");
        assert_eq!(GarageProvider::default().version(), env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_configure_registers_resources() {
        let provider = GarageProvider::new("test");
        let registry = provider
            .configure(&ProviderConfig::new("localhost:3903", "tok").with_scheme("http"))
            .unwrap();
        assert_eq!(
            registry.names(),
            vec!["garage_access_key", "garage_bucket", "garage_permission"]
        );
    }

    #[test]
    fn test_resource_names_carry_provider_prefix() {
        let provider = GarageProvider::new("test");
        let registry = provider
            .configure(&ProviderConfig::new("localhost:3903", "tok"))
            .unwrap();
        for name in registry.names() {
            assert!(name.starts_with(&format!("{}_", provider.type_name())));
        }
    }

    #[test]
    fn test_configure_rejects_bad_scheme() {
        let provider = GarageProvider::new("test");
        let err = provider
            .configure(&ProviderConfig::new("localhost", "tok").with_scheme("gopher"))
            .err()
            .unwrap();
        assert!(matches!(err, Error::InvalidScheme(ref s) if s == "gopher"));
    }

    #[test]
    fn test_resource_schemas_match_registry() {
        let provider = GarageProvider::new("test");
        let registry = provider
            .configure(&ProviderConfig::new("localhost:3903", "tok"))
            .unwrap();
        let schemas = provider.resource_schemas();
        assert_eq!(schemas.keys().copied().collect::<Vec<_>>(), registry.names());
        for (name, schema) in &schemas {
            assert_eq!(registry.get(name).unwrap().schema(), *schema);
        }
    }

    #[test]
    fn test_schema_marks_token_sensitive() {
        let schema = GarageProvider::new("test").schema();
        assert!(schema.attribute("token").unwrap().sensitive);
        assert!(schema.attribute("host").unwrap().required);
        assert!(schema.attribute("scheme").unwrap().optional);
    }
}
