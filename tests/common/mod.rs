//! Shared helpers for integration tests
#![allow(dead_code)]

use garage_provider::client::AdminClient;
use garage_provider::provider::GarageProvider;
use garage_provider::resources::{ResourceRegistry, ResourceState};
use serde_json::{json, Value};
use std::sync::Arc;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TOKEN: &str = "test-admin-token";

/// Client pointed at a mock admin API
pub fn client(server: &MockServer) -> Arc<AdminClient> {
    Arc::new(AdminClient::new(server.uri(), TOKEN).unwrap())
}

/// Registry of every resource wired to a mock admin API
pub fn registry(server: &MockServer) -> ResourceRegistry {
    GarageProvider::registry(client(server))
}

/// Build resource state from a JSON object literal
pub fn state(value: Value) -> ResourceState {
    serde_json::from_value(value).unwrap()
}

/// `GetBucketInfo` body for bucket `id` with one key holding `flags`
pub fn bucket_with_key(id: &str, key_id: &str, flags: (bool, bool, bool)) -> Value {
    json!({
        "id": id,
        "globalAliases": ["bongo"],
        "keys": [{
            "accessKeyId": key_id,
            "name": "app",
            "permissions": {"owner": flags.0, "read": flags.1, "write": flags.2},
        }],
    })
}

/// Body of `AllowBucketKey`/`DenyBucketKey`
pub fn grant_body(key_id: &str, bucket_id: &str, flags: (bool, bool, bool)) -> Value {
    json!({
        "accessKeyId": key_id,
        "bucketId": bucket_id,
        "permissions": {"owner": flags.0, "read": flags.1, "write": flags.2},
    })
}

/// Mount a `GetBucketInfo?id=` mock answering `body`
pub async fn mount_bucket_info(server: &MockServer, id: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path("/v2/GetBucketInfo"))
        .and(query_param("id", id))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}
