//! Common test utilities for integration tests

use nse_cli::models::Record;
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Builds an opaque record from field/value pairs
#[allow(dead_code)]
pub fn record(fields: &[(&str, Value)]) -> Record {
    fields
        .iter()
        .map(|(key, value)| (key.to_string(), value.clone()))
        .collect()
}

/// Mounts a key-login mock that hands out a fixed access token
#[allow(dead_code)]
pub async fn mount_login_ok(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/cvcue/keyLogin"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "test-token"})))
        .mount(server)
        .await;
}

/// Wraps records in the `{error, data}` envelope the query endpoints use
#[allow(dead_code)]
pub fn session_page(records: Value) -> Value {
    json!({"error": null, "data": {"records": records}})
}
