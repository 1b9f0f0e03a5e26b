//! Common helpers for end-to-end tests.

use serde_json::json;

use crate::store::MemoryStore;
use crate::testing::run_json;
use crate::types::{AttributeDefinition, Value};

/// Run `query` and return the serialized envelope.
#[allow(clippy::expect_used)]
pub fn query(store: &MemoryStore, query: &serde_json::Value) -> serde_json::Value {
    let result = run_json(store, query).expect("query should succeed");
    serde_json::to_value(&result).expect("result should serialize")
}

/// The ids resolved for `namespace`, in result order.
pub fn ids(result: &serde_json::Value, namespace: &str) -> Vec<String> {
    result["data"][namespace]
        .as_array()
        .map(|objects| {
            objects
                .iter()
                .filter_map(|o| o["id"].as_str().map(str::to_owned))
                .collect()
        })
        .unwrap_or_default()
}

/// A store with one `users` entity, `u1`, named Joe.
pub fn single_user_store() -> MemoryStore {
    let mut store = MemoryStore::new(vec![
        AttributeDefinition::primary_key("users-id", "users"),
        AttributeDefinition::blob("users-name", "users", "name"),
    ]);
    store.add("u1", "users-id", Value::string("u1"), 1);
    store.add("u1", "users-name", Value::string("Joe"), 2);
    store
}

/// `{ "data": { namespace: [] } }`
pub fn empty(namespace: &str) -> serde_json::Value {
    json!({ "data": { namespace: [] } })
}
