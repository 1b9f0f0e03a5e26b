//! Querying a store loaded from a snapshot file.

use std::io::Write;

use serde_json::json;
use tempfile::NamedTempFile;

use crate::e2e_tests::helpers::query;
use crate::store::MemoryStore;

const SNAPSHOT: &str = r#"{
    "cardinality-inference": true,
    "attrs": [
        { "id": "a1", "value-type": "blob", "forward-identity": ["f1", "teams", "id"], "unique?": true },
        { "id": "a2", "value-type": "blob", "forward-identity": ["f2", "teams", "name"] },
        { "id": "a3", "value-type": "blob", "forward-identity": ["f3", "members", "id"], "unique?": true },
        { "id": "a4", "value-type": "blob", "forward-identity": ["f4", "members", "handle"] },
        { "id": "a5", "value-type": "ref",
          "forward-identity": ["f5", "teams", "members"],
          "reverse-identity": ["r5", "members", "team"], "unique?": true }
    ],
    "triples": [
        ["t1", "a1", "t1", 1],
        ["t1", "a2", "Core", 2],
        ["m1", "a3", "m1", 3],
        ["m1", "a4", "ada", 4],
        ["m2", "a3", "m2", 5],
        ["m2", "a4", "grace", 6],
        ["t1", "a5", "m1", 7],
        ["t1", "a5", "m2", 8]
    ]
}"#;

#[test]
fn test_query_loaded_snapshot() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(SNAPSHOT.as_bytes()).unwrap();
    let store = MemoryStore::load(file.path()).unwrap();

    let result = query(
        &store,
        &json!({ "members": { "$": { "where": { "team.name": "Core" } }, "team": {} } }),
    );

    assert_eq!(
        result,
        json!({
            "data": {
                "members": [
                    { "id": "m1", "handle": "ada", "team": { "id": "t1", "name": "Core" } },
                    { "id": "m2", "handle": "grace", "team": { "id": "t1", "name": "Core" } }
                ]
            }
        })
    );
}
