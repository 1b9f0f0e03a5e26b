//! `limit`, `first` and `last`.

use serde_json::json;

use crate::e2e_tests::helpers::{ids, query};
use crate::testing::fixtures::social_store;

#[test]
fn test_limit_returns_a_prefix() {
    let store = social_store();

    let all = query(&store, &json!({ "posts": {} }));
    for n in 1..=4_usize {
        let limited = query(&store, &json!({ "posts": { "$": { "limit": n } } }));
        let expected: Vec<_> = ids(&all, "posts").into_iter().take(n).collect();
        assert_eq!(ids(&limited, "posts"), expected);
    }
}

#[test]
fn test_first_and_last_act_as_limit() {
    let store = social_store();

    let first = query(&store, &json!({ "users": { "$": { "first": 1 } } }));
    assert_eq!(ids(&first, "users"), vec!["u1"]);

    let last = query(
        &store,
        &json!({ "users": { "$": { "last": 1, "order": { "serverCreatedAt": "desc" } } } }),
    );
    assert_eq!(ids(&last, "users"), vec!["u3"]);
}

#[test]
fn test_zero_limit_means_unlimited() {
    let store = social_store();

    let result = query(&store, &json!({ "users": { "$": { "limit": 0 } } }));

    assert_eq!(ids(&result, "users"), vec!["u1", "u2", "u3"]);
}

#[test]
fn test_limit_applies_per_parent() {
    let store = social_store();

    let result = query(&store, &json!({ "users": { "posts": { "$": { "limit": 1 } } } }));

    let users = result["data"]["users"].as_array().unwrap();
    assert_eq!(users[0]["posts"], json!([{ "id": "p1", "title": "Hello" }]));
    assert_eq!(users[1]["posts"], json!([{ "id": "p3", "title": "Third" }]));
}

#[test]
fn test_descending_order() {
    let store = social_store();

    let result = query(
        &store,
        &json!({ "posts": { "$": { "order": { "serverCreatedAt": "desc" } } } }),
    );

    assert_eq!(ids(&result, "posts"), vec!["p3", "p2", "p1"]);
}
