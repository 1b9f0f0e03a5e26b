//! Child namespaces and cardinality.

use serde_json::json;

use crate::e2e_tests::helpers::{ids, query};
use crate::store::MemoryStore;
use crate::testing::fixtures::{social_catalog, social_store};
use crate::types::Value;

/// Setup: `u1` linked to post `p1` through `users.posts` (unique, so each
/// post has one author).
///
/// Query: users where name = "Joe", with posts
/// Expected: `posts` is a list, since a user can have many posts
#[test]
fn test_plural_relationship_is_a_list() {
    let mut store = MemoryStore::new(social_catalog()).with_cardinality_inference(true);
    store.add("u1", "users-id", Value::string("u1"), 1);
    store.add("u1", "users-name", Value::string("Joe"), 2);
    store.add("p1", "posts-id", Value::string("p1"), 3);
    store.add("p1", "posts-title", Value::string("Hello"), 4);
    store.add("u1", "users-posts", Value::string("p1"), 5);

    let result = query(
        &store,
        &json!({ "users": { "$": { "where": { "name": "Joe" } }, "posts": {} } }),
    );

    assert_eq!(
        result,
        json!({
            "data": {
                "users": [{
                    "id": "u1",
                    "name": "Joe",
                    "posts": [{ "id": "p1", "title": "Hello" }]
                }]
            }
        })
    );
}

#[test]
fn test_singular_relationship_is_an_object() {
    let store = social_store();

    let result = query(&store, &json!({ "posts": { "author": {} } }));

    let posts = result["data"]["posts"].as_array().unwrap();
    assert_eq!(posts.len(), 3);
    assert_eq!(posts[0]["author"]["id"], json!("u1"));
    assert_eq!(posts[1]["author"]["id"], json!("u1"));
    assert_eq!(posts[2]["author"]["id"], json!("u2"));
}

#[test]
fn test_singular_forward_relationship() {
    let store = social_store();

    let result = query(&store, &json!({ "users": { "profile": { "role": {} } } }));

    let users = result["data"]["users"].as_array().unwrap();
    assert_eq!(users[0]["profile"]["bio"], json!("hi there"));
    assert_eq!(users[0]["profile"]["role"]["name"], json!("admin"));
    // No profile: the key is left out entirely.
    assert!(users[1].get("profile").is_none());
    assert!(users[2].get("profile").is_none());
}

#[test]
fn test_child_where_filters_per_parent() {
    let store = social_store();

    let result = query(
        &store,
        &json!({ "users": { "posts": { "$": { "where": { "title": "Again" } } } } }),
    );

    let users = result["data"]["users"].as_array().unwrap();
    assert_eq!(users[0]["posts"], json!([{ "id": "p2", "title": "Again" }]));
    assert_eq!(users[1]["posts"], json!([]));
    assert_eq!(users[2]["posts"], json!([]));
}

#[test]
fn test_three_levels() {
    let store = social_store();

    let result = query(
        &store,
        &json!({ "users": { "$": { "where": { "name": "Ann" } }, "posts": { "comments": { "post": {} } } } }),
    );

    let comment = &result["data"]["users"][0]["posts"][0]["comments"][0];
    assert_eq!(comment["body"], json!("Nice"));
    assert_eq!(comment["post"]["id"], json!("p3"));
}

#[test]
fn test_multiple_namespaces_keep_query_order() {
    let store = social_store();

    let result = query(&store, &json!({ "posts": {}, "users": {} }));

    let keys: Vec<_> = result["data"].as_object().unwrap().keys().cloned().collect();
    assert_eq!(keys, vec!["posts", "users"]);
    assert_eq!(ids(&result, "users"), vec!["u1", "u2", "u3"]);
}
