//! A small social graph used across tests.
//!
//! ```text
//! users ──posts──▶ posts ──comments──▶ comments
//!   │  (author ◀)        (post ◀)
//!   └──profile──▶ profiles ──role──▶ roles
//!        (user ◀)         (profiles ◀)
//! ```
//!
//! | id  | etype    | fields                                 | created |
//! |-----|----------|----------------------------------------|---------|
//! | u1  | users    | name=Joe, email=joe@example.com        | 10      |
//! | u2  | users    | name=Ann, email=ann@example.com        | 20      |
//! | u3  | users    | name=Bob                               | 30      |
//! | p1  | posts    | title=Hello (by u1)                    | 40      |
//! | p2  | posts    | title=Again (by u1)                    | 50      |
//! | p3  | posts    | title=Third (by u2)                    | 60      |
//! | c1  | comments | body=Nice (on p3)                      | 70      |
//! | pr1 | profiles | bio=hi there (of u1)                   | 80      |
//! | r1  | roles    | name=admin (of pr1)                    | 90      |

use crate::store::MemoryStore;
use crate::types::{AttributeDefinition, Cardinality, Value};

/// The social graph catalog, with no facts.
#[must_use]
pub fn social_catalog() -> Vec<AttributeDefinition> {
    vec![
        AttributeDefinition::primary_key("users-id", "users"),
        AttributeDefinition::blob("users-name", "users", "name"),
        AttributeDefinition::blob("users-email", "users", "email"),
        AttributeDefinition::link("users-posts", ("users", "posts"), ("posts", "author"))
            .with_unique(true),
        AttributeDefinition::link("users-profile", ("users", "profile"), ("profiles", "user"))
            .with_cardinality(Cardinality::One)
            .with_unique(true),
        AttributeDefinition::primary_key("posts-id", "posts"),
        AttributeDefinition::blob("posts-title", "posts", "title"),
        AttributeDefinition::link("posts-comments", ("posts", "comments"), ("comments", "post"))
            .with_unique(true),
        AttributeDefinition::primary_key("comments-id", "comments"),
        AttributeDefinition::blob("comments-body", "comments", "body"),
        AttributeDefinition::primary_key("profiles-id", "profiles"),
        AttributeDefinition::blob("profiles-bio", "profiles", "bio"),
        AttributeDefinition::link("profiles-role", ("profiles", "role"), ("roles", "profiles"))
            .with_cardinality(Cardinality::One),
        AttributeDefinition::primary_key("roles-id", "roles"),
        AttributeDefinition::blob("roles-name", "roles", "name"),
    ]
}

/// The social graph with cardinality inference enabled.
#[must_use]
pub fn social_store() -> MemoryStore {
    let mut store = MemoryStore::new(social_catalog()).with_cardinality_inference(true);

    entity(&mut store, "users", "u1", 10, &[("name", "Joe"), ("email", "joe@example.com")]);
    entity(&mut store, "users", "u2", 20, &[("name", "Ann"), ("email", "ann@example.com")]);
    entity(&mut store, "users", "u3", 30, &[("name", "Bob")]);

    entity(&mut store, "posts", "p1", 40, &[("title", "Hello")]);
    store.add("u1", "users-posts", Value::string("p1"), 42);
    entity(&mut store, "posts", "p2", 50, &[("title", "Again")]);
    store.add("u1", "users-posts", Value::string("p2"), 52);
    entity(&mut store, "posts", "p3", 60, &[("title", "Third")]);
    store.add("u2", "users-posts", Value::string("p3"), 62);

    entity(&mut store, "comments", "c1", 70, &[("body", "Nice")]);
    store.add("p3", "posts-comments", Value::string("c1"), 72);

    entity(&mut store, "profiles", "pr1", 80, &[("bio", "hi there")]);
    store.add("u1", "users-profile", Value::string("pr1"), 82);

    entity(&mut store, "roles", "r1", 90, &[("name", "admin")]);
    store.add("pr1", "profiles-role", Value::string("r1"), 92);

    store
}

/// Add an entity's primary key at `created`, then its fields one tick apart.
pub fn entity(store: &mut MemoryStore, etype: &str, id: &str, created: u64, fields: &[(&str, &str)]) {
    store.add(id, &format!("{etype}-id"), Value::string(id), created);
    for (offset, (label, value)) in (1..).zip(fields) {
        store.add(id, &format!("{etype}-{label}"), Value::string(*value), created + offset);
    }
}
