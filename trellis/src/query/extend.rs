//! Extending resolved entities with their related entities.
//!
//! For every child label in a form, each parent object gets the entities
//! reachable through that relationship, resolved one level deeper and
//! extended in turn. Labels the catalog marks singular (when the store infers
//! cardinality) collapse to the first related object, or nothing.

use crate::query::error::QueryError;
use crate::query::resolver::Resolver;
use crate::types::{EntityId, Form, Related, ResolvedObject, ResolvedObjects};

impl Resolver<'_> {
    /// Attach every child namespace of `form` to `objects`.
    ///
    /// # Errors
    ///
    /// Only non-recoverable errors are returned: a child label the catalog
    /// does not know resolves to nothing.
    pub fn extend(
        &self,
        etype: &str,
        level: usize,
        form: &Form,
        objects: ResolvedObjects,
    ) -> Result<Vec<ResolvedObject>, QueryError> {
        if !form.has_children() {
            return Ok(objects.into_values());
        }

        let mut extended = Vec::with_capacity(objects.len());
        for (id, mut object) in objects {
            for (label, child_form) in &form.children {
                let related = self.related(etype, level, label, child_form, &id)?;
                object.set_related(label, related);
            }
            extended.push(object);
        }
        Ok(extended)
    }

    fn related(
        &self,
        etype: &str,
        level: usize,
        label: &str,
        form: &Form,
        parent: &EntityId,
    ) -> Result<Related, QueryError> {
        let store = self.store();
        let singular = store.cardinality_inference()
            && store.link(etype, label).is_some_and(|link| link.is_singular);

        let hop = match self.compiler().make_join(etype, level, label, parent) {
            Ok(hop) => hop,
            Err(e) if e.is_recoverable() => {
                tracing::debug!("Skipping {label} on {etype}: {e}");
                return Ok(empty(singular));
            }
            Err(e) => return Err(e),
        };

        let children =
            self.resolve_guarded(&hop.next_etype, hop.next_level, form, Some(&hop.pattern), None)?;
        let children = self.extend(&hop.next_etype, hop.next_level, form, children)?;

        Ok(if singular {
            Related::One(children.into_iter().next().map(Box::new))
        } else {
            Related::Many(children)
        })
    }
}

const fn empty(singular: bool) -> Related {
    if singular {
        Related::One(None)
    } else {
        Related::Many(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::query::engine::MatchEngine;
    use crate::testing::fixtures::social_store;

    fn run(store: &crate::store::MemoryStore, etype: &str, query: &serde_json::Value) -> serde_json::Value {
        let engine = MatchEngine::new(store);
        let resolver = Resolver::new(store, &engine);
        let form = Form::from_json(query).unwrap();
        let objects = resolver.resolve_guarded(etype, 0, &form, None, None).unwrap();
        serde_json::to_value(resolver.extend(etype, 0, &form, objects).unwrap()).unwrap()
    }

    #[test]
    fn test_plural_children() {
        let store = social_store();
        let result = run(
            &store,
            "users",
            &json!({ "$": { "where": { "name": "Joe" } }, "posts": {} }),
        );
        assert_eq!(
            result,
            json!([{
                "id": "u1",
                "name": "Joe",
                "email": "joe@example.com",
                "posts": [
                    { "id": "p1", "title": "Hello" },
                    { "id": "p2", "title": "Again" }
                ]
            }])
        );
    }

    #[test]
    fn test_singular_reverse_child_collapses() {
        let store = social_store();
        let result = run(
            &store,
            "posts",
            &json!({ "$": { "where": { "title": "Hello" } }, "author": {} }),
        );
        assert_eq!(result[0]["author"]["id"], json!("u1"));
    }

    #[test]
    fn test_singular_without_inference_stays_a_list() {
        let mut store = social_store();
        store.set_cardinality_inference(false);
        let result = run(
            &store,
            "posts",
            &json!({ "$": { "where": { "title": "Hello" } }, "author": {} }),
        );
        assert_eq!(result[0]["author"], json!([{ "id": "u1", "name": "Joe", "email": "joe@example.com" }]));
    }

    #[test]
    fn test_absent_singular_is_omitted() {
        let store = social_store();
        let result = run(
            &store,
            "users",
            &json!({ "$": { "where": { "name": "Bob" } }, "profile": {} }),
        );
        assert_eq!(result, json!([{ "id": "u3", "name": "Bob" }]));
    }

    #[test]
    fn test_unknown_child_label_degrades() {
        let store = social_store();
        let result = run(
            &store,
            "users",
            &json!({ "$": { "where": { "name": "Bob" } }, "followers": {} }),
        );
        assert_eq!(result[0]["followers"], json!([]));
    }

    #[test]
    fn test_grandchildren() {
        let store = social_store();
        let result = run(
            &store,
            "users",
            &json!({ "$": { "where": { "name": "Ann" } }, "posts": { "comments": {} } }),
        );
        assert_eq!(
            result[0]["posts"][0]["comments"],
            json!([{ "id": "c1", "body": "Nice" }])
        );
    }
}
