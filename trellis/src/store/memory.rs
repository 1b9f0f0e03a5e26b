//! In-memory triple store.
//!
//! Holds the current facts of a snapshot plus the attribute catalog. Indices:
//! - EAV: (`entity`, `attribute`) -> facts
//! - AEV: `attribute` -> facts
//! - VAE: (`referenced entity`, `attribute`) -> facts, for ref attributes only

use std::collections::HashMap;

use crate::store::{LinkMetadata, TripleIndex, TripleStore};
use crate::types::{
    AttributeDefinition, AttributeId, Cardinality, EntityId, ResolvedObject, Triple, Value,
    ValueKind,
};

/// An in-memory store over a fixed catalog.
#[derive(Debug, Default)]
pub struct MemoryStore {
    attrs: Vec<AttributeDefinition>,
    attr_positions: HashMap<AttributeId, usize>,
    forward_labels: HashMap<(String, String), usize>,
    reverse_labels: HashMap<(String, String), usize>,
    links: HashMap<(String, String), LinkMetadata>,
    cardinality_inference: bool,

    triples: Vec<Triple>,
    eav: HashMap<EntityId, HashMap<AttributeId, Vec<usize>>>,
    aev: HashMap<AttributeId, Vec<usize>>,
    vae: HashMap<(EntityId, AttributeId), Vec<usize>>,
}

impl MemoryStore {
    /// Create an empty store over `attrs`.
    ///
    /// Link metadata is derived from the catalog: a forward label is singular
    /// when the attribute has cardinality `one`, a reverse label when the
    /// attribute is unique.
    #[must_use]
    pub fn new(attrs: Vec<AttributeDefinition>) -> Self {
        let mut store = Self::default();
        for attr in attrs {
            store.add_attr(attr);
        }
        store
    }

    /// Enable or disable collapsing of singular relationships.
    #[must_use]
    pub const fn with_cardinality_inference(mut self, enabled: bool) -> Self {
        self.cardinality_inference = enabled;
        self
    }

    pub const fn set_cardinality_inference(&mut self, enabled: bool) {
        self.cardinality_inference = enabled;
    }

    fn add_attr(&mut self, attr: AttributeDefinition) {
        let position = self.attrs.len();
        let fwd = &attr.forward_identity;
        self.attr_positions.insert(attr.id.clone(), position);
        self.forward_labels
            .insert((fwd.etype.clone(), fwd.label.clone()), position);

        if let (ValueKind::Ref, Some(rev)) = (attr.value_type, &attr.reverse_identity) {
            self.reverse_labels
                .insert((rev.etype.clone(), rev.label.clone()), position);
            self.links.insert(
                (fwd.etype.clone(), fwd.label.clone()),
                LinkMetadata {
                    is_singular: attr.cardinality == Cardinality::One,
                },
            );
            self.links.insert(
                (rev.etype.clone(), rev.label.clone()),
                LinkMetadata {
                    is_singular: attr.unique,
                },
            );
        }

        self.attrs.push(attr);
    }

    /// Look up a catalog entry by id.
    #[must_use]
    pub fn attr(&self, id: &AttributeId) -> Option<&AttributeDefinition> {
        self.attr_positions.get(id).map(|&p| &self.attrs[p])
    }

    /// Add a fact to the snapshot.
    ///
    /// Values of ref attributes given as strings are stored as references.
    /// A fact overwrites the current one for its (entity, attribute), or for
    /// its (entity, attribute, value) on many-valued links, unless the current
    /// fact is newer.
    pub fn insert(&mut self, triple: Triple) {
        let attr = self.attr(&triple.attribute);
        let holds_ids = attr.is_some_and(|a| a.is_ref() || a.is_primary_key());
        let single_valued =
            attr.is_none_or(|a| !a.is_ref() || a.cardinality == Cardinality::One);
        let triple = match triple.value {
            Value::String(s) if holds_ids => Triple {
                value: Value::Ref(EntityId(s)),
                ..triple
            },
            value => Triple { value, ..triple },
        };

        let current = self
            .eav
            .get(&triple.entity)
            .and_then(|attrs| attrs.get(&triple.attribute))
            .and_then(|positions| {
                positions
                    .iter()
                    .copied()
                    .find(|&p| single_valued || self.triples[p].value == triple.value)
            });
        match current {
            Some(position) if self.triples[position].time > triple.time => {}
            Some(position) => self.replace(position, triple),
            None => self.append(triple),
        }
    }

    fn append(&mut self, triple: Triple) {
        let position = self.triples.len();
        self.eav
            .entry(triple.entity.clone())
            .or_default()
            .entry(triple.attribute.clone())
            .or_default()
            .push(position);
        self.aev
            .entry(triple.attribute.clone())
            .or_default()
            .push(position);
        if let Value::Ref(target) = &triple.value {
            self.vae
                .entry((target.clone(), triple.attribute.clone()))
                .or_default()
                .push(position);
        }
        self.triples.push(triple);
    }

    fn replace(&mut self, position: usize, triple: Triple) {
        if let Value::Ref(old) = &self.triples[position].value {
            let key = (old.clone(), triple.attribute.clone());
            if let Some(positions) = self.vae.get_mut(&key) {
                positions.retain(|&p| p != position);
            }
        }
        if let Value::Ref(target) = &triple.value {
            self.vae
                .entry((target.clone(), triple.attribute.clone()))
                .or_default()
                .push(position);
        }
        self.triples[position] = triple;
    }

    /// Convenience wrapper over [`MemoryStore::insert`].
    pub fn add(&mut self, entity: &str, attribute: &str, value: Value, time: u64) {
        self.insert(Triple::new(
            EntityId::from_string(entity),
            AttributeId::from_string(attribute),
            value,
            time,
        ));
    }

    /// Number of current facts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.triples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    fn resolve(&self, positions: Option<&Vec<usize>>) -> Vec<&Triple> {
        positions
            .map(|ps| ps.iter().map(|&p| &self.triples[p]).collect())
            .unwrap_or_default()
    }

    /// The current value of a single-valued `attribute` on `entity`.
    fn current_value(&self, entity: &EntityId, attribute: &AttributeId) -> Option<&Value> {
        self.triples(entity, attribute).first().map(|t| &t.value)
    }
}

impl TripleStore for MemoryStore {
    fn primary_key_attr(&self, etype: &str) -> Option<&AttributeDefinition> {
        self.attrs
            .iter()
            .find(|a| a.forward_identity.etype == etype && a.primary)
            .or_else(|| {
                self.attr_by_forward_label(etype, "id")
                    .filter(|a| a.is_primary_key())
            })
    }

    fn attr_by_forward_label(&self, etype: &str, label: &str) -> Option<&AttributeDefinition> {
        self.forward_labels
            .get(&(etype.to_owned(), label.to_owned()))
            .map(|&p| &self.attrs[p])
    }

    fn attr_by_reverse_label(&self, etype: &str, label: &str) -> Option<&AttributeDefinition> {
        self.reverse_labels
            .get(&(etype.to_owned(), label.to_owned()))
            .map(|&p| &self.attrs[p])
    }

    fn object(&self, etype: &str, id: &EntityId) -> Option<ResolvedObject> {
        let facts = self.eav.get(id)?;
        let mut obj = ResolvedObject::new();
        for attr in &self.attrs {
            // Relationships are exposed through child namespaces, not as fields.
            if attr.forward_identity.etype != etype || attr.is_ref() {
                continue;
            }
            if !facts.contains_key(&attr.id) {
                continue;
            }
            if let Some(value) = self.current_value(id, &attr.id) {
                obj.insert_attribute(&attr.forward_identity.label, value);
            }
        }
        (!obj.is_empty()).then_some(obj)
    }

    fn link(&self, etype: &str, label: &str) -> Option<LinkMetadata> {
        self.links.get(&(etype.to_owned(), label.to_owned())).copied()
    }

    fn cardinality_inference(&self) -> bool {
        self.cardinality_inference
    }
}

impl TripleIndex for MemoryStore {
    fn triples(&self, entity: &EntityId, attribute: &AttributeId) -> Vec<&Triple> {
        self.resolve(self.eav.get(entity).and_then(|attrs| attrs.get(attribute)))
    }

    fn triples_with_attribute(&self, attribute: &AttributeId) -> Vec<&Triple> {
        self.resolve(self.aev.get(attribute))
    }

    fn triples_referencing(&self, target: &EntityId, attribute: &AttributeId) -> Vec<&Triple> {
        self.resolve(self.vae.get(&(target.clone(), attribute.clone())))
    }
}
