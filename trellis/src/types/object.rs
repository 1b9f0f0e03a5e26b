//! Materialized result objects.

use std::collections::HashMap;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::types::{EntityId, Value};

/// Related entities attached to a parent under a child label.
#[derive(Debug, Clone, PartialEq)]
pub enum Related {
    /// A singular relationship: the related object, or nothing (serialized
    /// by omitting the key).
    One(Option<Box<ResolvedObject>>),
    /// A plural relationship, in resolution order.
    Many(Vec<ResolvedObject>),
}

impl Related {
    #[must_use]
    pub fn as_one(&self) -> Option<&ResolvedObject> {
        match self {
            Self::One(obj) => obj.as_deref(),
            Self::Many(_) => None,
        }
    }

    #[must_use]
    pub fn as_many(&self) -> Option<&[ResolvedObject]> {
        match self {
            Self::One(_) => None,
            Self::Many(objs) => Some(objs),
        }
    }
}

/// A plain record keyed by attribute label, extended with related objects.
///
/// # Invariants
///
/// - A label is either an attribute or a relationship, never both; setting a
///   relationship under an attribute's label replaces the attribute.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResolvedObject {
    attributes: serde_json::Map<String, serde_json::Value>,
    related: Vec<(String, Related)>,
}

impl ResolvedObject {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an attribute value, keeping the first-insertion position.
    pub fn insert_attribute(&mut self, label: &str, value: &Value) {
        self.attributes.insert(label.to_owned(), value.to_json());
    }

    #[must_use]
    pub fn attribute(&self, label: &str) -> Option<&serde_json::Value> {
        self.attributes.get(label)
    }

    /// Attach related objects under `label`.
    pub fn set_related(&mut self, label: &str, related: Related) {
        self.attributes.shift_remove(label);
        if let Some(slot) = self.related.iter_mut().find(|(l, _)| l == label) {
            slot.1 = related;
        } else {
            self.related.push((label.to_owned(), related));
        }
    }

    #[must_use]
    pub fn related(&self, label: &str) -> Option<&Related> {
        self.related
            .iter()
            .find_map(|(l, r)| (l == label).then_some(r))
    }

    /// Number of keys that would be serialized.
    #[must_use]
    pub fn len(&self) -> usize {
        self.attributes.len()
            + self
                .related
                .iter()
                .filter(|(_, r)| !matches!(r, Related::One(None)))
                .count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Serialize for ResolvedObject {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (label, value) in &self.attributes {
            map.serialize_entry(label, value)?;
        }
        for (label, related) in &self.related {
            match related {
                Related::One(None) => {}
                Related::One(Some(obj)) => map.serialize_entry(label, obj)?,
                Related::Many(objs) => map.serialize_entry(label, objs)?,
            }
        }
        map.end()
    }
}

/// Resolved objects keyed by entity id, in resolution order.
///
/// Re-inserting an id replaces its object but keeps its original position.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResolvedObjects {
    entries: Vec<(EntityId, ResolvedObject)>,
    positions: HashMap<EntityId, usize>,
}

impl ResolvedObjects {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: EntityId, object: ResolvedObject) {
        if let Some(&position) = self.positions.get(&id) {
            self.entries[position].1 = object;
            return;
        }
        self.positions.insert(id.clone(), self.entries.len());
        self.entries.push((id, object));
    }

    #[must_use]
    pub fn get(&self, id: &EntityId) -> Option<&ResolvedObject> {
        self.positions.get(id).map(|&p| &self.entries[p].1)
    }

    /// Keep only the first `n` entries.
    pub fn truncate(&mut self, n: usize) {
        if n >= self.entries.len() {
            return;
        }
        for (id, _) in self.entries.drain(n..) {
            self.positions.remove(&id);
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &EntityId> {
        self.entries.iter().map(|(id, _)| id)
    }

    #[must_use]
    pub fn into_values(self) -> Vec<ResolvedObject> {
        self.entries.into_iter().map(|(_, obj)| obj).collect()
    }
}

impl IntoIterator for ResolvedObjects {
    type Item = (EntityId, ResolvedObject);
    type IntoIter = std::vec::IntoIter<(EntityId, ResolvedObject)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl Serialize for ResolvedObjects {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (id, obj) in &self.entries {
            map.serialize_entry(id, obj)?;
        }
        map.end()
    }
}
