//! Triple store collaborators.
//!
//! The query core talks to the store through two traits:
//!
//! - [`TripleStore`]: the attribute catalog, link metadata and object
//!   materialization. This is everything the compiler, resolver and extender
//!   need.
//! - [`TripleIndex`]: raw access to facts through the EAV and VAE indices.
//!   Only the reference match engine uses it.
//!
//! [`MemoryStore`] implements both over an immutable, in-memory snapshot.

mod memory;
mod snapshot;

pub use memory::MemoryStore;
pub use snapshot::{Snapshot, SnapshotError};

use crate::types::{AttributeDefinition, AttributeId, EntityId, ResolvedObject, Triple};

/// Relationship metadata for one `(entity type, label)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkMetadata {
    /// At most one related entity is reachable through this label.
    pub is_singular: bool,
}

/// Catalog lookups and materialization consumed by the query core.
pub trait TripleStore {
    /// The attribute identifying entities of `etype`.
    fn primary_key_attr(&self, etype: &str) -> Option<&AttributeDefinition>;

    /// The attribute declared on `etype` under `label`.
    fn attr_by_forward_label(&self, etype: &str, label: &str) -> Option<&AttributeDefinition>;

    /// The relationship pointing at `etype` that `etype` sees as `label`.
    fn attr_by_reverse_label(&self, etype: &str, label: &str) -> Option<&AttributeDefinition>;

    /// Project an entity's scalar attributes into a plain record.
    ///
    /// Returns `None` when the id no longer names an entity.
    fn object(&self, etype: &str, id: &EntityId) -> Option<ResolvedObject>;

    /// Cardinality metadata for the relationship `label` on `etype`.
    fn link(&self, etype: &str, label: &str) -> Option<LinkMetadata>;

    /// Whether link metadata should be used to collapse singular relationships.
    fn cardinality_inference(&self) -> bool;
}

/// Index access used by pattern execution.
///
/// Indices hold current facts only. An overwritten value is no longer
/// visible to matching.
pub trait TripleIndex {
    /// Facts about `entity` under `attribute` (EAV).
    fn triples(&self, entity: &EntityId, attribute: &AttributeId) -> Vec<&Triple>;

    /// Every fact under `attribute`.
    fn triples_with_attribute(&self, attribute: &AttributeId) -> Vec<&Triple>;

    /// Facts under `attribute` whose value references `target` (VAE).
    fn triples_referencing(&self, target: &EntityId, attribute: &AttributeId) -> Vec<&Triple>;

    /// Whether `entity` currently has a non-null value for `attribute`.
    fn has_value(&self, entity: &EntityId, attribute: &AttributeId) -> bool {
        self.triples(entity, attribute)
            .iter()
            .any(|t| !t.value.is_null())
    }
}
