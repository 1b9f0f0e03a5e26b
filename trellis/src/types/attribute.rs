//! Attribute catalog entries.

use serde::Deserialize;

use crate::types::AttributeId;

/// Whether an attribute stores scalars or references to other entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Blob,
    Ref,
}

/// How many values an attribute holds per entity on its forward side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cardinality {
    One,
    #[default]
    Many,
}

/// One side of an attribute's identity: `[identity id, entity type, label]`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "(String, String, String)")]
pub struct Identity {
    pub id: String,
    pub etype: String,
    pub label: String,
}

impl Identity {
    #[must_use]
    pub fn new(id: &str, etype: &str, label: &str) -> Self {
        Self {
            id: id.to_owned(),
            etype: etype.to_owned(),
            label: label.to_owned(),
        }
    }
}

impl From<(String, String, String)> for Identity {
    fn from((id, etype, label): (String, String, String)) -> Self {
        Self { id, etype, label }
    }
}

/// A catalog entry.
///
/// # Invariants
///
/// - `reverse_identity` is `Some` only when `value_kind` is `Ref`.
/// - The forward identity's etype owns the attribute; for refs the reverse
///   identity's etype is the referenced entity type.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct AttributeDefinition {
    pub id: AttributeId,
    pub value_type: ValueKind,
    pub forward_identity: Identity,
    #[serde(default)]
    pub reverse_identity: Option<Identity>,
    #[serde(default)]
    pub cardinality: Cardinality,
    #[serde(default, rename = "unique?")]
    pub unique: bool,
    #[serde(default, rename = "primary?")]
    pub primary: bool,
}

impl AttributeDefinition {
    /// A scalar attribute `label` on `etype`.
    #[must_use]
    pub fn blob(id: &str, etype: &str, label: &str) -> Self {
        Self {
            id: AttributeId::from_string(id),
            value_type: ValueKind::Blob,
            forward_identity: Identity::new(&format!("{id}-fwd"), etype, label),
            reverse_identity: None,
            cardinality: Cardinality::One,
            unique: false,
            primary: false,
        }
    }

    /// The primary-key attribute of `etype`, labelled `id`.
    #[must_use]
    pub fn primary_key(id: &str, etype: &str) -> Self {
        Self {
            unique: true,
            primary: true,
            ..Self::blob(id, etype, "id")
        }
    }

    /// A relationship declared on `fwd_etype` as `fwd_label`, seen from
    /// `rev_etype` as `rev_label`.
    #[must_use]
    pub fn link(
        id: &str,
        (fwd_etype, fwd_label): (&str, &str),
        (rev_etype, rev_label): (&str, &str),
    ) -> Self {
        Self {
            id: AttributeId::from_string(id),
            value_type: ValueKind::Ref,
            forward_identity: Identity::new(&format!("{id}-fwd"), fwd_etype, fwd_label),
            reverse_identity: Some(Identity::new(&format!("{id}-rev"), rev_etype, rev_label)),
            cardinality: Cardinality::Many,
            unique: false,
            primary: false,
        }
    }

    /// Mark the forward side as holding at most one reference.
    #[must_use]
    pub const fn with_cardinality(mut self, cardinality: Cardinality) -> Self {
        self.cardinality = cardinality;
        self
    }

    /// Mark values as unique, making the reverse side hold at most one entity.
    #[must_use]
    pub const fn with_unique(mut self, unique: bool) -> Self {
        self.unique = unique;
        self
    }

    #[must_use]
    pub fn is_ref(&self) -> bool {
        self.value_type == ValueKind::Ref
    }

    /// Whether this attribute is the primary key of its owning entity type.
    #[must_use]
    pub fn is_primary_key(&self) -> bool {
        self.primary || (self.value_type == ValueKind::Blob && self.forward_identity.label == "id")
    }
}
