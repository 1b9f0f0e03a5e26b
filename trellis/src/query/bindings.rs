//! Variable bindings for pattern evaluation.
//!
//! `Bindings` holds what each query variable is bound to on one evaluation
//! path. Matching a pattern copies the bindings and extends the copy, so
//! alternative paths never see each other's bindings.

use std::collections::HashMap;

use super::types::{Datom, Variable};

/// The bindings of one evaluation path.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bindings {
    bindings: HashMap<String, Datom>,
}

impl Bindings {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a variable, replacing any previous binding.
    pub fn set(&mut self, variable: &Variable, value: Datom) {
        self.bindings.insert(variable.name.clone(), value);
    }

    #[must_use]
    pub fn get(&self, variable: &Variable) -> Option<&Datom> {
        self.bindings.get(&variable.name)
    }

    /// Bind `variable` to `value`, or check it against the existing binding.
    ///
    /// Returns `false` if the variable is bound to something else.
    pub fn unify(&mut self, variable: &Variable, value: Datom) -> bool {
        match self.get(variable) {
            Some(bound) => datoms_agree(bound, &value),
            None => {
                self.set(variable, value);
                true
            }
        }
    }
}

/// Entity ids unify with string or ref values naming the same entity.
fn datoms_agree(a: &Datom, b: &Datom) -> bool {
    match (a, b) {
        (Datom::Time(x), Datom::Time(y)) => x == y,
        (Datom::Value(x), Datom::Value(y)) => x.matches(y),
        _ => match (a.as_entity_id(), b.as_entity_id()) {
            (Some(x), Some(y)) => x == y,
            _ => false,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::types::{EntityId, Value};

    #[test]
    fn test_bindings_basic() {
        let mut bindings = Bindings::new();
        let x = Variable::new("x");

        assert!(bindings.get(&x).is_none());
        bindings.set(&x, Datom::Value(Value::string("hello")));
        assert!(bindings.get(&Variable::new("y")).is_none());
        assert_eq!(bindings.get(&x), Some(&Datom::Value(Value::string("hello"))));
    }

    #[test]
    fn test_unify_binds_then_checks() {
        let mut bindings = Bindings::new();
        let e = Variable::new("e");

        assert!(bindings.unify(&e, Datom::Entity(EntityId::from("u1"))));
        assert!(bindings.unify(&e, Datom::Entity(EntityId::from("u1"))));
        assert!(!bindings.unify(&e, Datom::Entity(EntityId::from("u2"))));
    }

    #[test]
    fn test_entity_unifies_with_ref_value() {
        let mut bindings = Bindings::new();
        let e = Variable::new("e");

        bindings.set(&e, Datom::Entity(EntityId::from("u1")));
        assert!(bindings.unify(&e, Datom::Value(Value::reference("u1"))));
        assert!(bindings.unify(&e, Datom::Value(Value::string("u1"))));
        assert!(!bindings.unify(&e, Datom::Time(1)));
    }
}
