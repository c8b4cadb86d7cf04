//! Logical waypoints: derived terms set by conditions instead of items.
//!
//! A waypoint binds a term to a condition. When the condition resolves true,
//! the state sets the term to 1, which can in turn resolve further
//! conditions — this is how room-to-room connectivity chains through the
//! fixpoint.

use std::collections::{hash_map, HashMap};

use crate::condition::Condition;
use crate::term::Term;

#[derive(Debug, Default)]
pub struct Waypoints {
    conditions: HashMap<Term, Condition>,
    /// Condition → the waypoint terms it resolves. Several waypoints may
    /// share one (interned) condition.
    inverse: HashMap<Condition, Vec<Term>>,
}

impl Waypoints {
    pub fn new(waypoints: impl IntoIterator<Item = (Term, Condition)>) -> Waypoints {
        let mut out = Waypoints::default();
        for (term, condition) in waypoints {
            out.inverse
                .entry(condition.clone())
                .or_default()
                .push(term.clone());
            out.conditions.insert(term, condition);
        }
        out
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn contains(&self, term: &Term) -> bool {
        self.conditions.contains_key(term)
    }

    pub fn condition(&self, term: &Term) -> Option<&Condition> {
        self.conditions.get(term)
    }

    /// Waypoint terms resolved by exactly this (interned) condition.
    pub fn terms_for(&self, condition: &Condition) -> &[Term] {
        self.inverse
            .get(condition)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn conditions(&self) -> impl Iterator<Item = &Condition> {
        self.inverse.keys()
    }

    pub fn iter(&self) -> hash_map::Iter<'_, Term, Condition> {
        self.conditions.iter()
    }
}
