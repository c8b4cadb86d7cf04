//! Read/write views over term values.
//!
//! Three variants share the [`TermMap`] read contract:
//! [`MutableTermMap`] (sparse, auto-compacting), [`ImmutableTermMap`]
//! (frozen snapshot), and [`SumTermMap`] (an uncached summing view over
//! several underlying maps, used to overlay tolerance adjustments without
//! copying).

use std::collections::hash_map;
use std::collections::{HashMap, HashSet};

use crate::term::Term;

/// Read contract for term values: unseen terms read as 0, and `terms()` is
/// the set of terms whose value is nonzero.
pub trait TermMap {
    fn get(&self, term: &Term) -> i32;

    fn terms(&self) -> HashSet<Term>;
}

/// Sparse mutable map. Invariant: stored values are never literally 0 —
/// `set(t, 0)` removes the entry.
#[derive(Debug, Clone, Default)]
pub struct MutableTermMap {
    values: HashMap<Term, i32>,
}

impl MutableTermMap {
    pub fn new() -> MutableTermMap {
        MutableTermMap::default()
    }

    pub fn set(&mut self, term: &Term, value: i32) {
        if value == 0 {
            self.values.remove(term);
        } else {
            self.values.insert(term.clone(), value);
        }
    }

    pub fn add(&mut self, term: &Term, delta: i32) {
        self.set(term, self.get(term) + delta);
    }

    /// Adds every entry of `other` into this map.
    pub fn add_all(&mut self, other: &dyn TermMap) {
        for t in other.terms() {
            let v = other.get(&t);
            self.set(&t, self.get(&t) + v);
        }
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> hash_map::Iter<'_, Term, i32> {
        self.values.iter()
    }
}

impl TermMap for MutableTermMap {
    fn get(&self, term: &Term) -> i32 {
        self.values.get(term).copied().unwrap_or(0)
    }

    fn terms(&self) -> HashSet<Term> {
        self.values.keys().cloned().collect()
    }
}

/// Frozen snapshot of term values.
#[derive(Debug, Clone, Default)]
pub struct ImmutableTermMap {
    values: HashMap<Term, i32>,
}

impl ImmutableTermMap {
    pub fn empty() -> ImmutableTermMap {
        ImmutableTermMap::default()
    }

    /// One-time copy of `map`; entries with value 0 are dropped.
    pub fn copy_of(map: &dyn TermMap) -> ImmutableTermMap {
        let mut values = HashMap::new();
        for t in map.terms() {
            let v = map.get(&t);
            if v != 0 {
                values.insert(t, v);
            }
        }
        ImmutableTermMap { values }
    }

    pub fn of(entries: impl IntoIterator<Item = (Term, i32)>) -> ImmutableTermMap {
        let values = entries.into_iter().filter(|(_, v)| *v != 0).collect();
        ImmutableTermMap { values }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn contains(&self, term: &Term) -> bool {
        self.values.contains_key(term)
    }

    pub fn iter(&self) -> hash_map::Iter<'_, Term, i32> {
        self.values.iter()
    }
}

impl TermMap for ImmutableTermMap {
    fn get(&self, term: &Term) -> i32 {
        self.values.get(term).copied().unwrap_or(0)
    }

    fn terms(&self) -> HashSet<Term> {
        self.values.keys().cloned().collect()
    }
}

/// A view of multiple term maps added together. Nothing is cached; every
/// read recomputes from the constituents.
pub struct SumTermMap<'a> {
    addends: Vec<&'a dyn TermMap>,
}

impl<'a> SumTermMap<'a> {
    pub fn new(addends: Vec<&'a dyn TermMap>) -> SumTermMap<'a> {
        SumTermMap { addends }
    }
}

impl TermMap for SumTermMap<'_> {
    fn get(&self, term: &Term) -> i32 {
        self.addends.iter().map(|m| m.get(term)).sum()
    }

    fn terms(&self) -> HashSet<Term> {
        self.addends
            .iter()
            .flat_map(|m| m.terms())
            .filter(|t| self.get(t) != 0)
            .collect()
    }
}
