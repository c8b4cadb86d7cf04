//! Per-term sorted threshold watch list.
//!
//! Each entry is a one-shot watch: "once `term` reaches `threshold`, this
//! condition is true". Watches fire exactly once — `remove_term_index`
//! removes everything it returns.

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::bi_multimap::BiMultimap;
use crate::condition::Condition;
use crate::term::Term;

#[derive(Debug, Clone, Default)]
pub struct TermConditionIndex {
    /// Ascending distinct watch thresholds per term.
    thresholds: HashMap<Term, BTreeSet<i32>>,
    /// (term, threshold) → watched conditions.
    conditions: BiMultimap<(Term, i32), Condition>,
}

impl TermConditionIndex {
    pub fn new() -> TermConditionIndex {
        TermConditionIndex::default()
    }

    pub fn put(&mut self, term: &Term, threshold: i32, condition: &Condition) {
        self.thresholds
            .entry(term.clone())
            .or_default()
            .insert(threshold);
        self.conditions
            .put((term.clone(), threshold), condition.clone());
    }

    /// Atomically removes and returns every watch on `term` whose threshold
    /// is ≤ `value`.
    pub fn remove_term_index(&mut self, term: &Term, value: i32) -> HashSet<Condition> {
        let mut fired = HashSet::new();
        let Some(set) = self.thresholds.get_mut(term) else {
            return fired;
        };

        let satisfied: Vec<i32> = set.range(..=value).copied().collect();
        for threshold in satisfied {
            set.remove(&threshold);
            fired.extend(self.conditions.remove_key(&(term.clone(), threshold)));
        }
        if set.is_empty() {
            self.thresholds.remove(term);
        }
        fired
    }

    /// Removes every remaining watch for `condition`, regardless of term.
    /// Used when a condition resolves through another path (e.g. as a
    /// disjunction sibling).
    pub fn remove_condition(&mut self, condition: &Condition) {
        // Only watch slots no other condition holds come back; a threshold
        // still watched by someone else stays in the sorted set.
        for (term, threshold) in self.conditions.remove_value(condition) {
            if let Some(set) = self.thresholds.get_mut(&term) {
                set.remove(&threshold);
                if set.is_empty() {
                    self.thresholds.remove(&term);
                }
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.thresholds.is_empty()
    }
}
