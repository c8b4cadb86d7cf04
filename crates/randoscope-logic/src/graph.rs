//! Incremental true/false propagation over a corpus of conditions.
//!
//! A `ConditionGraph` is a mutable record of condition evaluations, updated
//! incrementally. It assumes conditions only transition false → true and
//! term values only increase: instead of re-testing the whole corpus after
//! each term change, it watches only the leaves that could newly resolve
//! and propagates resolution upward through the (interning-shared)
//! dependency DAG.

use std::collections::HashSet;

use crate::bi_multimap::BiMultimap;
use crate::condition::{Condition, Context};
use crate::cost::NotchCosts;
use crate::darkness::DarknessOverrides;
use crate::index::TermConditionIndex;
use crate::term::Term;
use crate::term_map::TermMap;

#[derive(Debug, Clone)]
pub struct ConditionGraph {
    /// Every condition known to be true, permanently.
    true_conditions: HashSet<Condition>,
    /// Outstanding "parent depends on operand" edges; only false
    /// conditions appear here.
    children: BiMultimap<Condition, Condition>,
    /// Leaf watches for which false conditions remain.
    index: TermConditionIndex,
}

impl ConditionGraph {
    pub fn builder<'a>(
        values: &'a dyn TermMap,
        notch_costs: &'a NotchCosts,
        darkness: &'a DarknessOverrides,
    ) -> Builder<'a> {
        Builder {
            values,
            notch_costs,
            darkness,
            indexed: HashSet::new(),
            true_conditions: HashSet::new(),
            children: BiMultimap::new(),
            index: TermConditionIndex::new(),
        }
    }

    /// Membership test against the permanent true-set.
    pub fn test(&self, condition: &Condition) -> bool {
        self.true_conditions.contains(condition)
    }

    /// Independent copy. Conditions themselves are immutable and shared;
    /// the mutable true-set, edges and watch index are duplicated.
    pub fn deep_copy(&self) -> ConditionGraph {
        self.clone()
    }

    /// Re-derives truth after the given terms changed. Returns exactly the
    /// conditions that were false before this call and true after.
    pub fn update(&mut self, values: &dyn TermMap, dirty_terms: &HashSet<Term>) -> HashSet<Condition> {
        // Leaf watches whose threshold is now satisfied are immediately true.
        let mut updates = HashSet::new();
        for t in dirty_terms {
            updates.extend(self.index.remove_term_index(t, values.get(t)));
        }

        // Breadth-first propagation through the outstanding edges.
        let mut queue: Vec<Condition> = updates.iter().cloned().collect();
        let mut new_updates: HashSet<Condition> = HashSet::new();
        while !queue.is_empty() {
            let mut next = HashSet::new();
            for c in &queue {
                let parents: Vec<Condition> = self.children.get_key(c).cloned().collect();
                for parent in parents {
                    if parent.is_disjunction() {
                        // One true operand suffices; the siblings no longer
                        // matter.
                        next.insert(parent.clone());
                        self.children.remove_key(&parent);
                    } else {
                        self.children.remove(&parent, c);
                        if !self.children.contains_key(&parent) {
                            next.insert(parent);
                        }
                    }
                }
            }
            new_updates.extend(next.iter().cloned());
            queue = next.into_iter().collect();
        }

        // Conditions resolved through propagation may still hold leaf
        // watches (a disjunction sibling path); purge them.
        for c in &new_updates {
            self.index.remove_condition(c);
        }

        updates.extend(new_updates);
        self.true_conditions.extend(updates.iter().cloned());

        if !updates.is_empty() {
            log::trace!(
                "graph update: {} dirty terms -> {} newly true conditions",
                dirty_terms.len(),
                updates.len()
            );
        }
        updates
    }
}

/// Accumulates the true-set, dependency edges and leaf watches for a corpus
/// of conditions, evaluated against a fixed initial context.
pub struct Builder<'a> {
    values: &'a dyn TermMap,
    notch_costs: &'a NotchCosts,
    darkness: &'a DarknessOverrides,

    indexed: HashSet<Condition>,
    true_conditions: HashSet<Condition>,
    children: BiMultimap<Condition, Condition>,
    index: TermConditionIndex,
}

impl<'a> Builder<'a> {
    /// Indexes `condition` (recursively) and returns its current truth.
    /// Each distinct condition is evaluated directly exactly once; a
    /// condition that tests true is recorded permanently true and never
    /// registered for watching.
    pub fn index(&mut self, condition: &Condition) -> bool {
        if self.indexed.insert(condition.clone()) {
            let ctx = Context::new(self.values, self.notch_costs, self.darkness);
            if condition.test(&ctx) {
                self.true_conditions.insert(condition.clone());
                true
            } else {
                condition.index_into(self);
                false
            }
        } else {
            self.true_conditions.contains(condition)
        }
    }

    pub fn build(self) -> ConditionGraph {
        ConditionGraph {
            true_conditions: self.true_conditions,
            children: self.children,
            index: self.index,
        }
    }

    pub(crate) fn notch_costs(&self) -> &NotchCosts {
        self.notch_costs
    }

    /// Registers a one-shot leaf watch: `condition` becomes true once
    /// `term` reaches `threshold`.
    pub(crate) fn watch_term(&mut self, term: &Term, threshold: i32, condition: &Condition) {
        self.index.put(term, threshold, condition);
    }

    /// Indexes `child` and, unless it is already true, records an
    /// outstanding dependency edge from `parent`.
    pub(crate) fn index_child(&mut self, parent: &Condition, child: &Condition) -> bool {
        let child_true = self.index(child);
        if !child_true {
            self.children.put(parent.clone(), child.clone());
        }
        child_true
    }

    /// Records a dependency edge unconditionally (disjunction operands).
    pub(crate) fn add_dependency(&mut self, parent: &Condition, child: &Condition) {
        self.children.put(parent.clone(), child.clone());
    }
}
