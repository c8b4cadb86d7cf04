//! The per-seed registry of item checks.
//!
//! Built once by the seed loader, then shared read-only across every state
//! branch. Keeps the inverse access-condition table the fixpoint driver
//! uses to resolve a newly-true condition to the checks it gates.

use std::collections::HashMap;

use crate::condition::Condition;
use crate::cost::Costs;
use crate::item::{CheckId, Item, ItemCheck, Location};

#[derive(Debug, Default)]
pub struct ItemChecks {
    by_id: HashMap<CheckId, ItemCheck>,
    /// Stable insertion order for iteration.
    order: Vec<ItemCheck>,
    /// Access condition → the checks it gates.
    by_condition: HashMap<Condition, Vec<ItemCheck>>,
    /// Granted when a run begins, before any logic is evaluated.
    start: Vec<ItemCheck>,
    next_id: u32,
}

impl ItemChecks {
    pub fn new() -> ItemChecks {
        ItemChecks::default()
    }

    /// Registers a new check and returns it. Ids are assigned in insertion
    /// order.
    pub fn add(&mut self, location: Location, item: Item, costs: Costs, vanilla: bool) -> ItemCheck {
        self.next_id += 1;
        let check = ItemCheck::new(CheckId(self.next_id), location, item, costs, vanilla);
        self.by_id.insert(check.id(), check.clone());
        self.by_condition
            .entry(check.condition().clone())
            .or_default()
            .push(check.clone());
        self.order.push(check.clone());
        check
    }

    /// Registers a check that is acquired automatically when a run begins
    /// (the seed's starting inventory).
    pub fn add_start(
        &mut self,
        location: Location,
        item: Item,
        costs: Costs,
        vanilla: bool,
    ) -> ItemCheck {
        let check = self.add(location, item, costs, vanilla);
        self.start.push(check.clone());
        check
    }

    pub fn get(&self, id: CheckId) -> Option<&ItemCheck> {
        self.by_id.get(&id)
    }

    pub fn all(&self) -> impl Iterator<Item = &ItemCheck> {
        self.order.iter()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn start_checks(&self) -> impl Iterator<Item = &ItemCheck> {
        self.start.iter()
    }

    /// Checks gated by exactly this (interned) access condition.
    pub fn by_condition(&self, condition: &Condition) -> &[ItemCheck] {
        self.by_condition
            .get(condition)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// The distinct access conditions across the registry.
    pub fn conditions(&self) -> impl Iterator<Item = &Condition> {
        self.by_condition.keys()
    }
}
