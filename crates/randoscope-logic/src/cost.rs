//! Check costs and the per-run charm notch cost table.
//!
//! Costs gate *purchasing* a check, not reaching it — affordability is
//! answered against the speculative purchase view
//! ([`crate::state::State::purchase_term_values`]), never against logical
//! access.

use serde::{Deserialize, Serialize};

use crate::term::Term;
use crate::term_map::TermMap;

/// A single cost attached to a check.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cost {
    /// Spendable currency. Payable as long as currency can be replenished.
    Geo { amount: i32 },
    /// Cumulative counter threshold (collectibles, owned charms, ...).
    Term { term: Term, threshold: i32 },
}

impl Cost {
    pub fn geo(amount: i32) -> Cost {
        Cost::Geo { amount }
    }

    pub fn term(term: Term, threshold: i32) -> Cost {
        Cost::Term { term, threshold }
    }

    pub fn geo_cost(&self) -> i32 {
        match self {
            Cost::Geo { amount } => *amount,
            Cost::Term { .. } => 0,
        }
    }

    pub fn term_cost(&self, term: &Term) -> i32 {
        match self {
            Cost::Geo { .. } => 0,
            Cost::Term { term: t, threshold } => {
                if t == term {
                    *threshold
                } else {
                    0
                }
            }
        }
    }

    /// Whether this cost is payable under `values`.
    ///
    /// A geo cost is payable once geo can be replenished — the exact amount
    /// is never a logical barrier. A term cost needs the counter at or above
    /// the threshold.
    pub fn is_paid(&self, values: &dyn TermMap) -> bool {
        match self {
            Cost::Geo { .. } => values.get(Term::can_replenish_geo()) > 0,
            Cost::Term { term, threshold } => values.get(term) >= *threshold,
        }
    }

    pub fn debug_string(&self) -> String {
        match self {
            Cost::Geo { amount } => format!("{amount} geo"),
            Cost::Term { term, threshold } => {
                format!("{} {}", threshold, term.name().to_lowercase())
            }
        }
    }
}

/// The full cost set of a check. Empty means free.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Costs {
    costs: Vec<Cost>,
}

impl Costs {
    pub fn none() -> Costs {
        Costs::default()
    }

    pub fn of(costs: impl IntoIterator<Item = Cost>) -> Costs {
        let mut out: Vec<Cost> = Vec::new();
        for c in costs {
            if !out.contains(&c) {
                out.push(c);
            }
        }
        Costs { costs: out }
    }

    pub fn single(cost: Cost) -> Costs {
        Costs { costs: vec![cost] }
    }

    pub fn is_none(&self) -> bool {
        self.costs.is_empty()
    }

    pub fn costs(&self) -> &[Cost] {
        &self.costs
    }

    pub fn geo_cost(&self) -> i32 {
        self.costs.iter().map(Cost::geo_cost).sum()
    }

    pub fn term_cost(&self, term: &Term) -> i32 {
        self.costs.iter().map(|c| c.term_cost(term)).sum()
    }

    /// Whether every constituent cost is payable under `values`.
    pub fn is_paid(&self, values: &dyn TermMap) -> bool {
        self.costs.iter().all(|c| c.is_paid(values))
    }

    pub fn debug_string(&self) -> String {
        if self.costs.is_empty() {
            return String::new();
        }
        let parts: Vec<String> = self.costs.iter().map(Cost::debug_string).collect();
        format!("({})", parts.join(", "))
    }
}

/// Per-run notch cost of each charm, indexed by 1-based charm id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotchCosts {
    costs: Vec<i32>,
}

impl NotchCosts {
    pub fn new(costs: Vec<i32>) -> NotchCosts {
        NotchCosts { costs }
    }

    pub fn empty() -> NotchCosts {
        NotchCosts::default()
    }

    pub fn costs(&self) -> &[i32] {
        &self.costs
    }

    pub fn set_costs(&mut self, costs: Vec<i32>) {
        self.costs = costs;
    }

    /// Notch cost of `charm_id` (1-based). Unknown ids cost 0.
    pub fn notch_cost(&self, charm_id: u32) -> i32 {
        charm_id
            .checked_sub(1)
            .and_then(|i| self.costs.get(i as usize))
            .copied()
            .unwrap_or(0)
    }
}
