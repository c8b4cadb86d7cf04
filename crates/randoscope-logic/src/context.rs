//! Immutable per-seed context shared by every state branch.
//!
//! `StateContext` bundles everything fixed once a seed is loaded: the check
//! registry, waypoints, cost tables, starting term values and the policy
//! knobs. States hold it behind an `Arc`, so branching a state never copies
//! any of it.

use std::collections::HashSet;

use crate::checks::ItemChecks;
use crate::cost::NotchCosts;
use crate::darkness::DarknessOverrides;
use crate::term::Term;
use crate::term_map::ImmutableTermMap;
use crate::waypoints::Waypoints;

/// Which reachable transition checks are acquired automatically during the
/// fixpoint, without an explicit user action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransitionPolicy {
    /// Transitions behave like ordinary checks.
    None,
    /// Only vanilla (unrandomized) transitions auto-acquire.
    #[default]
    VanillaOnly,
    /// Every reachable transition auto-acquires.
    All,
}

#[derive(Debug)]
pub struct StateContext {
    checks: ItemChecks,
    waypoints: Waypoints,
    notch_costs: NotchCosts,
    darkness: DarknessOverrides,
    /// Term values set once at state creation (settings, starting stats).
    setters: ImmutableTermMap,
    /// Extra headroom granted to cost counters in the purchase view.
    tolerances: ImmutableTermMap,
    transition_policy: TransitionPolicy,
    /// Non-transition effect terms that auto-acquire their check on
    /// unlock.
    auto_acquire_terms: HashSet<Term>,
}

impl StateContext {
    pub fn new(
        checks: ItemChecks,
        waypoints: Waypoints,
        notch_costs: NotchCosts,
        darkness: DarknessOverrides,
        setters: ImmutableTermMap,
    ) -> StateContext {
        StateContext {
            checks,
            waypoints,
            notch_costs,
            darkness,
            setters,
            tolerances: ImmutableTermMap::empty(),
            transition_policy: TransitionPolicy::default(),
            auto_acquire_terms: HashSet::from([Term::can_replenish_geo().clone()]),
        }
    }

    pub fn checks(&self) -> &ItemChecks {
        &self.checks
    }

    pub fn waypoints(&self) -> &Waypoints {
        &self.waypoints
    }

    pub fn notch_costs(&self) -> &NotchCosts {
        &self.notch_costs
    }

    pub fn darkness(&self) -> &DarknessOverrides {
        &self.darkness
    }

    pub fn setters(&self) -> &ImmutableTermMap {
        &self.setters
    }

    pub fn tolerances(&self) -> &ImmutableTermMap {
        &self.tolerances
    }

    pub fn transition_policy(&self) -> TransitionPolicy {
        self.transition_policy
    }

    pub fn is_auto_acquire_term(&self, term: &Term) -> bool {
        self.auto_acquire_terms.contains(term)
    }

    // Configuration below happens between loading and the first
    // `State::new`; the context is frozen behind an Arc afterwards.

    pub fn set_transition_policy(&mut self, policy: TransitionPolicy) {
        self.transition_policy = policy;
    }

    pub fn set_tolerances(&mut self, tolerances: ImmutableTermMap) {
        self.tolerances = tolerances;
    }

    pub fn add_auto_acquire_term(&mut self, term: &Term) {
        self.auto_acquire_terms.insert(term.clone());
    }
}
