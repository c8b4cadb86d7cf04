//! Incremental reachability state over a loaded seed.
//!
//! A `State` answers "given everything acquired so far, what else is
//! reachable now?" and updates cheaply as acquisitions accumulate. Term
//! values only ever rise within a state lineage, so truth derived through
//! the graph is permanent and each update touches only what changed.
//!
//! Every real state carries a speculative twin (the "potential" state)
//! that additionally auto-acquires every reachable-but-unacquired check.
//! Its term values are the optimistic ceiling used to answer shop
//! affordability without mutating the real state.

use std::collections::HashSet;
use std::mem;
use std::sync::Arc;

use crate::condition::{Condition, Context};
use crate::context::{StateContext, TransitionPolicy};
use crate::graph::ConditionGraph;
use crate::item::ItemCheck;
use crate::term::Term;
use crate::term_map::{MutableTermMap, SumTermMap, TermMap};

#[derive(Clone)]
pub struct State {
    ctx: Arc<StateContext>,
    term_values: MutableTermMap,
    graph: ConditionGraph,
    /// Terms changed since the last normalize.
    dirty_terms: HashSet<Term>,
    obtains: HashSet<ItemCheck>,
    /// Reachable checks the user has not acquired.
    reachable_unacquired: HashSet<ItemCheck>,
    speculative: bool,
    potential: Option<Box<State>>,
}

impl State {
    /// Builds the initial state for a loaded seed: setters applied, start
    /// inventory acquired, and the fixpoint fully resolved.
    pub fn new(ctx: Arc<StateContext>) -> State {
        let mut state = State::new_inner(ctx, false);
        let start: Vec<ItemCheck> = state.ctx.checks().start_checks().cloned().collect();
        for check in &start {
            state.acquire_check(check);
        }
        state.normalize();
        state
    }

    fn new_inner(ctx: Arc<StateContext>, speculative: bool) -> State {
        let potential = if speculative {
            None
        } else {
            Some(Box::new(State::new_inner(Arc::clone(&ctx), true)))
        };

        let mut term_values = MutableTermMap::new();
        term_values.set(Term::always(), 1);
        for (t, v) in ctx.setters().iter() {
            term_values.set(t, *v);
        }

        let mut initially_true = Vec::new();
        let mut builder =
            ConditionGraph::builder(&term_values, ctx.notch_costs(), ctx.darkness());
        for c in ctx.waypoints().conditions().chain(ctx.checks().conditions()) {
            if builder.index(c) {
                initially_true.push(c.clone());
            }
        }
        let graph = builder.build();

        let mut state = State {
            ctx,
            term_values,
            graph,
            dirty_terms: HashSet::new(),
            obtains: HashSet::new(),
            reachable_unacquired: HashSet::new(),
            speculative,
            potential,
        };

        // Conditions true at build time never surface through graph updates;
        // resolve their consequences once here.
        for c in initially_true {
            state.on_condition_resolved(&c);
        }
        state.normalize();
        state
    }

    // ── Mutation ────────────────────────────────────────────────────────

    /// Sets `term` to `value`. Values must not regress within a lineage.
    /// Consequences are deferred until [`State::normalize`].
    pub fn set(&mut self, term: &Term, value: i32) {
        let current = self.term_values.get(term);
        if value == current {
            return;
        }
        debug_assert!(value > current, "term values must not regress");
        self.term_values.set(term, value);
        self.dirty_terms.insert(term.clone());
        // The potential state's values are a ceiling over ours; only raise.
        if let Some(p) = &mut self.potential {
            if value > p.term_values.get(term) {
                p.set(term, value);
            }
        }
    }

    /// Records `check` as obtained and applies its item's effects.
    /// Idempotent. Consequences are deferred until [`State::normalize`].
    pub fn acquire_check(&mut self, check: &ItemCheck) {
        if !self.obtains.insert(check.clone()) {
            return;
        }
        self.reachable_unacquired.remove(check);
        check.item().effects().apply(
            self.ctx.notch_costs(),
            self.ctx.darkness(),
            &mut self.term_values,
            &mut self.dirty_terms,
        );
        if let Some(p) = &mut self.potential {
            p.acquire_check(check);
        }
    }

    /// Drives the fixpoint: graph updates from dirty terms, waypoint terms
    /// set from newly true conditions, newly unlocked checks recorded (or
    /// auto-acquired), until nothing changes. Then the potential state
    /// catches up.
    pub fn normalize(&mut self) {
        while !self.dirty_terms.is_empty() {
            let dirty = mem::take(&mut self.dirty_terms);
            let newly_true = self.graph.update(&self.term_values, &dirty);
            for c in newly_true {
                self.on_condition_resolved(&c);
            }
        }
        if let Some(mut p) = self.potential.take() {
            p.normalize();
            self.potential = Some(p);
        }
        if !self.speculative {
            log::debug!(
                "state normalized: {} obtained, {} reachable unacquired",
                self.obtains.len(),
                self.reachable_unacquired.len()
            );
        }
    }

    fn on_condition_resolved(&mut self, condition: &Condition) {
        let ctx = Arc::clone(&self.ctx);
        for t in ctx.waypoints().terms_for(condition) {
            if self.term_values.get(t) == 0 {
                self.set(t, 1);
            }
        }
        for check in ctx.checks().by_condition(condition) {
            self.on_check_unlocked(check);
        }
    }

    fn on_check_unlocked(&mut self, check: &ItemCheck) {
        if self.obtains.contains(check) {
            return;
        }
        if self.auto_acquires(check) {
            self.acquire_check(check);
        } else {
            self.reachable_unacquired.insert(check.clone());
            // Everything reachable counts toward the optimistic ceiling.
            if let Some(p) = &mut self.potential {
                p.acquire_check(check);
            }
        }
    }

    fn auto_acquires(&self, check: &ItemCheck) -> bool {
        if self.speculative {
            return true;
        }
        if check.is_transition() {
            return match self.ctx.transition_policy() {
                TransitionPolicy::None => false,
                TransitionPolicy::VanillaOnly => check.vanilla(),
                TransitionPolicy::All => true,
            };
        }
        check
            .item()
            .effect_terms()
            .any(|t| self.ctx.is_auto_acquire_term(t))
    }

    // ── Queries ─────────────────────────────────────────────────────────

    pub fn ctx(&self) -> &StateContext {
        &self.ctx
    }

    pub fn get(&self, term: &Term) -> i32 {
        self.term_values.get(term)
    }

    pub fn term_values(&self) -> &dyn TermMap {
        &self.term_values
    }

    /// Graph-derived truth. Only meaningful for conditions that entered the
    /// graph (the corpus of access and waypoint conditions); permanently
    /// true once true.
    pub fn test(&self, condition: &Condition) -> bool {
        self.graph.test(condition)
    }

    /// Direct evaluation against current values. Works for any condition,
    /// including the non-monotonic leaves the graph refuses.
    pub fn evaluate(&self, condition: &Condition) -> bool {
        condition.test(&Context::new(
            &self.term_values,
            self.ctx.notch_costs(),
            self.ctx.darkness(),
        ))
    }

    pub fn is_acquired(&self, check: &ItemCheck) -> bool {
        self.obtains.contains(check)
    }

    pub fn obtained(&self) -> impl Iterator<Item = &ItemCheck> {
        self.obtains.iter()
    }

    /// Checks that are reachable but not yet acquired.
    pub fn accessible(&self) -> impl Iterator<Item = &ItemCheck> {
        self.reachable_unacquired.iter()
    }

    /// Independent branch of this state. Conditions stay shared; every
    /// mutable table (values, graph, obtains, the potential twin) is
    /// duplicated.
    pub fn deep_copy(&self) -> State {
        self.clone()
    }

    /// The value view costs are answered against: the potential state's
    /// (optimistic ceiling) values plus the configured tolerances.
    pub fn purchase_term_values(&self) -> SumTermMap<'_> {
        let base: &dyn TermMap = match &self.potential {
            Some(p) => &p.term_values,
            None => &self.term_values,
        };
        SumTermMap::new(vec![base, self.ctx.tolerances()])
    }

    /// Whether every cost on `check` is payable under the purchase view.
    pub fn can_afford(&self, check: &ItemCheck) -> bool {
        check.costs().is_paid(&self.purchase_term_values())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::ItemChecks;
    use crate::cost::{Cost, Costs, NotchCosts};
    use crate::darkness::DarknessOverrides;
    use crate::item::{Item, ItemEffects, Location};
    use crate::term_map::ImmutableTermMap;
    use crate::waypoints::Waypoints;

    fn freeze(checks: ItemChecks, waypoints: Waypoints) -> Arc<StateContext> {
        Arc::new(StateContext::new(
            checks,
            waypoints,
            NotchCosts::empty(),
            DarknessOverrides::empty(),
            ImmutableTermMap::empty(),
        ))
    }

    fn simple_item(name: &str) -> Item {
        let term = Term::new(name);
        let effects = ItemEffects::simple(&term, 1);
        Item::new(term, effects)
    }

    #[test]
    fn start_inventory_unlocks_gated_checks() {
        let dash = Term::new("DASH");
        let mut checks = ItemChecks::new();
        checks.add_start(
            Location::new("Start", "Tutorial", Condition::always_true()),
            simple_item("DASH"),
            Costs::none(),
            true,
        );
        let ledge = checks.add(
            Location::new("Ledge", "Cliffs", Condition::nonzero(&dash)),
            simple_item("Wanderer_Journal"),
            Costs::none(),
            false,
        );

        let state = State::new(freeze(checks, Waypoints::default()));
        assert_eq!(state.get(&dash), 1);
        assert!(state.test(&Condition::nonzero(&dash)));
        assert!(state.accessible().any(|c| *c == ledge));
        assert!(!state.is_acquired(&ledge));
    }

    #[test]
    fn acquiring_moves_check_from_accessible_to_obtained() {
        let dash = Term::new("DASH");
        let mut checks = ItemChecks::new();
        checks.add_start(
            Location::new("Start", "Tutorial", Condition::always_true()),
            simple_item("DASH"),
            Costs::none(),
            true,
        );
        let ledge = checks.add(
            Location::new("Ledge", "Cliffs", Condition::nonzero(&dash)),
            simple_item("Wanderer_Journal"),
            Costs::none(),
            false,
        );

        let mut state = State::new(freeze(checks, Waypoints::default()));
        state.acquire_check(&ledge);
        state.normalize();
        assert!(state.is_acquired(&ledge));
        assert!(!state.accessible().any(|c| *c == ledge));
        assert_eq!(state.get(&Term::new("Wanderer_Journal")), 1);
    }

    #[test]
    fn waypoints_chain_through_the_fixpoint() {
        let dash = Term::new("DASH");
        let upper = Term::new("Upper_Town");
        let waypoints = Waypoints::new([(upper.clone(), Condition::nonzero(&dash))]);

        let mut checks = ItemChecks::new();
        let dash_check = checks.add(
            Location::new("Shelf", "Town", Condition::always_true()),
            simple_item("DASH"),
            Costs::none(),
            false,
        );
        let attic = checks.add(
            Location::new("Attic", "Upper_Town", Condition::nonzero(&upper)),
            simple_item("Simple_Key"),
            Costs::none(),
            false,
        );

        let mut state = State::new(freeze(checks, waypoints));
        assert_eq!(state.get(&upper), 0);
        assert!(!state.accessible().any(|c| *c == attic));

        state.acquire_check(&dash_check);
        state.normalize();
        assert_eq!(state.get(&upper), 1);
        assert!(state.accessible().any(|c| *c == attic));
    }

    #[test]
    fn replenishable_geo_auto_acquires() {
        let mut checks = ItemChecks::new();
        let farm = checks.add(
            Location::new("Arena", "Colosseum", Condition::always_true()),
            Item::new(
                Term::can_replenish_geo().clone(),
                ItemEffects::simple(Term::can_replenish_geo(), 1),
            ),
            Costs::none(),
            true,
        );

        let state = State::new(freeze(checks, Waypoints::default()));
        assert!(state.is_acquired(&farm));
        assert_eq!(state.get(Term::can_replenish_geo()), 1);
    }

    #[test]
    fn transition_policy_governs_auto_acquire() {
        let mut checks = ItemChecks::new();
        let vanilla = checks.add(
            Location::transition("Town[left1]", "Town", Condition::always_true()),
            Item::transition(Term::new("Crossroads[right1]")),
            Costs::none(),
            true,
        );
        let randomized = checks.add(
            Location::transition("Town[right1]", "Town", Condition::always_true()),
            Item::transition(Term::new("Cliffs[left1]")),
            Costs::none(),
            false,
        );

        // Default policy acquires vanilla transitions only.
        let state = State::new(freeze(checks, Waypoints::default()));
        assert!(state.is_acquired(&vanilla));
        assert!(!state.is_acquired(&randomized));
        assert!(state.accessible().any(|c| *c == randomized));
        assert_eq!(state.get(&Term::new("Crossroads[right1]")), 1);
    }

    #[test]
    fn transition_policy_all() {
        let mut checks = ItemChecks::new();
        let randomized = checks.add(
            Location::transition("Town[right1]", "Town", Condition::always_true()),
            Item::transition(Term::new("Cliffs[left1]")),
            Costs::none(),
            false,
        );

        let mut ctx = StateContext::new(
            checks,
            Waypoints::default(),
            NotchCosts::empty(),
            DarknessOverrides::empty(),
            ImmutableTermMap::empty(),
        );
        ctx.set_transition_policy(TransitionPolicy::All);
        let state = State::new(Arc::new(ctx));
        assert!(state.is_acquired(&randomized));
    }

    #[test]
    fn purchase_view_counts_reachable_unacquired_items() {
        let grubs = Term::grubs().clone();
        let mut checks = ItemChecks::new();
        for name in ["Grub_1", "Grub_2", "Grub_3"] {
            checks.add(
                Location::new(name, "Crossroads", Condition::always_true()),
                Item::new(grubs.clone(), ItemEffects::simple(&grubs, 1)),
                Costs::none(),
                false,
            );
        }
        let cheap = checks.add(
            Location::shop("Grubfather_1", "Crossroads_38", Condition::always_true()),
            simple_item("Mask_Shard"),
            Costs::single(Cost::term(grubs.clone(), 3)),
            false,
        );
        let dear = checks.add(
            Location::shop("Grubfather_2", "Crossroads_38", Condition::always_true()),
            simple_item("Pale_Ore"),
            Costs::single(Cost::term(grubs.clone(), 4)),
            false,
        );

        let state = State::new(freeze(checks, Waypoints::default()));
        // Nothing acquired for real, but three grubs are in reach.
        assert_eq!(state.get(&grubs), 0);
        assert_eq!(state.purchase_term_values().get(&grubs), 3);
        assert!(state.can_afford(&cheap));
        assert!(!state.can_afford(&dear));
    }

    #[test]
    fn tolerances_extend_the_purchase_view() {
        let grubs = Term::grubs().clone();
        let mut checks = ItemChecks::new();
        checks.add(
            Location::new("Grub_1", "Crossroads", Condition::always_true()),
            Item::new(grubs.clone(), ItemEffects::simple(&grubs, 1)),
            Costs::none(),
            false,
        );
        let slot = checks.add(
            Location::shop("Grubfather_1", "Crossroads_38", Condition::always_true()),
            simple_item("Mask_Shard"),
            Costs::single(Cost::term(grubs.clone(), 2)),
            false,
        );

        let mut ctx = StateContext::new(
            checks,
            Waypoints::default(),
            NotchCosts::empty(),
            DarknessOverrides::empty(),
            ImmutableTermMap::empty(),
        );
        ctx.set_tolerances(ImmutableTermMap::of([(grubs.clone(), 1)]));
        let state = State::new(Arc::new(ctx));
        assert_eq!(state.purchase_term_values().get(&grubs), 2);
        assert!(state.can_afford(&slot));
    }

    #[test]
    fn geo_costs_need_replenishable_geo_in_reach() {
        let mut checks = ItemChecks::new();
        let slot = checks.add(
            Location::shop("Sly_1", "Town", Condition::always_true()),
            simple_item("Lumafly_Lantern"),
            Costs::single(Cost::geo(1800)),
            false,
        );
        let ctx = freeze(checks, Waypoints::default());
        let state = State::new(Arc::clone(&ctx));
        assert!(!state.can_afford(&slot));

        let mut checks = ItemChecks::new();
        let slot = checks.add(
            Location::shop("Sly_1", "Town", Condition::always_true()),
            simple_item("Lumafly_Lantern"),
            Costs::single(Cost::geo(1800)),
            false,
        );
        checks.add(
            Location::new("Arena", "Colosseum", Condition::always_true()),
            Item::new(
                Term::can_replenish_geo().clone(),
                ItemEffects::simple(Term::can_replenish_geo(), 1),
            ),
            Costs::none(),
            true,
        );
        let state = State::new(freeze(checks, Waypoints::default()));
        assert!(state.can_afford(&slot));
    }

    #[test]
    fn deep_copy_branches_independently() {
        let dash = Term::new("DASH");
        let mut checks = ItemChecks::new();
        let dash_check = checks.add(
            Location::new("Shelf", "Town", Condition::always_true()),
            simple_item("DASH"),
            Costs::none(),
            false,
        );
        let ledge = checks.add(
            Location::new("Ledge", "Cliffs", Condition::nonzero(&dash)),
            simple_item("Wanderer_Journal"),
            Costs::none(),
            false,
        );

        let base = State::new(freeze(checks, Waypoints::default()));
        let mut branch = base.deep_copy();
        branch.acquire_check(&dash_check);
        branch.normalize();

        assert!(branch.accessible().any(|c| *c == ledge));
        assert!(!base.accessible().any(|c| *c == ledge));
        assert_eq!(base.get(&dash), 0);
    }

    #[test]
    fn direct_set_feeds_the_fixpoint() {
        let essence = Term::essence().clone();
        let mut checks = ItemChecks::new();
        let tree = checks.add(
            Location::new(
                "Dream_Tree",
                "RestingGrounds",
                Condition::greater_than(&essence, 99),
            ),
            simple_item("Dream_Gate"),
            Costs::none(),
            false,
        );

        let mut state = State::new(freeze(checks, Waypoints::default()));
        state.set(&essence, 50);
        state.normalize();
        assert!(!state.accessible().any(|c| *c == tree));
        state.set(&essence, 100);
        state.normalize();
        assert!(state.accessible().any(|c| *c == tree));
    }

    #[test]
    fn evaluate_handles_non_monotonic_leaves() {
        let mut checks = ItemChecks::new();
        checks.add(
            Location::new("Bench", "Town", Condition::always_true()),
            simple_item("CHARMS"),
            Costs::none(),
            true,
        );
        let mut state = State::new(freeze(checks, Waypoints::default()));
        let few = Condition::less_than(Term::essence(), 100);
        assert!(state.evaluate(&few));
        state.set(Term::essence(), 200);
        state.normalize();
        assert!(!state.evaluate(&few));
    }
}
