//! Items, locations and the checks that place one at the other.
//!
//! An `ItemCheck` is a single placement in the loaded seed: an item at a
//! location, optionally behind costs. Checks compare by identity, not
//! value — two shop slots holding the same item must stay distinguishable.

use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::condition::{Condition, Context};
use crate::cost::{Costs, NotchCosts};
use crate::darkness::DarknessOverrides;
use crate::term::Term;
use crate::term_map::{ImmutableTermMap, MutableTermMap, TermMap};

/// Condition-gated term deltas with per-term caps.
///
/// An effect condition selects between a true-branch and a false-branch
/// delta map (most items are unconditional: gate TRUE, empty false branch).
/// Where a cap is declared for a term, applications clamp to it:
/// `new = min(current + delta, cap)`.
#[derive(Debug, Clone)]
pub struct ItemEffects {
    condition: Condition,
    true_effects: ImmutableTermMap,
    false_effects: ImmutableTermMap,
    caps: ImmutableTermMap,
}

impl ItemEffects {
    pub fn new(
        condition: Condition,
        true_effects: ImmutableTermMap,
        false_effects: ImmutableTermMap,
        caps: ImmutableTermMap,
    ) -> ItemEffects {
        ItemEffects {
            condition,
            true_effects,
            false_effects,
            caps,
        }
    }

    /// Unconditional single-term effect with no cap.
    pub fn simple(term: &Term, value: i32) -> ItemEffects {
        ItemEffects {
            condition: Condition::always_true(),
            true_effects: ImmutableTermMap::of([(term.clone(), value)]),
            false_effects: ImmutableTermMap::empty(),
            caps: ImmutableTermMap::empty(),
        }
    }

    /// Unconditional single-term effect clamped at `cap`.
    pub fn capped(term: &Term, value: i32, cap: i32) -> ItemEffects {
        ItemEffects {
            condition: Condition::always_true(),
            true_effects: ImmutableTermMap::of([(term.clone(), value)]),
            false_effects: ImmutableTermMap::empty(),
            caps: ImmutableTermMap::of([(term.clone(), cap)]),
        }
    }

    pub fn has_effect_term(&self, term: &Term) -> bool {
        self.true_effects.get(term) + self.false_effects.get(term) > 0
    }

    pub fn effect_value(&self, term: &Term) -> i32 {
        self.true_effects.get(term)
    }

    pub fn effect_terms(&self) -> impl Iterator<Item = &Term> {
        let mut seen = HashSet::new();
        self.true_effects
            .iter()
            .chain(self.false_effects.iter())
            .map(|(t, _)| t)
            .filter(move |t| seen.insert((*t).clone()))
    }

    /// Applies this effect to `values`, recording every touched term in
    /// `dirty_terms`.
    ///
    /// The gate is evaluated directly — effect conditions do not hold to
    /// the false→true paradigm, so they never go through a graph.
    pub fn apply(
        &self,
        notch_costs: &NotchCosts,
        darkness: &DarknessOverrides,
        values: &mut MutableTermMap,
        dirty_terms: &mut HashSet<Term>,
    ) {
        let branch = self
            .condition
            .test(&Context::new(values, notch_costs, darkness));
        let effects = if branch {
            &self.true_effects
        } else {
            &self.false_effects
        };

        for (t, delta) in effects.iter() {
            let cap = if self.caps.contains(t) {
                self.caps.get(t)
            } else {
                i32::MAX
            };
            let new_val = (values.get(t) + delta).min(cap);
            values.set(t, new_val);
            dirty_terms.insert(t.clone());
        }
    }
}

/// An item: a named carrier of effects, possibly a transition target.
#[derive(Debug, Clone)]
pub struct Item {
    term: Term,
    pool: Option<String>,
    transition: bool,
    effects: ItemEffects,
}

impl Item {
    pub fn new(term: Term, effects: ItemEffects) -> Item {
        Item {
            term,
            pool: None,
            transition: false,
            effects,
        }
    }

    pub fn with_pool(term: Term, pool: &str, effects: ItemEffects) -> Item {
        Item {
            term,
            pool: Some(pool.to_string()),
            transition: false,
            effects,
        }
    }

    /// A transition target: obtaining it sets the target transition term.
    pub fn transition(term: Term) -> Item {
        let effects = ItemEffects::simple(&term, 1);
        Item {
            term,
            pool: None,
            transition: true,
            effects,
        }
    }

    pub fn term(&self) -> &Term {
        &self.term
    }

    pub fn pool(&self) -> Option<&str> {
        self.pool.as_deref()
    }

    pub fn is_transition(&self) -> bool {
        self.transition
    }

    pub fn effects(&self) -> &ItemEffects {
        &self.effects
    }

    pub fn has_effect_term(&self, term: &Term) -> bool {
        self.effects.has_effect_term(term)
    }

    pub fn effect_value(&self, term: &Term) -> i32 {
        self.effects.effect_value(term)
    }

    pub fn effect_terms(&self) -> impl Iterator<Item = &Term> {
        self.effects.effect_terms()
    }
}

/// A check location: where an item can be found, behind an access
/// condition.
#[derive(Debug, Clone)]
pub struct Location {
    name: String,
    scene: String,
    access: Condition,
    shop: bool,
    transition: bool,
}

impl Location {
    pub fn new(name: &str, scene: &str, access: Condition) -> Location {
        Location {
            name: name.to_string(),
            scene: scene.to_string(),
            access,
            shop: false,
            transition: false,
        }
    }

    pub fn shop(name: &str, scene: &str, access: Condition) -> Location {
        Location {
            shop: true,
            ..Location::new(name, scene, access)
        }
    }

    pub fn transition(name: &str, scene: &str, access: Condition) -> Location {
        Location {
            transition: true,
            ..Location::new(name, scene, access)
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn scene(&self) -> &str {
        &self.scene
    }

    pub fn access_condition(&self) -> &Condition {
        &self.access
    }

    pub fn is_shop(&self) -> bool {
        self.shop
    }

    pub fn is_transition(&self) -> bool {
        self.transition
    }
}

/// Opaque check id, unique within one loaded seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CheckId(pub u32);

impl fmt::Display for CheckId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug)]
struct CheckData {
    id: CheckId,
    location: Location,
    item: Item,
    costs: Costs,
    vanilla: bool,
}

/// A single placement: `item` at `location` behind `costs`.
///
/// Cloning shares the underlying data; equality and hashing are by
/// identity.
#[derive(Clone)]
pub struct ItemCheck {
    data: Arc<CheckData>,
}

impl ItemCheck {
    pub(crate) fn new(
        id: CheckId,
        location: Location,
        item: Item,
        costs: Costs,
        vanilla: bool,
    ) -> ItemCheck {
        ItemCheck {
            data: Arc::new(CheckData {
                id,
                location,
                item,
                costs,
                vanilla,
            }),
        }
    }

    pub fn id(&self) -> CheckId {
        self.data.id
    }

    pub fn location(&self) -> &Location {
        &self.data.location
    }

    pub fn item(&self) -> &Item {
        &self.data.item
    }

    pub fn costs(&self) -> &Costs {
        &self.data.costs
    }

    pub fn vanilla(&self) -> bool {
        self.data.vanilla
    }

    pub fn is_transition(&self) -> bool {
        self.data.location.is_transition()
    }

    pub fn condition(&self) -> &Condition {
        self.data.location.access_condition()
    }
}

impl PartialEq for ItemCheck {
    fn eq(&self, other: &ItemCheck) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }
}

impl Eq for ItemCheck {}

impl Hash for ItemCheck {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (Arc::as_ptr(&self.data) as usize).hash(state);
    }
}

impl fmt::Debug for ItemCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ItemCheck[{} {} @ {}]",
            self.id(),
            self.item().term(),
            self.location().name()
        )
    }
}
