//! Boolean reachability expressions over terms.
//!
//! Conditions are immutable and interned: structurally identical expressions
//! are canonicalized to one shared instance, so equality and hashing after
//! construction are pointer-cheap, and the incremental graph can key its
//! dependency tables directly on `Condition` handles.
//!
//! To re-evaluate a large corpus efficiently as term values rise, use a
//! [`crate::graph::ConditionGraph`] instead of calling [`Condition::test`]
//! in a loop. Greater-than and charm-budget leaves are watched by the graph;
//! constants, equal-to and darkness leaves are fixed per run and resolve at
//! build time only; less-than leaves can flip true→false and must only ever
//! be evaluated directly.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Mutex, OnceLock, Weak};

use crate::cost::NotchCosts;
use crate::darkness::DarknessOverrides;
use crate::graph;
use crate::term::Term;
use crate::term_map::TermMap;

/// Evaluation context for direct condition tests: current term values plus
/// the run's fixed charm notch costs and darkness table.
pub struct Context<'a> {
    values: &'a dyn TermMap,
    notch_costs: &'a NotchCosts,
    darkness: &'a DarknessOverrides,
}

impl<'a> Context<'a> {
    pub fn new(
        values: &'a dyn TermMap,
        notch_costs: &'a NotchCosts,
        darkness: &'a DarknessOverrides,
    ) -> Context<'a> {
        Context {
            values,
            notch_costs,
            darkness,
        }
    }

    pub fn values(&self) -> &dyn TermMap {
        self.values
    }

    pub fn notch_costs(&self) -> &NotchCosts {
        self.notch_costs
    }

    pub fn darkness(&self) -> &DarknessOverrides {
        self.darkness
    }

    pub fn get(&self, term: &Term) -> i32 {
        self.values.get(term)
    }
}

#[derive(Debug)]
pub(crate) enum ConditionKind {
    Constant(bool),
    /// True iff `term > threshold`. The only generic leaf that is safe to
    /// index: term values never decrease.
    GreaterThan { term: Term, threshold: i32 },
    /// True iff `term < threshold`. Can flip true→false as values rise;
    /// never indexed.
    LessThan { term: Term, threshold: i32 },
    /// True iff `term == value`. Represents a fixed initial-state check;
    /// always evaluated directly, never cached in the graph.
    EqualTo { term: Term, value: i32 },
    /// All operands true. Always ≥2 distinct operands.
    Conjunction(Vec<Condition>),
    /// Any operand true. Always ≥2 distinct operands.
    Disjunction(Vec<Condition>),
    /// Scene darkness strictly below `level`. Fixed per run; resolves at
    /// build time, never watched.
    Darkness { scene: String, level: i32 },
    /// Charm notch budget check: NOTCHES exceeds the summed notch cost of
    /// the charm set, discounted by 1 (safe equip) or by the single largest
    /// cost (overcharmed equip). Monotonic in NOTCHES for a fixed cost
    /// table, so indexable.
    CharmBudget { safe: bool, charm_ids: Vec<u32> },
}

#[derive(Debug)]
pub(crate) struct ConditionInner {
    hash: u64,
    kind: ConditionKind,
}

/// An interned boolean expression. Cloning is cheap; equality is pointer
/// identity (valid because structurally identical expressions intern to the
/// same instance).
#[derive(Clone)]
pub struct Condition {
    inner: Arc<ConditionInner>,
}

impl PartialEq for Condition {
    fn eq(&self, other: &Condition) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Condition {}

impl Hash for Condition {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.inner.hash);
    }
}

impl fmt::Debug for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Condition[{}]", self.debug_string())
    }
}

// ── Interner ────────────────────────────────────────────────────────────

struct Interner {
    buckets: HashMap<u64, Vec<Weak<ConditionInner>>>,
    inserts_since_sweep: usize,
}

/// Every this many inserts, the whole table drops evicted entries and the
/// buckets left holding none, so hashes that are never interned again do not
/// pin empty buckets forever.
const SWEEP_INTERVAL: usize = 256;

fn interner() -> &'static Mutex<Interner> {
    static INTERNER: OnceLock<Mutex<Interner>> = OnceLock::new();
    INTERNER.get_or_init(|| {
        Mutex::new(Interner {
            buckets: HashMap::new(),
            inserts_since_sweep: 0,
        })
    })
}

/// Canonical operand order for commutative nodes: by structural hash, then
/// by interned pointer. Stable within a process, which is all the graph
/// needs.
fn canonical_sort(operands: &mut [Condition]) {
    operands.sort_by(|a, b| {
        a.inner
            .hash
            .cmp(&b.inner.hash)
            .then_with(|| (Arc::as_ptr(&a.inner) as usize).cmp(&(Arc::as_ptr(&b.inner) as usize)))
    });
}

fn structural_hash(kind: &ConditionKind) -> u64 {
    let mut h = DefaultHasher::new();
    match kind {
        ConditionKind::Constant(v) => {
            0u8.hash(&mut h);
            v.hash(&mut h);
        }
        ConditionKind::GreaterThan { term, threshold } => {
            1u8.hash(&mut h);
            term.hash(&mut h);
            threshold.hash(&mut h);
        }
        ConditionKind::LessThan { term, threshold } => {
            2u8.hash(&mut h);
            term.hash(&mut h);
            threshold.hash(&mut h);
        }
        ConditionKind::EqualTo { term, value } => {
            3u8.hash(&mut h);
            term.hash(&mut h);
            value.hash(&mut h);
        }
        ConditionKind::Darkness { scene, level } => {
            4u8.hash(&mut h);
            scene.hash(&mut h);
            level.hash(&mut h);
        }
        ConditionKind::CharmBudget { safe, charm_ids } => {
            5u8.hash(&mut h);
            safe.hash(&mut h);
            charm_ids.hash(&mut h);
        }
        // Operand hashes combine order-independently; the operand list is
        // canonically sorted anyway, but the hash must not depend on it.
        ConditionKind::Conjunction(ops) => {
            6u8.hash(&mut h);
            h.write_u64(ops.iter().fold(0u64, |acc, c| acc.wrapping_add(c.inner.hash)));
        }
        ConditionKind::Disjunction(ops) => {
            7u8.hash(&mut h);
            h.write_u64(ops.iter().fold(0u64, |acc, c| acc.wrapping_add(c.inner.hash)));
        }
    }
    h.finish()
}

/// Structural equality between a candidate kind and an already-interned one.
/// Operand lists compare element-wise: both sides are canonically sorted and
/// their elements are interned, so pointer equality suffices.
fn structural_eq(a: &ConditionKind, b: &ConditionKind) -> bool {
    use ConditionKind::*;
    match (a, b) {
        (Constant(x), Constant(y)) => x == y,
        (
            GreaterThan {
                term: t1,
                threshold: n1,
            },
            GreaterThan {
                term: t2,
                threshold: n2,
            },
        ) => t1 == t2 && n1 == n2,
        (
            LessThan {
                term: t1,
                threshold: n1,
            },
            LessThan {
                term: t2,
                threshold: n2,
            },
        ) => t1 == t2 && n1 == n2,
        (EqualTo { term: t1, value: v1 }, EqualTo { term: t2, value: v2 }) => {
            t1 == t2 && v1 == v2
        }
        (
            Darkness {
                scene: s1,
                level: l1,
            },
            Darkness {
                scene: s2,
                level: l2,
            },
        ) => s1 == s2 && l1 == l2,
        (
            CharmBudget {
                safe: s1,
                charm_ids: c1,
            },
            CharmBudget {
                safe: s2,
                charm_ids: c2,
            },
        ) => s1 == s2 && c1 == c2,
        (Conjunction(o1), Conjunction(o2)) | (Disjunction(o1), Disjunction(o2)) => o1 == o2,
        _ => false,
    }
}

fn intern(kind: ConditionKind) -> Condition {
    let hash = structural_hash(&kind);

    // A panic can never leave the table logically inconsistent (inserts are
    // single operations), so recover from poisoning instead of propagating.
    let mut table = match interner().lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };

    table.inserts_since_sweep += 1;
    if table.inserts_since_sweep >= SWEEP_INTERVAL {
        table.inserts_since_sweep = 0;
        table.buckets.retain(|_, bucket| {
            bucket.retain(|w| w.strong_count() > 0);
            !bucket.is_empty()
        });
    }

    let bucket = table.buckets.entry(hash).or_default();
    bucket.retain(|w| w.strong_count() > 0);
    for weak in bucket.iter() {
        if let Some(existing) = weak.upgrade() {
            if structural_eq(&existing.kind, &kind) {
                return Condition { inner: existing };
            }
        }
    }

    let inner = Arc::new(ConditionInner { hash, kind });
    bucket.push(Arc::downgrade(&inner));
    Condition { inner }
}

// ── Construction ────────────────────────────────────────────────────────

impl Condition {
    pub fn always_true() -> Condition {
        intern(ConditionKind::Constant(true))
    }

    pub fn always_false() -> Condition {
        intern(ConditionKind::Constant(false))
    }

    /// `term > threshold`.
    pub fn greater_than(term: &Term, threshold: i32) -> Condition {
        intern(ConditionKind::GreaterThan {
            term: term.clone(),
            threshold,
        })
    }

    /// `term > 0` — the common "has this been obtained" test.
    pub fn nonzero(term: &Term) -> Condition {
        Condition::greater_than(term, 0)
    }

    /// `term < threshold`. Never safe to index.
    pub fn less_than(term: &Term, threshold: i32) -> Condition {
        intern(ConditionKind::LessThan {
            term: term.clone(),
            threshold,
        })
    }

    /// `term == value`. Assumed fixed for the run's lifetime.
    pub fn equal_to(term: &Term, value: i32) -> Condition {
        intern(ConditionKind::EqualTo {
            term: term.clone(),
            value,
        })
    }

    /// Scene darkness strictly below `level`.
    pub fn darkness(scene: &str, level: i32) -> Condition {
        intern(ConditionKind::Darkness {
            scene: scene.to_string(),
            level,
        })
    }

    /// Charm notch budget affordability for a charm set.
    pub fn charm_budget(safe: bool, charm_ids: impl IntoIterator<Item = u32>) -> Condition {
        let mut ids: Vec<u32> = charm_ids.into_iter().collect();
        ids.sort_unstable();
        ids.dedup();
        intern(ConditionKind::CharmBudget {
            safe,
            charm_ids: ids,
        })
    }

    pub fn and(c1: Condition, c2: Condition) -> Condition {
        Condition::and_all([c1, c2])
    }

    pub fn or(c1: Condition, c2: Condition) -> Condition {
        Condition::or_all([c1, c2])
    }

    /// Conjunction over a full operand set, flattening nested conjunctions
    /// and collapsing singletons.
    pub fn and_all(operands: impl IntoIterator<Item = Condition>) -> Condition {
        Condition::commutative(operands, false)
    }

    /// Disjunction over a full operand set, flattening nested disjunctions
    /// and collapsing singletons.
    pub fn or_all(operands: impl IntoIterator<Item = Condition>) -> Condition {
        Condition::commutative(operands, true)
    }

    fn commutative(operands: impl IntoIterator<Item = Condition>, disjunction: bool) -> Condition {
        let mut flat: Vec<Condition> = Vec::new();
        for c in operands {
            let same_variant = match &c.inner.kind {
                ConditionKind::Conjunction(ops) if !disjunction => Some(ops.clone()),
                ConditionKind::Disjunction(ops) if disjunction => Some(ops.clone()),
                _ => None,
            };
            match same_variant {
                Some(ops) => flat.extend(ops),
                None => flat.push(c),
            }
        }

        canonical_sort(&mut flat);
        flat.dedup();

        match flat.len() {
            0 => panic!("commutative condition requires at least one operand"),
            1 => flat.into_iter().next().unwrap(),
            _ => {
                if disjunction {
                    intern(ConditionKind::Disjunction(flat))
                } else {
                    intern(ConditionKind::Conjunction(flat))
                }
            }
        }
    }
}

// ── Evaluation & indexing ───────────────────────────────────────────────

impl Condition {
    /// Direct, stateless evaluation against `ctx`.
    pub fn test(&self, ctx: &Context<'_>) -> bool {
        match &self.inner.kind {
            ConditionKind::Constant(v) => *v,
            ConditionKind::GreaterThan { term, threshold } => ctx.get(term) > *threshold,
            ConditionKind::LessThan { term, threshold } => ctx.get(term) < *threshold,
            ConditionKind::EqualTo { term, value } => ctx.get(term) == *value,
            ConditionKind::Conjunction(ops) => ops.iter().all(|c| c.test(ctx)),
            ConditionKind::Disjunction(ops) => ops.iter().any(|c| c.test(ctx)),
            ConditionKind::Darkness { scene, level } => {
                ctx.darkness().darkness_level(scene) < *level
            }
            ConditionKind::CharmBudget { safe, charm_ids } => {
                ctx.get(Term::notches()) > charm_budget_cost(ctx.notch_costs(), *safe, charm_ids)
            }
        }
    }

    /// Registers this condition into a graph builder. Only ever invoked on
    /// a condition that currently evaluates false.
    ///
    /// # Panics
    ///
    /// Indexing a less-than leaf is a construction-time contract violation:
    /// its truth is not monotonic, so it can never live in the graph.
    pub(crate) fn index_into(&self, builder: &mut graph::Builder<'_>) {
        match &self.inner.kind {
            // Constants, equal-to and darkness leaves resolve entirely
            // through the builder's direct-test shortcut; their truth is
            // fixed per run, so a false one simply never fires. A
            // conjunction over one wedges permanently false; a disjunction
            // can still resolve through a sibling.
            ConditionKind::Constant(_) => {}
            ConditionKind::EqualTo { .. } => {}
            ConditionKind::Darkness { .. } => {}
            ConditionKind::GreaterThan { term, threshold } => {
                // Strict ">": the watch fires once the value reaches
                // threshold + 1.
                builder.watch_term(term, threshold + 1, self);
            }
            ConditionKind::CharmBudget { safe, charm_ids } => {
                let cost = charm_budget_cost(builder.notch_costs(), *safe, charm_ids);
                builder.watch_term(Term::notches(), cost + 1, self);
            }
            ConditionKind::Conjunction(ops) => {
                for c in ops {
                    builder.index_child(self, c);
                }
            }
            ConditionKind::Disjunction(ops) => {
                // Edges are added regardless of each operand's truth: any
                // operand resolving later must be able to resolve us.
                for c in ops {
                    builder.index(c);
                    builder.add_dependency(self, c);
                }
            }
            ConditionKind::LessThan { .. } => {
                panic!("less-than conditions can flip true->false and must never be indexed")
            }
        }
    }

    pub fn is_conjunction(&self) -> bool {
        matches!(self.inner.kind, ConditionKind::Conjunction(_))
    }

    pub fn is_disjunction(&self) -> bool {
        matches!(self.inner.kind, ConditionKind::Disjunction(_))
    }

    /// Operands of a commutative node; empty for leaves.
    pub fn operands(&self) -> &[Condition] {
        match &self.inner.kind {
            ConditionKind::Conjunction(ops) | ConditionKind::Disjunction(ops) => ops,
            _ => &[],
        }
    }

    pub fn debug_string(&self) -> String {
        match &self.inner.kind {
            ConditionKind::Constant(true) => "TRUE".to_string(),
            ConditionKind::Constant(false) => "FALSE".to_string(),
            ConditionKind::GreaterThan { term, threshold } => {
                format!("{}>{}", term.name(), threshold)
            }
            ConditionKind::LessThan { term, threshold } => {
                format!("{}<{}", term.name(), threshold)
            }
            ConditionKind::EqualTo { term, value } => format!("{}={}", term.name(), value),
            ConditionKind::Conjunction(ops) => join_debug(ops, " && "),
            ConditionKind::Disjunction(ops) => join_debug(ops, " || "),
            ConditionKind::Darkness { scene, level } => {
                format!("$DarknessLevel[{scene}]<{level}")
            }
            ConditionKind::CharmBudget { safe, charm_ids } => {
                let tag = if *safe { "$SafeNotchCost" } else { "$NotchCost" };
                format!("NOTCHES > {tag}{charm_ids:?}")
            }
        }
    }

    /// Like [`Condition::debug_string`], but annotates every node with its
    /// evaluation under `ctx`.
    pub fn debug_evaluation(&self, ctx: &Context<'_>) -> String {
        match &self.inner.kind {
            ConditionKind::Constant(_) => self.debug_string(),
            ConditionKind::GreaterThan { term, threshold } => {
                format!("({}>{})={}", ctx.get(term), threshold, self.test(ctx))
            }
            ConditionKind::LessThan { term, threshold } => {
                format!("({}<{})={}", ctx.get(term), threshold, self.test(ctx))
            }
            ConditionKind::EqualTo { term, value } => {
                format!("({}={})={}", ctx.get(term), value, self.test(ctx))
            }
            ConditionKind::Conjunction(ops) => {
                let parts: Vec<String> = ops.iter().map(|c| c.debug_evaluation(ctx)).collect();
                format!("(({}))={}", parts.join(") && ("), self.test(ctx))
            }
            ConditionKind::Disjunction(ops) => {
                let parts: Vec<String> = ops.iter().map(|c| c.debug_evaluation(ctx)).collect();
                format!("(({}))={}", parts.join(") || ("), self.test(ctx))
            }
            ConditionKind::Darkness { scene, level } => {
                format!(
                    "({}<{})={}",
                    ctx.darkness().darkness_level(scene),
                    level,
                    self.test(ctx)
                )
            }
            ConditionKind::CharmBudget { safe, charm_ids } => {
                format!(
                    "({}>{})={}",
                    ctx.get(Term::notches()),
                    charm_budget_cost(ctx.notch_costs(), *safe, charm_ids),
                    self.test(ctx)
                )
            }
        }
    }
}

fn join_debug(ops: &[Condition], sep: &str) -> String {
    let parts: Vec<String> = ops.iter().map(|c| format!("({})", c.debug_string())).collect();
    parts.join(sep)
}

/// Notch cost of equipping the charm set: the summed cost, discounted by 1
/// for a safe equip or by the single largest cost for an overcharmed one.
fn charm_budget_cost(notch_costs: &NotchCosts, safe: bool, charm_ids: &[u32]) -> i32 {
    let mut sum = 0;
    let mut max = 0;
    for &id in charm_ids {
        let cost = notch_costs.notch_cost(id);
        sum += cost;
        max = max.max(cost);
    }
    sum - if safe { 1 } else { max }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term_map::MutableTermMap;

    fn ctx_fixtures() -> (MutableTermMap, NotchCosts, DarknessOverrides) {
        (
            MutableTermMap::new(),
            NotchCosts::empty(),
            DarknessOverrides::empty(),
        )
    }

    #[test]
    fn constants() {
        let (values, notch, dark) = ctx_fixtures();
        let ctx = Context::new(&values, &notch, &dark);
        assert!(Condition::always_true().test(&ctx));
        assert!(!Condition::always_false().test(&ctx));
        assert_eq!(Condition::always_true(), Condition::always_true());
    }

    #[test]
    fn greater_than_is_strict() {
        let swim = Term::new("SWIM");
        let (mut values, notch, dark) = ctx_fixtures();
        let c = Condition::greater_than(&swim, 2);

        values.set(&swim, 2);
        assert!(!c.test(&Context::new(&values, &notch, &dark)));
        values.set(&swim, 3);
        assert!(c.test(&Context::new(&values, &notch, &dark)));
    }

    #[test]
    fn interning_identical_structures() {
        let a = Term::new("A");
        let b = Term::new("B");
        let c1 = Condition::and(Condition::nonzero(&a), Condition::nonzero(&b));
        let c2 = Condition::and(Condition::nonzero(&b), Condition::nonzero(&a));
        assert_eq!(c1, c2);

        let l1 = Condition::less_than(&a, 4);
        let l2 = Condition::less_than(&a, 4);
        assert_eq!(l1, l2);
        assert_ne!(l1, Condition::less_than(&a, 5));
    }

    #[test]
    fn interner_reclaims_dead_buckets() {
        // Intern a handful of conditions nothing else will ever build, note
        // their structural hashes, and drop them immediately.
        let dead_hashes: Vec<u64> = (0..8)
            .map(|i| {
                let t = Term::new(&format!("EPHEMERAL_{i}"));
                Condition::greater_than(&t, 123_000 + i).inner.hash
            })
            .collect();

        // Churn enough fresh interning to cross at least one sweep after
        // the drops above.
        for i in 0..(2 * SWEEP_INTERVAL as i32 + 100) {
            let t = Term::new(&format!("CHURN_{i}"));
            let _ = Condition::greater_than(&t, i);
        }

        let table = match interner().lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        for hash in dead_hashes {
            assert!(
                !table.buckets.contains_key(&hash),
                "evicted bucket {hash} survived the sweep"
            );
        }
    }

    #[test]
    fn interning_is_shared_across_threads() {
        use std::sync::Barrier;
        use std::thread;

        let barrier = Arc::new(Barrier::new(8));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    let a = Term::new("THREADED_A");
                    let b = Term::new("THREADED_B");
                    Condition::or(
                        Condition::and(Condition::nonzero(&a), Condition::nonzero(&b)),
                        Condition::greater_than(&a, 7),
                    )
                })
            })
            .collect();

        let mut conditions = handles.into_iter().map(|h| h.join().unwrap());
        let first = conditions.next().unwrap();
        for c in conditions {
            // Structural identity collapses to pointer identity even under
            // concurrent construction.
            assert_eq!(c, first);
            assert!(Arc::ptr_eq(&c.inner, &first.inner));
        }
    }

    #[test]
    fn flattening_nested_same_variant() {
        let a = Condition::nonzero(&Term::new("A"));
        let b = Condition::nonzero(&Term::new("B"));
        let c = Condition::nonzero(&Term::new("C"));

        let nested = Condition::and(Condition::and(a.clone(), b.clone()), c.clone());
        let flat = Condition::and_all([a.clone(), b.clone(), c.clone()]);
        assert_eq!(nested, flat);
        assert_eq!(flat.operands().len(), 3);

        // A conjunction inside a disjunction is not flattened.
        let mixed = Condition::or(Condition::and(a.clone(), b.clone()), c.clone());
        assert_eq!(mixed.operands().len(), 2);
    }

    #[test]
    fn singleton_collapse() {
        let a = Condition::nonzero(&Term::new("A"));
        let collapsed = Condition::and_all([a.clone(), a.clone()]);
        assert_eq!(collapsed, a);
        assert!(!collapsed.is_conjunction());
    }

    #[test]
    fn equal_to_and_less_than_evaluate_directly() {
        let lanterns = Term::new("LANTERNS");
        let (mut values, notch, dark) = ctx_fixtures();
        values.set(&lanterns, 2);
        let ctx = Context::new(&values, &notch, &dark);
        assert!(Condition::equal_to(&lanterns, 2).test(&ctx));
        assert!(!Condition::equal_to(&lanterns, 3).test(&ctx));
        assert!(Condition::less_than(&lanterns, 3).test(&ctx));
        assert!(!Condition::less_than(&lanterns, 2).test(&ctx));
    }

    #[test]
    fn darkness_leaf() {
        let (values, notch, _) = ctx_fixtures();
        let dark = DarknessOverrides::new([("Cliffs_01".to_string(), 2)]);
        let ctx = Context::new(&values, &notch, &dark);
        assert!(!Condition::darkness("Cliffs_01", 2).test(&ctx));
        assert!(Condition::darkness("Cliffs_01", 3).test(&ctx));
        // Unlisted scenes are level 0.
        assert!(Condition::darkness("Town", 1).test(&ctx));
    }

    #[test]
    fn charm_budget_safe_and_overcharmed() {
        let (mut values, _, dark) = ctx_fixtures();
        let notch = NotchCosts::new(vec![2, 3]);

        // Safe: cost = 2 + 3 - 1 = 4; needs NOTCHES > 4.
        let safe = Condition::charm_budget(true, [1, 2]);
        // Overcharmed: cost = 2 + 3 - 3 = 2; needs NOTCHES > 2.
        let risky = Condition::charm_budget(false, [1, 2]);

        values.set(Term::notches(), 3);
        assert!(!safe.test(&Context::new(&values, &notch, &dark)));
        assert!(risky.test(&Context::new(&values, &notch, &dark)));

        values.set(Term::notches(), 5);
        assert!(safe.test(&Context::new(&values, &notch, &dark)));
    }

    #[test]
    fn debug_strings() {
        let a = Term::new("A");
        assert_eq!(Condition::greater_than(&a, 2).debug_string(), "A>2");
        assert_eq!(Condition::less_than(&a, 2).debug_string(), "A<2");
        assert_eq!(Condition::equal_to(&a, 2).debug_string(), "A=2");
        assert_eq!(
            Condition::darkness("Cliffs_01", 2).debug_string(),
            "$DarknessLevel[Cliffs_01]<2"
        );
        let both = Condition::and(
            Condition::nonzero(&a),
            Condition::nonzero(&Term::new("B")),
        );
        let s = both.debug_string();
        assert!(s.contains("A>0") && s.contains("B>0") && s.contains("&&"));
    }
}
