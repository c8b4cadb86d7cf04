//! Randoscope Headless Harness
//!
//! Loads the demo seed, assembles a StateContext, and validates the
//! reachability fixpoint end to end. Runs entirely in-process — no UI,
//! no file watching, no game hooks.
//!
//! Usage:
//!   cargo run -p randoscope-simtest
//!   cargo run -p randoscope-simtest -- --verbose

use std::collections::HashMap;
use std::sync::Arc;

use serde::Deserialize;

use randoscope_logic::checks::ItemChecks;
use randoscope_logic::condition::Condition;
use randoscope_logic::context::StateContext;
use randoscope_logic::cost::{Cost, Costs, NotchCosts};
use randoscope_logic::darkness::DarknessOverrides;
use randoscope_logic::item::{Item, ItemCheck, ItemEffects, Location};
use randoscope_logic::state::State;
use randoscope_logic::term::Term;
use randoscope_logic::term_map::ImmutableTermMap;
use randoscope_logic::waypoints::Waypoints;

// ── Seed format (same JSON a front end would feed the engine) ───────────
const SEED_JSON: &str = include_str!("../../../data/demo_seed.json");

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SeedSpec {
    #[serde(default)]
    notch_costs: Vec<i32>,
    #[serde(default)]
    darkness: HashMap<String, i32>,
    #[serde(default)]
    setters: Vec<TermValueSpec>,
    #[serde(default)]
    tolerances: Vec<TermValueSpec>,
    #[serde(default)]
    waypoints: Vec<WaypointSpec>,
    checks: Vec<CheckSpec>,
}

#[derive(Debug, Deserialize)]
struct TermValueSpec {
    term: String,
    value: i32,
}

#[derive(Debug, Deserialize)]
struct WaypointSpec {
    term: String,
    logic: LogicExpr,
}

#[derive(Debug, Deserialize)]
struct CheckSpec {
    location: String,
    scene: String,
    item: String,
    logic: LogicExpr,
    #[serde(default)]
    costs: Vec<CostSpec>,
    #[serde(default)]
    vanilla: bool,
    #[serde(default)]
    start: bool,
    #[serde(default)]
    shop: bool,
    #[serde(default)]
    transition: bool,
    #[serde(default)]
    effects: Vec<EffectSpec>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CostSpec {
    Geo { geo: i32 },
    Term { term: String, threshold: i32 },
}

#[derive(Debug, Deserialize)]
struct EffectSpec {
    term: String,
    value: i32,
    #[serde(default)]
    cap: Option<i32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum LogicExpr {
    True,
    Gt { term: String, threshold: i32 },
    Lt { term: String, threshold: i32 },
    Eq { term: String, value: i32 },
    All(Vec<LogicExpr>),
    Any(Vec<LogicExpr>),
    Darkness { scene: String, level: i32 },
    CharmBudget { safe: bool, charms: Vec<u32> },
}

impl LogicExpr {
    fn to_condition(&self) -> Condition {
        match self {
            LogicExpr::True => Condition::always_true(),
            LogicExpr::Gt { term, threshold } => {
                Condition::greater_than(&Term::new(term), *threshold)
            }
            LogicExpr::Lt { term, threshold } => Condition::less_than(&Term::new(term), *threshold),
            LogicExpr::Eq { term, value } => Condition::equal_to(&Term::new(term), *value),
            LogicExpr::All(ops) => Condition::and_all(ops.iter().map(LogicExpr::to_condition)),
            LogicExpr::Any(ops) => Condition::or_all(ops.iter().map(LogicExpr::to_condition)),
            LogicExpr::Darkness { scene, level } => Condition::darkness(scene, *level),
            LogicExpr::CharmBudget { safe, charms } => {
                Condition::charm_budget(*safe, charms.iter().copied())
            }
        }
    }
}

// ── Seed loading ────────────────────────────────────────────────────────

#[derive(Debug)]
enum SeedError {
    Parse(serde_json::Error),
    NoChecks,
    DuplicateLocation(String),
}

impl std::fmt::Display for SeedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SeedError::Parse(e) => write!(f, "malformed seed JSON: {}", e),
            SeedError::NoChecks => write!(f, "seed has no checks"),
            SeedError::DuplicateLocation(name) => {
                write!(f, "duplicate location name: {}", name)
            }
        }
    }
}

fn load_seed(json: &str) -> Result<SeedSpec, SeedError> {
    let spec: SeedSpec = serde_json::from_str(json).map_err(SeedError::Parse)?;
    if spec.checks.is_empty() {
        return Err(SeedError::NoChecks);
    }
    let mut seen = std::collections::HashSet::new();
    for c in &spec.checks {
        if !seen.insert(c.location.as_str()) {
            return Err(SeedError::DuplicateLocation(c.location.clone()));
        }
    }
    Ok(spec)
}

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn check(name: &str, passed: bool, detail: String) -> TestResult {
    TestResult {
        name: name.into(),
        passed,
        detail,
    }
}

fn main() {
    env_logger::init();
    let verbose = std::env::args().any(|a| a == "--verbose");
    println!("=== Randoscope Reachability Harness ===\n");

    let mut results = Vec::new();

    let spec = match load_seed(SEED_JSON) {
        Ok(s) => s,
        Err(e) => {
            println!("✗ seed_load: {}", e);
            std::process::exit(1);
        }
    };

    // 1. Seed shape
    results.extend(validate_seed_shape(&spec));

    // 2. Initial fixpoint
    let (ctx, by_location) = build_context(&spec);
    log::info!(
        "seed assembled: {} checks, {} waypoints",
        ctx.checks().len(),
        ctx.waypoints().len()
    );
    results.extend(validate_initial_state(&ctx, &by_location));

    // 3. Affordability view
    results.extend(validate_affordability(&ctx, &by_location));

    // 4. Full progression sweep
    results.extend(validate_sweep(&ctx));

    // 5. Branch independence
    results.extend(validate_branching(&ctx));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

// ── Seed assembly ───────────────────────────────────────────────────────

fn build_context(spec: &SeedSpec) -> (Arc<StateContext>, HashMap<String, ItemCheck>) {
    let waypoints = Waypoints::new(
        spec.waypoints
            .iter()
            .map(|w| (Term::new(&w.term), w.logic.to_condition())),
    );

    let mut checks = ItemChecks::new();
    let mut by_location = HashMap::new();
    for c in &spec.checks {
        let access = c.logic.to_condition();
        let location = if c.shop {
            Location::shop(&c.location, &c.scene, access)
        } else if c.transition {
            Location::transition(&c.location, &c.scene, access)
        } else {
            Location::new(&c.location, &c.scene, access)
        };

        let term = Term::new(&c.item);
        let item = if c.transition {
            Item::transition(term)
        } else if c.effects.is_empty() {
            let effects = ItemEffects::simple(&term, 1);
            Item::new(term, effects)
        } else {
            let deltas = ImmutableTermMap::of(
                c.effects.iter().map(|e| (Term::new(&e.term), e.value)),
            );
            let caps = ImmutableTermMap::of(
                c.effects
                    .iter()
                    .filter_map(|e| e.cap.map(|cap| (Term::new(&e.term), cap))),
            );
            let effects = ItemEffects::new(
                Condition::always_true(),
                deltas,
                ImmutableTermMap::empty(),
                caps,
            );
            Item::new(term, effects)
        };

        let costs = Costs::of(c.costs.iter().map(|cs| match cs {
            CostSpec::Geo { geo } => Cost::geo(*geo),
            CostSpec::Term { term, threshold } => Cost::term(Term::new(term), *threshold),
        }));

        let check = if c.start {
            checks.add_start(location, item, costs, c.vanilla)
        } else {
            checks.add(location, item, costs, c.vanilla)
        };
        by_location.insert(c.location.clone(), check);
    }

    let mut ctx = StateContext::new(
        checks,
        waypoints,
        NotchCosts::new(spec.notch_costs.clone()),
        DarknessOverrides::new(spec.darkness.iter().map(|(k, v)| (k.clone(), *v))),
        ImmutableTermMap::of(spec.setters.iter().map(|s| (Term::new(&s.term), s.value))),
    );
    ctx.set_tolerances(ImmutableTermMap::of(
        spec.tolerances.iter().map(|s| (Term::new(&s.term), s.value)),
    ));
    (Arc::new(ctx), by_location)
}

// ── 1. Seed shape ───────────────────────────────────────────────────────

fn validate_seed_shape(spec: &SeedSpec) -> Vec<TestResult> {
    println!("--- Seed Shape ---");
    let mut results = Vec::new();

    results.push(check(
        "seed_checks_loaded",
        spec.checks.len() == 17,
        format!("{} checks loaded", spec.checks.len()),
    ));
    results.push(check(
        "seed_waypoints_loaded",
        spec.waypoints.len() == 2,
        format!("{} waypoints loaded", spec.waypoints.len()),
    ));

    // Every logic expression must assemble into a condition.
    let conditions: Vec<Condition> = spec
        .checks
        .iter()
        .map(|c| c.logic.to_condition())
        .chain(spec.waypoints.iter().map(|w| w.logic.to_condition()))
        .collect();
    results.push(check(
        "seed_logic_assembles",
        conditions.len() == spec.checks.len() + spec.waypoints.len(),
        format!("{} conditions assembled", conditions.len()),
    ));

    // Interning: the repeated Can_Enter_Greenpath gate is one instance.
    let greenpath = Condition::nonzero(&Term::new("Can_Enter_Greenpath"));
    let shared = conditions.iter().filter(|c| **c == greenpath).count();
    results.push(check(
        "seed_logic_interned",
        shared >= 5,
        format!("{} checks share the greenpath gate", shared),
    ));

    results
}

// ── 2. Initial fixpoint ─────────────────────────────────────────────────

fn validate_initial_state(
    ctx: &Arc<StateContext>,
    by_location: &HashMap<String, ItemCheck>,
) -> Vec<TestResult> {
    println!("--- Initial Fixpoint ---");
    let mut results = Vec::new();
    let state = State::new(Arc::clone(ctx));

    let obtained: Vec<&ItemCheck> = state.obtained().collect();
    results.push(check(
        "initial_obtained",
        obtained.len() == 3,
        format!(
            "{} obtained (start, geo farm, vanilla transition)",
            obtained.len()
        ),
    ));
    results.push(check(
        "initial_start_acquired",
        state.is_acquired(&by_location["Start"]),
        "start inventory acquired".into(),
    ));
    results.push(check(
        "initial_geo_farm_auto",
        state.is_acquired(&by_location["Colosseum_Geo"]),
        "replenishable-geo check auto-acquired".into(),
    ));
    results.push(check(
        "initial_vanilla_transition_auto",
        state.is_acquired(&by_location["Town[left1]"])
            && !state.is_acquired(&by_location["Town[right1]"]),
        "vanilla transition auto-acquired, randomized one not".into(),
    ));

    let accessible = state.accessible().count();
    results.push(check(
        "initial_accessible",
        accessible == 13,
        format!("{} checks reachable but unacquired", accessible),
    ));
    results.push(check(
        "initial_mines_locked",
        !state.accessible().any(|c| *c == by_location["Mines_Crystal_Heart"]),
        "lantern-gated mines stay out of reach".into(),
    ));

    results.push(check(
        "initial_waypoints",
        state.get(&Term::new("Can_Enter_Greenpath")) == 1
            && state.get(&Term::new("Bright_Mines")) == 1,
        format!(
            "greenpath={} bright_mines={}",
            state.get(&Term::new("Can_Enter_Greenpath")),
            state.get(&Term::new("Bright_Mines"))
        ),
    ));

    // Non-monotonic leaves are answered directly, outside the graph.
    let dark = Condition::darkness("Crystal_Peak", 1);
    results.push(check(
        "initial_darkness_direct",
        !state.evaluate(&dark),
        "crystal peak is not below darkness level 1".into(),
    ));

    results
}

// ── 3. Affordability view ───────────────────────────────────────────────

fn validate_affordability(
    ctx: &Arc<StateContext>,
    by_location: &HashMap<String, ItemCheck>,
) -> Vec<TestResult> {
    println!("--- Affordability ---");
    let mut results = Vec::new();
    let state = State::new(Arc::clone(ctx));

    results.push(check(
        "afford_geo_shop",
        state.can_afford(&by_location["Sly_Lantern"]),
        "geo price payable once geo is replenishable".into(),
    ));
    results.push(check(
        "afford_grub_shop_speculative",
        state.can_afford(&by_location["Grubfather_Mask"]),
        "3-grub price payable from grubs still in the field".into(),
    ));
    results.push(check(
        "afford_ore_never",
        !state.can_afford(&by_location["Grubfather_Ore"]),
        "46-grub price unpayable in a 3-grub seed".into(),
    ));

    results
}

// ── 4. Full progression sweep ───────────────────────────────────────────

fn validate_sweep(ctx: &Arc<StateContext>) -> Vec<TestResult> {
    println!("--- Progression Sweep ---");
    let mut results = Vec::new();
    let mut state = State::new(Arc::clone(ctx));

    let mut rounds = 0;
    loop {
        let frontier: Vec<ItemCheck> = state.accessible().cloned().collect();
        if frontier.is_empty() {
            break;
        }
        for c in &frontier {
            state.acquire_check(c);
        }
        state.normalize();
        rounds += 1;
    }

    let obtained = state.obtained().count();
    results.push(check(
        "sweep_obtains_everything",
        obtained == ctx.checks().len(),
        format!("{}/{} checks obtained", obtained, ctx.checks().len()),
    ));
    results.push(check(
        "sweep_round_count",
        rounds == 2,
        format!("{} acquisition waves (lantern unlocks the mines)", rounds),
    ));
    results.push(check(
        "sweep_vessel_cap",
        state.get(&Term::new("VESSELS")) == 3,
        format!("VESSELS={} (4 fragments, cap 3)", state.get(&Term::new("VESSELS"))),
    ));
    results.push(check(
        "sweep_grub_total",
        state.get(Term::grubs()) == 3,
        format!("GRUBS={}", state.get(Term::grubs())),
    ));

    results
}

// ── 5. Branch independence ──────────────────────────────────────────────

fn validate_branching(ctx: &Arc<StateContext>) -> Vec<TestResult> {
    println!("--- Branching ---");
    let mut results = Vec::new();
    let base = State::new(Arc::clone(ctx));

    let mut branch = base.deep_copy();
    let frontier: Vec<ItemCheck> = branch.accessible().cloned().collect();
    for c in &frontier {
        branch.acquire_check(c);
    }
    branch.normalize();

    results.push(check(
        "branch_advances",
        branch.obtained().count() > base.obtained().count(),
        format!(
            "branch obtained {}, base obtained {}",
            branch.obtained().count(),
            base.obtained().count()
        ),
    ));
    results.push(check(
        "branch_base_untouched",
        base.obtained().count() == 3 && base.get(&Term::new("CLAW")) == 0,
        "base state unchanged by branch progress".into(),
    ));

    results
}
