//! Terms: opaque named integer progression counters.
//!
//! A `Term` is a name identity — it carries no value. Values live in the
//! [`crate::term_map`] family, keyed by term. Terms are cheap to clone
//! (shared string) and compare by name.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

/// A named progression counter. May be binary (acquiring an item, defeating
/// a boss, reaching a room) or multi-valued (currency, collectible tallies).
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Term(Arc<str>);

impl Term {
    pub fn new(name: &str) -> Term {
        Term(Arc::from(name))
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl PartialOrd for Term {
    fn partial_cmp(&self, other: &Term) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Term {
    fn cmp(&self, other: &Term) -> Ordering {
        self.name().cmp(other.name())
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Debug for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Term({})", self.name())
    }
}

macro_rules! well_known_term {
    ($fn_name:ident, $name:literal) => {
        #[doc = concat!("Well-known term `", $name, "`.")]
        pub fn $fn_name() -> &'static Term {
            static TERM: OnceLock<Term> = OnceLock::new();
            TERM.get_or_init(|| Term::new($name))
        }
    };
}

impl Term {
    well_known_term!(always, "TRUE");
    well_known_term!(geo, "GEO");
    well_known_term!(can_replenish_geo, "Can_Replenish_Geo");
    well_known_term!(notches, "NOTCHES");
    well_known_term!(grubs, "GRUBS");
    well_known_term!(essence, "ESSENCE");
    well_known_term!(rancid_eggs, "RANCIDEGGS");
    well_known_term!(charms, "CHARMS");

    /// Terms that represent spendable/accumulated cost currencies. Seed
    /// loaders route initial values for these into the tolerance map rather
    /// than the setter map.
    pub fn cost_terms() -> &'static [Term] {
        static COST_TERMS: OnceLock<Vec<Term>> = OnceLock::new();
        COST_TERMS.get_or_init(|| {
            vec![
                Term::grubs().clone(),
                Term::essence().clone(),
                Term::rancid_eggs().clone(),
                Term::charms().clone(),
            ]
        })
    }
}
