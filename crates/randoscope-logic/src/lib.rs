//! Incremental reachability logic for randomized seeds.
//!
//! This crate contains the whole reachability engine, independent of any
//! UI, file format, or game hook. Everything is plain data in, plain data
//! out: load a seed into a [`context::StateContext`], create a
//! [`state::State`], and acquire checks as the run progresses; the state
//! answers "what else is reachable now?" incrementally instead of
//! re-evaluating the full logic corpus.
//!
//! The central assumption is monotonicity: progression counters only rise
//! within a state lineage, so reachability conditions only flip false →
//! true and everything derived from them can be cached permanently.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`bi_multimap`] | Bidirectional multimap used by the graph's edge tables |
//! | [`checks`] | Per-seed registry of item checks with inverse condition lookup |
//! | [`condition`] | Interned boolean expressions over terms |
//! | [`context`] | Immutable per-seed context (checks, waypoints, cost tables, policy) |
//! | [`cost`] | Check costs and the per-run charm notch cost table |
//! | [`darkness`] | Per-scene darkness levels |
//! | [`graph`] | Incremental false→true propagation over a condition corpus |
//! | [`index`] | Per-term sorted threshold watch lists |
//! | [`item`] | Items, locations and identity-compared checks |
//! | [`state`] | The mutable reachability frontier, with speculative purchase view |
//! | [`term`] | Named progression counters |
//! | [`term_map`] | Mutable/immutable/summing views over term values |
//! | [`waypoints`] | Condition-derived terms chaining connectivity through the fixpoint |

pub mod bi_multimap;
pub mod checks;
pub mod condition;
pub mod context;
pub mod cost;
pub mod darkness;
pub mod graph;
pub mod index;
pub mod item;
pub mod state;
pub mod term;
pub mod term_map;
pub mod waypoints;
