//! `budgeteer`: a self-calibrating multiple-choice knapsack control loop.
//!
//! Designed for "pick one option per setting, every cycle" problems: you
//! have many independent settings (quality levels, feature toggles, LOD
//! choices, anything with mutually exclusive alternatives), each choice
//! consumes a share of a limited resource (CPU/GPU time, a frame or audio
//! deadline), and you want to maximize total subjective value without
//! blowing the budget.  `budgeteer` profiles what each option actually
//! costs, live, and re-decides the whole configuration once per control
//! period.
//!
//! **The cycle** ([`Controller::update`]):
//!
//! 1. *Harvest*: drain every [`Setting`]'s pending measurements into the
//!    current-run [`Profile`], tracking an observed-vs-expected
//!    [`Anomaly`] signal.
//! 2. *Estimate*: turn statistics into per-option [`NormalBurden`]s,
//!    blending this run's data with a prior run's (rescaled by
//!    [`Controller::past_present_ratio`]) and biasing under-sampled options
//!    with an exploration bonus.
//! 3. *Solve*: run the quantized multiple-choice knapsack DP
//!    ([`Knapsack::decide`]) under a chance-constrained capacity.
//! 4. *Apply*: push each decision's chosen index back into its setting and
//!    return a typed [`CycleReport`].
//!
//! **Goals:**
//! - **Deterministic**: same profiles + same config → same choices.  No
//!   internal randomness; exploration is scheduled by the solver, not
//!   sampled.
//! - **Bounded per-cycle cost**: solve time is
//!   `O(decisions × options × precision)` with a tunable `precision` that
//!   trades optimality for runtime: net value is at least
//!   `(100 − 100/precision)%` of the best feasible assignment
//!   (value-quantized DP in the FPTAS family: Lawler 1979; Kellerer,
//!   Pferschy & Pisinger 2004, ch. 11).
//! - **Uncertainty-aware**: burdens are `(mean, variance)` pairs and the
//!   capacity test is chance-constrained: mean plus a sigma multiple must
//!   stay under the limit (Charnes & Cooper 1959).
//! - **Graceful under overload**: an unattainable capacity degrades every
//!   setting to its lightest option and says so, instead of failing the
//!   control loop.
//!
//! **Non-goals:**
//! - Not a general combinatorial optimizer: exactly one option per
//!   decision, one capacity, additive values.
//! - No exact optimum guarantee: the approximation ratio above is the
//!   contract.
//! - Not a persistence layer: [`ProfileSnapshot`] defines the interchange
//!   shape; storage and format belong to the host.
//!
//! # Statistics
//!
//! Per-option costs are accumulated with numerically stable incremental
//! mean/variance updates (Welford 1962) in two clocks: a lifetime `full`
//! estimate and an exponentially decayed `recent` window, so estimates stay
//! both stable and drift-responsive.  Merging profiles across runs uses the
//! pairwise/parallel variance combination (Chan, Golub & LeVeque 1982), and
//! a weighted cross-run mean ratio rescales prior-run costs onto the
//! current machine's speed.
//!
//! Under-sampled options receive a configurable value bonus and a burden
//! discount until they meet their measurement quota: optimism in the face
//! of uncertainty, the same principle as a UCB exploration term (Auer,
//! Cesa-Bianchi & Fischer 2002), but routed through the knapsack so
//! exploration competes for budget like everything else.
//!
//! # Concurrency model
//!
//! Single-threaded and synchronous by construction: a cycle borrows the
//! settings exclusively and runs to completion with no suspension points.
//! Solver and scratch buffers are reused across cycles; only profile data
//! grows, and only when new identities appear.

#![forbid(unsafe_code)]

mod economy;
pub use economy::*;

mod stats;
pub use stats::*;

mod profile;
pub use profile::*;

mod knapsack;
pub use knapsack::*;

mod controller;
pub use controller::*;

mod settings;
pub use settings::*;

mod report;
pub use report::*;

mod persist;
pub use persist::*;

mod utils;
pub use utils::*;

/// Crate version, for embedding in host diagnostics and stored snapshots.
pub const BUDGETEER_VERSION: &str = env!("CARGO_PKG_VERSION");
