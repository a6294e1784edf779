//! # Bargain — two-party resource-allocation bargaining explorer
//!
//! Computes bargaining outcomes between **team aligned (A)** and
//! **team unaligned (U)** over a pool of resource units, and maps how
//! aligned's expected payoff responds to bargaining power and deal odds.
//!
//! ## Game
//!
//! A scalar `m ∈ (0,1)` is A's bargaining weight: with probability `m` the
//! aligned coordinate of the action profile governs the whole pool, with
//! probability `1-m` the unaligned coordinate does. Each coordinate is a
//! fraction of the pool directed at good X; the rest goes to good Y. A
//! consumes X, U consumes Y, and utilities are base-10 log payoffs floored
//! at zero (allocations under one unit are worthless).
//!
//! ## Pipeline
//!
//! | Stage | Rust module | Description |
//! |-------|-------------|-------------|
//! | utility model | [`utility`] | clamped-log payoffs for both parties |
//! | welfare objectives | [`welfare`] | Nash product and Kalai-Smorodinsky scores |
//! | constrained solve | [`optimizer`], [`solver`] | projected quasi-Newton maximization over the unit square |
//! | breakdown payoffs | [`disagreement`] | three policies mapping m to disagreement utilities |
//! | scenario metrics | [`evaluator`] | expected utility and odds-nudge sensitivities over (m, p) |
//! | grid sweep | [`grid`] | log-spaced axes, parallel cartesian scan |
//! | rendering | [`heatmap`] | PNG heatmaps with log-scale tick labels |
//!
//! Scenario space is swept by the `bargain-heatmap` binary; `bargain-point`
//! inspects a single (m, p) cell in detail.
//!
//! ## Numerics
//!
//! - f64 end to end; every run is deterministic (fixed starting profile,
//!   no randomness).
//! - Solver non-convergence is a flagged result carrying the best point
//!   found, never an error; domain violations (m or p outside the open
//!   unit interval) fail fast before any numerics run.
//! - The Kalai-Smorodinsky ideal point is hoisted once per solve; the
//!   unhoisted [`welfare::Welfare::score`] stays available and agrees
//!   exactly.

pub mod config;
pub mod disagreement;
pub mod error;
pub mod evaluator;
pub mod grid;
pub mod heatmap;
pub mod optimizer;
pub mod solver;
pub mod types;
pub mod utility;
pub mod welfare;
