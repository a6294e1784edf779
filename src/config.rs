//! Solver configuration.
//!
//! Every number the solver depends on lives in [`SolverConfig`] and is
//! passed explicitly into the solver and evaluator. The defaults reproduce
//! the reference scenario: a pool of 1e22 resource units, an asymmetric
//! starting profile, and stopping tolerances sized for utilities on the
//! 0..22 scale.

use crate::types::ActionProfile;

/// Resource units in the pool. With 1e22 units a full allocation is worth
/// log10(1e22) = 22 utility, and fractions below 1e-22 drop under the
/// one-unit utility floor.
pub const DEFAULT_RESOURCE_POOL: f64 = 1e22;

/// Starting profile for every solve. Asymmetric on purpose: symmetric
/// optima must be found by the optimizer, not baked into the start.
pub const DEFAULT_INITIAL_GUESS: ActionProfile = ActionProfile::new(0.1, 0.9);

/// Forward-difference step for numerical gradients.
pub const DEFAULT_GRAD_STEP: f64 = 1e-8;

/// Stop when the projected-gradient infinity norm falls below this.
pub const DEFAULT_PG_TOL: f64 = 1e-5;

/// Stop when one step improves the objective by less than this fraction of
/// its magnitude.
pub const DEFAULT_F_TOL: f64 = 1e-9;

/// Iteration cap; hitting it flags the solve as non-converged.
pub const DEFAULT_MAX_ITERS: usize = 500;

/// Curvature pairs retained by the quasi-Newton update.
pub const DEFAULT_HISTORY: usize = 10;

/// Knobs for one bounded bargaining solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig {
    /// Resource units in the pool (the N in `log10(N * fraction)`).
    pub resource_pool: f64,
    /// Profile every optimization starts from, clamped into the unit square.
    pub initial_guess: ActionProfile,
    /// Finite-difference step for gradient estimates.
    pub grad_step: f64,
    /// Projected-gradient tolerance (first-order optimality).
    pub pg_tol: f64,
    /// Relative-improvement tolerance per iteration.
    pub f_tol: f64,
    /// Hard cap on optimizer iterations.
    pub max_iters: usize,
    /// Quasi-Newton history length.
    pub history: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            resource_pool: DEFAULT_RESOURCE_POOL,
            initial_guess: DEFAULT_INITIAL_GUESS,
            grad_step: DEFAULT_GRAD_STEP,
            pg_tol: DEFAULT_PG_TOL,
            f_tol: DEFAULT_F_TOL,
            max_iters: DEFAULT_MAX_ITERS,
            history: DEFAULT_HISTORY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_guess_is_inside_the_box() {
        let cfg = SolverConfig::default();
        assert!(cfg.initial_guess.in_unit_square());
        assert!(cfg.resource_pool > 1.0);
    }
}
