//! Error types for the bargaining explorer.
//!
//! Domain violations fail fast: a weight or probability outside the open
//! unit interval is rejected at the solver/evaluator entry points before any
//! numerics run, so the utility floor can never paper over bad inputs.
//! Solver non-convergence is deliberately not an error; it is surfaced as a
//! `converged` flag carrying the best point found, so a grid sweep can keep
//! partial results and keep going.

use thiserror::Error;

/// Failure modes of the solver, evaluator and grid layers.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BargainError {
    /// Bargaining weight outside the open interval (0, 1). NaN lands here.
    #[error("bargaining weight m must lie strictly inside (0, 1), got {0}")]
    InvalidWeight(f64),

    /// Success probability outside the open interval (0, 1). NaN lands here.
    #[error("success probability p must lie strictly inside (0, 1), got {0}")]
    InvalidProbability(f64),

    /// Shift-ratio denominator too close to zero to divide safely.
    #[error("shift ratio undefined: |delta_m| = {delta_m:.3e} is below the floor {floor:.3e}")]
    UndefinedRatio {
        /// The denominator that was about to be divided by.
        delta_m: f64,
        /// The configured floor it failed to clear.
        floor: f64,
    },

    /// Grid configuration that cannot produce a valid scan.
    #[error("invalid grid: {0}")]
    InvalidGrid(String),
}

/// Validate a bargaining weight. NaN fails the comparison chain and is
/// rejected along with everything outside (0, 1).
pub fn check_weight(m: f64) -> Result<(), BargainError> {
    if m > 0.0 && m < 1.0 {
        Ok(())
    } else {
        Err(BargainError::InvalidWeight(m))
    }
}

/// Validate a success probability, same domain rule as [`check_weight`].
pub fn check_probability(p: f64) -> Result<(), BargainError> {
    if p > 0.0 && p < 1.0 {
        Ok(())
    } else {
        Err(BargainError::InvalidProbability(p))
    }
}
