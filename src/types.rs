//! Core value types shared across the solver, evaluator and grid layers.

use serde::Serialize;

/// Fractions of the resource pool each party would direct toward good X.
///
/// Both coordinates live in `[0, 1]`; whatever is not spent on X goes to
/// good Y. Team aligned consumes X and team unaligned consumes Y, so
/// aligned's ideal profile is `(1, 1)` and unaligned's is `(0, 0)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ActionProfile {
    /// Team aligned's fraction of the pool spent on good X.
    pub aligned: f64,
    /// Team unaligned's fraction of the pool spent on good X.
    pub unaligned: f64,
}

impl ActionProfile {
    pub const fn new(aligned: f64, unaligned: f64) -> Self {
        Self { aligned, unaligned }
    }

    /// Componentwise complement: the same profile seen from the Y side.
    pub fn complement(self) -> Self {
        Self::new(1.0 - self.aligned, 1.0 - self.unaligned)
    }

    /// True when both coordinates lie inside the unit square.
    pub fn in_unit_square(self) -> bool {
        (0.0..=1.0).contains(&self.aligned) && (0.0..=1.0).contains(&self.unaligned)
    }
}

/// Per-party payoffs when bargaining breaks down.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DisagreementPayoffs {
    pub aligned: f64,
    pub unaligned: f64,
}

impl DisagreementPayoffs {
    pub const ZERO: Self = Self { aligned: 0.0, unaligned: 0.0 };

    pub const fn new(aligned: f64, unaligned: f64) -> Self {
        Self { aligned, unaligned }
    }
}

/// Outcome of one bargaining solve.
///
/// A non-converged solve still carries the best profile found; callers
/// decide whether that is good enough for their purpose.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Solution {
    /// Welfare-maximizing action profile (best found if not converged).
    pub profile: ActionProfile,
    /// Welfare score at `profile`.
    pub welfare: f64,
    /// Optimizer iterations consumed.
    pub iterations: usize,
    /// Whether the optimizer met one of its stopping tolerances.
    pub converged: bool,
}

/// Best utility each party can reach on its own, disagreement pinned to
/// zero. This is the reference ("ideal") point of the Kalai-Smorodinsky
/// objective.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IdealUtilities {
    pub aligned: f64,
    pub unaligned: f64,
    /// AND of the two sub-solves' convergence flags.
    pub converged: bool,
}

/// A scalar metric value together with the convergence status of every
/// solve that went into it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Evaluation {
    pub value: f64,
    /// False if any inner bargaining solve failed to converge.
    pub converged: bool,
}

impl Evaluation {
    pub const fn new(value: f64, converged: bool) -> Self {
        Self { value, converged }
    }
}
