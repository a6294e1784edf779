//! Welfare objectives scored over action profiles.
//!
//! Two bargaining objectives behind the closed [`Welfare`] enum:
//!
//! - `Nash`: the product of both parties' utility gains over their
//!   disagreement payoffs.
//! - `KalaiSmorodinsky`: a quadratic penalty pulling the solution onto the
//!   proportionality line between the disagreement point and the ideal
//!   point, plus a joint-utility term that steers the solution toward the
//!   efficient end of the line.
//!
//! The KS ideal point (each party's best reachable utility, disagreement
//! pinned to zero) costs one bounded solve per party. [`Welfare::score`]
//! recomputes it on every call, which is always correct since m is fixed
//! within one outer solve; the solver hoists it once per call through
//! [`ideal_utilities`] + [`Welfare::score_with_ideal`] instead. Both paths
//! produce identical scores for the same m.

use serde::Serialize;

use crate::config::SolverConfig;
use crate::solver::maximize_profile;
use crate::types::{ActionProfile, DisagreementPayoffs, IdealUtilities};
use crate::utility::{utility_aligned, utility_unaligned};

/// Bargaining objective selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Welfare {
    Nash,
    KalaiSmorodinsky,
}

impl Welfare {
    /// Score `profile` under this objective.
    ///
    /// The Kalai-Smorodinsky arm recomputes the ideal point with two nested
    /// solves per call. Loops should hoist with [`ideal_utilities`] and use
    /// [`Welfare::score_with_ideal`].
    pub fn score(
        &self,
        m: f64,
        profile: ActionProfile,
        disagreement: DisagreementPayoffs,
        cfg: &SolverConfig,
    ) -> f64 {
        match self {
            Welfare::Nash => nash_score(m, profile, disagreement, cfg.resource_pool),
            Welfare::KalaiSmorodinsky => {
                let ideal = ideal_utilities(m, cfg);
                ks_score(m, profile, disagreement, ideal, cfg.resource_pool)
            }
        }
    }

    /// Hoisted form of [`Welfare::score`]: `ideal` must have been computed
    /// by [`ideal_utilities`] for the same m. The Nash arm ignores it.
    pub fn score_with_ideal(
        &self,
        m: f64,
        profile: ActionProfile,
        disagreement: DisagreementPayoffs,
        ideal: IdealUtilities,
        pool: f64,
    ) -> f64 {
        match self {
            Welfare::Nash => nash_score(m, profile, disagreement, pool),
            Welfare::KalaiSmorodinsky => ks_score(m, profile, disagreement, ideal, pool),
        }
    }
}

/// Nash product: `(u_A - d_A) * (u_U - d_U)`.
///
/// Positive only where both parties gain; the optimizer may cross regions
/// where one factor is negative when the disagreement point dominates much
/// of the box.
pub fn nash_score(
    m: f64,
    profile: ActionProfile,
    d: DisagreementPayoffs,
    pool: f64,
) -> f64 {
    let u_a = utility_aligned(m, profile, pool);
    let u_u = utility_unaligned(m, profile, pool);
    (u_a - d.aligned) * (u_u - d.unaligned)
}

/// Kalai-Smorodinsky score against a fixed ideal point:
///
/// ```text
/// lhs   = (u_A - d_A) * (b_U - d_U)
/// rhs   = (b_A - d_A) * (u_U - d_U)
/// score = -(lhs - rhs)^2 + (u_A + u_U)
/// ```
///
/// The squared term vanishes exactly on the proportionality line from the
/// disagreement point toward the ideal point `(b_A, b_U)`; with utilities
/// on the 22 scale it dominates the joint-utility term by orders of
/// magnitude, so solutions sit within ~1e-3 of the line. Along the line
/// the joint-utility term takes over and carries the solution out to the
/// Pareto frontier.
pub fn ks_score(
    m: f64,
    profile: ActionProfile,
    d: DisagreementPayoffs,
    ideal: IdealUtilities,
    pool: f64,
) -> f64 {
    let u_a = utility_aligned(m, profile, pool);
    let u_u = utility_unaligned(m, profile, pool);
    let lhs = (u_a - d.aligned) * (ideal.unaligned - d.unaligned);
    let rhs = (ideal.aligned - d.aligned) * (u_u - d.unaligned);
    -(lhs - rhs) * (lhs - rhs) + (u_a + u_u)
}

/// Best utility each party can reach on its own: two bounded solves of the
/// raw utilities with disagreement pinned to zero. The sub-solves'
/// convergence flags AND into the result.
pub fn ideal_utilities(m: f64, cfg: &SolverConfig) -> IdealUtilities {
    let pool = cfg.resource_pool;
    let best_a = maximize_profile(|q| utility_aligned(m, q, pool), cfg);
    let best_u = maximize_profile(|q| utility_unaligned(m, q, pool), cfg);
    IdealUtilities {
        aligned: utility_aligned(m, best_a.profile, pool),
        unaligned: utility_unaligned(m, best_u.profile, pool),
        converged: best_a.converged && best_u.converged,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POOL: f64 = 1e22;

    #[test]
    fn nash_score_is_the_gain_product() {
        let q = ActionProfile::new(0.5, 0.5);
        let d = DisagreementPayoffs::new(1.0, 2.0);
        let u = 22.0 + 0.5f64.log10();
        let expected = (u - 1.0) * (u - 2.0);
        assert!((nash_score(0.4, q, d, POOL) - expected).abs() < 1e-9);
    }

    #[test]
    fn ideal_point_reaches_the_full_pool() {
        let cfg = SolverConfig::default();
        let ideal = ideal_utilities(0.51, &cfg);
        assert!(ideal.converged);
        assert!((ideal.aligned - 22.0).abs() < 1e-6);
        assert!((ideal.unaligned - 22.0).abs() < 1e-6);
    }

    #[test]
    fn ks_score_vanishing_penalty_on_the_line() {
        // Symmetric profile, symmetric ideal: lhs == rhs, only the
        // joint-utility term remains.
        let q = ActionProfile::new(0.5, 0.5);
        let ideal = IdealUtilities { aligned: 22.0, unaligned: 22.0, converged: true };
        let u = 22.0 + 0.5f64.log10();
        let score = ks_score(0.5, q, DisagreementPayoffs::ZERO, ideal, POOL);
        assert!((score - 2.0 * u).abs() < 1e-9);
    }

    #[test]
    fn ks_score_penalizes_leaving_the_line() {
        let ideal = IdealUtilities { aligned: 22.0, unaligned: 22.0, converged: true };
        let on_line = ks_score(
            0.5,
            ActionProfile::new(0.5, 0.5),
            DisagreementPayoffs::ZERO,
            ideal,
            POOL,
        );
        let off_line = ks_score(
            0.5,
            ActionProfile::new(0.9, 0.9),
            DisagreementPayoffs::ZERO,
            ideal,
            POOL,
        );
        assert!(off_line < on_line);
    }

    #[test]
    fn ks_score_rewards_joint_utility_along_the_line() {
        // At m = 0.5 every profile (t, 1-t) gives both parties identical
        // utility, so the penalty is exactly zero and the score ranks the
        // profiles by joint utility alone. Wasteful splits must lose.
        let ideal = IdealUtilities { aligned: 22.0, unaligned: 22.0, converged: true };
        let d = DisagreementPayoffs::ZERO;
        let score = |t: f64| ks_score(0.5, ActionProfile::new(t, 1.0 - t), d, ideal, POOL);
        assert!(score(0.5) > score(0.3));
        assert!(score(0.3) > score(0.1));
    }

    #[test]
    fn score_and_hoisted_score_agree() {
        let cfg = SolverConfig::default();
        let m = 0.51;
        let d = DisagreementPayoffs::ZERO;
        let ideal = ideal_utilities(m, &cfg);
        for &q in &[
            ActionProfile::new(0.1, 0.9),
            ActionProfile::new(0.5, 0.5),
            ActionProfile::new(0.97, 0.02),
        ] {
            for &w in &[Welfare::Nash, Welfare::KalaiSmorodinsky] {
                let every_call = w.score(m, q, d, &cfg);
                let hoisted = w.score_with_ideal(m, q, d, ideal, cfg.resource_pool);
                assert!((every_call - hoisted).abs() < 1e-9);
            }
        }
    }
}
