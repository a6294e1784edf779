//! Constrained bargaining solves.
//!
//! [`find_bargaining_solution`] maximizes the selected welfare objective
//! over action profiles in the unit square by minimizing its negation from
//! the configured starting profile. The Kalai-Smorodinsky ideal point is
//! hoisted once per call (m is fixed for the duration), then the scoring
//! stays cheap inside the optimizer loop.
//!
//! [`maximize_profile`] is the arbitrary-objective form underneath it, also
//! used for the ideal-point sub-solves and handy for probing the solver
//! with bespoke objectives in tests.

use crate::config::SolverConfig;
use crate::error::{check_weight, BargainError};
use crate::optimizer::{minimize_unit_square, MinimizeOutcome};
use crate::types::{ActionProfile, DisagreementPayoffs, Solution};
use crate::welfare::{ideal_utilities, ks_score, nash_score, Welfare};

/// Maximize an arbitrary objective over action profiles in the unit square.
///
/// Starts from `cfg.initial_guess`. Non-convergence is not an error: the
/// returned [`Solution`] carries the best profile found and a flag. Domain
/// checks on m belong to the caller; the objective is only ever evaluated
/// inside the unit square.
pub fn maximize_profile<F: Fn(ActionProfile) -> f64>(objective: F, cfg: &SolverConfig) -> Solution {
    let start = [cfg.initial_guess.aligned, cfg.initial_guess.unaligned];
    let out: MinimizeOutcome =
        minimize_unit_square(|x| -objective(ActionProfile::new(x[0], x[1])), start, cfg);
    Solution {
        profile: ActionProfile::new(out.x[0], out.x[1]),
        welfare: -out.value,
        iterations: out.iterations,
        converged: out.converged,
    }
}

/// Solve the bargaining game: the action profile maximizing `welfare` given
/// the disagreement payoffs.
///
/// Fails fast on a weight outside (0, 1). For Kalai-Smorodinsky the two
/// ideal-point sub-solves run first and their convergence flags AND into
/// the result, so a shaky reference point is never reported as a clean
/// solve.
pub fn find_bargaining_solution(
    m: f64,
    welfare: Welfare,
    disagreement: DisagreementPayoffs,
    cfg: &SolverConfig,
) -> Result<Solution, BargainError> {
    check_weight(m)?;
    let pool = cfg.resource_pool;
    match welfare {
        Welfare::Nash => Ok(maximize_profile(
            |q| nash_score(m, q, disagreement, pool),
            cfg,
        )),
        Welfare::KalaiSmorodinsky => {
            let ideal = ideal_utilities(m, cfg);
            let mut solution =
                maximize_profile(|q| ks_score(m, q, disagreement, ideal, pool), cfg);
            solution.converged &= ideal.converged;
            Ok(solution)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utility::utility_aligned;

    #[test]
    fn weight_domain_is_enforced() {
        let cfg = SolverConfig::default();
        for &m in &[0.0, 1.0, -0.5, 2.0, f64::NAN] {
            let r = find_bargaining_solution(m, Welfare::Nash, DisagreementPayoffs::ZERO, &cfg);
            assert!(matches!(r, Err(BargainError::InvalidWeight(_))));
        }
    }

    #[test]
    fn maximize_profile_finds_the_aligned_corner() {
        // An objective rewarding only team aligned pins both coordinates at 1.
        let cfg = SolverConfig::default();
        let sol = maximize_profile(|q| utility_aligned(0.2, q, cfg.resource_pool), &cfg);
        assert!(sol.converged);
        assert!((sol.profile.aligned - 1.0).abs() < 1e-3);
        assert!((sol.profile.unaligned - 1.0).abs() < 1e-3);
        assert!((sol.welfare - 22.0).abs() < 1e-6);
    }

    #[test]
    fn nash_with_zero_disagreement_splits_evenly() {
        let cfg = SolverConfig::default();
        let sol = find_bargaining_solution(0.2, Welfare::Nash, DisagreementPayoffs::ZERO, &cfg)
            .unwrap();
        assert!(sol.converged);
        assert!((sol.profile.aligned - 0.5).abs() < 1e-3);
        assert!((sol.profile.unaligned - 0.5).abs() < 1e-3);
    }

    #[test]
    fn reported_welfare_matches_the_profile() {
        let cfg = SolverConfig::default();
        let d = DisagreementPayoffs::ZERO;
        let sol = find_bargaining_solution(0.35, Welfare::Nash, d, &cfg).unwrap();
        let rescored = nash_score(0.35, sol.profile, d, cfg.resource_pool);
        assert!((sol.welfare - rescored).abs() < 1e-12);
    }
}
