//! Acceptance tests for the bargaining solver and scenario evaluator.
//!
//! Each test pins a property of the game itself (equal split under Nash,
//! corner capture under a one-sided objective, equalized gains under
//! Kalai-Smorodinsky, expectation boundaries in p) rather than an
//! implementation detail, so a correct solver rewrite keeps them green.

use bargain::config::SolverConfig;
use bargain::disagreement::DisagreementPolicy;
use bargain::evaluator::{Metric, ScenarioConfig, ScenarioEvaluator, SuccessWelfare};
use bargain::grid::{scan, GridConfig};
use bargain::solver::{find_bargaining_solution, maximize_profile};
use bargain::types::{ActionProfile, DisagreementPayoffs};
use bargain::utility::{utility_aligned, utility_unaligned};
use bargain::welfare::Welfare;

/// True if nudging one coordinate of `q` by 0.01 makes one party strictly
/// better off without making the other worse off. Nudges that leave the
/// unit square are not tried.
fn has_profitable_single_shift(m: f64, q: ActionProfile, pool: f64) -> bool {
    let base_a = utility_aligned(m, q, pool);
    let base_u = utility_unaligned(m, q, pool);
    let probes = [
        ActionProfile::new(q.aligned + 0.01, q.unaligned),
        ActionProfile::new(q.aligned - 0.01, q.unaligned),
        ActionProfile::new(q.aligned, q.unaligned + 0.01),
        ActionProfile::new(q.aligned, q.unaligned - 0.01),
    ];
    probes.into_iter().filter(|p| p.in_unit_square()).any(|p| {
        let ua = utility_aligned(m, p, pool);
        let uu = utility_unaligned(m, p, pool);
        (ua > base_a && uu >= base_u) || (uu > base_u && ua >= base_a)
    })
}

#[test]
fn nash_with_zero_disagreement_splits_the_pool_evenly() {
    let cfg = SolverConfig::default();
    for &m in &[0.05, 0.2, 0.5, 0.8, 0.95] {
        let sol = find_bargaining_solution(m, Welfare::Nash, DisagreementPayoffs::ZERO, &cfg)
            .unwrap();
        assert!(sol.converged, "m = {} did not converge", m);
        assert!(
            (sol.profile.aligned - 0.5).abs() < 1e-3,
            "m = {}: aligned keeps {}",
            m,
            sol.profile.aligned
        );
        assert!(
            (sol.profile.unaligned - 0.5).abs() < 1e-3,
            "m = {}: unaligned keeps {}",
            m,
            sol.profile.unaligned
        );
    }
}

#[test]
fn maximizing_one_party_alone_hands_it_everything() {
    let cfg = SolverConfig::default();
    let pool = cfg.resource_pool;
    let sol = maximize_profile(|q| utility_aligned(0.3, q, pool), &cfg);
    assert!(sol.converged);
    assert!((sol.profile.aligned - 1.0).abs() < 1e-3);
    assert!((sol.profile.unaligned - 1.0).abs() < 1e-3);
    assert!((sol.welfare - 22.0).abs() < 1e-6);
}

#[test]
fn ks_equalizes_gains_and_lands_near_the_pareto_frontier() {
    let cfg = SolverConfig::default();
    let pool = cfg.resource_pool;
    let m = 0.51;
    let sol = find_bargaining_solution(
        m,
        Welfare::KalaiSmorodinsky,
        DisagreementPayoffs::ZERO,
        &cfg,
    )
    .unwrap();
    let ua = utility_aligned(m, sol.profile, pool);
    let uu = utility_unaligned(m, sol.profile, pool);
    // Zero disagreement and a near-symmetric weight: the equal-gain line is
    // u_A = u_U and the penalty term holds the solution close to it.
    assert!(
        (ua - uu).abs() < 1e-2,
        "gains split unevenly: aligned {} vs unaligned {}",
        ua,
        uu
    );
    assert!(
        !has_profitable_single_shift(m, sol.profile, pool),
        "a 0.01 nudge of {:?} left one party better off for free",
        sol.profile
    );
}

#[test]
fn expected_utility_rises_with_success_probability() {
    let evaluator = ScenarioEvaluator::new(ScenarioConfig {
        policy: DisagreementPolicy::Unilateral,
        ..ScenarioConfig::default()
    });
    let m = 0.3;
    let mut last = f64::NEG_INFINITY;
    for &p in &[0.1, 0.3, 0.5, 0.7, 0.9] {
        let e = evaluator.expected_utility_aligned(m, p).unwrap();
        assert!(e.converged);
        assert!(
            e.value > last,
            "expected utility fell from {} to {} at p = {}",
            last,
            e.value,
            p
        );
        last = e.value;
    }
}

#[test]
fn expected_utility_pins_to_the_disagreement_point_as_p_vanishes() {
    let evaluator = ScenarioEvaluator::new(ScenarioConfig {
        policy: DisagreementPolicy::Zero,
        ..ScenarioConfig::default()
    });
    // Zero policy: E = p * u_deal, so E -> 0 as p -> 0 and E -> u_deal
    // (the equal split of the pool) as p -> 1.
    let low = evaluator.expected_utility_aligned(0.5, 1e-9).unwrap();
    assert!(low.value.abs() < 1e-6, "E at p = 1e-9 was {}", low.value);
    let high = evaluator.expected_utility_aligned(0.5, 1.0 - 1e-9).unwrap();
    let equal_split = 22.0 + 0.5f64.log10();
    assert!(
        (high.value - equal_split).abs() < 1e-3,
        "E at p ~ 1 was {}, expected about {}",
        high.value,
        equal_split
    );
}

#[test]
fn sensitivity_metrics_agree_at_an_interior_point() {
    let evaluator = ScenarioEvaluator::new(ScenarioConfig {
        policy: DisagreementPolicy::Unilateral,
        ..ScenarioConfig::default()
    });
    let (m, p) = (0.3, 0.5);
    let dm = evaluator.delta_m(m, p).unwrap();
    let dp = evaluator.delta_p(m, p).unwrap();
    let ratio = evaluator.shift_ratio(m, p).unwrap();
    let max = evaluator.max_shift(m, p).unwrap();
    // The deal beats the fallback here, so more success probability always
    // helps the aligned party.
    assert!(dp.value > 0.0, "delta_p was {}", dp.value);
    assert!(ratio.value.is_finite());
    assert_eq!(max.value, dm.value.max(dp.value));
    assert_eq!(
        evaluator.evaluate(Metric::MaxShift, m, p).unwrap().value,
        max.value
    );
}

#[test]
fn scans_are_reproducible_across_runs() {
    let evaluator = ScenarioEvaluator::new(ScenarioConfig {
        welfare: Welfare::Nash,
        policy: DisagreementPolicy::Zero,
        success_welfare: SuccessWelfare::Configured,
        ..ScenarioConfig::default()
    });
    let grid = GridConfig {
        resolution: 4,
        ..GridConfig::default()
    };
    let a = scan(&evaluator, Metric::ExpectedUtility, &grid).unwrap();
    let b = scan(&evaluator, Metric::ExpectedUtility, &grid).unwrap();
    assert_eq!(a.values, b.values);
    assert_eq!(a.unconverged, b.unconverged);
    assert_eq!(a.undefined, b.undefined);
    for row in &a.values {
        for v in row {
            assert!(v.is_finite());
        }
    }
}
