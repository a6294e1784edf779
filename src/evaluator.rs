//! Scenario evaluation: expected utility and bargaining-power sensitivity.
//!
//! A scenario is a weight m and a success probability p. With probability p
//! the parties strike a deal (the solved bargaining profile plays out); with
//! probability 1-p they fall back to the disagreement policy. All metrics
//! are from team aligned's point of view:
//!
//! - `expected_utility_aligned`: `p * u_A(solution) + (1-p) * d_A`
//! - `delta_m` / `delta_p`: change in expected utility from nudging m (or p)
//!   up by `delta` in odds space
//! - `shift_ratio`: `delta_p / delta_m`, guarded against a vanishing
//!   denominator
//! - `max_shift`: the larger of the two nudge gains
//!
//! Every inner solve's convergence flag ANDs into the returned
//! [`Evaluation`]; inputs are validated before any numerics run.

use serde::Serialize;

use crate::config::SolverConfig;
use crate::disagreement::DisagreementPolicy;
use crate::error::{check_probability, check_weight, BargainError};
use crate::grid::{odds_to_probability, probability_to_odds};
use crate::solver::find_bargaining_solution;
use crate::types::Evaluation;
use crate::utility::utility_aligned;
use crate::welfare::Welfare;

/// Relative odds nudge used by the sensitivity metrics.
pub const DEFAULT_DELTA: f64 = 0.01;

/// Smallest |delta_m| the shift ratio will divide by.
pub const DEFAULT_RATIO_FLOOR: f64 = 1e-9;

/// Which welfare the success-branch solve uses.
///
/// `AlwaysNash` solves the deal with Nash welfare no matter what the
/// scenario's welfare selector says; `Configured` uses the selector. The
/// default is `AlwaysNash`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SuccessWelfare {
    AlwaysNash,
    Configured,
}

/// Metric selector for grid scans and drivers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    ExpectedUtility,
    DeltaM,
    DeltaP,
    ShiftRatio,
    MaxShift,
}

/// Everything a scenario evaluation depends on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScenarioConfig {
    pub solver: SolverConfig,
    pub welfare: Welfare,
    pub policy: DisagreementPolicy,
    pub success_welfare: SuccessWelfare,
    /// Relative odds nudge for the sensitivity metrics.
    pub delta: f64,
    /// Smallest |delta_m| the shift ratio divides by.
    pub ratio_floor: f64,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            solver: SolverConfig::default(),
            welfare: Welfare::Nash,
            policy: DisagreementPolicy::Zero,
            success_welfare: SuccessWelfare::AlwaysNash,
            delta: DEFAULT_DELTA,
            ratio_floor: DEFAULT_RATIO_FLOOR,
        }
    }
}

/// Nudge a probability up by `delta` in odds space:
/// `x/(1-x) * (1+delta)`, converted back. The result is capped at the
/// largest f64 below 1.0: at the very top of the interval the odds round
/// trip rounds onto the boundary, which downstream validation would
/// reject.
pub fn shift_up_in_odds(x: f64, delta: f64) -> f64 {
    let shifted = odds_to_probability(probability_to_odds(x) * (1.0 + delta));
    shifted.min(1.0 - f64::EPSILON / 2.0)
}

/// Stateless evaluator over a fixed [`ScenarioConfig`]. Holds no mutable
/// state; share `&self` across threads freely.
#[derive(Debug, Clone, Copy)]
pub struct ScenarioEvaluator {
    cfg: ScenarioConfig,
}

impl ScenarioEvaluator {
    pub fn new(cfg: ScenarioConfig) -> Self {
        Self { cfg }
    }

    pub fn config(&self) -> &ScenarioConfig {
        &self.cfg
    }

    fn success_welfare(&self) -> Welfare {
        match self.cfg.success_welfare {
            SuccessWelfare::AlwaysNash => Welfare::Nash,
            SuccessWelfare::Configured => self.cfg.welfare,
        }
    }

    /// `p * u_A(deal) + (1-p) * d_A(m)`.
    pub fn expected_utility_aligned(&self, m: f64, p: f64) -> Result<Evaluation, BargainError> {
        check_weight(m)?;
        check_probability(p)?;
        let pool = self.cfg.solver.resource_pool;
        let d = self.cfg.policy.payoffs(m, pool);
        let solution = find_bargaining_solution(m, self.success_welfare(), d, &self.cfg.solver)?;
        let u_deal = utility_aligned(m, solution.profile, pool);
        Ok(Evaluation::new(
            p * u_deal + (1.0 - p) * d.aligned,
            solution.converged,
        ))
    }

    /// Gain in expected utility from nudging m up by `delta` in odds space.
    pub fn delta_m(&self, m: f64, p: f64) -> Result<Evaluation, BargainError> {
        let base = self.expected_utility_aligned(m, p)?;
        let shifted = self.expected_utility_aligned(shift_up_in_odds(m, self.cfg.delta), p)?;
        Ok(Evaluation::new(
            shifted.value - base.value,
            base.converged && shifted.converged,
        ))
    }

    /// Gain in expected utility from nudging p up by `delta` in odds space.
    pub fn delta_p(&self, m: f64, p: f64) -> Result<Evaluation, BargainError> {
        let base = self.expected_utility_aligned(m, p)?;
        let shifted = self.expected_utility_aligned(m, shift_up_in_odds(p, self.cfg.delta))?;
        Ok(Evaluation::new(
            shifted.value - base.value,
            base.converged && shifted.converged,
        ))
    }

    /// `delta_p / delta_m`. Refuses to divide when |delta_m| is under the
    /// configured floor; infinities never leak out silently.
    pub fn shift_ratio(&self, m: f64, p: f64) -> Result<Evaluation, BargainError> {
        let dm = self.delta_m(m, p)?;
        let dp = self.delta_p(m, p)?;
        if dm.value.abs() < self.cfg.ratio_floor {
            return Err(BargainError::UndefinedRatio {
                delta_m: dm.value,
                floor: self.cfg.ratio_floor,
            });
        }
        Ok(Evaluation::new(
            dp.value / dm.value,
            dm.converged && dp.converged,
        ))
    }

    /// The larger of the two nudge gains.
    pub fn max_shift(&self, m: f64, p: f64) -> Result<Evaluation, BargainError> {
        let dm = self.delta_m(m, p)?;
        let dp = self.delta_p(m, p)?;
        Ok(Evaluation::new(
            dm.value.max(dp.value),
            dm.converged && dp.converged,
        ))
    }

    /// Dispatch by [`Metric`].
    pub fn evaluate(&self, metric: Metric, m: f64, p: f64) -> Result<Evaluation, BargainError> {
        match metric {
            Metric::ExpectedUtility => self.expected_utility_aligned(m, p),
            Metric::DeltaM => self.delta_m(m, p),
            Metric::DeltaP => self.delta_p(m, p),
            Metric::ShiftRatio => self.shift_ratio(m, p),
            Metric::MaxShift => self.max_shift(m, p),
        }
    }
}
