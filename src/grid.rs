//! Grid sweeps over (m, p) scenario space.
//!
//! Both axes are sampled log-uniformly: the m axis over an odds-ratio range
//! (so each decade of relative bargaining power gets equal weight, then the
//! ratios convert back to probability space), the p axis directly over its
//! probability range. The scan walks the full cartesian grid in parallel,
//! one rayon task per m row.

use rayon::prelude::*;
use serde::Serialize;

use crate::error::BargainError;
use crate::evaluator::{Metric, ScenarioEvaluator};

/// Cells per axis.
pub const DEFAULT_RESOLUTION: usize = 12;

/// Bargaining-power odds ratio m/(1-m) range.
pub const DEFAULT_MIN_M_ODDS: f64 = 1e-5;
pub const DEFAULT_MAX_M_ODDS: f64 = 1e5;

/// Success probability range.
pub const DEFAULT_MIN_P: f64 = 1e-3;
pub const DEFAULT_MAX_P: f64 = 1.0 - 1e-3;

/// Odds ratio of a probability: `x / (1 - x)`. Meaningful for x in (0, 1).
#[inline]
pub fn probability_to_odds(x: f64) -> f64 {
    x / (1.0 - x)
}

/// Probability of an odds ratio: `r / (1 + r)`. Inverse of
/// [`probability_to_odds`] across the positive reals.
#[inline]
pub fn odds_to_probability(r: f64) -> f64 {
    r / (1.0 + r)
}

/// `n` values log10-uniform between `lo` and `hi`, endpoints included.
/// Callers guarantee `0 < lo < hi` and `n >= 2`.
pub fn log_spaced(lo: f64, hi: f64, n: usize) -> Vec<f64> {
    let l0 = lo.log10();
    let step = (hi.log10() - l0) / (n - 1) as f64;
    (0..n).map(|i| 10f64.powf(l0 + step * i as f64)).collect()
}

/// Scan extents and resolution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GridConfig {
    /// Cells per axis (the grid is resolution x resolution).
    pub resolution: usize,
    /// Smallest m odds ratio m/(1-m).
    pub min_m_odds: f64,
    /// Largest m odds ratio.
    pub max_m_odds: f64,
    /// Smallest success probability.
    pub min_p: f64,
    /// Largest success probability.
    pub max_p: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            resolution: DEFAULT_RESOLUTION,
            min_m_odds: DEFAULT_MIN_M_ODDS,
            max_m_odds: DEFAULT_MAX_M_ODDS,
            min_p: DEFAULT_MIN_P,
            max_p: DEFAULT_MAX_P,
        }
    }
}

impl GridConfig {
    pub fn validate(&self) -> Result<(), BargainError> {
        if self.resolution < 2 {
            return Err(BargainError::InvalidGrid(format!(
                "resolution must be at least 2, got {}",
                self.resolution
            )));
        }
        if !(self.min_m_odds > 0.0 && self.max_m_odds > self.min_m_odds) {
            return Err(BargainError::InvalidGrid(format!(
                "m odds range must satisfy 0 < min < max, got [{}, {}]",
                self.min_m_odds, self.max_m_odds
            )));
        }
        if !(self.min_p > 0.0 && self.max_p > self.min_p && self.max_p < 1.0) {
            return Err(BargainError::InvalidGrid(format!(
                "p range must satisfy 0 < min < max < 1, got [{}, {}]",
                self.min_p, self.max_p
            )));
        }
        Ok(())
    }

    /// Ascending m values: odds ratios log-sampled, converted back to
    /// probability space.
    pub fn m_values(&self) -> Vec<f64> {
        log_spaced(self.min_m_odds, self.max_m_odds, self.resolution)
            .into_iter()
            .map(odds_to_probability)
            .collect()
    }

    /// Ascending p values, log-sampled directly.
    pub fn p_values(&self) -> Vec<f64> {
        log_spaced(self.min_p, self.max_p, self.resolution)
    }
}

/// One metric evaluated over the full grid.
#[derive(Debug, Clone, Serialize)]
pub struct GridScan {
    pub m_values: Vec<f64>,
    pub p_values: Vec<f64>,
    /// Row-major: `values[i][j]` is the metric at `(m_values[i], p_values[j])`.
    /// Undefined-ratio cells hold NaN.
    pub values: Vec<Vec<f64>>,
    /// Cells where at least one inner solve missed its tolerances.
    pub unconverged: usize,
    /// Cells whose shift ratio had a vanishing denominator.
    pub undefined: usize,
}

struct Cell {
    value: f64,
    converged: bool,
    undefined: bool,
}

/// Evaluate `metric` at every grid cell, m rows in parallel.
///
/// Undefined-ratio cells become NaN and are counted rather than failing the
/// scan; any other evaluator error aborts it.
pub fn scan(
    evaluator: &ScenarioEvaluator,
    metric: Metric,
    grid: &GridConfig,
) -> Result<GridScan, BargainError> {
    grid.validate()?;
    let m_values = grid.m_values();
    let p_values = grid.p_values();

    let rows: Result<Vec<Vec<Cell>>, BargainError> = m_values
        .par_iter()
        .map(|&m| {
            p_values
                .iter()
                .map(|&p| match evaluator.evaluate(metric, m, p) {
                    Ok(e) => Ok(Cell {
                        value: e.value,
                        converged: e.converged,
                        undefined: false,
                    }),
                    Err(BargainError::UndefinedRatio { .. }) => Ok(Cell {
                        value: f64::NAN,
                        converged: true,
                        undefined: true,
                    }),
                    Err(e) => Err(e),
                })
                .collect()
        })
        .collect();
    let rows = rows?;

    let unconverged = rows.iter().flatten().filter(|c| !c.converged).count();
    let undefined = rows.iter().flatten().filter(|c| c.undefined).count();
    let values = rows
        .iter()
        .map(|row| row.iter().map(|c| c.value).collect())
        .collect();

    Ok(GridScan { m_values, p_values, values, unconverged, undefined })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::ScenarioConfig;

    #[test]
    fn odds_round_trip_at_half() {
        assert_eq!(probability_to_odds(0.5), 1.0);
        assert_eq!(odds_to_probability(1.0), 0.5);
        let x = 0.9;
        let back = odds_to_probability(probability_to_odds(x));
        assert!((back - x).abs() < 1e-12);
    }

    #[test]
    fn log_spaced_hits_decades() {
        let vals = log_spaced(1e-3, 1e3, 7);
        assert_eq!(vals.len(), 7);
        for (i, v) in vals.iter().enumerate() {
            let expected = 10f64.powi(i as i32 - 3);
            assert!((v / expected - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn axes_are_ascending_and_inside_their_domains() {
        let grid = GridConfig::default();
        let ms = grid.m_values();
        let ps = grid.p_values();
        assert_eq!(ms.len(), grid.resolution);
        assert_eq!(ps.len(), grid.resolution);
        for w in ms.windows(2) {
            assert!(w[0] < w[1]);
        }
        for w in ps.windows(2) {
            assert!(w[0] < w[1]);
        }
        assert!(ms.iter().all(|&m| m > 0.0 && m < 1.0));
        assert!(ps.iter().all(|&p| p > 0.0 && p < 1.0));
        // First m is the probability of the smallest odds ratio.
        let expected = DEFAULT_MIN_M_ODDS / (1.0 + DEFAULT_MIN_M_ODDS);
        assert!((ms[0] - expected).abs() < 1e-12);
    }

    #[test]
    fn bad_grids_are_rejected() {
        let mut grid = GridConfig { resolution: 1, ..GridConfig::default() };
        assert!(matches!(grid.validate(), Err(BargainError::InvalidGrid(_))));
        grid = GridConfig { min_m_odds: -1.0, ..GridConfig::default() };
        assert!(grid.validate().is_err());
        grid = GridConfig { max_p: 1.0, ..GridConfig::default() };
        assert!(grid.validate().is_err());
        grid = GridConfig { min_p: 0.9, max_p: 0.1, ..GridConfig::default() };
        assert!(grid.validate().is_err());
        assert!(GridConfig::default().validate().is_ok());
    }

    #[test]
    fn scan_fills_every_cell() {
        let ev = ScenarioEvaluator::new(ScenarioConfig::default());
        let grid = GridConfig { resolution: 3, ..GridConfig::default() };
        let scan = scan(&ev, Metric::ExpectedUtility, &grid).unwrap();
        assert_eq!(scan.values.len(), 3);
        assert!(scan.values.iter().all(|row| row.len() == 3));
        assert!(scan.values.iter().flatten().all(|v| v.is_finite()));
        assert_eq!(scan.unconverged, 0);
        assert_eq!(scan.undefined, 0);
    }

    #[test]
    fn scan_counts_undefined_ratio_cells() {
        // Zero policy makes the expectation flat in m; with a huge floor
        // every shift ratio is refused and lands as a counted NaN.
        let cfg = ScenarioConfig { ratio_floor: 1.0, ..ScenarioConfig::default() };
        let ev = ScenarioEvaluator::new(cfg);
        let grid = GridConfig { resolution: 2, ..GridConfig::default() };
        let scan = scan(&ev, Metric::ShiftRatio, &grid).unwrap();
        assert_eq!(scan.undefined, 4);
        assert!(scan.values.iter().flatten().all(|v| v.is_nan()));
    }
}
