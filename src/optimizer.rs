//! Bound-constrained quasi-Newton minimizer for the bargaining objectives.
//!
//! A projected L-BFGS specialized to the unit square:
//!
//! 1. Forward-difference gradients, switching to backward differences at the
//!    upper bound so the objective is never probed outside the box.
//! 2. Two-loop recursion over a short curvature history for the search
//!    direction, with a steepest-descent restart whenever the quasi-Newton
//!    direction stops being a descent direction.
//! 3. Projected Armijo backtracking: trial points are clamped into the box
//!    and sufficient decrease is measured along the projected step.
//! 4. Stopping on the projected-gradient infinity norm, on relative
//!    improvement below `f_tol`, or at the iteration cap.
//!
//! The objectives this serves are smooth almost everywhere but kinked where
//! the utility floor engages, so a line search that cannot find an
//! acceptable step is terminal: the best point found is returned with
//! `converged = false` and there is no automatic retry.

use crate::config::SolverConfig;

/// Result of one bounded minimization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinimizeOutcome {
    /// Final iterate (best point found when not converged).
    pub x: [f64; 2],
    /// Objective value at `x`.
    pub value: f64,
    /// Iterations consumed.
    pub iterations: usize,
    /// Whether a stopping tolerance was met before the iteration cap.
    pub converged: bool,
}

/// Armijo sufficient-decrease constant.
const ARMIJO_C1: f64 = 1e-4;
/// Step scale below which the line search gives up.
const MIN_STEP: f64 = 1e-12;
/// Curvature threshold for accepting an (s, y) pair into the history.
const CURVATURE_FLOOR: f64 = 1e-12;

#[inline]
fn clamp_unit(x: [f64; 2]) -> [f64; 2] {
    [x[0].clamp(0.0, 1.0), x[1].clamp(0.0, 1.0)]
}

#[inline]
fn dot(a: [f64; 2], b: [f64; 2]) -> f64 {
    a[0] * b[0] + a[1] * b[1]
}

#[inline]
fn inf_norm(a: [f64; 2]) -> f64 {
    a[0].abs().max(a[1].abs())
}

/// Gradient components pointing out of the box at an active bound are
/// zeroed. A zero projected gradient is first-order optimality for the
/// box-constrained problem.
fn projected_gradient(x: [f64; 2], g: [f64; 2]) -> [f64; 2] {
    let mut pg = g;
    for i in 0..2 {
        if (x[i] <= 0.0 && g[i] > 0.0) || (x[i] >= 1.0 && g[i] < 0.0) {
            pg[i] = 0.0;
        }
    }
    pg
}

/// Finite-difference gradient. Forward step where it stays inside the box,
/// backward at the upper bound; the objective is never evaluated outside
/// the unit square.
fn gradient<F: Fn([f64; 2]) -> f64>(f: &F, x: [f64; 2], fx: f64, h: f64) -> [f64; 2] {
    let mut g = [0.0; 2];
    for i in 0..2 {
        let mut probe = x;
        if x[i] + h <= 1.0 {
            probe[i] = x[i] + h;
            g[i] = (f(probe) - fx) / h;
        } else {
            probe[i] = x[i] - h;
            g[i] = (fx - f(probe)) / h;
        }
    }
    g
}

/// Two-loop recursion: the quasi-Newton direction `-H g` for the current
/// inverse-Hessian estimate. An empty history yields plain `-g`.
fn two_loop(g: [f64; 2], hist: &[([f64; 2], [f64; 2], f64)]) -> [f64; 2] {
    let mut q = g;
    let mut alphas = Vec::with_capacity(hist.len());
    for &(s, y, rho) in hist.iter().rev() {
        let alpha = rho * dot(s, q);
        q = [q[0] - alpha * y[0], q[1] - alpha * y[1]];
        alphas.push(alpha);
    }
    if let Some(&(s, y, _)) = hist.last() {
        let yy = dot(y, y);
        if yy > 0.0 {
            let gamma = dot(s, y) / yy;
            q = [gamma * q[0], gamma * q[1]];
        }
    }
    for (&(s, y, rho), &alpha) in hist.iter().zip(alphas.iter().rev()) {
        let beta = rho * dot(y, q);
        q = [q[0] + (alpha - beta) * s[0], q[1] + (alpha - beta) * s[1]];
    }
    [-q[0], -q[1]]
}

/// Projected backtracking line search. Halves alpha until the clamped trial
/// point satisfies the Armijo condition measured along the projected step.
/// Returns `None` when the direction is fully blocked by the bounds or no
/// acceptable step exists above [`MIN_STEP`].
fn line_search<F: Fn([f64; 2]) -> f64>(
    f: &F,
    x: [f64; 2],
    fx: f64,
    g: [f64; 2],
    d: [f64; 2],
) -> Option<([f64; 2], f64)> {
    let mut alpha = 1.0;
    while alpha >= MIN_STEP {
        let trial = clamp_unit([x[0] + alpha * d[0], x[1] + alpha * d[1]]);
        let step = [trial[0] - x[0], trial[1] - x[1]];
        if inf_norm(step) == 0.0 {
            return None;
        }
        let slope = dot(g, step);
        if slope < 0.0 {
            let ft = f(trial);
            if ft <= fx + ARMIJO_C1 * slope {
                return Some((trial, ft));
            }
        }
        alpha *= 0.5;
    }
    None
}

/// Minimize `f` over the unit square starting from `start` (clamped into
/// the box first). Tolerances, the finite-difference step and the iteration
/// cap come from `cfg`.
pub fn minimize_unit_square<F: Fn([f64; 2]) -> f64>(
    f: F,
    start: [f64; 2],
    cfg: &SolverConfig,
) -> MinimizeOutcome {
    let mut x = clamp_unit(start);
    let mut fx = f(x);
    let mut g = gradient(&f, x, fx, cfg.grad_step);
    let mut hist: Vec<([f64; 2], [f64; 2], f64)> = Vec::with_capacity(cfg.history);
    let mut converged = false;
    let mut iterations = 0;

    while iterations < cfg.max_iters {
        iterations += 1;

        let pg = projected_gradient(x, g);
        if inf_norm(pg) <= cfg.pg_tol {
            converged = true;
            break;
        }

        let mut d = two_loop(g, &hist);
        let descent = dot(d, g);
        if !descent.is_finite() || descent >= 0.0 {
            hist.clear();
            d = [-pg[0], -pg[1]];
        }
        if hist.is_empty() {
            // First step and restarts run a unit-capped steepest descent so
            // a 40-scale gradient does not fling the iterate across the box.
            let n = inf_norm(d);
            if n > 1.0 {
                d = [d[0] / n, d[1] / n];
            }
        }

        let accepted = line_search(&f, x, fx, g, d).or_else(|| {
            // Quasi-Newton direction rejected; one retry along the
            // projected steepest descent before giving up.
            hist.clear();
            let mut sd = [-pg[0], -pg[1]];
            let n = inf_norm(sd);
            if n > 1.0 {
                sd = [sd[0] / n, sd[1] / n];
            }
            line_search(&f, x, fx, g, sd)
        });

        let Some((xn, fxn)) = accepted else {
            break;
        };

        let improvement = fx - fxn;
        let scale = fx.abs().max(fxn.abs()).max(1.0);
        let s = [xn[0] - x[0], xn[1] - x[1]];
        let gn = gradient(&f, xn, fxn, cfg.grad_step);
        let y = [gn[0] - g[0], gn[1] - g[1]];
        let sy = dot(s, y);
        if sy > CURVATURE_FLOOR {
            if hist.len() == cfg.history {
                hist.remove(0);
            }
            hist.push((s, y, 1.0 / sy));
        }
        x = xn;
        fx = fxn;
        g = gn;

        if improvement <= cfg.f_tol * scale {
            converged = true;
            break;
        }
    }

    MinimizeOutcome { x, value: fx, iterations, converged }
}
