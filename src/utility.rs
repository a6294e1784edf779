//! Log-utility model for the two-party allocation game.
//!
//! A pool of `pool` resource units is steered by whichever party ends up in
//! control: with probability `m` (team aligned's bargaining weight) the
//! aligned profile coordinate governs the whole pool, otherwise the
//! unaligned coordinate does. Aligned consumes good X, unaligned consumes
//! good Y, and each party's utility is its expected base-10 log payoff,
//! floored at zero: an allocation below one unit is worthless, not
//! negatively valued.
//!
//! With the default pool of 1e22 units, `clamped_log10(pool * x)` equals
//! `22 + log10(x)` for any fraction `x > 1e-22`, so utilities range over
//! `[0, 22]`.

use crate::types::ActionProfile;

/// log10 floored at zero: 0 for `x < 1`, `log10(x)` otherwise.
///
/// The floor introduces a kink (a jump in slope) that the bounded optimizer
/// must tolerate. It is a utility-model choice, not input sanitation:
/// weights and probabilities are validated at the solver and evaluator
/// entry points, never silently absorbed here.
#[inline(always)]
pub fn clamped_log10(x: f64) -> f64 {
    if x < 1.0 {
        0.0
    } else {
        x.log10()
    }
}

/// Team aligned's expected log payoff in units of good X.
///
/// `m * clamped_log10(pool * q.aligned) + (1-m) * clamped_log10(pool * q.unaligned)`
#[inline(always)]
pub fn utility_aligned(m: f64, q: ActionProfile, pool: f64) -> f64 {
    m * clamped_log10(pool * q.aligned) + (1.0 - m) * clamped_log10(pool * q.unaligned)
}

/// Team unaligned's expected log payoff in units of good Y: the mirror of
/// [`utility_aligned`] on the complementary allocations.
#[inline(always)]
pub fn utility_unaligned(m: f64, q: ActionProfile, pool: f64) -> f64 {
    utility_aligned(m, q.complement(), pool)
}
