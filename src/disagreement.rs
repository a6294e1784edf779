//! Disagreement payoffs: what each party walks away with when bargaining
//! breaks down.
//!
//! All three policies price the breakdown off the unilateral reference
//! profile `(1, 0)`: each party spends everything on its own good and
//! nothing on the opponent's.

use serde::Serialize;

use crate::types::{ActionProfile, DisagreementPayoffs};
use crate::utility::{utility_aligned, utility_unaligned};

/// Both parties all-in on their own good.
const UNILATERAL: ActionProfile = ActionProfile::new(1.0, 0.0);

/// How breakdown payoffs are derived from the bargaining weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DisagreementPolicy {
    /// Each party keeps the utility of the unilateral profile: with pool
    /// `10^L` this is `d_A = L*m`, `d_U = L*(1-m)`.
    Unilateral,
    /// Breakdown is worth nothing to either party.
    Zero,
    /// The unilateral payoffs swapped and negated: each party loses what
    /// the opponent would have kept. `d_A = -L*(1-m)`, `d_U = -L*m`.
    MirroredLoss,
}

impl DisagreementPolicy {
    /// Breakdown payoffs for bargaining weight `m`.
    pub fn payoffs(&self, m: f64, pool: f64) -> DisagreementPayoffs {
        let keep_a = utility_aligned(m, UNILATERAL, pool);
        let keep_u = utility_unaligned(m, UNILATERAL, pool);
        match self {
            DisagreementPolicy::Unilateral => DisagreementPayoffs::new(keep_a, keep_u),
            DisagreementPolicy::Zero => DisagreementPayoffs::ZERO,
            DisagreementPolicy::MirroredLoss => DisagreementPayoffs::new(-keep_u, -keep_a),
        }
    }
}
