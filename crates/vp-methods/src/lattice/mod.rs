//! Lattice methods for option pricing.
//!
//! * [`BinomialTree`] — recombining Cox–Ross–Rubinstein tree
//! * [`backward_induction`] — rollback with a per-layer local rate and
//!   optional early exercise

pub mod binomial_tree;

pub use binomial_tree::BinomialTree;

use tracing::trace;
use vp_core::{Rate, Real, Time};

// ─── Backward induction ───────────────────────────────────────────────────────

/// Roll a payoff back through `tree` and return the root value.
///
/// * `payoff` — exercise value as a function of the node's spot
/// * `dividend` — continuous dividend yield `q`
/// * `rate_at` — local rate at the normalized time `i/N` of layer `i`
/// * `american` — take `max(continuation, payoff)` at every node
///
/// Each layer uses its own discount `exp(−r_i Δt)` and its own probability
/// `(exp((r_i − q)Δt) − d)/(u − d)`. A single buffer of `N + 1` values is
/// overwritten in place.
pub fn backward_induction(
    tree: &BinomialTree,
    payoff: impl Fn(Real) -> Real,
    dividend: Rate,
    rate_at: impl Fn(Time) -> Rate,
    american: bool,
) -> Real {
    let n = tree.steps();
    let dt = tree.dt();

    let mut values: Vec<Real> = (0..tree.size(n))
        .map(|j| payoff(tree.underlying(n, j)))
        .collect();

    for i in (0..n).rev() {
        let r = rate_at(i as Real / n as Real);
        let disc = (-r * dt).exp();
        let p = tree.probability(r, dividend);
        trace!(layer = i, rate = r, probability = p, "lattice layer");
        for j in 0..tree.size(i) {
            let up = values[tree.descendant(i, j, 1)];
            let down = values[tree.descendant(i, j, 0)];
            let continuation = disc * (p * up + (1.0 - p) * down);
            values[j] = if american {
                continuation.max(payoff(tree.underlying(i, j)))
            } else {
                continuation
            };
        }
    }

    values[0]
}
