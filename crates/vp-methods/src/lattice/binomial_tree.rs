//! Cox–Ross–Rubinstein recombining binomial tree.
//!
//! Node `(i, j)` is the state after `j` up-moves and `i − j` down-moves,
//! with value `S₀·uʲ·dⁱ⁻ʲ`, `u = exp(σ√Δt)` and `d = 1/u`. The drift lives
//! entirely in the branch probabilities, which the caller may recompute
//! per layer from a local rate.

use vp_core::{ensure, errors::Result, Rate, Real, Size, Time};

/// A recombining CRR tree.
#[derive(Debug, Clone)]
pub struct BinomialTree {
    x0: Real,
    dt: Time,
    steps: Size,
    up: Real,
    down: Real,
}

impl BinomialTree {
    /// Build a CRR tree for spot `x0` and volatility `sigma` over `[0, end]`.
    ///
    /// # Errors
    /// [`InvalidParameters`](vp_core::Error::InvalidParameters) if `steps`
    /// is zero.
    pub fn cox_ross_rubinstein(x0: Real, sigma: Real, end: Time, steps: Size) -> Result<Self> {
        ensure!(steps > 0 => InvalidParameters, "binomial tree needs at least one step");
        let dt = end / steps as Real;
        let up = (sigma * dt.sqrt()).exp();
        Ok(Self {
            x0,
            dt,
            steps,
            up,
            down: 1.0 / up,
        })
    }

    // ── Accessors ────────────────────────────────────────────────────────

    /// Number of time steps.
    pub fn steps(&self) -> Size {
        self.steps
    }

    /// Time increment per step.
    pub fn dt(&self) -> Time {
        self.dt
    }

    /// Up factor `u`.
    pub fn up(&self) -> Real {
        self.up
    }

    /// Down factor `d = 1/u`.
    pub fn down(&self) -> Real {
        self.down
    }

    /// Number of nodes at time step `i` (always `i + 1`).
    pub fn size(&self, i: Size) -> Size {
        i + 1
    }

    /// Index of the descendant node at step `i+1` for a given `branch`.
    ///
    /// `branch = 0` → down, `branch = 1` → up.
    pub fn descendant(&self, _i: Size, index: Size, branch: Size) -> Size {
        index + branch
    }

    /// Underlying value at node `(i, index)`.
    pub fn underlying(&self, i: Size, index: Size) -> Real {
        self.x0 * self.up.powi(index as i32) * self.down.powi((i - index) as i32)
    }

    /// Risk-neutral up probability `(exp((r − q)Δt) − d)/(u − d)`.
    ///
    /// Not range checked; see [`checked_probability`](Self::checked_probability).
    #[inline]
    pub fn probability(&self, r: Rate, q: Rate) -> Real {
        (((r - q) * self.dt).exp() - self.down) / (self.up - self.down)
    }

    /// [`probability`](Self::probability), failing when it leaves `[0, 1]`
    /// or is not a number (e.g. zero volatility, where `u = d`).
    pub fn checked_probability(&self, r: Rate, q: Rate) -> Result<Real> {
        let p = self.probability(r, q);
        ensure!(
            (0.0..=1.0).contains(&p) => InvalidParameters,
            "risk-neutral probability {p} outside [0, 1] (r = {r}, q = {q}, dt = {})",
            self.dt
        );
        Ok(p)
    }
}
