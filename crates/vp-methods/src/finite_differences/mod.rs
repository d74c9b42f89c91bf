//! Finite difference methods for PDE-based option pricing.
//!
//! # Overview
//!
//! * [`TridiagonalOperator`] — tridiagonal matrix with Thomas-algorithm solver
//! * [`CrankNicolsonSolver`] — Black–Scholes PDE on a uniform spot grid
//!   `S_j = j·ΔS`, rolled back from the terminal payoff with the
//!   Crank–Nicolson average of the explicit and implicit operators

use tracing::{debug, trace};
use vp_core::{ensure, errors::Result, Rate, Real, Size, Time};

// ─── Tridiagonal operator ─────────────────────────────────────────────────────

/// A tridiagonal matrix operator.
///
/// Stores the lower, diagonal, and upper bands.
#[derive(Debug, Clone)]
pub struct TridiagonalOperator {
    /// Lower diagonal; index 0 is unused.
    pub lower: Vec<Real>,
    /// Main diagonal.
    pub diag: Vec<Real>,
    /// Upper diagonal; the last index is unused.
    pub upper: Vec<Real>,
}

impl TridiagonalOperator {
    /// Create a zero tridiagonal operator of size `n`.
    pub fn new(n: Size) -> Self {
        Self {
            lower: vec![0.0; n],
            diag: vec![0.0; n],
            upper: vec![0.0; n],
        }
    }

    /// Size (number of rows/columns).
    pub fn size(&self) -> Size {
        self.diag.len()
    }

    /// Apply the operator: `y = A · x`.
    #[cfg(test)]
    pub(crate) fn apply(&self, x: &[Real]) -> Vec<Real> {
        let n = self.size();
        debug_assert_eq!(x.len(), n);
        (0..n)
            .map(|i| {
                let mut y = self.diag[i] * x[i];
                if i > 0 {
                    y += self.lower[i] * x[i - 1];
                }
                if i + 1 < n {
                    y += self.upper[i] * x[i + 1];
                }
                y
            })
            .collect()
    }

    /// Solve `A · x = rhs` using the Thomas algorithm.
    pub fn solve(&self, rhs: &[Real]) -> Vec<Real> {
        let mut x = vec![0.0; self.size()];
        let mut scratch = vec![0.0; self.size()];
        self.solve_into(rhs, &mut x, &mut scratch);
        x
    }

    /// Allocation-free [`solve`](Self::solve): writes the solution to `x`,
    /// using `scratch` for the modified upper band. Both must have length
    /// `size()`.
    ///
    /// The matrix is assumed diagonally dominant (no pivoting).
    pub fn solve_into(&self, rhs: &[Real], x: &mut [Real], scratch: &mut [Real]) {
        let n = self.size();
        debug_assert!(rhs.len() == n && x.len() == n && scratch.len() == n);
        if n == 0 {
            return;
        }

        // forward sweep: scratch holds c', x holds d'
        scratch[0] = self.upper[0] / self.diag[0];
        x[0] = rhs[0] / self.diag[0];
        for i in 1..n {
            let m = self.diag[i] - self.lower[i] * scratch[i - 1];
            scratch[i] = if i + 1 < n { self.upper[i] / m } else { 0.0 };
            x[i] = (rhs[i] - self.lower[i] * x[i - 1]) / m;
        }

        // back substitution
        for i in (0..n - 1).rev() {
            x[i] -= scratch[i] * x[i + 1];
        }
    }
}

// ─── Crank–Nicolson spot-grid solver ─────────────────────────────────────────

/// Crank–Nicolson solver for the Black–Scholes PDE
/// `∂V/∂t + ½σ²S²·∂²V/∂S² + (r−q)S·∂V/∂S − rV = 0` on `S ∈ [0, S_max]`.
///
/// With `S_j = j·ΔS` the spot-scaled coefficients reduce to functions of the
/// node index `j`:
///
/// ```text
/// A_j = ½Δt(½σ²j² − ½(r−q)j)
/// B_j = 1 + ½Δt(σ²j² + r)
/// C_j = ½Δt(½σ²j² + ½(r−q)j)
/// ```
///
/// and each step solves
/// `−A_j V_{j−1}ⁿ + B_j V_jⁿ − C_j V_{j+1}ⁿ = A_j V_{j−1}ⁿ⁺¹ + (2 − B_j) V_jⁿ⁺¹ + C_j V_{j+1}ⁿ⁺¹`
/// for the interior nodes, with Dirichlet values at `j = 0` and `j = M`.
#[derive(Debug, Clone)]
pub struct CrankNicolsonSolver {
    maturity: Time,
    sigma: Real,
    dividend: Rate,
    s_max: Real,
    spot_steps: Size,
    time_steps: Size,
}

impl CrankNicolsonSolver {
    /// Create a solver over `[0, maturity] × [0, s_max]` with `time_steps`
    /// time intervals and `spot_steps` spot intervals.
    ///
    /// # Errors
    /// * [`InvalidTemporal`](vp_core::Error::InvalidTemporal) if `maturity ≤ 0`.
    /// * [`InvalidParameters`](vp_core::Error::InvalidParameters) if
    ///   `time_steps < 1`, `spot_steps < 2` or `s_max ≤ 0`.
    pub fn new(
        maturity: Time,
        sigma: Real,
        dividend: Rate,
        s_max: Real,
        spot_steps: Size,
        time_steps: Size,
    ) -> Result<Self> {
        ensure!(maturity > 0.0 => InvalidTemporal, "time to maturity must be positive, got {maturity}");
        ensure!(time_steps >= 1 => InvalidParameters, "need at least one time step");
        ensure!(spot_steps >= 2 => InvalidParameters, "need at least two spot steps, got {spot_steps}");
        ensure!(s_max > 0.0 => InvalidParameters, "spot ceiling must be positive, got {s_max}");
        Ok(Self {
            maturity,
            sigma,
            dividend,
            s_max,
            spot_steps,
            time_steps,
        })
    }

    /// Grid spacing `ΔS`.
    pub fn ds(&self) -> Real {
        self.s_max / self.spot_steps as Real
    }

    /// The spot grid `S_j = j·ΔS`, `j = 0..=M`.
    pub fn grid(&self) -> Vec<Real> {
        let ds = self.ds();
        (0..=self.spot_steps).map(|j| j as Real * ds).collect()
    }

    /// Roll the terminal `payoff` back to `t = 0` and return the grid values.
    ///
    /// * `rate_at` — local rate at the normalized time to maturity `τ/T`
    /// * `boundary` — `(V(0), V(S_max))` given `τ` and the local rate
    /// * `american` — project every node onto `max(V, payoff)` after each step
    pub fn rollback(
        &self,
        payoff: impl Fn(Real) -> Real,
        rate_at: impl Fn(Time) -> Rate,
        boundary: impl Fn(Time, Rate) -> (Real, Real),
        american: bool,
    ) -> Vec<Real> {
        let m = self.spot_steps;
        let n_int = m - 1;
        let dt = self.maturity / self.time_steps as Real;
        let sigma2 = self.sigma * self.sigma;
        let q = self.dividend;

        debug!(
            spot_steps = m,
            time_steps = self.time_steps,
            s_max = self.s_max,
            maturity = self.maturity,
            american,
            "crank-nicolson rollback"
        );

        let grid = self.grid();
        let intrinsic: Vec<Real> = grid.iter().map(|&s| payoff(s)).collect();
        let mut values = intrinsic.clone();

        let mut op = TridiagonalOperator::new(n_int);
        let mut rhs = vec![0.0; n_int];
        let mut interior = vec![0.0; n_int];
        let mut scratch = vec![0.0; n_int];

        for step in (0..self.time_steps).rev() {
            let t = step as Real * dt;
            let tau = self.maturity - t;
            let r = rate_at(tau / self.maturity);
            let (lo, hi) = boundary(tau, r);
            trace!(step, tau, rate = r, lo, hi, "fd step");

            for k in 0..n_int {
                let j = (k + 1) as Real;
                let diffusion = 0.5 * sigma2 * j * j;
                let drift = 0.5 * (r - q) * j;
                let a = 0.5 * dt * (diffusion - drift);
                let b = 1.0 + 0.5 * dt * (sigma2 * j * j + r);
                let c = 0.5 * dt * (diffusion + drift);

                op.lower[k] = -a;
                op.diag[k] = b;
                op.upper[k] = -c;
                rhs[k] = a * values[k] + (2.0 - b) * values[k + 1] + c * values[k + 2];
            }
            rhs[0] += -op.lower[0] * lo;
            rhs[n_int - 1] += -op.upper[n_int - 1] * hi;

            op.solve_into(&rhs, &mut interior, &mut scratch);

            values[0] = lo;
            values[m] = hi;
            values[1..m].copy_from_slice(&interior);

            if american {
                for (v, &x) in values.iter_mut().zip(&intrinsic) {
                    *v = v.max(x);
                }
            }
        }

        values
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
