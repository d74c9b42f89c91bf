//! 1D interpolation.
//!
//! The finite-difference engine reads its price off the spot grid through
//! [`LinearInterpolation`].

use vp_core::{ensure, errors::Result, Real};

/// A 1D interpolation function `f: R → R` defined by a set of known points.
pub trait Interpolation1D: std::fmt::Debug {
    /// Evaluate the interpolation at `x`.
    fn operator(&self, x: Real) -> Real;

    /// Return the lower bound of the interpolation domain.
    fn x_min(&self) -> Real;

    /// Return the upper bound of the interpolation domain.
    fn x_max(&self) -> Real;

    /// Return `true` if `x` is within the interpolation range.
    fn is_in_range(&self, x: Real) -> bool {
        x >= self.x_min() && x <= self.x_max()
    }
}

// ── Linear ────────────────────────────────────────────────────────────────────

/// Linear interpolation on sorted abscissae.
///
/// `f(x) = y[i] + (y[i+1] - y[i]) * (x - x[i]) / (x[i+1] - x[i])`
///
/// Outside the domain the value is clamped to the nearest end node.
#[derive(Debug, Clone)]
pub struct LinearInterpolation<'a> {
    xs: &'a [Real],
    ys: &'a [Real],
}

impl<'a> LinearInterpolation<'a> {
    /// Borrow sorted `xs` and matching `ys`.
    ///
    /// # Errors
    /// Returns an error if the slices have different lengths or fewer than 2 points.
    pub fn new(xs: &'a [Real], ys: &'a [Real]) -> Result<Self> {
        ensure!(xs.len() >= 2, "need at least 2 points for interpolation");
        ensure!(
            xs.len() == ys.len(),
            "xs and ys must have the same length ({} vs {})",
            xs.len(),
            ys.len()
        );
        Ok(Self { xs, ys })
    }

    fn locate(&self, x: Real) -> usize {
        // index of the last node with xs[i] <= x, limited to [0, n-2]
        let n = self.xs.len();
        self.xs[1..n - 1].partition_point(|&xi| xi <= x)
    }
}

impl Interpolation1D for LinearInterpolation<'_> {
    fn x_min(&self) -> Real {
        self.xs[0]
    }

    fn x_max(&self) -> Real {
        self.xs[self.xs.len() - 1]
    }

    fn operator(&self, x: Real) -> Real {
        if x <= self.x_min() {
            return self.ys[0];
        }
        if x >= self.x_max() {
            return self.ys[self.ys.len() - 1];
        }
        let i = self.locate(x);
        let dx = self.xs[i + 1] - self.xs[i];
        if dx.abs() < f64::EPSILON {
            return self.ys[i];
        }
        self.ys[i] + (x - self.xs[i]) * (self.ys[i + 1] - self.ys[i]) / dx
    }
}
