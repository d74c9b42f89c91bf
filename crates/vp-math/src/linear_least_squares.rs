//! Least-squares regression on the quadratic basis `{1, x, x²}`.
//!
//! Longstaff–Schwartz approximates the continuation value of an American
//! option by regressing discounted future cash flows on the current spot.
//! The fit is obtained from the 3×3 normal equations
//! $\mathbf{A}^\top\mathbf{A}\,\boldsymbol{\beta} = \mathbf{A}^\top\mathbf{y}$
//! built incrementally from power sums, so only the in-the-money sample
//! pairs need to be streamed through once.

use nalgebra::{Matrix3, Vector3};
use vp_core::Real;

/// Normal matrices whose determinant falls below this magnitude are treated
/// as singular and yield no fit.
pub const DETERMINANT_TOLERANCE: Real = 1e-10;

/// Fit `y ≈ β₀ + β₁·x + β₂·x²` to the given `(x, y)` pairs.
///
/// Returns `None` when the normal matrix is degenerate, i.e. fewer than
/// three distinct abscissae or `|det| < DETERMINANT_TOLERANCE`.
///
/// # Example
/// ```
/// use vp_math::quadratic_regression;
/// let pts = (0..5).map(|i| {
///     let x = i as f64;
///     (x, 1.0 + 2.0 * x + 3.0 * x * x)
/// });
/// let [b0, b1, b2] = quadratic_regression(pts).unwrap();
/// assert!((b0 - 1.0).abs() < 1e-8);
/// assert!((b1 - 2.0).abs() < 1e-8);
/// assert!((b2 - 3.0).abs() < 1e-8);
/// ```
pub fn quadratic_regression<I>(points: I) -> Option<[Real; 3]>
where
    I: IntoIterator<Item = (Real, Real)>,
{
    // power sums Σxᵏ for k = 0..4 and Σxᵏy for k = 0..2
    let mut sx = [0.0; 5];
    let mut sxy = [0.0; 3];
    for (x, y) in points {
        let x2 = x * x;
        sx[0] += 1.0;
        sx[1] += x;
        sx[2] += x2;
        sx[3] += x2 * x;
        sx[4] += x2 * x2;
        sxy[0] += y;
        sxy[1] += x * y;
        sxy[2] += x2 * y;
    }

    #[rustfmt::skip]
    let normal = Matrix3::new(
        sx[0], sx[1], sx[2],
        sx[1], sx[2], sx[3],
        sx[2], sx[3], sx[4],
    );
    let det = normal.determinant();
    if det.is_nan() || det.abs() < DETERMINANT_TOLERANCE {
        return None;
    }
    let rhs = Vector3::new(sxy[0], sxy[1], sxy[2]);
    let beta = normal.lu().solve(&rhs)?;
    Some([beta[0], beta[1], beta[2]])
}

/// Evaluate the fitted quadratic at `x`.
#[inline]
pub fn evaluate_quadratic(beta: &[Real; 3], x: Real) -> Real {
    beta[0] + x * (beta[1] + x * beta[2])
}
