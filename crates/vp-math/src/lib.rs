//! # vp-math
//!
//! Numerical building blocks shared by the pricing engines: the standard
//! normal distribution (via statrs), Mersenne Twister based random number
//! generation, running statistics, linear interpolation and the quadratic
//! least-squares regression used by Longstaff–Schwartz.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// Probability distributions.
pub mod distributions;

/// 1D interpolation schemes.
pub mod interpolations;

/// Least-squares regression.
pub mod linear_least_squares;

/// Random number generators.
pub mod random_numbers;

/// Statistics accumulators.
pub mod statistics;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use distributions::{normal_cdf, normal_cdf_inverse, normal_pdf};
pub use interpolations::LinearInterpolation;
pub use linear_least_squares::{evaluate_quadratic, quadratic_regression, DETERMINANT_TOLERANCE};
pub use random_numbers::{derive_seed, InverseCumulativeNormalRng, MersenneTwisterUniformRng};
pub use statistics::Statistics;
