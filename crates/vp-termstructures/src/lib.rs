//! # vp-termstructures
//!
//! The piecewise-linear yield curve used for variable-rate discounting by
//! the lattice, finite-difference and Monte Carlo engines.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// `YieldCurve` — rate points with clamped linear interpolation.
pub mod yield_curve;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use yield_curve::{RatePoint, YieldCurve};
