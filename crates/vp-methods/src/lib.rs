//! # vp-methods
//!
//! Numerical methods behind the vanilla engines: the CRR binomial lattice,
//! the Crank–Nicolson finite-difference solver and the Monte Carlo path
//! machinery with Longstaff–Schwartz regression.
//!
//! The methods know nothing about options or configurations. They take
//! payoffs, boundary conditions and rate lookups as closures so each engine
//! decides how the curve is sampled.
//!
//! # Modules
//!
//! * [`lattice`] — binomial tree and backward induction
//! * [`finite_differences`] — tridiagonal solver and the CN spot-grid solver
//! * [`monte_carlo`] — path arena, European estimator, Longstaff–Schwartz

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// Lattice methods: CRR binomial tree, backward induction.
pub mod lattice;

/// Monte Carlo simulation: path generation, estimators, regression.
pub mod monte_carlo;

/// Finite difference methods: tridiagonal solver, Crank–Nicolson grid.
pub mod finite_differences;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use finite_differences::{CrankNicolsonSolver, TridiagonalOperator};
pub use lattice::{backward_induction, BinomialTree};
pub use monte_carlo::{
    longstaff_schwartz, simulate_european, GbmStepper, PathArena, CHUNK_SIZE,
};
