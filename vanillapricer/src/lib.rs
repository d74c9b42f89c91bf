//! # vanillapricer
//!
//! Vanilla option pricing with four interchangeable engines: the
//! Black–Scholes–Merton closed form, a Cox–Ross–Rubinstein lattice,
//! Crank–Nicolson finite differences and Monte Carlo with
//! Longstaff–Schwartz early exercise.
//!
//! This crate is a **façade** that re-exports the workspace crates.
//! Application code should depend on it rather than on the individual
//! `vp-*` crates.
//!
//! ## Quick start
//!
//! ```rust
//! use vanillapricer::prelude::*;
//!
//! let config = PricingConfiguration::default()
//!     .with_risk_free_rate(0.05)
//!     .with_lattice_steps(200);
//! let option = VanillaOption::american(OptionType::Put, 100.0, 100.0, 0.2);
//!
//! let pricer = PricerFactory::create_with(PricerMethod::Lattice, config);
//! let price = pricer.price(&option)?;
//! let greeks = pricer.compute_greeks(&option)?;
//! assert!(price > 5.5 && greeks.delta < 0.0);
//! # Ok::<(), vanillapricer::core::Error>(())
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Core types, aliases, and error definitions.
pub use vp_core as core;

/// Mathematical utilities: distributions, interpolation, regression, RNG.
pub use vp_math as math;

/// Yield curves.
pub use vp_termstructures as termstructures;

/// Vanilla option description and payoffs.
pub use vp_instruments as instruments;

/// Numerical methods (lattice, finite differences, Monte Carlo).
pub use vp_methods as methods;

/// Configuration, Greeks, the pricer trait and the four engines.
pub use vp_pricingengines as pricingengines;

/// The items needed to configure and run a pricer.
pub mod prelude {
    pub use vp_core::{Error, Real, Result};
    pub use vp_instruments::{ExerciseType, OptionType, VanillaOption};
    pub use vp_pricingengines::{
        Greeks, OptionPricer, PricerFactory, PricerMethod, PricingConfiguration,
    };
    pub use vp_termstructures::{RatePoint, YieldCurve};
}
