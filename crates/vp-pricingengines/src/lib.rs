//! # vp-pricingengines
//!
//! Vanilla option pricers behind a single [`OptionPricer`] trait.
//!
//! ## Engines
//!
//! - [`AnalyticPricer`] — Black–Scholes–Merton closed form (European only)
//! - [`LatticePricer`] — Cox–Ross–Rubinstein binomial tree
//! - [`FiniteDifferencePricer`] — Crank–Nicolson PDE on a spot grid
//! - [`SimulationPricer`] — Monte Carlo, Longstaff–Schwartz for American exercise
//!
//! The three numerical engines share the bump-and-reprice Greek protocol in
//! [`greeks`]. [`PricerFactory`] builds any of them from a [`PricerMethod`]
//! or a textual tag.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod analytic_european_engine;
pub mod binomial_engine;
pub mod configuration;
pub mod factory;
pub mod fd_crank_nicolson_engine;
pub mod greeks;
pub mod mc_vanilla_engine;
pub mod pricer;

pub use analytic_european_engine::{black_scholes_merton, AnalyticPricer};
pub use binomial_engine::LatticePricer;
pub use configuration::PricingConfiguration;
pub use factory::{PricerFactory, PricerMethod};
pub use fd_crank_nicolson_engine::FiniteDifferencePricer;
pub use greeks::{bump_and_reprice, Greeks};
pub use mc_vanilla_engine::SimulationPricer;
pub use pricer::OptionPricer;
