//! The `OptionPricer` trait implemented by every engine.

use crate::configuration::PricingConfiguration;
use crate::factory::PricerMethod;
use crate::greeks::Greeks;
use std::fmt;
use vp_core::{errors::Result, Real};
use vp_instruments::VanillaOption;

/// A configured vanilla option pricer.
///
/// Implementations hold only their configuration, so a single pricer may be
/// shared between threads and called concurrently.
pub trait OptionPricer: fmt::Debug + Send + Sync {
    /// Present value of `option`.
    fn price(&self, option: &VanillaOption) -> Result<Real>;

    /// Delta, gamma, vega, theta and rho of `option`.
    fn compute_greeks(&self, option: &VanillaOption) -> Result<Greeks>;

    /// The configuration this pricer was built with.
    fn configuration(&self) -> &PricingConfiguration;

    /// The numerical method behind this pricer.
    fn method(&self) -> PricerMethod;
}
