//! Crank–Nicolson finite-difference engine.
//!
//! Solves the Black–Scholes PDE backward from the payoff on the spot grid
//! `[0, S_max]`, with `S_max` the configured ceiling or `3·max(K, S₀)`.
//! Boundary values are
//!
//! * call: `V(0) = 0`, `V(S_max) = S_max·e^{−qτ} − K·e^{−rτ}`
//! * put: `V(0) = K·e^{−rτ}`, `V(S_max) = 0`
//!
//! and the price is read off the final grid at `S₀` by linear interpolation.

use crate::configuration::PricingConfiguration;
use crate::factory::PricerMethod;
use crate::greeks::{bump_and_reprice, Greeks};
use crate::pricer::OptionPricer;
use vp_core::{ensure, errors::Result, Rate, Real, Time};
use vp_instruments::{OptionType, VanillaOption};
use vp_math::{interpolations::Interpolation1D, LinearInterpolation};
use vp_methods::finite_differences::CrankNicolsonSolver;

/// Finite-difference pricer for European and American options.
#[derive(Debug, Clone, Default)]
pub struct FiniteDifferencePricer {
    config: PricingConfiguration,
}

impl FiniteDifferencePricer {
    /// Create a pricer with the given configuration.
    pub fn new(config: PricingConfiguration) -> Self {
        Self { config }
    }

    /// Price `option` under an arbitrary configuration.
    pub fn price_with(option: &VanillaOption, config: &PricingConfiguration) -> Result<Real> {
        let t = config.effective_maturity();
        ensure!(
            t > 0.0 => InvalidTemporal,
            "effective maturity {t} is not positive (maturity {}, elapsed {})",
            config.maturity,
            config.elapsed_years()
        );

        let s0 = option.underlying();
        let k = option.strike();
        let q = option.dividend();
        let s_max = if config.pde_price_ceiling > 0.0 {
            config.pde_price_ceiling
        } else {
            3.0 * k.max(s0)
        };

        let solver = CrankNicolsonSolver::new(
            t,
            option.volatility(),
            q,
            s_max,
            config.pde_spot_steps,
            config.pde_time_steps,
        )?;

        let option_type = option.option_type();
        let boundary = move |tau: Time, r: Rate| match option_type {
            OptionType::Call => (0.0, s_max * (-q * tau).exp() - k * (-r * tau).exp()),
            OptionType::Put => (k * (-r * tau).exp(), 0.0),
        };

        let values = solver.rollback(
            |s| option.intrinsic(s),
            |x| config.local_rate(x),
            boundary,
            option.is_american(),
        );
        let grid = solver.grid();
        Ok(LinearInterpolation::new(&grid, &values)?.operator(s0))
    }
}

impl OptionPricer for FiniteDifferencePricer {
    fn price(&self, option: &VanillaOption) -> Result<Real> {
        Self::price_with(option, &self.config)
    }

    fn compute_greeks(&self, option: &VanillaOption) -> Result<Greeks> {
        bump_and_reprice(option, &self.config, Self::price_with)
    }

    fn configuration(&self) -> &PricingConfiguration {
        &self.config
    }

    fn method(&self) -> PricerMethod {
        PricerMethod::FiniteDifference
    }
}
