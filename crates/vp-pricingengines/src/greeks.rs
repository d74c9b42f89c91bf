//! Greeks and the bump-and-reprice protocol of the numerical engines.
//!
//! Sensitivities are central differences of full reprices:
//!
//! | Greek | bump | estimator |
//! |---|---|---|
//! | delta | `h = 1%·S` | `(P₊ − P₋)/2h` |
//! | gamma | `h = 1%·S` | `(P₊ − 2P₀ + P₋)/h²` |
//! | vega | `±0.01` vol | `(P₊ − P₋)/0.02` |
//! | theta | maturity `−1/365` | `(P(T−δ) − P(T))/δ` |
//! | rho | `±0.001` on every curve point, or on the flat rate | `(P₊ − P₋)/0.002` |
//!
//! Theta is the change in value per year as calendar time passes, which is
//! negative for a typical long option; the analytic engine reports the
//! same quantity in closed form.

use crate::configuration::PricingConfiguration;
use serde::{Deserialize, Serialize};
use tracing::debug;
use vp_core::{errors::Result, Real};
use vp_instruments::VanillaOption;

/// Relative spot bump for delta and gamma.
pub const SPOT_BUMP: Real = 0.01;
/// Absolute volatility bump for vega.
pub const VOLATILITY_BUMP: Real = 0.01;
/// Maturity decrement for theta (one day).
pub const THETA_STEP: Real = 1.0 / 365.0;
/// Absolute rate bump for rho.
pub const RATE_BUMP: Real = 0.001;

/// First- and second-order sensitivities of an option price.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Greeks {
    /// ∂V/∂S.
    pub delta: Real,
    /// ∂²V/∂S².
    pub gamma: Real,
    /// ∂V/∂σ, per unit of volatility.
    pub vega: Real,
    /// ∂V/∂t, per year.
    pub theta: Real,
    /// ∂V/∂r, per unit of rate.
    pub rho: Real,
}

/// `config` with every rate moved by `bump`: the curve points when the
/// curve is non-empty, the flat rate otherwise.
pub fn shift_rates(config: &PricingConfiguration, bump: Real) -> PricingConfiguration {
    let mut shifted = config.clone();
    if config.yield_curve.is_empty() {
        shifted.risk_free_rate += bump;
    } else {
        shifted.yield_curve = config.yield_curve.shifted(bump);
    }
    shifted
}

/// Estimate [`Greeks`] by repricing bumped copies of `option` and `config`.
///
/// `price` is called nine times. The spot, volatility, time and rate legs
/// run concurrently on the rayon pool. The first failing reprice is
/// returned as the error.
pub fn bump_and_reprice<F>(
    option: &VanillaOption,
    config: &PricingConfiguration,
    price: F,
) -> Result<Greeks>
where
    F: Fn(&VanillaOption, &PricingConfiguration) -> Result<Real> + Sync,
{
    let s = option.underlying();
    let h = SPOT_BUMP * s;
    let sigma = option.volatility();

    let spot_leg = || -> Result<(Real, Real, Real)> {
        let ((base, up), down) = rayon::join(
            || {
                rayon::join(
                    || price(option, config),
                    || price(&option.with_underlying(s + h), config),
                )
            },
            || price(&option.with_underlying(s - h), config),
        );
        Ok((base?, up?, down?))
    };

    let vol_leg = || -> Result<Real> {
        let (up, down) = rayon::join(
            || price(&option.with_volatility(sigma + VOLATILITY_BUMP), config),
            || price(&option.with_volatility(sigma - VOLATILITY_BUMP), config),
        );
        Ok((up? - down?) / (2.0 * VOLATILITY_BUMP))
    };

    let time_leg = || -> Result<Real> {
        let mut earlier = config.clone();
        earlier.maturity -= THETA_STEP;
        price(option, &earlier)
    };

    let rate_leg = || -> Result<Real> {
        let (up, down) = rayon::join(
            || price(option, &shift_rates(config, RATE_BUMP)),
            || price(option, &shift_rates(config, -RATE_BUMP)),
        );
        Ok((up? - down?) / (2.0 * RATE_BUMP))
    };

    let ((spot, vega), (shorter, rho)) = rayon::join(
        || rayon::join(spot_leg, vol_leg),
        || rayon::join(time_leg, rate_leg),
    );
    let (base, up, down) = spot?;
    let vega = vega?;
    let shorter = shorter?;
    let rho = rho?;

    let greeks = Greeks {
        delta: (up - down) / (2.0 * h),
        gamma: (up - 2.0 * base + down) / (h * h),
        vega,
        theta: (shorter - base) / THETA_STEP,
        rho,
    };
    debug!(?greeks, base, "bump-and-reprice greeks");
    Ok(greeks)
}
