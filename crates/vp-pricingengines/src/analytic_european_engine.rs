//! Analytic European option engine (Black–Scholes–Merton).
//!
//! Prices European vanilla options with the closed-form solution and reports
//! the closed-form Greeks. Only the flat configured rate is used; the yield
//! curve plays no part in this engine.

use crate::configuration::PricingConfiguration;
use crate::factory::PricerMethod;
use crate::greeks::Greeks;
use crate::pricer::OptionPricer;
use tracing::debug;
use vp_core::{ensure, errors::Result, Real, Time};
use vp_instruments::{OptionType, VanillaOption};
use vp_math::distributions::{normal_cdf, normal_pdf};

/// Closed-form pricer for European vanilla options.
///
/// $$C = S e^{-qT} N(d_1) - K e^{-rT} N(d_2)$$
/// $$P = K e^{-rT} N(-d_2) - S e^{-qT} N(-d_1)$$
///
/// where $d_{1,2} = \frac{\ln(S/K) + (r - q \pm \sigma^2/2)T}{\sigma\sqrt{T}}$
/// and `T` is the effective maturity of the configuration.
#[derive(Debug, Clone, Default)]
pub struct AnalyticPricer {
    config: PricingConfiguration,
}

impl AnalyticPricer {
    /// Create a pricer with the given configuration.
    pub fn new(config: PricingConfiguration) -> Self {
        Self { config }
    }

    fn evaluate(&self, option: &VanillaOption) -> Result<(Real, Greeks)> {
        ensure!(
            !option.is_american() => InvalidModel,
            "the analytic engine supports only European exercise"
        );
        let t = self.config.effective_maturity();
        debug!(maturity = t, rate = self.config.risk_free_rate, "analytic price");
        black_scholes_merton(
            option.option_type(),
            option.underlying(),
            option.strike(),
            self.config.risk_free_rate,
            option.dividend(),
            option.volatility(),
            t,
        )
    }
}

impl OptionPricer for AnalyticPricer {
    fn price(&self, option: &VanillaOption) -> Result<Real> {
        self.evaluate(option).map(|(price, _)| price)
    }

    fn compute_greeks(&self, option: &VanillaOption) -> Result<Greeks> {
        self.evaluate(option).map(|(_, greeks)| greeks)
    }

    fn configuration(&self) -> &PricingConfiguration {
        &self.config
    }

    fn method(&self) -> PricerMethod {
        PricerMethod::Analytic
    }
}

/// Black–Scholes–Merton price and closed-form [`Greeks`] of a European
/// option. Theta is `∂V/∂t` per year, vega and rho are per unit of
/// volatility and rate. With zero volatility the price is the discounted
/// forward intrinsic value and gamma is zero.
///
/// # Errors
/// [`InvalidTemporal`](vp_core::Error::InvalidTemporal) if
/// `time_to_expiry ≤ 0`.
pub fn black_scholes_merton(
    option_type: OptionType,
    spot: Real,
    strike: Real,
    risk_free_rate: Real,
    dividend_yield: Real,
    volatility: Real,
    time_to_expiry: Time,
) -> Result<(Real, Greeks)> {
    let t = time_to_expiry;
    ensure!(
        t > 0.0 => InvalidTemporal,
        "time to maturity must be positive, got {t}"
    );

    let phi = option_type.sign();
    let (r, q, sigma) = (risk_free_rate, dividend_yield, volatility);
    let sqrt_t = t.sqrt();
    let std_dev = sigma * sqrt_t;
    let df_r = (-r * t).exp();
    let df_q = (-q * t).exp();

    // zero standard deviation: both d's saturate on the side of the forward
    let degenerate = std_dev <= 1e-15;
    let (d1, d2) = if degenerate {
        let forward = spot * ((r - q) * t).exp();
        let d = if forward > strike { 1e15 } else { -1e15 };
        (d, d)
    } else {
        let d1 = ((spot / strike).ln() + (r - q + 0.5 * sigma * sigma) * t) / std_dev;
        (d1, d1 - std_dev)
    };

    let n1 = normal_cdf(phi * d1);
    let n2 = normal_cdf(phi * d2);
    let pdf1 = if degenerate { 0.0 } else { normal_pdf(d1) };
    let spot_leg = spot * df_q;
    let strike_leg = strike * df_r;

    let price = phi * (spot_leg * n1 - strike_leg * n2);
    let greeks = Greeks {
        delta: phi * df_q * n1,
        gamma: if degenerate { 0.0 } else { df_q * pdf1 / (spot * std_dev) },
        vega: spot_leg * pdf1 * sqrt_t,
        theta: -spot_leg * pdf1 * sigma / (2.0 * sqrt_t) - phi * r * strike_leg * n2
            + phi * q * spot_leg * n1,
        rho: phi * strike * t * df_r * n2,
    };
    Ok((price, greeks))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use chrono::{Duration, Local};
    use vp_core::Error;
    use vp_instruments::ExerciseType;
    use vp_termstructures::YieldCurve;

    fn config() -> PricingConfiguration {
        PricingConfiguration::default().with_risk_free_rate(0.05)
    }

    #[test]
    fn bs_call_price() {
        // S=100, K=100, r=5%, q=0%, σ=20%, T=1
        let (price, g) =
            black_scholes_merton(OptionType::Call, 100.0, 100.0, 0.05, 0.0, 0.20, 1.0).unwrap();
        assert_abs_diff_eq!(price, 10.4506, epsilon = 1e-4);
        assert_abs_diff_eq!(g.delta, 0.6368, epsilon = 1e-4);
        assert_abs_diff_eq!(g.gamma, 0.018_762, epsilon = 1e-5);
        assert_abs_diff_eq!(g.vega, 37.524, epsilon = 1e-3);
        assert_abs_diff_eq!(g.theta, -6.414, epsilon = 1e-3);
        assert_abs_diff_eq!(g.rho, 53.232, epsilon = 1e-3);
    }

    #[test]
    fn bs_put_call_parity_with_dividends() {
        let (s, k, r, q, sigma, t) = (100.0, 105.0, 0.08, 0.03, 0.25, 0.5);
        let (call, _) = black_scholes_merton(OptionType::Call, s, k, r, q, sigma, t).unwrap();
        let (put, _) = black_scholes_merton(OptionType::Put, s, k, r, q, sigma, t).unwrap();
        let parity = call - s * (-q * t).exp() + k * (-r * t).exp();
        assert_abs_diff_eq!(put, parity, epsilon = 1e-8);
    }

    #[test]
    fn bs_deep_itm_call() {
        let (price, g) =
            black_scholes_merton(OptionType::Call, 200.0, 100.0, 0.05, 0.0, 0.20, 1.0).unwrap();
        assert!(price > 100.0, "price = {price}");
        assert!(g.delta > 0.95, "delta = {}", g.delta);
    }

    #[test]
    fn bs_zero_vol_call() {
        let (price, g) =
            black_scholes_merton(OptionType::Call, 100.0, 95.0, 0.05, 0.0, 0.0, 1.0).unwrap();
        let expected = 100.0 - 95.0 * (-0.05_f64).exp();
        assert_abs_diff_eq!(price, expected, epsilon = 1e-10);
        assert_eq!(g.gamma, 0.0);
        assert_eq!(g.vega, 0.0);
    }

    #[test]
    fn non_positive_maturity_is_temporal_error() {
        for t in [0.0, -0.1] {
            assert!(matches!(
                black_scholes_merton(OptionType::Put, 90.0, 100.0, 0.05, 0.0, 0.2, t),
                Err(Error::InvalidTemporal(_))
            ));
        }
    }

    #[test]
    fn pricer_matches_formula() {
        let opt = VanillaOption::european(OptionType::Call, 100.0, 100.0, 0.2);
        let pricer = AnalyticPricer::new(config());
        assert_abs_diff_eq!(pricer.price(&opt).unwrap(), 10.4506, epsilon = 1e-4);
        let g = pricer.compute_greeks(&opt).unwrap();
        assert!(g.theta < 0.0);
        assert_eq!(pricer.method(), PricerMethod::Analytic);
    }

    #[test]
    fn american_is_rejected() {
        let opt = VanillaOption::american(OptionType::Put, 100.0, 100.0, 0.2);
        let pricer = AnalyticPricer::new(config());
        assert!(matches!(pricer.price(&opt), Err(Error::InvalidModel(_))));
        assert!(matches!(pricer.compute_greeks(&opt), Err(Error::InvalidModel(_))));
    }

    #[test]
    fn yield_curve_is_ignored() {
        let opt = VanillaOption::european(OptionType::Put, 100.0, 110.0, 0.3)
            .with_exercise(ExerciseType::European);
        let plain = AnalyticPricer::new(config()).price(&opt).unwrap();
        let curved = AnalyticPricer::new(
            config().with_yield_curve(YieldCurve::new().with_rate_point(0.0, 0.2)),
        )
        .price(&opt)
        .unwrap();
        assert_eq!(plain, curved);
    }

    #[test]
    fn calculation_date_shortens_maturity() {
        let opt = VanillaOption::european(OptionType::Call, 100.0, 100.0, 0.2);
        let aged = config().with_calculation_date(Local::now().date_naive() - Duration::days(180));
        let short = AnalyticPricer::new(aged.clone()).price(&opt).unwrap();
        let full = AnalyticPricer::new(config()).price(&opt).unwrap();
        assert!(short < full);
    }

    #[test]
    fn expired_configuration_is_temporal_error() {
        let expired = config()
            .with_maturity(0.25)
            .with_calculation_date(Local::now().date_naive() - Duration::days(400));
        let itm = VanillaOption::european(OptionType::Call, 120.0, 100.0, 0.2);
        let pricer = AnalyticPricer::new(expired);
        assert!(matches!(pricer.price(&itm), Err(Error::InvalidTemporal(_))));
        assert!(matches!(pricer.compute_greeks(&itm), Err(Error::InvalidTemporal(_))));
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn put_call_parity(
                spot in 50.0f64..150.0,
                strike in 50.0f64..150.0,
                rate in 0.0f64..0.1,
                dividend in 0.0f64..0.05,
                vol in 0.05f64..0.6,
                t in 0.05f64..3.0,
            ) {
                let (call, gc) =
                    black_scholes_merton(OptionType::Call, spot, strike, rate, dividend, vol, t).unwrap();
                let (put, gp) =
                    black_scholes_merton(OptionType::Put, spot, strike, rate, dividend, vol, t).unwrap();
                let forward = spot * (-dividend * t).exp() - strike * (-rate * t).exp();
                prop_assert!((call - put - forward).abs() < 1e-7);
                prop_assert!((gc.delta - gp.delta - (-dividend * t).exp()).abs() < 1e-9);
                prop_assert!((gc.gamma - gp.gamma).abs() < 1e-12);
                prop_assert!((gc.vega - gp.vega).abs() < 1e-9);
            }
        }
    }
}
