//! `PricingConfiguration` — the parameters shared by every engine.
//!
//! A configuration is a plain value. Engines keep their own copy, and the
//! Greek protocol clones it to build bumped scenarios. It can be read from
//! TOML; any field left out takes its default:
//!
//! ```toml
//! calculation_date = "2024-03-01"
//! maturity = 1.5
//! risk_free_rate = 0.03
//! lattice_steps = 500
//! yield_curve = [
//!     { maturity = 0.0, rate = 0.02 },
//!     { maturity = 1.0, rate = 0.035 },
//! ]
//! ```

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use vp_core::{
    errors::{Error, Result},
    Rate, Real, Size, Time,
};
use vp_termstructures::YieldCurve;

/// Days per year used to turn the calculation-date offset into a year fraction.
pub const DAYS_PER_YEAR: Real = 365.25;

/// Engine parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PricingConfiguration {
    /// Date the configured maturity is measured from. `None` means today,
    /// i.e. no offset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calculation_date: Option<NaiveDate>,
    /// Time to maturity in years, as of `calculation_date`.
    pub maturity: Time,
    /// Flat rate used when the yield curve is empty (and always by the
    /// analytic engine).
    pub risk_free_rate: Rate,
    /// Binomial tree steps.
    pub lattice_steps: Size,
    /// Crank–Nicolson time steps.
    pub pde_time_steps: Size,
    /// Crank–Nicolson spot steps.
    pub pde_spot_steps: Size,
    /// Upper end of the spot grid; `0` selects `3·max(strike, spot)`.
    pub pde_price_ceiling: Real,
    /// Monte Carlo paths.
    pub mc_paths: Size,
    /// Monte Carlo time steps per path.
    pub mc_steps_per_path: Size,
    /// Seed of the Monte Carlo normal stream.
    pub mc_seed: u64,
    /// Term structure sampled at normalized time; empty selects the flat rate.
    pub yield_curve: YieldCurve,
}

impl Default for PricingConfiguration {
    fn default() -> Self {
        Self {
            calculation_date: None,
            maturity: 1.0,
            risk_free_rate: 2.0,
            lattice_steps: 100,
            pde_time_steps: 100,
            pde_spot_steps: 100,
            pde_price_ceiling: 0.0,
            mc_paths: 10_000,
            mc_steps_per_path: 100,
            mc_seed: 42,
            yield_curve: YieldCurve::new(),
        }
    }
}

impl PricingConfiguration {
    /// Parse a TOML document.
    ///
    /// # Errors
    /// [`Error::Config`] on syntax errors, type mismatches or unknown keys.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| Error::Config(e.to_string()))
    }

    /// Read and parse a TOML file.
    ///
    /// # Errors
    /// [`Error::Resource`] if the file cannot be read, [`Error::Config`] if
    /// it does not parse.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| Error::Resource(format!("cannot read {}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    /// Render as a TOML document.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| Error::Config(e.to_string()))
    }

    /// Years elapsed between the calculation date and `today`; zero without
    /// a calculation date. Negative for a date in the future.
    pub fn elapsed_years_at(&self, today: NaiveDate) -> Time {
        self.calculation_date
            .map_or(0.0, |d| (today - d).num_days() as Real / DAYS_PER_YEAR)
    }

    /// [`elapsed_years_at`](Self::elapsed_years_at) with the local date.
    pub fn elapsed_years(&self) -> Time {
        self.elapsed_years_at(Local::now().date_naive())
    }

    /// `maturity − elapsed_years()`: the time left to expiry today.
    pub fn effective_maturity(&self) -> Time {
        self.maturity - self.elapsed_years()
    }

    /// The curve rate at normalized time `t`, or the flat rate when the
    /// curve is empty.
    #[inline]
    pub fn local_rate(&self, t: Time) -> Rate {
        self.yield_curve.rate_or(t, self.risk_free_rate)
    }

    // ── Builders ─────────────────────────────────────────────────────────────

    /// Set the calculation date.
    pub fn with_calculation_date(mut self, date: NaiveDate) -> Self {
        self.calculation_date = Some(date);
        self
    }

    /// Set the maturity.
    pub fn with_maturity(mut self, maturity: Time) -> Self {
        self.maturity = maturity;
        self
    }

    /// Set the flat risk-free rate.
    pub fn with_risk_free_rate(mut self, rate: Rate) -> Self {
        self.risk_free_rate = rate;
        self
    }

    /// Set the yield curve.
    pub fn with_yield_curve(mut self, curve: YieldCurve) -> Self {
        self.yield_curve = curve;
        self
    }

    /// Set the binomial steps.
    pub fn with_lattice_steps(mut self, steps: Size) -> Self {
        self.lattice_steps = steps;
        self
    }

    /// Set the Crank–Nicolson grid size.
    pub fn with_pde_grid(mut self, time_steps: Size, spot_steps: Size) -> Self {
        self.pde_time_steps = time_steps;
        self.pde_spot_steps = spot_steps;
        self
    }

    /// Set the spot-grid ceiling (`0` for automatic).
    pub fn with_pde_price_ceiling(mut self, ceiling: Real) -> Self {
        self.pde_price_ceiling = ceiling;
        self
    }

    /// Set the Monte Carlo path count and steps per path.
    pub fn with_simulation(mut self, paths: Size, steps_per_path: Size) -> Self {
        self.mc_paths = paths;
        self.mc_steps_per_path = steps_per_path;
        self
    }

    /// Set the Monte Carlo seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.mc_seed = seed;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use chrono::Duration;
    use std::io::Write;

    #[test]
    fn defaults() {
        let c = PricingConfiguration::default();
        assert_eq!(c.calculation_date, None);
        assert_eq!(c.maturity, 1.0);
        assert_eq!(c.risk_free_rate, 2.0);
        assert!(c.yield_curve.is_empty());
        assert_eq!(c.lattice_steps, 100);
        assert_eq!((c.pde_time_steps, c.pde_spot_steps), (100, 100));
        assert_eq!(c.pde_price_ceiling, 0.0);
        assert_eq!((c.mc_paths, c.mc_steps_per_path), (10_000, 100));
        assert_eq!(c.mc_seed, 42);
        assert_eq!(c.elapsed_years(), 0.0);
        assert_eq!(c.effective_maturity(), 1.0);
    }

    #[test]
    fn elapsed_years_uses_day_count() {
        let today = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();
        let c = PricingConfiguration::default()
            .with_calculation_date(today - Duration::days(365));
        assert_abs_diff_eq!(c.elapsed_years_at(today), 365.0 / 365.25, epsilon = 1e-15);
        let future = c.clone().with_calculation_date(today + Duration::days(30));
        assert!(future.elapsed_years_at(today) < 0.0);
    }

    #[test]
    fn effective_maturity_relative_to_today() {
        let today = Local::now().date_naive();
        let c = PricingConfiguration::default()
            .with_maturity(2.0)
            .with_calculation_date(today - Duration::days(73));
        // tolerate a date rollover between the two clock reads
        let expected = 2.0 - 73.0 / DAYS_PER_YEAR;
        assert!((c.effective_maturity() - expected).abs() < 2.0 / DAYS_PER_YEAR);
    }

    #[test]
    fn local_rate_falls_back_to_flat() {
        let c = PricingConfiguration::default().with_risk_free_rate(0.05);
        assert_eq!(c.local_rate(0.3), 0.05);
        let c = c.with_yield_curve(YieldCurve::new().with_rate_point(0.0, 0.01).with_rate_point(1.0, 0.03));
        assert_abs_diff_eq!(c.local_rate(0.5), 0.02, epsilon = 1e-15);
    }

    #[test]
    fn partial_toml_overrides_named_fields() {
        let c = PricingConfiguration::from_toml_str(
            r#"
            calculation_date = "2024-03-01"
            maturity = 1.5
            risk_free_rate = 0.03
            mc_seed = 7
            yield_curve = [{ maturity = 0.0, rate = 0.02 }, { maturity = 1.0, rate = 0.04 }]
            "#,
        )
        .unwrap();
        assert_eq!(c.calculation_date, NaiveDate::from_ymd_opt(2024, 3, 1));
        assert_eq!(c.maturity, 1.5);
        assert_eq!(c.risk_free_rate, 0.03);
        assert_eq!(c.mc_seed, 7);
        assert_eq!(c.yield_curve.len(), 2);
        // untouched fields keep their defaults
        assert_eq!(c.lattice_steps, 100);
        assert_eq!(c.mc_paths, 10_000);
    }

    #[test]
    fn toml_errors() {
        assert!(matches!(
            PricingConfiguration::from_toml_str("lattice_stepz = 10"),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            PricingConfiguration::from_toml_str("maturity = \"soon\""),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            PricingConfiguration::from_toml_file("/definitely/not/here.toml"),
            Err(Error::Resource(_))
        ));
    }

    #[test]
    fn toml_file_round_trip() {
        let original = PricingConfiguration::default()
            .with_calculation_date(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap())
            .with_risk_free_rate(0.04)
            .with_pde_grid(200, 150)
            .with_yield_curve(YieldCurve::new().with_rate_point(0.0, 0.01).with_rate_point(1.0, 0.02));
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(original.to_toml_string().unwrap().as_bytes()).unwrap();
        file.flush().unwrap();
        let loaded = PricingConfiguration::from_toml_file(file.path()).unwrap();
        assert_eq!(loaded, original);
    }
}
