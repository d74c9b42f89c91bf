//! Construction of pricers by method.

use crate::analytic_european_engine::AnalyticPricer;
use crate::binomial_engine::LatticePricer;
use crate::configuration::PricingConfiguration;
use crate::fd_crank_nicolson_engine::FiniteDifferencePricer;
use crate::mc_vanilla_engine::SimulationPricer;
use crate::pricer::OptionPricer;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use vp_core::errors::{Error, Result};

// ─── PricerMethod ─────────────────────────────────────────────────────────────

/// The numerical method of a pricer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PricerMethod {
    /// Black–Scholes–Merton closed form.
    Analytic,
    /// Cox–Ross–Rubinstein binomial tree.
    Lattice,
    /// Crank–Nicolson finite differences.
    FiniteDifference,
    /// Monte Carlo simulation.
    Simulation,
}

impl PricerMethod {
    /// Every method, in declaration order.
    pub const ALL: [PricerMethod; 4] = [
        PricerMethod::Analytic,
        PricerMethod::Lattice,
        PricerMethod::FiniteDifference,
        PricerMethod::Simulation,
    ];

    /// Canonical tag, as accepted by [`FromStr`].
    pub fn tag(self) -> &'static str {
        match self {
            PricerMethod::Analytic => "analytic",
            PricerMethod::Lattice => "lattice",
            PricerMethod::FiniteDifference => "finite-difference",
            PricerMethod::Simulation => "simulation",
        }
    }
}

impl fmt::Display for PricerMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for PricerMethod {
    type Err = Error;

    /// Case-insensitive; `_` and spaces are read as `-`.
    fn from_str(s: &str) -> Result<Self> {
        let tag: String = s
            .trim()
            .chars()
            .map(|c| match c {
                '_' | ' ' => '-',
                c => c.to_ascii_lowercase(),
            })
            .collect();
        match tag.as_str() {
            "analytic" | "black-scholes" | "black-scholes-merton" | "bs" | "bsm" | "closed-form" => {
                Ok(PricerMethod::Analytic)
            }
            "lattice" | "binomial" | "crr" | "tree" | "cox-ross-rubinstein" => {
                Ok(PricerMethod::Lattice)
            }
            "finite-difference" | "fd" | "fdm" | "pde" | "crank-nicolson" => {
                Ok(PricerMethod::FiniteDifference)
            }
            "simulation" | "mc" | "monte-carlo" | "longstaff-schwartz" | "lsm" => {
                Ok(PricerMethod::Simulation)
            }
            _ => Err(Error::UnknownMethod(s.to_string())),
        }
    }
}

// ─── PricerFactory ────────────────────────────────────────────────────────────

/// Builds boxed [`OptionPricer`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct PricerFactory;

impl PricerFactory {
    /// A pricer for `method` with the default configuration.
    pub fn create(method: PricerMethod) -> Box<dyn OptionPricer> {
        Self::create_with(method, PricingConfiguration::default())
    }

    /// A pricer for `method` holding `config`.
    pub fn create_with(method: PricerMethod, config: PricingConfiguration) -> Box<dyn OptionPricer> {
        match method {
            PricerMethod::Analytic => Box::new(AnalyticPricer::new(config)),
            PricerMethod::Lattice => Box::new(LatticePricer::new(config)),
            PricerMethod::FiniteDifference => Box::new(FiniteDifferencePricer::new(config)),
            PricerMethod::Simulation => Box::new(SimulationPricer::new(config)),
        }
    }

    /// Parse `tag` as a [`PricerMethod`] and build the pricer.
    ///
    /// # Errors
    /// [`Error::UnknownMethod`] if the tag is not recognised.
    pub fn create_from_tag(tag: &str, config: PricingConfiguration) -> Result<Box<dyn OptionPricer>> {
        Ok(Self::create_with(tag.parse()?, config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_and_aliases() {
        for method in PricerMethod::ALL {
            assert_eq!(method.tag().parse::<PricerMethod>(), Ok(method));
            assert_eq!(method.to_string().to_uppercase().parse::<PricerMethod>(), Ok(method));
        }
        assert_eq!("Black_Scholes".parse(), Ok(PricerMethod::Analytic));
        assert_eq!("CRR".parse(), Ok(PricerMethod::Lattice));
        assert_eq!(" crank nicolson ".parse(), Ok(PricerMethod::FiniteDifference));
        assert_eq!("Monte-Carlo".parse(), Ok(PricerMethod::Simulation));
    }

    #[test]
    fn unknown_tag() {
        assert_eq!(
            "heston".parse::<PricerMethod>(),
            Err(Error::UnknownMethod("heston".into()))
        );
        assert!(matches!(
            PricerFactory::create_from_tag("", PricingConfiguration::default()),
            Err(Error::UnknownMethod(_))
        ));
    }

    #[test]
    fn factory_builds_requested_method() {
        for method in PricerMethod::ALL {
            assert_eq!(PricerFactory::create(method).method(), method);
        }
        let config = PricingConfiguration::default().with_lattice_steps(7);
        let pricer = PricerFactory::create_from_tag("binomial", config).unwrap();
        assert_eq!(pricer.method(), PricerMethod::Lattice);
        assert_eq!(pricer.configuration().lattice_steps, 7);
    }

    #[test]
    fn serde_uses_canonical_tags() {
        #[derive(Serialize, Deserialize)]
        struct Doc {
            method: PricerMethod,
        }
        let doc: Doc = toml::from_str("method = \"finite-difference\"").unwrap();
        assert_eq!(doc.method, PricerMethod::FiniteDifference);
        let out = toml::to_string(&Doc { method: PricerMethod::Simulation }).unwrap();
        assert_eq!(out.trim(), "method = \"simulation\"");
    }
}
