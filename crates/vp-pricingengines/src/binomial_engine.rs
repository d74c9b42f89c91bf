//! Cox–Ross–Rubinstein lattice engine.
//!
//! The tree spans the configured maturity (the calculation-date offset is
//! not applied). The flat rate fixes the validity of the tree: its
//! risk-neutral probability must lie in `[0, 1]`. During rollback each
//! layer `i` discounts with the curve rate at `i/N`.

use crate::configuration::PricingConfiguration;
use crate::factory::PricerMethod;
use crate::greeks::{bump_and_reprice, Greeks};
use crate::pricer::OptionPricer;
use tracing::debug;
use vp_core::{errors::Result, Real};
use vp_instruments::VanillaOption;
use vp_methods::lattice::{backward_induction, BinomialTree};

/// Binomial-tree pricer for European and American options.
#[derive(Debug, Clone, Default)]
pub struct LatticePricer {
    config: PricingConfiguration,
}

impl LatticePricer {
    /// Create a pricer with the given configuration.
    pub fn new(config: PricingConfiguration) -> Self {
        Self { config }
    }

    /// Price `option` under an arbitrary configuration.
    pub fn price_with(option: &VanillaOption, config: &PricingConfiguration) -> Result<Real> {
        let q = option.dividend();
        let tree = BinomialTree::cox_ross_rubinstein(
            option.underlying(),
            option.volatility(),
            config.maturity,
            config.lattice_steps,
        )?;
        let p = tree.checked_probability(config.risk_free_rate, q)?;
        debug!(
            steps = tree.steps(),
            maturity = config.maturity,
            probability = p,
            american = option.is_american(),
            "lattice price"
        );
        Ok(backward_induction(
            &tree,
            |s| option.intrinsic(s),
            q,
            |t| config.local_rate(t),
            option.is_american(),
        ))
    }
}

impl OptionPricer for LatticePricer {
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
        PricerMethod::Lattice
    }
}
