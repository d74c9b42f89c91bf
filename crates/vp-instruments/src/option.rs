//! `VanillaOption` — the value object every engine prices.
//!
//! The option bundles contract terms (strike, type, exercise style) with the
//! market inputs of the underlying (spot, volatility, dividend yield). It is
//! `Copy` so the Greek protocol can perturb a field on a local copy and
//! reprice.

use crate::exercise::ExerciseType;
use crate::payoff::{OptionType, Payoff, PlainVanillaPayoff};
use serde::{Deserialize, Serialize};
use vp_core::{
    ensure,
    errors::Result,
    Price, Real, Volatility,
};

/// A plain vanilla option on a single underlying.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VanillaOption {
    underlying: Price,
    strike: Price,
    volatility: Volatility,
    dividend: Real,
    option_type: OptionType,
    exercise: ExerciseType,
}

impl VanillaOption {
    /// Create an option from its six defining fields.
    pub fn new(
        underlying: Price,
        strike: Price,
        volatility: Volatility,
        dividend: Real,
        option_type: OptionType,
        exercise: ExerciseType,
    ) -> Self {
        Self {
            underlying,
            strike,
            volatility,
            dividend,
            option_type,
            exercise,
        }
    }

    /// European option without dividends.
    pub fn european(option_type: OptionType, underlying: Price, strike: Price, volatility: Volatility) -> Self {
        Self::new(underlying, strike, volatility, 0.0, option_type, ExerciseType::European)
    }

    /// American option without dividends.
    pub fn american(option_type: OptionType, underlying: Price, strike: Price, volatility: Volatility) -> Self {
        Self::new(underlying, strike, volatility, 0.0, option_type, ExerciseType::American)
    }

    // ── Accessors ────────────────────────────────────────────────────────────

    /// Spot price of the underlying.
    pub fn underlying(&self) -> Price {
        self.underlying
    }

    /// Strike price.
    pub fn strike(&self) -> Price {
        self.strike
    }

    /// Annualized volatility.
    pub fn volatility(&self) -> Volatility {
        self.volatility
    }

    /// Continuous dividend yield.
    pub fn dividend(&self) -> Real {
        self.dividend
    }

    /// Call or put.
    pub fn option_type(&self) -> OptionType {
        self.option_type
    }

    /// Exercise style.
    pub fn exercise(&self) -> ExerciseType {
        self.exercise
    }

    /// `true` if the option may be exercised before expiry.
    pub fn is_american(&self) -> bool {
        self.exercise.allows_early_exercise()
    }

    /// The option's payoff.
    pub fn payoff(&self) -> PlainVanillaPayoff {
        PlainVanillaPayoff::new(self.option_type, self.strike)
    }

    /// Exercise value at spot `s`.
    #[inline]
    pub fn intrinsic(&self, s: Real) -> Real {
        self.payoff().value(s)
    }

    // ── Setters ──────────────────────────────────────────────────────────────

    /// Set the spot price.
    pub fn set_underlying(&mut self, underlying: Price) {
        self.underlying = underlying;
    }

    /// Set the strike.
    pub fn set_strike(&mut self, strike: Price) {
        self.strike = strike;
    }

    /// Set the volatility.
    pub fn set_volatility(&mut self, volatility: Volatility) {
        self.volatility = volatility;
    }

    /// Set the dividend yield.
    pub fn set_dividend(&mut self, dividend: Real) {
        self.dividend = dividend;
    }

    /// Set call/put.
    pub fn set_option_type(&mut self, option_type: OptionType) {
        self.option_type = option_type;
    }

    /// Set the exercise style.
    pub fn set_exercise(&mut self, exercise: ExerciseType) {
        self.exercise = exercise;
    }

    // ── Builders ─────────────────────────────────────────────────────────────

    /// Copy with a different spot.
    pub fn with_underlying(mut self, underlying: Price) -> Self {
        self.underlying = underlying;
        self
    }

    /// Copy with a different strike.
    pub fn with_strike(mut self, strike: Price) -> Self {
        self.strike = strike;
        self
    }

    /// Copy with a different volatility.
    pub fn with_volatility(mut self, volatility: Volatility) -> Self {
        self.volatility = volatility;
        self
    }

    /// Copy with a different dividend yield.
    pub fn with_dividend(mut self, dividend: Real) -> Self {
        self.dividend = dividend;
        self
    }

    /// Copy with a different option type.
    pub fn with_option_type(mut self, option_type: OptionType) -> Self {
        self.option_type = option_type;
        self
    }

    /// Copy with a different exercise style.
    pub fn with_exercise(mut self, exercise: ExerciseType) -> Self {
        self.exercise = exercise;
        self
    }

    /// Check the domain of the market inputs.
    ///
    /// Engines do not call this themselves: bumped scenarios such as a
    /// vega reprice at zero volatility step outside the domain on purpose.
    ///
    /// # Errors
    /// [`Precondition`](vp_core::Error::Precondition) if the spot or strike
    /// is not positive, or the volatility or dividend yield is negative.
    pub fn validate(&self) -> Result<()> {
        ensure!(self.underlying > 0.0, "underlying must be positive, got {}", self.underlying);
        ensure!(self.strike > 0.0, "strike must be positive, got {}", self.strike);
        ensure!(self.volatility >= 0.0, "volatility must be non-negative, got {}", self.volatility);
        ensure!(self.dividend >= 0.0, "dividend yield must be non-negative, got {}", self.dividend);
        Ok(())
    }
}
