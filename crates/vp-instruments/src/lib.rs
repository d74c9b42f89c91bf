//! # vp-instruments
//!
//! The single-underlying vanilla option valued by every engine, together
//! with its payoff and exercise style.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// Exercise styles.
pub mod exercise;

/// `VanillaOption` — market and contract data of a vanilla option.
pub mod option;

/// Option payoffs.
pub mod payoff;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use exercise::ExerciseType;
pub use option::VanillaOption;
pub use payoff::{OptionType, Payoff, PlainVanillaPayoff};
