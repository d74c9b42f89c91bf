//! Error types for vanillapricer.
//!
//! Every failure of the pricing core is reported through the single
//! `thiserror`-derived [`Error`] enum. The variants group failures by cause
//! so that a boundary layer can map them to its own sentinel values. The
//! `ensure!` and `fail!` macros are shorthands for early returns.

use thiserror::Error;

/// The top-level error type used throughout vanillapricer.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// The engine cannot value this kind of option (e.g. an American option
    /// handed to the closed-form engine).
    #[error("invalid model use: {0}")]
    InvalidModel(String),

    /// Numerical parameters are mutually inconsistent or degenerate
    /// (e.g. a risk-neutral probability outside `[0, 1]`, a zero step count).
    #[error("invalid numerical parameters: {0}")]
    InvalidParameters(String),

    /// A yield curve without any points was queried for a rate.
    #[error("yield curve is empty")]
    EmptyCurve,

    /// An external resource could not be read or has a bad format.
    #[error("invalid resource: {0}")]
    Resource(String),

    /// The calculation date leaves no positive time to maturity.
    #[error("invalid temporal configuration: {0}")]
    InvalidTemporal(String),

    /// A pricer method tag was not recognised.
    #[error("unknown pricer method: {0}")]
    UnknownMethod(String),

    /// A configuration document could not be parsed.
    #[error("configuration error: {0}")]
    Config(String),

    /// Precondition violated.
    #[error("precondition not satisfied: {0}")]
    Precondition(String),

    /// General runtime error.
    #[error("{0}")]
    Runtime(String),
}

/// Shorthand `Result` type used throughout vanillapricer.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Return early with an error if a condition does not hold.
///
/// The plain form returns [`Error::Precondition`]. Prefixing the message
/// with `=> Variant` selects any message-carrying variant instead.
///
/// # Example
/// ```
/// use vp_core::{ensure, errors::Error};
/// fn positive(x: f64) -> vp_core::errors::Result<f64> {
///     ensure!(x > 0.0, "x must be positive, got {x}");
///     Ok(x)
/// }
/// fn steps(n: usize) -> vp_core::errors::Result<usize> {
///     ensure!(n > 0 => InvalidParameters, "need at least one step");
///     Ok(n)
/// }
/// assert!(positive(1.0).is_ok());
/// assert!(positive(-1.0).is_err());
/// assert_eq!(
///     steps(0),
///     Err(Error::InvalidParameters("need at least one step".into()))
/// );
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr => $kind:ident, $($msg:tt)*) => {
        if !$cond {
            return Err($crate::errors::Error::$kind(format!($($msg)*)));
        }
    };
    ($cond:expr, $($msg:tt)*) => {
        if !$cond {
            return Err($crate::errors::Error::Precondition(
                format!($($msg)*)
            ));
        }
    };
}

/// Return `Err(Error::Runtime(...))` immediately.
///
/// # Example
/// ```
/// use vp_core::{fail, errors::Error};
/// fn always_err() -> vp_core::errors::Result<()> {
///     fail!("something went wrong");
/// }
/// assert!(always_err().is_err());
/// ```
#[macro_export]
macro_rules! fail {
    ($($msg:tt)*) => {
        return Err($crate::errors::Error::Runtime(format!($($msg)*)))
    };
}
