//! Probability distributions.
//!
//! Only the standard normal is needed by the engines; its CDF is built on the
//! complementary error function from `statrs`.

pub mod normal;

pub use normal::{normal_cdf, normal_cdf_inverse, normal_pdf};
