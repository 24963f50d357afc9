//! Ordinary least-squares fitting of lines and polynomials.
//!
//! Polynomials are stored constant term first: `coeffs[i]` multiplies `x^i`.

mod error;
mod linear;
mod poly;

pub use error::FitError;
pub use linear::{LinearFit, linear_fit, r_squared};
pub use poly::{polynomial_fit, predict};

/// Pivots and denominators smaller than this are treated as zero.
pub(crate) const EPS: f64 = 1e-10;
