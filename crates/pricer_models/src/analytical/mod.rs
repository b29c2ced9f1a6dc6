//! Closed-form and semi-closed-form option pricing.
//!
//! This module provides:
//! - Normal and bivariate normal distribution functions
//! - Generalised Black-Scholes with cost of carry
//! - Bjerksund-Stensland (2002) American approximation
//! - Discrete arithmetic Asian approximations (moment matching, Curran)
//!
//! ## Design Principles
//!
//! - **Validate first**: inputs are checked before any formula runs; domain
//!   violations return [`AnalyticalError`] rather than `NaN`
//! - **Carry convention**: every formula takes the cost of carry `b`, so
//!   dividends, futures and currencies share one code path

pub mod american;
pub mod asian;
pub mod black_scholes;
pub mod distributions;
pub mod error;

// Re-export main types at module level
pub use american::{american_approx, bjerksund_stensland};
pub use asian::{
    discrete_asian_approx, discrete_asian_curran, discrete_asian_moment_matching, AsianMethod,
    DiscreteAsianParams, FixingClass, FixingSplit,
};
pub use black_scholes::BlackScholes;
pub use distributions::{bivariate_norm_cdf, norm_cdf, norm_pdf};
pub use error::AnalyticalError;
