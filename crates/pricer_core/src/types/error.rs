//! Error types for structured error handling.
//!
//! This module provides:
//! - `PricingError`: Errors surfaced by every pricing path (analytic or simulated)
//! - `SolverError`: Errors from root-finding solvers

use thiserror::Error;

/// Categorised pricing errors.
///
/// Every analytic formula, approximator and Monte Carlo contract reports its
/// failures through one of these kinds. Domain errors are never converted into
/// `NaN` results.
///
/// # Variants
/// - `InvalidOptionType`: Flavour outside {call, put}
/// - `InvalidConfiguration`: Non-positive expiry, volatility, batch size, ...
/// - `NumericDomain`: Logarithm of a non-positive price ratio (spot or strike <= 0)
/// - `NumericalInstability`: An inner numerical routine failed to converge
///
/// # Examples
/// ```
/// use pricer_core::types::PricingError;
///
/// let err = PricingError::InvalidOptionType("straddle".to_string());
/// assert_eq!(format!("{}", err), "Invalid option type: straddle");
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PricingError {
    /// Option flavour outside {call, put}.
    #[error("Invalid option type: {0}")]
    InvalidOptionType(String),

    /// Invalid configuration or model parameter.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Input outside the numeric domain of a formula.
    #[error("Numeric domain error: {0}")]
    NumericDomain(String),

    /// Numerical instability during computation.
    #[error("Numerical instability: {0}")]
    NumericalInstability(String),
}

/// Solver-related errors.
///
/// # Examples
/// ```
/// use pricer_core::types::SolverError;
///
/// let err = SolverError::MaxIterationsExceeded { iterations: 100 };
/// assert!(format!("{}", err).contains("100 iterations"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SolverError {
    /// Solver failed to converge within maximum iterations.
    #[error("Failed to converge after {iterations} iterations")]
    MaxIterationsExceeded {
        /// Number of iterations attempted
        iterations: usize,
    },

    /// No valid bracket (function values at endpoints have same sign).
    #[error("No bracket: f({a}) and f({b}) have same sign")]
    NoBracket {
        /// Left bracket endpoint
        a: f64,
        /// Right bracket endpoint
        b: f64,
    },
}

impl From<SolverError> for PricingError {
    fn from(err: SolverError) -> Self {
        PricingError::NumericalInstability(err.to_string())
    }
}
