//! Error types for analytical pricing operations.
//!
//! This module provides:
//! - `AnalyticalError`: Errors specific to closed-form formulas and approximators

use pricer_core::types::{PricingError, SolverError};
use thiserror::Error;

/// Analytical pricing errors.
///
/// Provides structured error handling for analytical pricing operations
/// with descriptive context for each failure mode.
///
/// # Variants
/// - `InvalidSpot` / `InvalidStrike`: Non-positive price entering a logarithm
/// - `InvalidExpiry` / `InvalidVolatility`: Non-positive time or volatility
/// - `NoFixings`: Averaging schedule without any fixing date
/// - `InvalidOptionType`: Flavour string outside {call, put}
/// - `NumericalInstability`: Computation encountered numerical issues
///
/// # Examples
/// ```
/// use pricer_models::analytical::AnalyticalError;
///
/// let err = AnalyticalError::InvalidVolatility { volatility: -0.2 };
/// assert!(format!("{}", err).contains("volatility"));
/// ```
#[derive(Debug, Clone, Error, PartialEq)]
pub enum AnalyticalError {
    /// Invalid spot price (non-positive).
    #[error("Invalid spot price: S = {spot}")]
    InvalidSpot {
        /// The invalid spot price value
        spot: f64,
    },

    /// Invalid strike (non-positive).
    #[error("Invalid strike: K = {strike}")]
    InvalidStrike {
        /// The invalid strike value
        strike: f64,
    },

    /// Invalid time to expiry (non-positive).
    #[error("Invalid expiry: T = {expiry}")]
    InvalidExpiry {
        /// The invalid expiry value
        expiry: f64,
    },

    /// Invalid volatility (non-positive).
    #[error("Invalid volatility: σ = {volatility}")]
    InvalidVolatility {
        /// The invalid volatility value
        volatility: f64,
    },

    /// Averaging schedule has no fixing dates.
    #[error("Averaging schedule has no fixings")]
    NoFixings,

    /// Option flavour outside {call, put}.
    #[error("Invalid option type: {flavor}")]
    InvalidOptionType {
        /// The rejected flavour string
        flavor: String,
    },

    /// Numerical instability during computation.
    #[error("Numerical instability: {message}")]
    NumericalInstability {
        /// Description of the numerical issue
        message: String,
    },
}

impl AnalyticalError {
    /// Rejects non-positive or non-finite spot.
    pub(crate) fn check_spot(spot: f64) -> Result<(), Self> {
        if spot.is_finite() && spot > 0.0 {
            Ok(())
        } else {
            Err(Self::InvalidSpot { spot })
        }
    }

    pub(crate) fn check_strike(strike: f64) -> Result<(), Self> {
        if strike.is_finite() && strike > 0.0 {
            Ok(())
        } else {
            Err(Self::InvalidStrike { strike })
        }
    }

    pub(crate) fn check_expiry(expiry: f64) -> Result<(), Self> {
        if expiry.is_finite() && expiry > 0.0 {
            Ok(())
        } else {
            Err(Self::InvalidExpiry { expiry })
        }
    }

    pub(crate) fn check_volatility(volatility: f64) -> Result<(), Self> {
        if volatility.is_finite() && volatility > 0.0 {
            Ok(())
        } else {
            Err(Self::InvalidVolatility { volatility })
        }
    }
}

impl From<AnalyticalError> for PricingError {
    fn from(err: AnalyticalError) -> Self {
        match err {
            AnalyticalError::InvalidSpot { .. } | AnalyticalError::InvalidStrike { .. } => {
                PricingError::NumericDomain(err.to_string())
            }
            AnalyticalError::InvalidExpiry { .. }
            | AnalyticalError::InvalidVolatility { .. }
            | AnalyticalError::NoFixings => PricingError::InvalidConfiguration(err.to_string()),
            AnalyticalError::InvalidOptionType { flavor } => PricingError::InvalidOptionType(flavor),
            AnalyticalError::NumericalInstability { .. } => {
                PricingError::NumericalInstability(err.to_string())
            }
        }
    }
}

impl From<PricingError> for AnalyticalError {
    fn from(err: PricingError) -> Self {
        match err {
            PricingError::InvalidOptionType(flavor) => AnalyticalError::InvalidOptionType { flavor },
            other => AnalyticalError::NumericalInstability {
                message: other.to_string(),
            },
        }
    }
}

impl From<SolverError> for AnalyticalError {
    fn from(err: SolverError) -> Self {
        AnalyticalError::NumericalInstability {
            message: err.to_string(),
        }
    }
}
