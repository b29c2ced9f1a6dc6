//! Path-dependent contracts priced by the Monte Carlo engine.
//!
//! All contracts run under [`GbmProcess`] and share one path layout: column 0
//! holds the initial spot, the following columns the spot at each
//! observation date.
//!
//! - [`EuropeanContract`]: terminal payoff, one knot, pathwise delta as
//!   auxiliary output
//! - [`ArithmeticAsianContract`]: discrete arithmetic average with partially
//!   fixed periods, one knot per floating fixing
//! - [`BarrierContract`]: discretely monitored knock-in / knock-out

mod asian;
mod barrier;
mod european;

pub use asian::ArithmeticAsianContract;
pub use barrier::{BarrierContract, BarrierType};
pub use european::EuropeanContract;

use pricer_core::types::PricingError;
use pricer_models::models::GbmProcess;

use crate::mc::Matrix;

/// Rejects NaN and non-positive prices.
fn check_price(name: &str, value: f64) -> Result<(), PricingError> {
    if value.is_nan() || value <= 0.0 {
        return Err(PricingError::NumericDomain(format!("{name} must be positive, got {value}")));
    }
    Ok(())
}

/// Rejects NaN and non-positive expiries.
fn check_expiry(expiry: f64) -> Result<(), PricingError> {
    if expiry.is_nan() || expiry <= 0.0 {
        return Err(PricingError::InvalidConfiguration(format!(
            "expiry must be positive, got {expiry}"
        )));
    }
    Ok(())
}

/// Builds `[spot, S(t_1), ..., S(t_n)]` rows from the first `times.len()`
/// draws of each row.
fn gbm_paths(
    spot: f64,
    process: &GbmProcess<f64>,
    times: &[f64],
    draws: &Matrix,
) -> Result<Matrix, PricingError> {
    if draws.cols() < times.len() {
        return Err(PricingError::InvalidConfiguration(format!(
            "contract needs {} knots per path, got {}",
            times.len(),
            draws.cols()
        )));
    }
    let mut paths = Matrix::zeros(draws.rows(), times.len() + 1);
    for (row, z) in paths.iter_rows_mut().zip(draws.iter_rows()) {
        row[0] = spot;
        process.fill_path(spot, times, z, &mut row[1..]);
    }
    Ok(paths)
}

/// Rejects path matrices of the wrong width.
fn check_path_width(paths: &Matrix, expected: usize) -> Result<(), PricingError> {
    if paths.cols() != expected {
        return Err(PricingError::InvalidConfiguration(format!(
            "expected paths with {expected} columns, got {}",
            paths.cols()
        )));
    }
    Ok(())
}
