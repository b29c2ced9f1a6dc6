//! Two-moment lognormal matching for discrete arithmetic averages.
//!
//! With forwards `F_i = S·e^(b·t_i)` over the `N` floating fixings:
//!
//! ```text
//! M1   = (1/N)  Σ_i F_i
//! M2   = (1/N²) Σ_i Σ_j F_i F_j e^(σ² min(t_i, t_j))
//! σ_A² = ln(M2 / M1²) / T
//! ```
//!
//! The average is treated as a lognormal forward `M1` with volatility `σ_A`
//! and priced with generalised Black-Scholes at zero carry.

use pricer_core::types::OptionFlavor;

use super::{price_split, DiscreteAsianParams};
use crate::analytical::black_scholes::BlackScholes;
use crate::analytical::error::AnalyticalError;

/// Prices a discrete arithmetic Asian option by moment matching.
///
/// # Errors
/// Validation errors from [`DiscreteAsianParams::split`];
/// `NumericalInstability` if the matched variance is not positive.
///
/// # Examples
/// ```
/// use pricer_core::types::OptionFlavor;
/// use pricer_models::analytical::asian::{discrete_asian_moment_matching, DiscreteAsianParams};
///
/// let params = DiscreteAsianParams::new(100.0, 100.0, vec![0.25, 0.5, 0.75, 1.0], 1.0, 0.05, 0.05, 0.25);
/// let call = discrete_asian_moment_matching(OptionFlavor::Call, &params).unwrap();
/// assert!((call - 8.2540).abs() < 1e-4);
/// ```
pub fn discrete_asian_moment_matching(
    flavor: OptionFlavor,
    params: &DiscreteAsianParams,
) -> Result<f64, AnalyticalError> {
    price_split(flavor, params, |split, adjusted_strike, weight| {
        let times = split.floating_times();
        let n = times.len() as f64;
        let forwards: Vec<f64> = times.iter().map(|&t| params.forward(t)).collect();
        let variance = params.volatility * params.volatility;

        let m1 = forwards.iter().sum::<f64>() / n;
        let m2 = forwards
            .iter()
            .zip(times)
            .map(|(&f_i, &t_i)| {
                forwards
                    .iter()
                    .zip(times)
                    .map(|(&f_j, &t_j)| f_i * f_j * (variance * t_i.min(t_j)).exp())
                    .sum::<f64>()
            })
            .sum::<f64>()
            / (n * n);

        let average_variance = (m2 / (m1 * m1)).ln() / params.expiry;
        if average_variance.is_nan() || average_variance <= 0.0 {
            return Err(AnalyticalError::NumericalInstability {
                message: format!("matched average variance {average_variance} is not positive"),
            });
        }

        let lognormal = BlackScholes::new(m1, params.rate, 0.0, average_variance.sqrt())?;
        Ok(weight * lognormal.price(flavor, adjusted_strike, params.expiry))
    })
}
