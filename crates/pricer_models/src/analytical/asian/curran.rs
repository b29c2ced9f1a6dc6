//! Curran's approximation for discrete arithmetic averages.
//!
//! Log-prices at the floating fixings are jointly normal:
//! `μ_i = ln S + (b - σ²/2) t_i`, `cov(i, j) = σ² min(t_i, t_j)`. Conditioning
//! the arithmetic average `A` on the geometric average `G` splits the call
//! into an exact part over `{G > K}` (where `A >= G > K`) and a residual over
//! `{G <= K}`:
//!
//! ```text
//! E[(A - K)+] = (1/N) Σ F_i N(d_K + σ_iG/σ_G) - K N(d_K)
//!             + ∫_{g*}^{ln K} (E[A | ln G = g] - K) f(g) dg
//! ```
//!
//! `g*` solves `E[A | ln G = g] = K` (Brent) and the residual integral uses
//! 64-point Gauss-Legendre. Puts follow from put-call parity on the average.

use pricer_core::math::quadrature::{GaussLegendre, SharedRule};
use pricer_core::math::solvers::BrentSolver;
use pricer_core::types::OptionFlavor;

use super::{price_split, DiscreteAsianParams};
use crate::analytical::distributions::{norm_cdf, norm_pdf};
use crate::analytical::error::AnalyticalError;

/// Standard deviations of `ln G` below the mean where the residual
/// integral is truncated.
const LOWER_TRUNCATION: f64 = 12.0;

/// Prices a discrete arithmetic Asian option with Curran's approximation.
///
/// # Errors
/// Validation errors from [`DiscreteAsianParams::split`];
/// `NumericalInstability` if the conditional-mean root cannot be bracketed.
///
/// # Examples
/// ```
/// use pricer_core::types::OptionFlavor;
/// use pricer_models::analytical::asian::{discrete_asian_curran, DiscreteAsianParams};
///
/// let params = DiscreteAsianParams::new(100.0, 100.0, vec![0.25, 0.5, 0.75, 1.0], 1.0, 0.05, 0.05, 0.25);
/// let call = discrete_asian_curran(OptionFlavor::Call, &params).unwrap();
/// assert!((call - 8.2290).abs() < 1e-4);
/// ```
pub fn discrete_asian_curran(
    flavor: OptionFlavor,
    params: &DiscreteAsianParams,
) -> Result<f64, AnalyticalError> {
    price_split(flavor, params, |split, adjusted_strike, weight| {
        let moments = GeometricConditioning::new(params, split.floating_times());
        let call = moments.expected_call(adjusted_strike)?;
        let discount = (-params.rate * params.expiry).exp();

        let value = match flavor {
            OptionFlavor::Call => call,
            OptionFlavor::Put => call - (moments.mean_forward() - adjusted_strike),
        };
        Ok(discount * weight * value)
    })
}

/// Joint moments of the log-prices and their geometric mean.
struct GeometricConditioning {
    times: Vec<f64>,
    forwards: Vec<f64>,
    /// `μ_i`
    log_means: Vec<f64>,
    /// `cov(ln S_i, ln G)`
    covariances: Vec<f64>,
    variance: f64,
    /// `μ_G`
    geometric_mean: f64,
    /// `σ_G²`
    geometric_variance: f64,
}

impl GeometricConditioning {
    fn new(params: &DiscreteAsianParams, times: &[f64]) -> Self {
        let n = times.len() as f64;
        let variance = params.volatility * params.volatility;
        let log_spot = params.spot.ln();

        let log_means: Vec<f64> = times
            .iter()
            .map(|&t| log_spot + (params.carry - 0.5 * variance) * t)
            .collect();
        let covariances: Vec<f64> = times
            .iter()
            .map(|&t_i| variance / n * times.iter().map(|&t_j| t_i.min(t_j)).sum::<f64>())
            .collect();

        Self {
            times: times.to_vec(),
            forwards: times.iter().map(|&t| params.forward(t)).collect(),
            geometric_mean: log_means.iter().sum::<f64>() / n,
            geometric_variance: covariances.iter().sum::<f64>() / n,
            log_means,
            covariances,
            variance,
        }
    }

    fn mean_forward(&self) -> f64 {
        self.forwards.iter().sum::<f64>() / self.forwards.len() as f64
    }

    /// `E[A | ln G = g]`
    fn conditional_average(&self, g: f64) -> f64 {
        let shift = g - self.geometric_mean;
        let total: f64 = self
            .log_means
            .iter()
            .zip(&self.covariances)
            .zip(&self.times)
            .map(|((&mu, &cov), &t)| {
                let beta = cov / self.geometric_variance;
                (mu + beta * shift + 0.5 * (self.variance * t - cov * beta)).exp()
            })
            .sum();
        total / self.times.len() as f64
    }

    /// Undiscounted `E[(A - K)+]`.
    fn expected_call(&self, strike: f64) -> Result<f64, AnalyticalError> {
        let sigma_g = self.geometric_variance.sqrt();
        let log_strike = strike.ln();
        let d_k = (self.geometric_mean - log_strike) / sigma_g;

        let above: f64 = self
            .forwards
            .iter()
            .zip(&self.covariances)
            .map(|(&f, &cov)| f * norm_cdf(d_k + cov / sigma_g))
            .sum::<f64>()
            / self.forwards.len() as f64
            - strike * norm_cdf(d_k);

        Ok(above + self.residual(strike, log_strike, sigma_g)?)
    }

    /// `∫ (E[A | g] - K)+ f(g) dg` over `g < ln K`.
    fn residual(&self, strike: f64, log_strike: f64, sigma_g: f64) -> Result<f64, AnalyticalError> {
        let floor = self.geometric_mean - LOWER_TRUNCATION * sigma_g;
        if floor >= log_strike {
            return Ok(0.0);
        }

        let excess = |g: f64| self.conditional_average(g) - strike;
        // single fixing: E[A | g] = e^g never exceeds K below ln K
        if excess(log_strike) <= 0.0 {
            return Ok(0.0);
        }
        let lower = if excess(floor) >= 0.0 {
            floor
        } else {
            BrentSolver::with_defaults().find_root(excess, floor, log_strike)?
        };
        if lower >= log_strike {
            return Ok(0.0);
        }

        let density = |g: f64| norm_pdf((g - self.geometric_mean) / sigma_g) / sigma_g;
        Ok(GaussLegendre::shared(SharedRule::SixtyFour)
            .integrate(|g| excess(g).max(0.0) * density(g), lower, log_strike))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytical::asian::discrete_asian_moment_matching;
    use approx::assert_relative_eq;

    fn quarterly() -> DiscreteAsianParams {
        DiscreteAsianParams::new(100.0, 100.0, vec![0.25, 0.5, 0.75, 1.0], 1.0, 0.05, 0.05, 0.25)
    }

    #[test]
    fn test_reference_values() {
        let p = quarterly();
        assert_relative_eq!(
            discrete_asian_curran(OptionFlavor::Call, &p).unwrap(),
            8.229_015_157_926_92,
            epsilon = 1e-8
        );
        assert_relative_eq!(
            discrete_asian_curran(OptionFlavor::Put, &p).unwrap(),
            5.199_904_351_922_41,
            epsilon = 1e-8
        );
    }

    #[test]
    fn test_conditional_average_is_increasing() {
        let p = quarterly();
        let moments = GeometricConditioning::new(&p, &p.fixing_times);
        let values: Vec<f64> = (-20..=20)
            .map(|i| moments.conditional_average(moments.geometric_mean + 0.05 * i as f64))
            .collect();
        assert!(values.windows(2).all(|w| w[1] > w[0]));
        // E[A | G = g] >= g
        let g = moments.geometric_mean;
        assert!(moments.conditional_average(g) >= g.exp());
    }

    #[test]
    fn test_single_fixing_collapses_to_black_scholes() {
        // with N = 1, G = A and the residual vanishes
        let p = DiscreteAsianParams::new(100.0, 95.0, vec![0.75], 0.75, 0.04, 0.01, 0.3);
        let moments = GeometricConditioning::new(&p, &p.fixing_times);
        let discount = (-0.04_f64 * 0.75).exp();
        let vanilla = crate::analytical::BlackScholes::new(100.0, 0.04, 0.01, 0.3)
            .unwrap()
            .price_call(95.0, 0.75);
        assert_relative_eq!(
            discount * moments.expected_call(95.0).unwrap(),
            vanilla,
            epsilon = 1e-10
        );
    }

    #[test]
    fn test_close_to_moment_matching() {
        let p = DiscreteAsianParams::new(100.0, 95.0, (1..=12).map(|i| i as f64 / 12.0).collect(), 1.0, 0.03, 0.0, 0.4);
        for flavor in [OptionFlavor::Call, OptionFlavor::Put] {
            let curran = discrete_asian_curran(flavor, &p).unwrap();
            let hhm = discrete_asian_moment_matching(flavor, &p).unwrap();
            assert_relative_eq!(curran, hhm, max_relative = 0.03);
        }
    }

    #[test]
    fn test_deep_in_the_money_residual() {
        // strike far below the geometric mean: truncated residual, still finite
        let p = DiscreteAsianParams::new(100.0, 1.0, vec![0.5, 1.0], 1.0, 0.05, 0.05, 0.2);
        let call = discrete_asian_curran(OptionFlavor::Call, &p).unwrap();
        let forward_average = (p.forward(0.5) + p.forward(1.0)) / 2.0;
        assert_relative_eq!(call, (-0.05_f64).exp() * (forward_average - 1.0), epsilon = 1e-8);
    }

    #[test]
    fn test_continuity_when_fixing_crosses_today() {
        let floating = [0.1, 0.2, 0.3, 0.4, 0.5];
        let mut just_fixed = vec![-1e-6];
        just_fixed.extend_from_slice(&floating);
        let mut about_to_fix = vec![1e-6];
        about_to_fix.extend_from_slice(&floating);

        for flavor in [OptionFlavor::Call, OptionFlavor::Put] {
            let before = DiscreteAsianParams::new(100.0, 100.0, about_to_fix.clone(), 0.5, 0.05, 0.02, 0.3);
            let after = DiscreteAsianParams::new(100.0, 100.0, just_fixed.clone(), 0.5, 0.05, 0.02, 0.3)
                .with_realized_average(100.0);
            let a = discrete_asian_curran(flavor, &before).unwrap();
            let b = discrete_asian_curran(flavor, &after).unwrap();
            assert_relative_eq!(a, b, max_relative = 1e-4);
        }
    }
}
