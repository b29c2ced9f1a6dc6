//! Standard and bivariate normal distribution functions.
//!
//! This module provides:
//! - `norm_cdf`: Univariate cumulative distribution function, double precision
//! - `norm_pdf`: Probability density function
//! - `bivariate_norm_cdf`: Joint CDF of two correlated standard normals
//!
//! `norm_cdf` follows West's double-precision rational approximation (Hart
//! 1968, algorithm 5666), accurate to roughly `1e-14` over the whole real line.
//! The bivariate CDF is Genz's (2004) adaptation of Drezner-Wesolowsky, with the
//! Gauss-Legendre order chosen by `|rho|`.

use std::f64::consts::PI;

use num_traits::Float;
use pricer_core::math::quadrature::{GaussLegendre, SharedRule};

/// 1 / sqrt(2 * pi)
const FRAC_1_SQRT_2PI: f64 = 0.398_942_280_401_432_7;

/// sqrt(2 * pi), to the precision used by the continued-fraction tail.
const SQRT_2PI_TAIL: f64 = 2.506_628_274_631;

/// Beyond this the tail probability underflows.
const CDF_CUTOFF: f64 = 37.0;

/// Switch point between the rational and continued-fraction branches.
const RATIONAL_LIMIT: f64 = 7.071_067_811_865_47;

const NUMERATOR: [f64; 7] = [
    3.526_249_659_989_11e-2,
    0.700_383_064_443_688,
    6.373_962_203_531_65,
    33.912_866_078_383,
    112.079_291_497_871,
    221.213_596_169_931,
    220.206_867_912_376,
];

const DENOMINATOR: [f64; 8] = [
    8.838_834_764_831_84e-2,
    1.755_667_163_182_64,
    16.064_177_579_207,
    86.780_732_202_946_1,
    296.564_248_779_674,
    637.333_633_378_831,
    793.826_512_519_948,
    440.413_735_824_752,
];

#[inline]
fn lit<T: Float>(v: f64) -> T {
    T::from(v).unwrap_or_else(T::nan)
}

#[inline]
fn horner<T: Float>(coefficients: &[f64], x: T) -> T {
    coefficients
        .iter()
        .fold(T::zero(), |acc, &c| acc * x + lit::<T>(c))
}

/// Standard normal cumulative distribution function.
///
/// Computes P(X <= x) where X ~ N(0, 1).
///
/// # Accuracy
/// Double precision (about `1e-14` absolute); returns exactly `0` and `1`
/// for `|x| > 37`.
///
/// # Examples
/// ```
/// use pricer_models::analytical::distributions::norm_cdf;
///
/// assert_eq!(norm_cdf(0.0_f64), 0.5);
/// assert!((norm_cdf(1.0_f64) - 0.841_344_746_068_543).abs() < 1e-14);
/// assert_eq!(norm_cdf(-40.0_f64), 0.0);
/// ```
#[inline]
pub fn norm_cdf<T: Float>(x: T) -> T {
    let abs_x = x.abs();

    let tail = if abs_x > lit(CDF_CUTOFF) {
        T::zero()
    } else {
        let gauss = (-abs_x * abs_x / lit(2.0)).exp();
        if abs_x < lit(RATIONAL_LIMIT) {
            gauss * horner(&NUMERATOR, abs_x) / horner(&DENOMINATOR, abs_x)
        } else {
            let mut fraction = abs_x + lit(0.65);
            for k in [4.0, 3.0, 2.0, 1.0] {
                fraction = abs_x + lit::<T>(k) / fraction;
            }
            gauss / fraction / lit(SQRT_2PI_TAIL)
        }
    };

    if x > T::zero() {
        T::one() - tail
    } else {
        tail
    }
}

/// Standard normal probability density function.
///
/// Computes the density φ(x) = (1 / sqrt(2π)) * exp(-x² / 2).
///
/// # Examples
/// ```
/// use pricer_models::analytical::distributions::norm_pdf;
///
/// // φ(1) = exp(-0.5) / sqrt(2π) ≈ 0.2420
/// assert!((norm_pdf(1.0_f64) - 0.2419707245).abs() < 1e-10);
/// ```
#[inline]
pub fn norm_pdf<T: Float>(x: T) -> T {
    lit::<T>(FRAC_1_SQRT_2PI) * (-x * x / lit(2.0)).exp()
}

/// Bivariate standard normal CDF, `P(X <= x, Y <= y)` with `corr(X, Y) = rho`.
///
/// Uses 6, 12 or 20 Gauss-Legendre points for `|rho|` below 0.3, 0.75 and
/// above respectively, and a separate expansion around `|rho| = 1` when
/// `|rho| >= 0.925`. `rho` is clamped to `[-1, 1]`.
///
/// # Examples
/// ```
/// use pricer_models::analytical::distributions::{bivariate_norm_cdf, norm_cdf};
///
/// // Independence factorises.
/// let joint = bivariate_norm_cdf(0.4, -0.3, 0.0);
/// assert!((joint - norm_cdf(0.4) * norm_cdf(-0.3)).abs() < 1e-15);
///
/// // Orthant probability at the origin: 1/4 + asin(rho) / (2π).
/// let rho = 0.5_f64;
/// let orthant = 0.25 + rho.asin() / (2.0 * std::f64::consts::PI);
/// assert!((bivariate_norm_cdf(0.0, 0.0, rho) - orthant).abs() < 1e-14);
/// ```
pub fn bivariate_norm_cdf(x: f64, y: f64, rho: f64) -> f64 {
    let rho = rho.clamp(-1.0, 1.0);
    let abs_rho = rho.abs();
    let rule = GaussLegendre::shared(if abs_rho < 0.3 {
        SharedRule::Six
    } else if abs_rho < 0.75 {
        SharedRule::Twelve
    } else {
        SharedRule::Twenty
    });

    let h = -x;
    let mut k = -y;
    let mut hk = h * k;

    if abs_rho < 0.925 {
        let mut bvn = 0.0;
        if abs_rho > 0.0 {
            let hs = (h * h + k * k) / 2.0;
            let asr = rho.asin();
            let sum: f64 = rule
                .nodes()
                .iter()
                .zip(rule.weights())
                .map(|(&node, &weight)| {
                    let sn = (asr * (node + 1.0) / 2.0).sin();
                    weight * ((sn * hk - hs) / (1.0 - sn * sn)).exp()
                })
                .sum();
            bvn = sum * asr / (4.0 * PI);
        }
        return bvn + norm_cdf(-h) * norm_cdf(-k);
    }

    if rho < 0.0 {
        k = -k;
        hk = -hk;
    }

    let mut bvn = 0.0;
    if abs_rho < 1.0 {
        let ass = (1.0 - rho) * (1.0 + rho);
        let mut a = ass.sqrt();
        let bs = (h - k) * (h - k);
        let c = (4.0 - hk) / 8.0;
        let d = (12.0 - hk) / 16.0;

        let asr = -(bs / ass + hk) / 2.0;
        if asr > -100.0 {
            bvn = a
                * asr.exp()
                * (1.0 - c * (bs - ass) * (1.0 - d * bs / 5.0) / 3.0 + c * d * ass * ass / 5.0);
        }
        if -hk < 100.0 {
            let b = bs.sqrt();
            bvn -= (-hk / 2.0).exp()
                * (2.0 * PI).sqrt()
                * norm_cdf(-b / a)
                * b
                * (1.0 - c * bs * (1.0 - d * bs / 5.0) / 3.0);
        }

        a /= 2.0;
        for (&node, &weight) in rule.nodes().iter().zip(rule.weights()) {
            let xs = (a * (node + 1.0)).powi(2);
            let rs = (1.0 - xs).sqrt();
            let asr = -(bs / xs + hk) / 2.0;
            if asr > -100.0 {
                bvn += a
                    * weight
                    * asr.exp()
                    * ((-hk * (1.0 - rs) / (2.0 * (1.0 + rs))).exp() / rs
                        - (1.0 + c * xs * (1.0 + d * xs)));
            }
        }
        bvn = -bvn / (2.0 * PI);
    }

    if rho > 0.0 {
        bvn + norm_cdf(-h.max(k))
    } else {
        let mut bvn = -bvn;
        if k > h {
            bvn += norm_cdf(k) - norm_cdf(h);
        }
        bvn
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // ==========================================================
    // norm_cdf tests
    // ==========================================================

    #[test]
    fn test_norm_cdf_at_zero() {
        assert_eq!(norm_cdf(0.0_f64), 0.5);
    }

    #[test]
    fn test_norm_cdf_reference_values() {
        assert_relative_eq!(norm_cdf(1.0_f64), 0.841_344_746_068_543, epsilon = 1e-14);
        assert_relative_eq!(norm_cdf(-1.0_f64), 0.158_655_253_931_457, epsilon = 1e-14);
        assert_relative_eq!(norm_cdf(-2.0_f64), 0.022_750_131_948_179_2, epsilon = 1e-15);
        assert_relative_eq!(norm_cdf(3.0_f64), 0.998_650_101_968_370, epsilon = 1e-14);
    }

    #[test]
    fn test_norm_cdf_symmetry() {
        for i in -80..=80 {
            let x = i as f64 * 0.1;
            assert_relative_eq!(norm_cdf(x) + norm_cdf(-x), 1.0, epsilon = 1e-14);
        }
    }

    #[test]
    fn test_norm_cdf_tail_branch() {
        // continued-fraction region: Φ(-8) ≈ 6.22e-16
        let tail = norm_cdf(-8.0_f64);
        assert_relative_eq!(tail, 6.220_960_574_271_78e-16, max_relative = 1e-7);
        assert_eq!(norm_cdf(-38.0_f64), 0.0);
        assert_eq!(norm_cdf(38.0_f64), 1.0);
    }

    #[test]
    fn test_norm_cdf_monotonic() {
        let values: Vec<f64> = (-60..=60).map(|i| i as f64 * 0.1).collect();
        for pair in values.windows(2) {
            assert!(
                norm_cdf(pair[1]) > norm_cdf(pair[0]),
                "CDF not monotonic at x = {}",
                pair[0]
            );
        }
    }

    #[test]
    fn test_norm_cdf_f32_compatibility() {
        assert!((norm_cdf(0.5_f32) - 0.691_462_5).abs() < 1e-5);
    }

    // ==========================================================
    // norm_pdf tests
    // ==========================================================

    #[test]
    fn test_norm_pdf_at_zero() {
        assert_relative_eq!(norm_pdf(0.0_f64), FRAC_1_SQRT_2PI, epsilon = 1e-16);
    }

    #[test]
    fn test_cdf_pdf_relationship() {
        let h = 1e-5;
        for x in [-2.0, -1.0, 0.0, 1.0, 2.0] {
            let numerical_derivative = (norm_cdf(x + h) - norm_cdf(x - h)) / (2.0 * h);
            assert_relative_eq!(numerical_derivative, norm_pdf(x), epsilon = 1e-9);
        }
    }

    // ==========================================================
    // bivariate_norm_cdf tests
    // ==========================================================

    #[test]
    fn test_bivariate_independent() {
        for (x, y) in [(-1.0, 0.5), (0.3, 0.3), (2.0, -1.5)] {
            assert_relative_eq!(
                bivariate_norm_cdf(x, y, 0.0),
                norm_cdf(x) * norm_cdf(y),
                epsilon = 1e-15
            );
        }
    }

    #[test]
    fn test_bivariate_orthant_probabilities() {
        // each |rho| band: 6, 12, 20 nodes and the near-degenerate branch
        for rho in [-0.95, -0.8, -0.5, -0.1, 0.2, 0.6, 0.9, 0.93, 0.99] {
            let expected = 0.25 + f64::asin(rho) / (2.0 * PI);
            assert_relative_eq!(bivariate_norm_cdf(0.0, 0.0, rho), expected, epsilon = 1e-13);
        }
    }

    #[test]
    fn test_bivariate_reference_values() {
        assert_relative_eq!(
            bivariate_norm_cdf(0.3, -0.2, 0.95),
            0.417_650_619_159_027,
            epsilon = 1e-12
        );
        assert_relative_eq!(
            bivariate_norm_cdf(-0.5, 0.8, -0.6),
            0.171_903_506_840_578,
            epsilon = 1e-12
        );
        assert_relative_eq!(
            bivariate_norm_cdf(1.2, 0.4, 0.5),
            0.619_758_958_826_261,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_bivariate_perfect_correlation() {
        assert_relative_eq!(
            bivariate_norm_cdf(0.7, -0.2, 1.0),
            norm_cdf(-0.2),
            epsilon = 1e-15
        );
        // P(X <= x, -X <= y) = Φ(x) - Φ(-y) when x > -y
        assert_relative_eq!(
            bivariate_norm_cdf(0.7, 0.2, -1.0),
            norm_cdf(0.7) - norm_cdf(-0.2),
            epsilon = 1e-15
        );
        assert_eq!(bivariate_norm_cdf(-0.7, 0.2, -1.0), 0.0);
    }

    #[test]
    fn test_bivariate_symmetric_in_arguments() {
        for rho in [-0.97, -0.4, 0.1, 0.5, 0.8, 0.95] {
            assert_relative_eq!(
                bivariate_norm_cdf(0.4, -1.1, rho),
                bivariate_norm_cdf(-1.1, 0.4, rho),
                epsilon = 1e-14
            );
        }
    }

    #[test]
    fn test_bivariate_marginals() {
        // large y recovers the univariate marginal
        for rho in [-0.9, -0.3, 0.4, 0.95] {
            assert_relative_eq!(bivariate_norm_cdf(0.6, 12.0, rho), norm_cdf(0.6), epsilon = 1e-12);
        }
    }
}
