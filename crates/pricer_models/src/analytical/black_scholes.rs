//! Generalised Black-Scholes pricing with cost of carry.
//!
//! A single formula covers stock options (`b = r`), options on stocks with a
//! continuous dividend yield `q` (`b = r - q`), futures options (`b = 0`) and
//! currency options (`b = r - r_f`).
//!
//! ## Mathematical Formulas
//!
//! **Call Price**: C = S·e^((b-r)T)·N(d₁) - K·e^(-rT)·N(d₂)
//! **Put Price**: P = K·e^(-rT)·N(-d₂) - S·e^((b-r)T)·N(-d₁)
//!
//! Where:
//! - d₁ = (ln(S/K) + (b + σ²/2)T) / (σ√T)
//! - d₂ = d₁ - σ√T

use num_traits::Float;
use pricer_core::types::OptionFlavor;

use super::distributions::{norm_cdf, norm_pdf};
use super::error::AnalyticalError;

/// Below this, time to expiry is treated as zero.
const EXPIRY_EPSILON: f64 = 1e-10;

/// Generalised Black-Scholes model for European option pricing.
///
/// # Type Parameters
/// * `T` - Floating-point type implementing `Float` (e.g., `f64`, `f32`)
///
/// # Examples
/// ```
/// use pricer_core::types::OptionFlavor;
/// use pricer_models::analytical::BlackScholes;
///
/// // Currency option: r = 10%, foreign rate 5% => b = 5%
/// let bs = BlackScholes::new(75.0_f64, 0.10, 0.05, 0.35).unwrap();
/// let put = bs.price(OptionFlavor::Put, 70.0, 0.5);
/// assert!((put - 4.0870).abs() < 1e-4);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct BlackScholes<T: Float> {
    spot: T,
    rate: T,
    carry: T,
    volatility: T,
}

impl<T: Float> BlackScholes<T> {
    /// Creates a new generalised Black-Scholes model.
    ///
    /// # Arguments
    /// * `spot` - Current spot price (must be positive)
    /// * `rate` - Risk-free interest rate (annualised)
    /// * `carry` - Cost of carry `b` (annualised)
    /// * `volatility` - Volatility (must be positive)
    ///
    /// # Errors
    /// - `AnalyticalError::InvalidSpot` if spot <= 0
    /// - `AnalyticalError::InvalidVolatility` if volatility <= 0
    pub fn new(spot: T, rate: T, carry: T, volatility: T) -> Result<Self, AnalyticalError> {
        let zero = T::zero();

        if spot.is_nan() || spot <= zero {
            return Err(AnalyticalError::InvalidSpot {
                spot: spot.to_f64().unwrap_or(f64::NAN),
            });
        }

        if volatility.is_nan() || volatility <= zero {
            return Err(AnalyticalError::InvalidVolatility {
                volatility: volatility.to_f64().unwrap_or(f64::NAN),
            });
        }

        Ok(Self {
            spot,
            rate,
            carry,
            volatility,
        })
    }

    /// Returns the spot price.
    #[inline]
    pub fn spot(&self) -> T {
        self.spot
    }

    /// Returns the risk-free rate.
    #[inline]
    pub fn rate(&self) -> T {
        self.rate
    }

    /// Returns the cost of carry.
    #[inline]
    pub fn carry(&self) -> T {
        self.carry
    }

    /// Returns the volatility.
    #[inline]
    pub fn volatility(&self) -> T {
        self.volatility
    }

    #[inline]
    fn expired(expiry: T) -> bool {
        expiry <= T::from(EXPIRY_EPSILON).unwrap_or_else(T::epsilon)
    }

    /// Computes d₁ = (ln(S/K) + (b + σ²/2)T) / (σ√T).
    ///
    /// Returns large positive/negative values for expiry ≈ 0.
    #[inline]
    pub fn d1(&self, strike: T, expiry: T) -> T {
        if Self::expired(expiry) {
            let large = T::from(100.0).unwrap_or_else(T::max_value);
            return if self.spot > strike {
                large
            } else if self.spot < strike {
                -large
            } else {
                T::zero()
            };
        }

        let half = T::from(0.5).unwrap_or_else(T::nan);
        let vol_sqrt_t = self.volatility * expiry.sqrt();
        let drift = (self.carry + half * self.volatility * self.volatility) * expiry;

        ((self.spot / strike).ln() + drift) / vol_sqrt_t
    }

    /// Computes d₂ = d₁ - σ√T.
    #[inline]
    pub fn d2(&self, strike: T, expiry: T) -> T {
        if Self::expired(expiry) {
            return self.d1(strike, expiry);
        }
        self.d1(strike, expiry) - self.volatility * expiry.sqrt()
    }

    /// Carry discount factor e^((b-r)T) applied to the spot leg.
    #[inline]
    fn carry_factor(&self, expiry: T) -> T {
        ((self.carry - self.rate) * expiry).exp()
    }

    /// Computes the European call price.
    ///
    /// At expiry returns the intrinsic value `max(S - K, 0)`.
    #[inline]
    pub fn price_call(&self, strike: T, expiry: T) -> T {
        if Self::expired(expiry) {
            return (self.spot - strike).max(T::zero());
        }

        let d1 = self.d1(strike, expiry);
        let d2 = self.d2(strike, expiry);
        let discount = (-self.rate * expiry).exp();

        self.spot * self.carry_factor(expiry) * norm_cdf(d1) - strike * discount * norm_cdf(d2)
    }

    /// Computes the European put price.
    ///
    /// At expiry returns the intrinsic value `max(K - S, 0)`.
    #[inline]
    pub fn price_put(&self, strike: T, expiry: T) -> T {
        if Self::expired(expiry) {
            return (strike - self.spot).max(T::zero());
        }

        let d1 = self.d1(strike, expiry);
        let d2 = self.d2(strike, expiry);
        let discount = (-self.rate * expiry).exp();

        strike * discount * norm_cdf(-d2) - self.spot * self.carry_factor(expiry) * norm_cdf(-d1)
    }

    /// Prices a call or put.
    #[inline]
    pub fn price(&self, flavor: OptionFlavor, strike: T, expiry: T) -> T {
        match flavor {
            OptionFlavor::Call => self.price_call(strike, expiry),
            OptionFlavor::Put => self.price_put(strike, expiry),
        }
    }

    /// Computes Delta (∂V/∂S).
    ///
    /// - Call Delta = e^((b-r)T)·N(d₁)
    /// - Put Delta = e^((b-r)T)·(N(d₁) - 1)
    pub fn delta(&self, flavor: OptionFlavor, strike: T, expiry: T) -> T {
        let one = T::one();
        let zero = T::zero();

        if Self::expired(expiry) {
            return match flavor {
                OptionFlavor::Call if self.spot > strike => one,
                OptionFlavor::Put if self.spot < strike => -one,
                _ => zero,
            };
        }

        let n_d1 = norm_cdf(self.d1(strike, expiry));
        let factor = self.carry_factor(expiry);
        match flavor {
            OptionFlavor::Call => factor * n_d1,
            OptionFlavor::Put => factor * (n_d1 - one),
        }
    }

    /// Computes Gamma (∂²V/∂S²), identical for calls and puts.
    ///
    /// Gamma = e^((b-r)T)·φ(d₁) / (S·σ·√T)
    pub fn gamma(&self, strike: T, expiry: T) -> T {
        if Self::expired(expiry) {
            return T::zero();
        }

        let d1 = self.d1(strike, expiry);
        self.carry_factor(expiry) * norm_pdf(d1) / (self.spot * self.volatility * expiry.sqrt())
    }

    /// Computes Vega (∂V/∂σ), identical for calls and puts.
    ///
    /// Vega = S·e^((b-r)T)·φ(d₁)·√T
    pub fn vega(&self, strike: T, expiry: T) -> T {
        if Self::expired(expiry) {
            return T::zero();
        }

        let d1 = self.d1(strike, expiry);
        self.spot * self.carry_factor(expiry) * norm_pdf(d1) * expiry.sqrt()
    }
}
