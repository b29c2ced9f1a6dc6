//! Geometric Brownian Motion with cost of carry.
//!
//! Under the pricing measure the underlying follows:
//! ```text
//! dS = b * S * dt + sigma * S * dW
//! ```
//! where:
//! - S = asset price
//! - b = cost of carry (b = r for non-dividend stock, b = r - q with yield q, b = 0 for futures)
//! - sigma = volatility
//! - dW = Wiener process increment
//!
//! Payoffs are discounted at the risk-free rate `r`.
//!
//! ## Log-space formulation
//!
//! Steps use the exact solution, so coarse time grids carry no
//! discretisation bias:
//! ```text
//! S(t+dt) = S(t) * exp((b - 0.5*sigma^2)*dt + sigma*sqrt(dt)*z),  z ~ N(0, 1)
//! ```

use num_traits::Float;

use crate::analytical::error::AnalyticalError;

/// Flat-parameter GBM diffusion used by the Monte Carlo contracts.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GbmProcess<T: Float> {
    rate: T,
    carry: T,
    volatility: T,
}

impl<T: Float> GbmProcess<T> {
    /// Create a GBM process with validation.
    ///
    /// # Arguments
    /// * `rate` - Risk-free rate `r` used for discounting
    /// * `carry` - Cost of carry `b` driving the forward
    /// * `volatility` - Volatility `sigma` (must be positive)
    ///
    /// # Errors
    /// `InvalidVolatility` for a non-positive or NaN volatility.
    ///
    /// # Examples
    /// ```
    /// use pricer_models::models::GbmProcess;
    ///
    /// let gbm = GbmProcess::new(0.05, 0.03, 0.2).unwrap();
    /// assert!(gbm.step(100.0, 0.25, 1.0) > 100.0);
    /// assert!(GbmProcess::new(0.05, 0.03, 0.0).is_err());
    /// ```
    pub fn new(rate: T, carry: T, volatility: T) -> Result<Self, AnalyticalError> {
        if volatility.is_nan() || volatility <= T::zero() {
            return Err(AnalyticalError::InvalidVolatility {
                volatility: volatility.to_f64().unwrap_or(f64::NAN),
            });
        }
        Ok(Self {
            rate,
            carry,
            volatility,
        })
    }

    /// Risk-free rate `r`.
    #[inline]
    pub fn rate(&self) -> T {
        self.rate
    }

    /// Cost of carry `b`.
    #[inline]
    pub fn carry(&self) -> T {
        self.carry
    }

    /// Volatility `sigma`.
    #[inline]
    pub fn volatility(&self) -> T {
        self.volatility
    }

    /// Discount factor `e^(-r t)`.
    #[inline]
    pub fn discount(&self, time: T) -> T {
        (-self.rate * time).exp()
    }

    /// Forward `S e^(b t)`.
    #[inline]
    pub fn forward(&self, spot: T, time: T) -> T {
        spot * (self.carry * time).exp()
    }

    /// Advances `spot` over `dt` with the standard normal shock `z`.
    #[inline]
    pub fn step(&self, spot: T, dt: T, z: T) -> T {
        let half = T::from(0.5).unwrap_or_else(T::nan);
        let drift = (self.carry - half * self.volatility * self.volatility) * dt;
        let diffusion = self.volatility * dt.sqrt() * z;
        spot * (drift + diffusion).exp()
    }

    /// Writes the spot at each of `times` (ascending, from today) into `out`,
    /// consuming one shock per time.
    ///
    /// Only the first `min(times, draws, out)` entries are used.
    pub fn fill_path(&self, spot: T, times: &[T], draws: &[T], out: &mut [T]) {
        let mut current = spot;
        let mut previous = T::zero();
        for ((&t, &z), slot) in times.iter().zip(draws).zip(out.iter_mut()) {
            current = self.step(current, t - previous, z);
            previous = t;
            *slot = current;
        }
    }
}
