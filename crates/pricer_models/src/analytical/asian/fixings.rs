//! Splitting an averaging schedule into realized and floating fixings.
//!
//! With `n` fixings of which `m` are already observed at average `SA`, the
//! payoff `(m·SA + Σ S(t_i)) / n - K` over the `n - m` future fixings equals
//! `(n - m)/n · (A_future - K_adj)` with
//! `K_adj = (n·K - m·SA) / (n - m)`. Both approximators and the Monte Carlo
//! Asian contract go through this split.

use pricer_core::types::OptionFlavor;

use super::DiscreteAsianParams;
use crate::analytical::black_scholes::BlackScholes;
use crate::analytical::error::AnalyticalError;

/// How an averaging option is valued once realized fixings are taken out.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FixingClass {
    /// Value is known without any model for the floating part.
    Determined(f64),
    /// Exactly one fixing remains; priced as a vanilla on the adjusted strike.
    SingleFixing {
        /// `K_adj`
        adjusted_strike: f64,
        /// `1 / n`
        weight: f64,
    },
    /// Two or more fixings remain; needs an average approximation.
    Floating {
        /// `K_adj`
        adjusted_strike: f64,
        /// `n_adj / n`
        weight: f64,
    },
}

/// An averaging schedule split at today (`t = 0`).
///
/// Fixing times `t <= 0` are realized; the rest float.
#[derive(Debug, Clone, PartialEq)]
pub struct FixingSplit {
    total: usize,
    realized: usize,
    floating_times: Vec<f64>,
    realized_average: f64,
}

impl FixingSplit {
    /// Sorts the fixing times and splits them at zero.
    ///
    /// The realized average is forced to zero when no fixing has been
    /// observed yet.
    ///
    /// # Errors
    /// - `NoFixings` for an empty schedule
    /// - `InvalidExpiry` for a non-finite fixing time
    pub fn new(fixing_times: &[f64], realized_average: f64) -> Result<Self, AnalyticalError> {
        if fixing_times.is_empty() {
            return Err(AnalyticalError::NoFixings);
        }
        if let Some(&bad) = fixing_times.iter().find(|t| !t.is_finite()) {
            return Err(AnalyticalError::InvalidExpiry { expiry: bad });
        }

        let mut times = fixing_times.to_vec();
        times.sort_by(f64::total_cmp);

        let realized = times.iter().take_while(|&&t| t <= 0.0).count();
        let floating_times = times.split_off(realized);

        Ok(Self {
            total: fixing_times.len(),
            realized,
            floating_times,
            realized_average: if realized == 0 { 0.0 } else { realized_average },
        })
    }

    /// Total number of fixings `n`.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Number of realized fixings `m`.
    pub fn realized(&self) -> usize {
        self.realized
    }

    /// Number of floating fixings `n - m`.
    pub fn floating(&self) -> usize {
        self.floating_times.len()
    }

    /// Floating fixing times, ascending and strictly positive.
    pub fn floating_times(&self) -> &[f64] {
        &self.floating_times
    }

    /// Realized average `SA`, zero when nothing has fixed.
    pub fn realized_average(&self) -> f64 {
        self.realized_average
    }

    /// `m · SA`.
    pub fn realized_sum(&self) -> f64 {
        self.realized as f64 * self.realized_average
    }

    /// `true` when the realized part alone already reaches the strike,
    /// `m·SA >= n·K`.
    pub fn is_determined(&self, strike: f64) -> bool {
        self.realized_sum() >= self.total as f64 * strike
    }

    /// Averaging payoff of one path given the spot at every floating fixing.
    pub fn payoff(&self, flavor: OptionFlavor, strike: f64, floating_spots: &[f64]) -> f64 {
        let sum: f64 = floating_spots.iter().sum();
        let average = (self.realized_sum() + sum) / self.total as f64;
        flavor.intrinsic(average, strike)
    }

    /// Classifies the option for the given flavour and market.
    ///
    /// # Errors
    /// `InvalidSpot` / `InvalidVolatility` from the vanilla on the adjusted
    /// strike when exactly one fixing remains.
    pub fn classify(
        &self,
        flavor: OptionFlavor,
        params: &DiscreteAsianParams,
    ) -> Result<FixingClass, AnalyticalError> {
        let n = self.total as f64;
        let discount = (-params.rate * params.expiry).exp();

        if self.is_determined(params.strike) {
            return Ok(FixingClass::Determined(match flavor {
                OptionFlavor::Put => 0.0,
                OptionFlavor::Call => {
                    let forwards: f64 = self.floating_times.iter().map(|&t| params.forward(t)).sum();
                    discount * ((self.realized_sum() + forwards) / n - params.strike)
                }
            }));
        }

        let floating = self.floating();
        if floating == 0 {
            return Ok(FixingClass::Determined(
                discount * flavor.intrinsic(self.realized_average, params.strike),
            ));
        }

        let adjusted_strike = (n * params.strike - self.realized_sum()) / floating as f64;
        let weight = floating as f64 / n;

        Ok(if floating == 1 {
            FixingClass::SingleFixing {
                adjusted_strike,
                weight,
            }
        } else {
            FixingClass::Floating {
                adjusted_strike,
                weight,
            }
        })
    }
}

impl FixingClass {
    /// Resolves the cases that need no average approximation; `Floating`
    /// is handed to `floating` with `(adjusted_strike, weight)`.
    pub(crate) fn resolve<F>(
        self,
        flavor: OptionFlavor,
        params: &DiscreteAsianParams,
        floating: F,
    ) -> Result<f64, AnalyticalError>
    where
        F: FnOnce(f64, f64) -> Result<f64, AnalyticalError>,
    {
        match self {
            FixingClass::Determined(value) => Ok(value),
            // evaluated at expiry, not at the last fixing
            FixingClass::SingleFixing {
                adjusted_strike,
                weight,
            } => {
                let vanilla = BlackScholes::new(params.spot, params.rate, params.carry, params.volatility)?;
                Ok(weight * vanilla.price(flavor, adjusted_strike, params.expiry))
            }
            FixingClass::Floating {
                adjusted_strike,
                weight,
            } => floating(adjusted_strike, weight),
        }
    }
}
