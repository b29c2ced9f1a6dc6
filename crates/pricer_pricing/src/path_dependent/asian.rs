//! Discrete arithmetic-average option with partially fixed averaging.
//!
//! The schedule is split exactly like the analytic approximators do
//! ([`FixingSplit`]): fixings at `t <= 0` enter through the realized
//! average, one knot is simulated per floating fixing.

use pricer_core::types::{OptionFlavor, PricingError};
use pricer_models::analytical::asian::{DiscreteAsianParams, FixingSplit};
use pricer_models::models::GbmProcess;

use super::{check_expiry, check_path_width, check_price, gbm_paths};
use crate::mc::{Matrix, OptionContract, PathValuation};

/// Arithmetic Asian call or put paying `(average - K)+` or `(K - average)+`
/// at expiry.
#[derive(Clone, Debug, PartialEq)]
pub struct ArithmeticAsianContract {
    flavor: OptionFlavor,
    strike: f64,
    fixing_times: Vec<f64>,
    expiry: f64,
    realized_average: f64,
    split: FixingSplit,
}

impl ArithmeticAsianContract {
    /// Contract whose averaging period has not started.
    ///
    /// # Errors
    /// `NumericDomain` for a non-positive strike; `InvalidConfiguration` for
    /// a non-positive expiry or an empty schedule.
    pub fn new(
        flavor: OptionFlavor,
        strike: f64,
        fixing_times: Vec<f64>,
        expiry: f64,
    ) -> Result<Self, PricingError> {
        check_price("strike", strike)?;
        check_expiry(expiry)?;
        let split = FixingSplit::new(&fixing_times, 0.0)?;
        Ok(Self {
            flavor,
            strike,
            fixing_times,
            expiry,
            realized_average: 0.0,
            split,
        })
    }

    /// Contract on the same terms as an analytic parameter set.
    ///
    /// # Errors
    /// As [`new`](Self::new).
    pub fn from_params(flavor: OptionFlavor, params: &DiscreteAsianParams) -> Result<Self, PricingError> {
        Self::new(flavor, params.strike, params.fixing_times.clone(), params.expiry)?
            .with_realized_average(params.realized_average)
    }

    /// Sets the average of the fixings already observed.
    ///
    /// # Errors
    /// Never fails for a contract built by [`new`](Self::new).
    pub fn with_realized_average(mut self, realized_average: f64) -> Result<Self, PricingError> {
        self.split = FixingSplit::new(&self.fixing_times, realized_average)?;
        self.realized_average = self.split.realized_average();
        Ok(self)
    }

    /// Random numbers consumed per path: one per floating fixing, at least 1.
    #[inline]
    pub fn knots(&self) -> usize {
        self.split.floating().max(1)
    }

    /// Realized/floating split of the schedule.
    #[inline]
    pub fn split(&self) -> &FixingSplit {
        &self.split
    }

    /// Option flavour.
    #[inline]
    pub fn flavor(&self) -> OptionFlavor {
        self.flavor
    }

    /// Strike on the full average.
    #[inline]
    pub fn strike(&self) -> f64 {
        self.strike
    }

    /// Fixing times as given.
    #[inline]
    pub fn fixing_times(&self) -> &[f64] {
        &self.fixing_times
    }

    /// Payment time.
    #[inline]
    pub fn expiry(&self) -> f64 {
        self.expiry
    }

    /// Average of the realized fixings, zero while no fixing has occurred.
    #[inline]
    pub fn realized_average(&self) -> f64 {
        self.realized_average
    }
}

impl OptionContract for ArithmeticAsianContract {
    type Process = GbmProcess<f64>;
    type Auxiliary = ();

    fn paths_given_draws(
        &self,
        spot: f64,
        process: &Self::Process,
        draws: &Matrix,
    ) -> Result<Matrix, PricingError> {
        gbm_paths(spot, process, self.split.floating_times(), draws)
    }

    fn pv_paths(
        &self,
        paths: &Matrix,
        process: &Self::Process,
    ) -> Result<PathValuation<()>, PricingError> {
        check_path_width(paths, self.split.floating() + 1)?;
        let df = process.discount(self.expiry);
        let pv = paths
            .iter_rows()
            .map(|row| df * self.split.payoff(self.flavor, self.strike, &row[1..]))
            .collect();
        Ok(PathValuation::new(pv))
    }
}
