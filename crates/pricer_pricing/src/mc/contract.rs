//! The interface between the engine and an option.
//!
//! The engine owns randomness and aggregation; a contract owns path
//! construction and valuation. Both contract methods are pure functions of
//! their inputs, so iterations can run on any thread in any order.

use pricer_core::types::PricingError;

use super::matrix::Matrix;

/// An option the Monte Carlo engine can value.
///
/// # Examples
///
/// A forward contract paying `S_T - K`, one knot per path:
///
/// ```rust
/// use pricer_core::types::PricingError;
/// use pricer_models::models::GbmProcess;
/// use pricer_pricing::mc::{Matrix, OptionContract, PathValuation};
///
/// struct Forward { strike: f64, expiry: f64 }
///
/// impl OptionContract for Forward {
///     type Process = GbmProcess<f64>;
///     type Auxiliary = ();
///
///     fn paths_given_draws(&self, spot: f64, gbm: &Self::Process, draws: &Matrix)
///         -> Result<Matrix, PricingError>
///     {
///         let terminal = draws.iter_rows().map(|z| gbm.step(spot, self.expiry, z[0])).collect();
///         Matrix::from_vec(draws.rows(), 1, terminal)
///     }
///
///     fn pv_paths(&self, paths: &Matrix, gbm: &Self::Process)
///         -> Result<PathValuation<()>, PricingError>
///     {
///         let df = gbm.discount(self.expiry);
///         Ok(PathValuation::new(paths.iter_rows().map(|s| df * (s[0] - self.strike)).collect()))
///     }
/// }
/// ```
pub trait OptionContract: Send + Sync {
    /// Diffusion the paths are generated under; opaque to the engine.
    type Process: Send + Sync;

    /// Per-iteration side output, returned unaggregated.
    type Auxiliary: Send;

    /// Turns a batch of standard normal draws (one row per path, one column
    /// per knot) into simulated paths.
    ///
    /// # Errors
    /// Any contract-specific failure; the engine reports it as
    /// `IterationFailed` with the run's entropy.
    fn paths_given_draws(
        &self,
        spot: f64,
        process: &Self::Process,
        draws: &Matrix,
    ) -> Result<Matrix, PricingError>;

    /// Present value of every path (one entry per row, not averaged) plus an
    /// optional auxiliary output.
    ///
    /// # Errors
    /// Any contract-specific failure.
    fn pv_paths(
        &self,
        paths: &Matrix,
        process: &Self::Process,
    ) -> Result<PathValuation<Self::Auxiliary>, PricingError>;
}

/// Per-path present values of one batch.
#[derive(Clone, Debug, PartialEq)]
pub struct PathValuation<A> {
    /// One present value per path.
    pub pv: Vec<f64>,
    /// Optional side output of the batch.
    pub others: Option<A>,
}

impl<A> PathValuation<A> {
    /// Present values without side output.
    pub fn new(pv: Vec<f64>) -> Self {
        Self { pv, others: None }
    }

    /// Present values with side output.
    pub fn with_others(pv: Vec<f64>, others: A) -> Self {
        Self {
            pv,
            others: Some(others),
        }
    }

    /// Mean of the per-path values; `NaN` for an empty batch.
    pub fn mean(&self) -> f64 {
        self.pv.iter().sum::<f64>() / self.pv.len() as f64
    }
}
