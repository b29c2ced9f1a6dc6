//! Reproducible, optionally parallel Monte Carlo engine.
//!
//! One run is `num_iterations` independent iterations. Iteration `i`:
//!
//! 1. seeds a [`PricerRng`] with `SeedStream::new(entropy).seed(i)`
//! 2. draws an antithetic batch `[Z; -Z]` of `2 * floor(batch_size / 2)`
//!    rows and `knots_per_path` columns
//! 3. asks the contract for paths, then for one PV per path
//! 4. records the mean PV
//!
//! The run PV is the mean of the iteration PVs. Results are stored by
//! iteration index, so the backend and worker count never change them.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;

use pricer_core::types::PricingError;

use super::config::{Backend, MonteCarloConfig};
use super::contract::OptionContract;
use super::error::SimulationError;
use super::matrix::Matrix;
use super::result::{summarise, GreeksResult, SimulationResult};
use crate::pool::{PoolError, WorkerPool};
use crate::rng::{Entropy, PricerRng, SeedStream};

/// Default relative spot bump for [`MonteCarloEngine::calc_greeks`].
pub const DEFAULT_BUMP_RELATIVE: f64 = 0.01;

/// Why a single iteration produced no PV.
enum IterationError {
    Contract(PricingError),
    PvLength { expected: usize, actual: usize },
}

/// Monte Carlo engine bound to one configuration.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use pricer_core::types::OptionFlavor;
/// use pricer_models::models::GbmProcess;
/// use pricer_pricing::mc::{MonteCarloConfig, MonteCarloEngine};
/// use pricer_pricing::path_dependent::EuropeanContract;
/// use pricer_pricing::rng::Entropy;
///
/// let config = MonteCarloConfig::builder()
///     .batch_size(2_000)
///     .num_iterations(4)
///     .build()
///     .unwrap();
/// let engine = MonteCarloEngine::new(config).unwrap();
///
/// let call = Arc::new(EuropeanContract::new(OptionFlavor::Call, 100.0, 1.0).unwrap());
/// let gbm = Arc::new(GbmProcess::new(0.05, 0.05, 0.2).unwrap());
///
/// let result = engine
///     .calc(&call, 100.0, &gbm, call.knots(), false, Some(Entropy::new(42)))
///     .unwrap();
/// assert_eq!(result.entropy_used, Entropy::new(42));
/// assert_eq!(result.total_paths, 8_000);
/// assert!((result.pv - 10.45).abs() < 5.0 * result.std_error + 0.1);
/// ```
#[derive(Debug)]
pub struct MonteCarloEngine {
    config: MonteCarloConfig,
    pool: Option<WorkerPool>,
}

impl MonteCarloEngine {
    /// Creates an engine; the `ThreadPool` backend builds its pool here.
    ///
    /// # Errors
    /// `InvalidConfiguration` if the configuration is invalid or the pool
    /// cannot be built.
    pub fn new(config: MonteCarloConfig) -> Result<Self, SimulationError> {
        config.validate()?;
        let pool = match config.backend() {
            Backend::Sequential => None,
            Backend::ThreadPool => Some(
                WorkerPool::new(config.effective_workers())
                    .map_err(|e| SimulationError::invalid(e.to_string()))?,
            ),
        };
        Ok(Self { config, pool })
    }

    /// Returns the configuration.
    #[inline]
    pub fn config(&self) -> &MonteCarloConfig {
        &self.config
    }

    /// Prices `contract` from `spot`.
    ///
    /// `entropy = None` draws fresh OS entropy; it is returned in
    /// `entropy_used` either way. With `want_auxiliary`, each iteration's
    /// auxiliary output is returned in iteration order (`None` if any
    /// iteration produced none).
    ///
    /// # Errors
    /// - `InvalidConfiguration`: `knots_per_path == 0`, invalid spot, or a
    ///   PV vector whose length differs from the batch
    /// - `SimulationTimeout`: the run exceeded the configured budget
    /// - `IterationFailed`: the contract returned an error
    /// - `WorkerPanicked`: the contract panicked
    pub fn calc<C>(
        &self,
        contract: &Arc<C>,
        spot: f64,
        process: &Arc<C::Process>,
        knots_per_path: usize,
        want_auxiliary: bool,
        entropy: Option<Entropy>,
    ) -> Result<SimulationResult<C::Auxiliary>, SimulationError>
    where
        C: OptionContract + 'static,
        C::Process: 'static,
        C::Auxiliary: 'static,
    {
        if knots_per_path == 0 {
            return Err(SimulationError::invalid("knots_per_path must be at least 1"));
        }
        if !spot.is_finite() || spot <= 0.0 {
            return Err(SimulationError::invalid(format!(
                "spot must be finite and positive, got {spot}"
            )));
        }

        let entropy = entropy.unwrap_or_else(Entropy::fresh);
        let iterations = self.config.num_iterations();
        let half = self.config.half_batch();
        let span = tracing::info_span!(
            "mc_calc",
            %entropy,
            iterations,
            batch_size = 2 * half,
            knots = knots_per_path,
            backend = %self.config.backend(),
        );
        let _guard = span.enter();

        let seeds = SeedStream::new(entropy).spawn(iterations);
        let started = Instant::now();

        let outcomes = match &self.pool {
            Some(pool) if iterations > 1 => {
                let contract = Arc::clone(contract);
                let process = Arc::clone(process);
                let seeds = Arc::new(seeds);
                pool.run_indexed(
                    iterations,
                    move |i| {
                        run_iteration(
                            &*contract,
                            spot,
                            &*process,
                            half,
                            knots_per_path,
                            seeds[i],
                            want_auxiliary,
                        )
                    },
                    self.config.timeout(),
                )
                .map_err(|err| self.pool_failure(err, entropy))?
            }
            _ => self.run_sequential(
                contract.as_ref(),
                spot,
                process.as_ref(),
                half,
                knots_per_path,
                &seeds,
                want_auxiliary,
                entropy,
            )?,
        };

        let mut iteration_pvs = Vec::with_capacity(iterations);
        let mut auxiliary = Vec::with_capacity(if want_auxiliary { iterations } else { 0 });
        for (iteration, outcome) in outcomes.into_iter().enumerate() {
            match outcome {
                Ok((pv, others)) => {
                    iteration_pvs.push(pv);
                    auxiliary.push(others);
                }
                Err(IterationError::Contract(source)) => {
                    return Err(SimulationError::IterationFailed {
                        iteration,
                        entropy,
                        source,
                    })
                }
                Err(IterationError::PvLength { expected, actual }) => {
                    return Err(SimulationError::InvalidConfiguration {
                        message: format!(
                            "iteration {iteration}: contract returned {actual} PVs for {expected} paths"
                        ),
                        entropy: Some(entropy),
                    })
                }
            }
        }

        let (pv, std_error) = summarise(&iteration_pvs);
        tracing::debug!(
            pv,
            std_error,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "simulation completed"
        );

        Ok(SimulationResult {
            pv,
            std_error,
            iteration_pvs,
            other_outputs: if want_auxiliary {
                auxiliary.into_iter().collect()
            } else {
                None
            },
            entropy_used: entropy,
            total_paths: self.config.total_paths(),
        })
    }

    /// Prices at `spot` and `spot * (1 ± bump_relative)` with the same
    /// entropy and returns central-difference Delta and Gamma.
    ///
    /// # Errors
    /// `InvalidConfiguration` for a non-positive or non-finite bump, or a
    /// bump that takes the down spot to zero; otherwise as [`calc`](Self::calc).
    pub fn calc_greeks<C>(
        &self,
        contract: &Arc<C>,
        spot: f64,
        process: &Arc<C::Process>,
        knots_per_path: usize,
        bump_relative: f64,
        entropy: Option<Entropy>,
    ) -> Result<GreeksResult, SimulationError>
    where
        C: OptionContract + 'static,
        C::Process: 'static,
        C::Auxiliary: 'static,
    {
        if !bump_relative.is_finite() || bump_relative <= 0.0 || bump_relative >= 1.0 {
            return Err(SimulationError::invalid(format!(
                "bump_relative must lie in (0, 1), got {bump_relative}"
            )));
        }
        let entropy = Some(entropy.unwrap_or_else(Entropy::fresh));
        let h = bump_relative * spot;

        let base = self.calc(contract, spot, process, knots_per_path, false, entropy)?;
        let up = self.calc(contract, spot + h, process, knots_per_path, false, entropy)?;
        let down = self.calc(contract, spot - h, process, knots_per_path, false, entropy)?;

        Ok(GreeksResult {
            pv: base.pv,
            std_error: base.std_error,
            delta: (up.pv - down.pv) / (2.0 * h),
            gamma: (up.pv - 2.0 * base.pv + down.pv) / (h * h),
            entropy_used: base.entropy_used,
        })
    }

    #[allow(clippy::too_many_arguments)]
    fn run_sequential<C: OptionContract>(
        &self,
        contract: &C,
        spot: f64,
        process: &C::Process,
        half: usize,
        knots: usize,
        seeds: &[u64],
        want_auxiliary: bool,
        entropy: Entropy,
    ) -> Result<Vec<IterationOutcome<C::Auxiliary>>, SimulationError> {
        // None: the budget is past the end of the clock
        let deadline = Instant::now().checked_add(self.config.timeout());
        let mut outcomes = Vec::with_capacity(seeds.len());

        for (iteration, &seed) in seeds.iter().enumerate() {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                run_iteration(contract, spot, process, half, knots, seed, want_auxiliary)
            }))
            .map_err(|_| SimulationError::WorkerPanicked { iteration, entropy })?;
            outcomes.push(outcome);

            let expired = matches!(deadline, Some(d) if Instant::now() > d);
            if expired && iteration + 1 < seeds.len() {
                return Err(self.timed_out(entropy, iteration + 1, seeds.len()));
            }
        }
        Ok(outcomes)
    }

    fn pool_failure(&self, err: PoolError, entropy: Entropy) -> SimulationError {
        match err {
            PoolError::Timeout { completed, total } => self.timed_out(entropy, completed, total),
            PoolError::Panicked { index } => SimulationError::WorkerPanicked {
                iteration: index,
                entropy,
            },
            other => SimulationError::InvalidConfiguration {
                message: other.to_string(),
                entropy: Some(entropy),
            },
        }
    }

    fn timed_out(&self, entropy: Entropy, completed: usize, total: usize) -> SimulationError {
        let budget = self.config.timeout();
        tracing::warn!(completed, total, ?budget, "simulation timed out");
        SimulationError::SimulationTimeout {
            entropy,
            completed,
            total,
            budget,
        }
    }
}

type IterationOutcome<A> = Result<(f64, Option<A>), IterationError>;

fn run_iteration<C: OptionContract + ?Sized>(
    contract: &C,
    spot: f64,
    process: &C::Process,
    half: usize,
    knots: usize,
    seed: u64,
    want_auxiliary: bool,
) -> IterationOutcome<C::Auxiliary> {
    let mut rng = PricerRng::from_seed(seed);
    let draws = Matrix::antithetic_normals(half, knots, &mut rng);

    let paths = contract
        .paths_given_draws(spot, process, &draws)
        .map_err(IterationError::Contract)?;
    let valuation = contract.pv_paths(&paths, process).map_err(IterationError::Contract)?;

    if valuation.pv.len() != draws.rows() {
        return Err(IterationError::PvLength {
            expected: draws.rows(),
            actual: valuation.pv.len(),
        });
    }
    let pv = valuation.mean();
    let others = if want_auxiliary { valuation.others } else { None };
    Ok((pv, others))
}
