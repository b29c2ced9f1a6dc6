//! Outputs of a Monte Carlo run.

use crate::rng::Entropy;

/// Present value estimate of one run.
///
/// # Examples
///
/// ```rust
/// use pricer_pricing::mc::SimulationResult;
/// use pricer_pricing::rng::Entropy;
///
/// let result: SimulationResult<()> = SimulationResult {
///     pv: 10.45,
///     std_error: 0.02,
///     iteration_pvs: vec![10.43, 10.47],
///     other_outputs: None,
///     entropy_used: Entropy::new(1),
///     total_paths: 20_000,
/// };
///
/// println!("PV: {} +/- {}", result.pv, result.confidence_95());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationResult<A> {
    /// Mean of the iteration PVs.
    pub pv: f64,
    /// Sample standard deviation of the iteration PVs over
    /// `sqrt(num_iterations)`; zero for a single iteration.
    pub std_error: f64,
    /// Mean PV of each iteration, in iteration order.
    pub iteration_pvs: Vec<f64>,
    /// Auxiliary output of each iteration, in iteration order, when requested.
    pub other_outputs: Option<Vec<A>>,
    /// Entropy the run was seeded from.
    pub entropy_used: Entropy,
    /// Paths simulated.
    pub total_paths: usize,
}

impl<A> SimulationResult<A> {
    /// Returns the 95% confidence interval half-width.
    #[inline]
    pub fn confidence_95(&self) -> f64 {
        1.96 * self.std_error
    }

    /// Returns the 99% confidence interval half-width.
    #[inline]
    pub fn confidence_99(&self) -> f64 {
        2.576 * self.std_error
    }
}

/// Bump-and-revalue spot sensitivities under common random numbers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GreeksResult {
    /// Unbumped present value.
    pub pv: f64,
    /// Standard error of the unbumped present value.
    pub std_error: f64,
    /// Delta: ∂V/∂S (central difference).
    pub delta: f64,
    /// Gamma: ∂²V/∂S² (central difference).
    pub gamma: f64,
    /// Entropy shared by the three revaluations.
    pub entropy_used: Entropy,
}

/// Mean and standard error of the iteration PVs.
pub(crate) fn summarise(iteration_pvs: &[f64]) -> (f64, f64) {
    let n = iteration_pvs.len() as f64;
    let mean = iteration_pvs.iter().sum::<f64>() / n;
    if iteration_pvs.len() < 2 {
        return (mean, 0.0);
    }
    let variance = iteration_pvs.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0);
    (mean, (variance / n).sqrt())
}
