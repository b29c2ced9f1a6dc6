//! Solver configuration types.

use num_traits::Float;

/// Configuration for root-finding algorithms.
///
/// # Example
///
/// ```
/// use pricer_core::math::solvers::SolverConfig;
///
/// let config: SolverConfig<f64> = SolverConfig::default();
/// assert_eq!(config.max_iterations, 100);
///
/// let tight = SolverConfig::<f64>::high_precision();
/// assert!(tight.tolerance < config.tolerance);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig<T: Float> {
    /// Convergence tolerance, applied both to `|f(x)|` and to the bracket width.
    pub tolerance: T,

    /// Maximum number of iterations before giving up.
    pub max_iterations: usize,
}

impl<T: Float> Default for SolverConfig<T> {
    /// Tolerance `1e-10`, at most 100 iterations.
    fn default() -> Self {
        Self {
            tolerance: T::from(1e-10).unwrap_or_else(T::epsilon),
            max_iterations: 100,
        }
    }
}

impl<T: Float> SolverConfig<T> {
    /// Creates a configuration; non-positive tolerances and a zero iteration
    /// budget are replaced by the defaults.
    pub fn new(tolerance: T, max_iterations: usize) -> Self {
        let defaults = Self::default();
        Self {
            tolerance: if tolerance > T::zero() {
                tolerance
            } else {
                defaults.tolerance
            },
            max_iterations: if max_iterations > 0 {
                max_iterations
            } else {
                defaults.max_iterations
            },
        }
    }

    /// Tolerance `1e-14`, at most 500 iterations.
    pub fn high_precision() -> Self {
        Self {
            tolerance: T::from(1e-14).unwrap_or_else(T::epsilon),
            max_iterations: 500,
        }
    }
}
