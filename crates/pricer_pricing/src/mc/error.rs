//! Error types for the Monte Carlo engine.
//!
//! - [`ConfigError`]: rejected configuration values (builder, TOML, environment)
//! - [`SimulationError`]: failures of a simulation run, carrying the entropy
//!   needed to reproduce it

use std::time::Duration;

use pricer_core::types::PricingError;
use thiserror::Error;

use crate::rng::Entropy;

/// Configuration error for the Monte Carlo engine.
///
/// These errors occur while building, loading or overriding a
/// [`MonteCarloConfig`](super::MonteCarloConfig).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Batch size below 2 (no antithetic pair fits).
    #[error("Invalid batch size {0}: must be at least 2")]
    InvalidBatchSize(usize),

    /// Zero iterations.
    #[error("Invalid iteration count {0}: must be at least 1")]
    InvalidIterations(usize),

    /// Zero workers.
    #[error("Invalid worker count {0}: must be at least 1")]
    InvalidWorkers(usize),

    /// Zero, negative or non-finite timeout.
    #[error("Invalid timeout: {0}")]
    InvalidTimeout(String),

    /// Unknown backend name.
    #[error("Invalid backend '{0}': expected 'sequential' or 'thread_pool'")]
    InvalidBackend(String),

    /// Unparsable parameter value with name and description.
    #[error("Invalid parameter '{name}': {value}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Description of the invalid value.
        value: String,
    },

    /// Configuration file could not be read.
    #[error("Configuration file error: {0}")]
    Io(String),

    /// Configuration file is not valid TOML for this schema.
    #[error("Configuration parse error: {0}")]
    Parse(String),
}

/// Failure of a simulation run.
///
/// Every variant raised after the entropy was chosen carries it, so the
/// failing run can be replayed exactly.
#[derive(Error, Debug)]
pub enum SimulationError {
    /// Invalid engine, call or contract output shape.
    #[error("Invalid configuration: {message}")]
    InvalidConfiguration {
        /// What was rejected.
        message: String,
        /// Entropy of the run, when it had started.
        entropy: Option<Entropy>,
    },

    /// The run did not finish within its time budget.
    #[error("Simulation timed out after {budget:?} with {completed}/{total} iterations (entropy {entropy})")]
    SimulationTimeout {
        /// Entropy of the run.
        entropy: Entropy,
        /// Iterations finished before the deadline.
        completed: usize,
        /// Iterations requested.
        total: usize,
        /// Time budget.
        budget: Duration,
    },

    /// The contract returned an error for one iteration.
    #[error("Iteration {iteration} failed (entropy {entropy}): {source}")]
    IterationFailed {
        /// Iteration index.
        iteration: usize,
        /// Entropy of the run.
        entropy: Entropy,
        /// Error raised by the contract.
        #[source]
        source: PricingError,
    },

    /// A worker panicked while running an iteration.
    #[error("Worker panicked in iteration {iteration} (entropy {entropy})")]
    WorkerPanicked {
        /// Iteration index.
        iteration: usize,
        /// Entropy of the run.
        entropy: Entropy,
    },
}

impl SimulationError {
    /// Entropy of the failed run, if it had started.
    pub fn entropy(&self) -> Option<Entropy> {
        match self {
            Self::InvalidConfiguration { entropy, .. } => *entropy,
            Self::SimulationTimeout { entropy, .. }
            | Self::IterationFailed { entropy, .. }
            | Self::WorkerPanicked { entropy, .. } => Some(*entropy),
        }
    }

    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            message: message.into(),
            entropy: None,
        }
    }
}

impl From<ConfigError> for SimulationError {
    fn from(err: ConfigError) -> Self {
        Self::invalid(err.to_string())
    }
}

impl From<SimulationError> for PricingError {
    fn from(err: SimulationError) -> Self {
        match err {
            SimulationError::InvalidConfiguration { message, .. } => {
                PricingError::InvalidConfiguration(message)
            }
            SimulationError::IterationFailed { source, .. } => source,
            other => PricingError::NumericalInstability(other.to_string()),
        }
    }
}
