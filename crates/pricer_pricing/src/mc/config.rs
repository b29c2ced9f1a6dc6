//! Monte Carlo simulation configuration.
//!
//! A [`MonteCarloConfig`] is immutable once built. Values come from, in
//! increasing precedence: defaults, a TOML file, `PRICER_MC_*` environment
//! variables, explicit builder calls.
//!
//! ```toml
//! batch_size = 20000
//! num_iterations = 16
//! backend = "thread_pool"
//! workers = 8
//! timeout_secs = 30.0
//! ```

use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

use super::error::ConfigError;

/// Default paths per iteration.
pub const DEFAULT_BATCH_SIZE: usize = 10_000;

/// Default number of iterations.
pub const DEFAULT_NUM_ITERATIONS: usize = 10;

/// Default time budget of a run.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(100);

/// Environment variable prefix for overrides.
pub const ENV_PREFIX: &str = "PRICER_MC_";

/// Where iterations execute.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    /// On the calling thread, in iteration order.
    #[default]
    Sequential,
    /// On a [`WorkerPool`](crate::pool::WorkerPool).
    ThreadPool,
}

impl FromStr for Backend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sequential" | "serial" => Ok(Backend::Sequential),
            "thread_pool" | "threadpool" | "thread-pool" | "parallel" => Ok(Backend::ThreadPool),
            _ => Err(ConfigError::InvalidBackend(s.to_string())),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Sequential => write!(f, "sequential"),
            Backend::ThreadPool => write!(f, "thread_pool"),
        }
    }
}

/// Monte Carlo simulation configuration.
///
/// Use [`MonteCarloConfigBuilder`] to construct instances.
///
/// # Examples
///
/// ```rust
/// use std::time::Duration;
/// use pricer_pricing::mc::{Backend, MonteCarloConfig};
///
/// let config = MonteCarloConfig::builder()
///     .batch_size(10_001)
///     .num_iterations(8)
///     .backend(Backend::ThreadPool)
///     .workers(4)
///     .timeout(Duration::from_secs(30))
///     .build()
///     .expect("valid configuration");
///
/// // odd batch sizes round down to whole antithetic pairs
/// assert_eq!(config.total_paths(), 10_000 * 8);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct MonteCarloConfig {
    batch_size: usize,
    num_iterations: usize,
    backend: Backend,
    workers: Option<usize>,
    timeout: Duration,
}

impl Default for MonteCarloConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            num_iterations: DEFAULT_NUM_ITERATIONS,
            backend: Backend::default(),
            workers: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// On-disk schema; absent keys keep their defaults.
#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    batch_size: usize,
    num_iterations: usize,
    backend: Backend,
    workers: Option<usize>,
    timeout_secs: f64,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            num_iterations: DEFAULT_NUM_ITERATIONS,
            backend: Backend::default(),
            workers: None,
            timeout_secs: DEFAULT_TIMEOUT.as_secs_f64(),
        }
    }
}

impl MonteCarloConfig {
    /// Creates a builder seeded with the defaults.
    #[inline]
    pub fn builder() -> MonteCarloConfigBuilder {
        MonteCarloConfigBuilder::default()
    }

    /// Re-opens this configuration for explicit overrides.
    pub fn to_builder(&self) -> MonteCarloConfigBuilder {
        MonteCarloConfigBuilder {
            batch_size: self.batch_size,
            num_iterations: self.num_iterations,
            backend: self.backend,
            workers: self.workers,
            timeout: self.timeout,
        }
    }

    /// Parses a TOML document.
    ///
    /// # Errors
    /// `Parse` for malformed TOML or unknown keys, then validation errors.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        Self::builder()
            .batch_size(file.batch_size)
            .num_iterations(file.num_iterations)
            .backend(file.backend)
            .optional_workers(file.workers)
            .timeout_secs(file.timeout_secs)?
            .build()
    }

    /// Reads and parses a TOML file.
    ///
    /// # Errors
    /// `Io` if the file cannot be read, otherwise as [`from_toml_str`](Self::from_toml_str).
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
    }

    /// Defaults overridden by the process environment.
    ///
    /// # Errors
    /// As [`with_env_override`](Self::with_env_override).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_env_override()
    }

    /// Optional file, then environment overrides.
    ///
    /// # Errors
    /// File and environment errors, then validation errors.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let base = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        base.with_env_override()
    }

    /// Applies `PRICER_MC_*` variables from the process environment.
    ///
    /// Recognised: `BATCH_SIZE`, `NUM_ITERATIONS`, `BACKEND`, `WORKERS`,
    /// `TIMEOUT_SECS`.
    ///
    /// # Errors
    /// `InvalidParameter` for unparsable values, then validation errors.
    pub fn with_env_override(self) -> Result<Self, ConfigError> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides from an arbitrary `PRICER_MC_*` lookup.
    pub(crate) fn with_overrides<F>(self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |suffix: &str| lookup(&format!("{ENV_PREFIX}{suffix}"));
        let mut builder = self.to_builder();

        if let Some(v) = get("BATCH_SIZE") {
            builder = builder.batch_size(parse_env("PRICER_MC_BATCH_SIZE", &v)?);
        }
        if let Some(v) = get("NUM_ITERATIONS") {
            builder = builder.num_iterations(parse_env("PRICER_MC_NUM_ITERATIONS", &v)?);
        }
        if let Some(v) = get("BACKEND") {
            builder = builder.backend(v.parse()?);
        }
        if let Some(v) = get("WORKERS") {
            builder = builder.workers(parse_env("PRICER_MC_WORKERS", &v)?);
        }
        if let Some(v) = get("TIMEOUT_SECS") {
            builder = builder.timeout_secs(parse_env("PRICER_MC_TIMEOUT_SECS", &v)?)?;
        }

        builder.build()
    }

    /// Paths per iteration as requested.
    #[inline]
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Antithetic pairs per iteration, `floor(batch_size / 2)`.
    #[inline]
    pub fn half_batch(&self) -> usize {
        self.batch_size / 2
    }

    /// Number of iterations.
    #[inline]
    pub fn num_iterations(&self) -> usize {
        self.num_iterations
    }

    /// Execution backend.
    #[inline]
    pub fn backend(&self) -> Backend {
        self.backend
    }

    /// Configured worker count, `None` for all cores.
    #[inline]
    pub fn workers(&self) -> Option<usize> {
        self.workers
    }

    /// Worker count actually used by the thread pool.
    pub fn effective_workers(&self) -> usize {
        self.workers.unwrap_or_else(num_cpus::get)
    }

    /// Time budget of one run.
    #[inline]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Paths simulated by one run: `2 * floor(batch_size / 2) * num_iterations`.
    #[inline]
    pub fn total_paths(&self) -> usize {
        2 * self.half_batch() * self.num_iterations
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - `batch_size` is below 2
    /// - `num_iterations` is 0
    /// - `workers` is `Some(0)`
    /// - `timeout` is zero
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.batch_size < 2 {
            return Err(ConfigError::InvalidBatchSize(self.batch_size));
        }
        if self.num_iterations == 0 {
            return Err(ConfigError::InvalidIterations(self.num_iterations));
        }
        if let Some(0) = self.workers {
            return Err(ConfigError::InvalidWorkers(0));
        }
        if self.timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout("must be positive".to_string()));
        }
        Ok(())
    }
}

fn parse_env<T: FromStr>(name: &'static str, value: &str) -> Result<T, ConfigError>
where
    T::Err: fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::InvalidParameter {
        name,
        value: format!("{value:?}: {e}"),
    })
}

/// Builder for [`MonteCarloConfig`].
///
/// Starts from the defaults and validates at build time.
#[derive(Clone, Debug)]
pub struct MonteCarloConfigBuilder {
    batch_size: usize,
    num_iterations: usize,
    backend: Backend,
    workers: Option<usize>,
    timeout: Duration,
}

impl Default for MonteCarloConfigBuilder {
    fn default() -> Self {
        MonteCarloConfig::default().to_builder()
    }
}

impl MonteCarloConfigBuilder {
    /// Sets the paths per iteration (at least 2).
    #[inline]
    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Sets the number of iterations (at least 1).
    #[inline]
    pub fn num_iterations(mut self, num_iterations: usize) -> Self {
        self.num_iterations = num_iterations;
        self
    }

    /// Sets the execution backend.
    #[inline]
    pub fn backend(mut self, backend: Backend) -> Self {
        self.backend = backend;
        self
    }

    /// Sets the thread pool size.
    #[inline]
    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self
    }

    #[inline]
    fn optional_workers(mut self, workers: Option<usize>) -> Self {
        self.workers = workers;
        self
    }

    /// Sets the time budget of a run.
    #[inline]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the time budget in (fractional) seconds.
    ///
    /// # Errors
    /// `InvalidTimeout` for negative, NaN or overflowing values.
    pub fn timeout_secs(self, secs: f64) -> Result<Self, ConfigError> {
        let timeout = Duration::try_from_secs_f64(secs)
            .map_err(|e| ConfigError::InvalidTimeout(format!("{secs}: {e}")))?;
        Ok(self.timeout(timeout))
    }

    /// Builds the configuration.
    ///
    /// # Errors
    /// See [`MonteCarloConfig::validate`].
    pub fn build(self) -> Result<MonteCarloConfig, ConfigError> {
        let config = MonteCarloConfig {
            batch_size: self.batch_size,
            num_iterations: self.num_iterations,
            backend: self.backend,
            workers: self.workers,
            timeout: self.timeout,
        };
        config.validate()?;
        Ok(config)
    }
}
