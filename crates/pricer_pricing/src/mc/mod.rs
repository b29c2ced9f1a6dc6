//! Monte Carlo simulation engine.
//!
//! # Architecture
//!
//! ```text
//! MonteCarloEngine
//! ├── MonteCarloConfig  (batch size, iterations, backend, workers, timeout)
//! ├── WorkerPool        (ThreadPool backend only)
//! └── per iteration
//!     ├── PricerRng seeded from SeedStream(entropy)[i]
//!     ├── Matrix::antithetic_normals   [Z; -Z]
//!     ├── OptionContract::paths_given_draws
//!     └── OptionContract::pv_paths     one PV per path
//! ```
//!
//! # Reproducibility
//!
//! For fixed entropy, iteration count, batch size and knots the iteration
//! PVs are bit-identical across backends and worker counts:
//!
//! ```rust
//! use std::sync::Arc;
//! use pricer_core::types::OptionFlavor;
//! use pricer_models::models::GbmProcess;
//! use pricer_pricing::mc::{Backend, MonteCarloConfig, MonteCarloEngine};
//! use pricer_pricing::path_dependent::EuropeanContract;
//! use pricer_pricing::rng::Entropy;
//!
//! let put = Arc::new(EuropeanContract::new(OptionFlavor::Put, 100.0, 0.5).unwrap());
//! let gbm = Arc::new(GbmProcess::new(0.03, 0.03, 0.25).unwrap());
//!
//! let run = |backend| {
//!     let config = MonteCarloConfig::builder()
//!         .batch_size(1_000)
//!         .num_iterations(8)
//!         .backend(backend)
//!         .workers(3)
//!         .build()
//!         .unwrap();
//!     MonteCarloEngine::new(config)
//!         .unwrap()
//!         .calc(&put, 100.0, &gbm, 1, false, Some(Entropy::new(7)))
//!         .unwrap()
//! };
//!
//! assert_eq!(run(Backend::Sequential).iteration_pvs, run(Backend::ThreadPool).iteration_pvs);
//! ```

pub mod config;
pub mod contract;
pub mod engine;
pub mod error;
pub mod matrix;
pub mod result;

pub use config::{Backend, MonteCarloConfig, MonteCarloConfigBuilder};
pub use contract::{OptionContract, PathValuation};
pub use engine::{MonteCarloEngine, DEFAULT_BUMP_RELATIVE};
pub use error::{ConfigError, SimulationError};
pub use matrix::Matrix;
pub use result::{GreeksResult, SimulationResult};
