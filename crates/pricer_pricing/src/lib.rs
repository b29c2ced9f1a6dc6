//! # Pricer Pricing (Layer 3: Simulation)
//!
//! ## Layer 3 Role
//!
//! pricer_pricing turns option contracts into statistically sound present
//! values:
//! - Reproducible randomness: root [`rng::Entropy`], splittable
//!   [`rng::SeedStream`], seeded [`rng::PricerRng`]
//! - A fixed-size [`pool::WorkerPool`] with index-ordered results, a
//!   deadline and panic isolation
//! - The [`mc::MonteCarloEngine`]: antithetic batches, iteration
//!   aggregation, bump-and-revalue Greeks with common random numbers
//! - Example contracts in [`path_dependent`] under
//!   [`pricer_models::models::GbmProcess`]
//!
//! ## Usage Example
//!
//! ```rust
//! use std::sync::Arc;
//! use pricer_core::types::OptionFlavor;
//! use pricer_models::models::GbmProcess;
//! use pricer_pricing::mc::{Backend, MonteCarloConfig, MonteCarloEngine};
//! use pricer_pricing::path_dependent::ArithmeticAsianContract;
//! use pricer_pricing::rng::Entropy;
//!
//! let config = MonteCarloConfig::builder()
//!     .batch_size(4_000)
//!     .num_iterations(8)
//!     .backend(Backend::ThreadPool)
//!     .workers(2)
//!     .build()
//!     .unwrap();
//! let engine = MonteCarloEngine::new(config).unwrap();
//!
//! let asian = Arc::new(
//!     ArithmeticAsianContract::new(OptionFlavor::Call, 100.0, vec![0.25, 0.5, 0.75, 1.0], 1.0).unwrap(),
//! );
//! let gbm = Arc::new(GbmProcess::new(0.05, 0.05, 0.25).unwrap());
//!
//! let result = engine
//!     .calc(&asian, 100.0, &gbm, asian.knots(), false, Some(Entropy::new(1)))
//!     .unwrap();
//! assert!((result.pv - 8.23).abs() < 5.0 * result.std_error + 0.05);
//! ```
//!
//! ## Logging
//!
//! The engine emits `tracing` spans and events (`mc_calc`); install a
//! subscriber to see them.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod mc;
pub mod path_dependent;
pub mod pool;
pub mod rng;
