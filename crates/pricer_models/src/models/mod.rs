//! Diffusion processes driving the Monte Carlo contracts.
//!
//! This module provides:
//! - `GbmProcess`: Geometric Brownian Motion with flat rate, carry and volatility
//!
//! ## Example
//!
//! ```
//! use pricer_models::models::GbmProcess;
//!
//! let gbm = GbmProcess::new(0.05, 0.05, 0.2).unwrap();
//!
//! // Spot at three fixing dates from three standard normal shocks
//! let mut path = [0.0; 3];
//! gbm.fill_path(100.0, &[0.25, 0.5, 1.0], &[0.1, -0.4, 0.8], &mut path);
//! assert!(path.iter().all(|s| *s > 0.0));
//! ```

pub mod gbm;

pub use gbm::GbmProcess;
