//! # Random Number Generation Infrastructure
//!
//! Random draws for the Monte Carlo engine:
//!
//! - [`Entropy`]: root entropy of a run, recorded in every result
//! - [`SeedStream`]: counter-based splitter turning one entropy into
//!   independent per-iteration seeds
//! - [`PricerRng`]: seeded `StdRng` wrapper producing standard normals
//!
//! ## Reproducibility
//!
//! Iteration `i` always draws from `PricerRng::from_seed(stream.seed(i))`.
//! Neither the backend nor the worker count enters the seed.
//!
//! ```rust
//! use pricer_pricing::rng::{Entropy, PricerRng, SeedStream};
//!
//! let stream = SeedStream::new(Entropy::new(2024));
//! let mut rng = PricerRng::from_seed(stream.seed(3));
//!
//! let mut buffer = vec![0.0; 1000];
//! rng.fill_normal(&mut buffer);
//! ```

mod prng;
mod stream;

pub use prng::PricerRng;
pub use stream::{Entropy, SeedStream};
