//! # Pricer Models (L2: Analytics and Models)
//!
//! Closed-form and semi-closed-form option pricing, plus the diffusion
//! process consumed by the Monte Carlo layer.
//!
//! This crate provides:
//! - The analytic kernel: normal and bivariate normal distributions,
//!   generalised Black-Scholes with cost of carry
//! - Bjerksund-Stensland (2002) American exercise approximation
//! - Discrete arithmetic Asian approximations (moment matching and Curran)
//!   with partially fixed averaging periods
//! - Geometric Brownian motion with flat rate, carry and volatility
//!
//! ## Design Principles
//!
//! - **Pure functions**: every approximator is re-entrant and side-effect free
//! - **Typed flavours**: formulas take [`pricer_core::types::OptionFlavor`];
//!   string entry points reject unknown flavours before any formula runs
//! - **No silent NaN**: domain violations surface as [`analytical::AnalyticalError`]
//!
//! ## Example
//!
//! ```
//! use pricer_core::types::OptionFlavor;
//! use pricer_models::analytical::american::bjerksund_stensland;
//! use pricer_models::analytical::BlackScholes;
//!
//! let american = bjerksund_stensland(OptionFlavor::Put, 100.0, 100.0, 1.0, 0.08, -0.04, 0.2).unwrap();
//! let european = BlackScholes::new(100.0, 0.08, -0.04, 0.2)
//!     .unwrap()
//!     .price(OptionFlavor::Put, 100.0, 1.0);
//! assert!(american >= european);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod analytical;
pub mod models;
