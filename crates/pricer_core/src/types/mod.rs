//! Core financial and error types.
//!
//! This module provides:
//! - `flavor`: The call/put option flavour, validated at construction
//! - `error`: Structured error types for pricing and solver operations
//!
//! # Re-exports
//!
//! For convenience, commonly used types are re-exported at this module level:
//! - [`OptionFlavor`] from `flavor`
//! - [`PricingError`], [`SolverError`] from `error`

pub mod error;
pub mod flavor;

pub use error::{PricingError, SolverError};
pub use flavor::OptionFlavor;
