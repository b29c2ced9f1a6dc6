//! Numerical building blocks shared by the analytic and simulation layers.
//!
//! - [`quadrature`]: Gauss-Legendre rules for one-dimensional integrals
//! - [`solvers`]: Bracketing root finders

pub mod quadrature;
pub mod solvers;
