//! # pricer_core: Numerical Foundation
//!
//! ## Layer 1 (Foundation) Role
//!
//! pricer_core is the bottom layer of the pricing workspace, providing:
//! - Error taxonomy shared by every pricing path (`types::error`)
//! - The two-variant option flavour (`types::flavor`)
//! - Gauss-Legendre quadrature (`math::quadrature`)
//! - Bracketing root finders (`math::solvers`)
//!
//! ## Zero Dependency Principle
//!
//! Layer 1 has no dependencies on other pricer_* crates, with minimal external dependencies:
//! - num-traits: Traits for generic numerical computation
//! - thiserror: Error derivation
//! - serde: Serialisation support (optional)
//!
//! ## Usage Examples
//!
//! ```rust
//! use pricer_core::math::quadrature::GaussLegendre;
//! use pricer_core::types::OptionFlavor;
//!
//! let flavor: OptionFlavor = "put".parse().unwrap();
//! assert_eq!(flavor, OptionFlavor::Put);
//! assert!("straddle".parse::<OptionFlavor>().is_err());
//!
//! let rule = GaussLegendre::new(8).unwrap();
//! let area = rule.integrate(|x: f64| x * x, 0.0, 3.0);
//! assert!((area - 9.0).abs() < 1e-12);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde` (default): Enable serialisation for `OptionFlavor` and error payloads

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod math;
pub mod types;
