//! Option flavour (call or put).
//!
//! Flavours arrive as strings from callers and configuration files; they are
//! parsed into [`OptionFlavor`] once, so an unknown flavour fails before any
//! formula is evaluated.

use std::fmt;
use std::str::FromStr;

use super::error::PricingError;

/// Exercise flavour of a vanilla or exotic option.
///
/// # Examples
/// ```
/// use pricer_core::types::OptionFlavor;
///
/// assert_eq!("c".parse::<OptionFlavor>().unwrap(), OptionFlavor::Call);
/// assert_eq!("Put".parse::<OptionFlavor>().unwrap(), OptionFlavor::Put);
/// assert_eq!(OptionFlavor::Call.sign(), 1.0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum OptionFlavor {
    /// Right to buy.
    Call,
    /// Right to sell.
    Put,
}

impl OptionFlavor {
    /// Returns `+1` for calls and `-1` for puts.
    #[inline]
    pub fn sign(self) -> f64 {
        match self {
            OptionFlavor::Call => 1.0,
            OptionFlavor::Put => -1.0,
        }
    }

    /// Returns `true` for calls.
    #[inline]
    pub fn is_call(self) -> bool {
        matches!(self, OptionFlavor::Call)
    }

    /// Intrinsic value `max(sign * (underlying - strike), 0)`.
    #[inline]
    pub fn intrinsic(self, underlying: f64, strike: f64) -> f64 {
        (self.sign() * (underlying - strike)).max(0.0)
    }
}

impl FromStr for OptionFlavor {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "c" | "call" => Ok(OptionFlavor::Call),
            "p" | "put" => Ok(OptionFlavor::Put),
            _ => Err(PricingError::InvalidOptionType(s.to_string())),
        }
    }
}

impl fmt::Display for OptionFlavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionFlavor::Call => write!(f, "call"),
            OptionFlavor::Put => write!(f, "put"),
        }
    }
}
