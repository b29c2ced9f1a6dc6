//! Discrete arithmetic-average (Asian) option approximations.
//!
//! Two approximations share the same preprocessing ([`FixingSplit`]):
//! - [`discrete_asian_moment_matching`]: lognormal matching of the first two
//!   moments of the average (Haug-Haug-Margrabe)
//! - [`discrete_asian_curran`]: conditioning on the geometric average (Curran)
//!
//! Both handle averaging periods that have already started: fixing times
//! `t <= 0` are realized at `realized_average`, the remaining fixings float.
//!
//! # Examples
//! ```
//! use pricer_models::analytical::asian::{discrete_asian_approx, AsianMethod, DiscreteAsianParams};
//!
//! let params = DiscreteAsianParams::new(100.0, 100.0, vec![0.25, 0.5, 0.75, 1.0], 1.0, 0.05, 0.05, 0.25);
//! let curran = discrete_asian_approx("call", AsianMethod::Curran, &params).unwrap();
//! let hhm = discrete_asian_approx("call", AsianMethod::MomentMatching, &params).unwrap();
//! assert!((curran - hhm).abs() < 0.1);
//! ```

mod curran;
mod fixings;
mod moment_matching;

pub use curran::discrete_asian_curran;
pub use fixings::{FixingClass, FixingSplit};
pub use moment_matching::discrete_asian_moment_matching;

use std::fmt;
use std::str::FromStr;

use pricer_core::types::{OptionFlavor, PricingError};

use super::error::AnalyticalError;

/// Inputs of a discretely monitored arithmetic Asian option.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DiscreteAsianParams {
    /// Spot price `S`
    pub spot: f64,
    /// Strike `K` on the full average
    pub strike: f64,
    /// Fixing times in years from today; `t <= 0` means already fixed
    pub fixing_times: Vec<f64>,
    /// Time to payment `T`
    pub expiry: f64,
    /// Risk-free rate `r`
    pub rate: f64,
    /// Cost of carry `b`
    pub carry: f64,
    /// Volatility `σ`
    pub volatility: f64,
    /// Average of the realized fixings `SA`
    #[cfg_attr(feature = "serde", serde(default))]
    pub realized_average: f64,
}

impl DiscreteAsianParams {
    /// Creates parameters for an averaging period that has not started.
    pub fn new(
        spot: f64,
        strike: f64,
        fixing_times: Vec<f64>,
        expiry: f64,
        rate: f64,
        carry: f64,
        volatility: f64,
    ) -> Self {
        Self {
            spot,
            strike,
            fixing_times,
            expiry,
            rate,
            carry,
            volatility,
            realized_average: 0.0,
        }
    }

    /// Sets the average of the fixings already observed.
    pub fn with_realized_average(mut self, realized_average: f64) -> Self {
        self.realized_average = realized_average;
        self
    }

    /// Forward price `S·e^(b·t)`.
    #[inline]
    pub fn forward(&self, time: f64) -> f64 {
        self.spot * (self.carry * time).exp()
    }

    /// Checks prices, times and volatility, then splits the schedule.
    ///
    /// # Errors
    /// - `InvalidSpot` / `InvalidStrike` for non-positive prices
    /// - `InvalidExpiry` / `InvalidVolatility` for non-positive time or volatility
    /// - `NoFixings` for an empty schedule
    pub fn split(&self) -> Result<FixingSplit, AnalyticalError> {
        AnalyticalError::check_spot(self.spot)?;
        AnalyticalError::check_strike(self.strike)?;
        AnalyticalError::check_expiry(self.expiry)?;
        AnalyticalError::check_volatility(self.volatility)?;
        FixingSplit::new(&self.fixing_times, self.realized_average)
    }
}

/// Approximation used for the floating part of the average.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum AsianMethod {
    /// Haug-Haug-Margrabe two-moment lognormal matching.
    MomentMatching,
    /// Curran's conditioning on the geometric average.
    #[default]
    Curran,
}

impl FromStr for AsianMethod {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "moment_matching" | "moment-matching" | "hhm" => Ok(AsianMethod::MomentMatching),
            "curran" => Ok(AsianMethod::Curran),
            _ => Err(PricingError::InvalidConfiguration(format!(
                "unknown averaging approximation: {s}"
            ))),
        }
    }
}

impl fmt::Display for AsianMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AsianMethod::MomentMatching => write!(f, "moment_matching"),
            AsianMethod::Curran => write!(f, "curran"),
        }
    }
}

/// String-flavoured entry point dispatching to either approximation.
///
/// # Errors
/// `InvalidOptionType` for flavours other than `c`/`call`/`p`/`put`, then
/// the errors of the selected approximation.
pub fn discrete_asian_approx(
    flavor: &str,
    method: AsianMethod,
    params: &DiscreteAsianParams,
) -> Result<f64, AnalyticalError> {
    let flavor: OptionFlavor = flavor.parse()?;
    match method {
        AsianMethod::MomentMatching => discrete_asian_moment_matching(flavor, params),
        AsianMethod::Curran => discrete_asian_curran(flavor, params),
    }
}

/// Splits the schedule and resolves the degenerate cases, handing
/// `(split, adjusted_strike, weight)` to `floating` otherwise.
fn price_split<F>(
    flavor: OptionFlavor,
    params: &DiscreteAsianParams,
    floating: F,
) -> Result<f64, AnalyticalError>
where
    F: FnOnce(&FixingSplit, f64, f64) -> Result<f64, AnalyticalError>,
{
    let split = params.split()?;
    let class = split.classify(flavor, params)?;
    if let FixingClass::Determined(value) = class {
        tracing::debug!(
            realized = split.realized(),
            total = split.total(),
            value,
            "average payoff fully determined"
        );
    }
    class.resolve(flavor, params, |adjusted_strike, weight| {
        floating(&split, adjusted_strike, weight)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn quarterly() -> DiscreteAsianParams {
        DiscreteAsianParams::new(100.0, 100.0, vec![0.25, 0.5, 0.75, 1.0], 1.0, 0.05, 0.05, 0.25)
    }

    #[test]
    fn test_method_parsing() {
        assert_eq!("curran".parse::<AsianMethod>().unwrap(), AsianMethod::Curran);
        assert_eq!(" HHM ".parse::<AsianMethod>().unwrap(), AsianMethod::MomentMatching);
        assert!(matches!(
            "levy".parse::<AsianMethod>(),
            Err(PricingError::InvalidConfiguration(_))
        ));
        assert_eq!(AsianMethod::default().to_string(), "curran");
    }

    #[test]
    fn test_string_entry_point_dispatches() {
        let p = quarterly();
        assert_eq!(
            discrete_asian_approx("p", AsianMethod::Curran, &p).unwrap(),
            discrete_asian_curran(OptionFlavor::Put, &p).unwrap()
        );
        assert_eq!(
            discrete_asian_approx("Call", AsianMethod::MomentMatching, &p).unwrap(),
            discrete_asian_moment_matching(OptionFlavor::Call, &p).unwrap()
        );
    }

    #[test]
    fn test_unknown_flavor_rejected_before_pricing() {
        // invalid inputs too, the flavour check comes first
        let p = DiscreteAsianParams::new(-1.0, 100.0, vec![], 0.0, 0.05, 0.05, 0.0);
        for method in [AsianMethod::Curran, AsianMethod::MomentMatching] {
            assert_eq!(
                discrete_asian_approx("digital", method, &p),
                Err(AnalyticalError::InvalidOptionType {
                    flavor: "digital".to_string()
                })
            );
        }
    }

    #[test]
    fn test_validation_errors() {
        let base = quarterly();
        let cases = [
            (DiscreteAsianParams { spot: 0.0, ..base.clone() }, "spot"),
            (DiscreteAsianParams { strike: -5.0, ..base.clone() }, "strike"),
            (DiscreteAsianParams { expiry: 0.0, ..base.clone() }, "expiry"),
            (DiscreteAsianParams { volatility: 0.0, ..base.clone() }, "volatility"),
            (DiscreteAsianParams { fixing_times: vec![], ..base.clone() }, "fixings"),
        ];
        for (p, what) in cases {
            for method in [AsianMethod::Curran, AsianMethod::MomentMatching] {
                let err = discrete_asian_approx("c", method, &p).unwrap_err();
                assert!(
                    err.to_string().to_lowercase().contains(what),
                    "{what}: unexpected error {err}"
                );
            }
        }
    }

    #[test]
    fn test_validation_maps_to_pricing_error_kinds() {
        let p = DiscreteAsianParams { spot: -1.0, ..quarterly() };
        let err: PricingError = discrete_asian_curran(OptionFlavor::Call, &p).unwrap_err().into();
        assert!(matches!(err, PricingError::NumericDomain(_)));

        let p = DiscreteAsianParams { expiry: -1.0, ..quarterly() };
        let err: PricingError = discrete_asian_curran(OptionFlavor::Call, &p).unwrap_err().into();
        assert!(matches!(err, PricingError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_degenerate_cases_agree_across_methods() {
        // all past and determined: put exactly zero
        let p = DiscreteAsianParams::new(100.0, 100.0, vec![-0.3, -0.2, -0.1], 0.5, 0.05, 0.0, 0.3)
            .with_realized_average(104.0);
        for method in [AsianMethod::Curran, AsianMethod::MomentMatching] {
            assert_eq!(discrete_asian_approx("put", method, &p).unwrap(), 0.0);
            assert_relative_eq!(
                discrete_asian_approx("call", method, &p).unwrap(),
                4.0 * (-0.025_f64).exp(),
                epsilon = 1e-12
            );
        }

        // one floating fixing: vanilla on the adjusted strike, divided by n
        let p = DiscreteAsianParams::new(100.0, 100.0, vec![-0.1, -0.05, 0.5], 0.5, 0.05, 0.02, 0.3)
            .with_realized_average(99.0);
        let vanilla = crate::analytical::BlackScholes::new(100.0, 0.05, 0.02, 0.3)
            .unwrap()
            .price_call(102.0, 0.5);
        for method in [AsianMethod::Curran, AsianMethod::MomentMatching] {
            assert_relative_eq!(
                discrete_asian_approx("call", method, &p).unwrap(),
                vanilla / 3.0,
                epsilon = 1e-12
            );
        }
    }
}
