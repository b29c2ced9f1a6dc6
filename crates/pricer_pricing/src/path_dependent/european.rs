//! European vanilla option with pathwise delta.

use pricer_core::types::{OptionFlavor, PricingError};
use pricer_models::models::GbmProcess;

use super::{check_expiry, check_path_width, check_price, gbm_paths};
use crate::mc::{Matrix, OptionContract, PathValuation};

/// European call or put on the terminal spot.
///
/// Auxiliary output is the pathwise delta of every path,
/// `e^(-rT) · 1{in the money} · ±S_T / S_0`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EuropeanContract {
    flavor: OptionFlavor,
    strike: f64,
    expiry: f64,
}

impl EuropeanContract {
    /// # Errors
    /// `NumericDomain` for a non-positive strike, `InvalidConfiguration` for
    /// a non-positive expiry.
    pub fn new(flavor: OptionFlavor, strike: f64, expiry: f64) -> Result<Self, PricingError> {
        check_price("strike", strike)?;
        check_expiry(expiry)?;
        Ok(Self {
            flavor,
            strike,
            expiry,
        })
    }

    /// Random numbers consumed per path.
    #[inline]
    pub fn knots(&self) -> usize {
        1
    }

    /// Option flavour.
    #[inline]
    pub fn flavor(&self) -> OptionFlavor {
        self.flavor
    }

    /// Strike.
    #[inline]
    pub fn strike(&self) -> f64 {
        self.strike
    }

    /// Time to expiry in years.
    #[inline]
    pub fn expiry(&self) -> f64 {
        self.expiry
    }
}

impl OptionContract for EuropeanContract {
    type Process = GbmProcess<f64>;
    type Auxiliary = Vec<f64>;

    fn paths_given_draws(
        &self,
        spot: f64,
        process: &Self::Process,
        draws: &Matrix,
    ) -> Result<Matrix, PricingError> {
        gbm_paths(spot, process, &[self.expiry], draws)
    }

    fn pv_paths(
        &self,
        paths: &Matrix,
        process: &Self::Process,
    ) -> Result<PathValuation<Vec<f64>>, PricingError> {
        check_path_width(paths, 2)?;
        let df = process.discount(self.expiry);
        let sign = self.flavor.sign();

        let (pv, delta): (Vec<f64>, Vec<f64>) = paths
            .iter_rows()
            .map(|row| {
                let (s0, terminal) = (row[0], row[1]);
                let payoff = self.flavor.intrinsic(terminal, self.strike);
                let delta = if payoff > 0.0 { sign * terminal / s0 } else { 0.0 };
                (df * payoff, df * delta)
            })
            .unzip();

        Ok(PathValuation::with_others(pv, delta))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_new_validation() {
        assert!(EuropeanContract::new(OptionFlavor::Call, 100.0, 1.0).is_ok());
        assert!(matches!(
            EuropeanContract::new(OptionFlavor::Call, -1.0, 1.0),
            Err(PricingError::NumericDomain(_))
        ));
        assert!(matches!(
            EuropeanContract::new(OptionFlavor::Put, 100.0, 0.0),
            Err(PricingError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_pv_and_pathwise_delta() {
        let gbm = GbmProcess::new(0.05, 0.05, 0.2).unwrap();
        let call = EuropeanContract::new(OptionFlavor::Call, 100.0, 1.0).unwrap();
        let paths = Matrix::from_vec(2, 2, vec![100.0, 120.0, 100.0, 90.0]).unwrap();

        let valuation = call.pv_paths(&paths, &gbm).unwrap();
        let df = (-0.05_f64).exp();
        assert_relative_eq!(valuation.pv[0], 20.0 * df, epsilon = 1e-12);
        assert_eq!(valuation.pv[1], 0.0);

        let delta = valuation.others.unwrap();
        assert_relative_eq!(delta[0], 1.2 * df, epsilon = 1e-12);
        assert_eq!(delta[1], 0.0);
    }

    #[test]
    fn test_put_delta_is_negative() {
        let gbm = GbmProcess::new(0.05, 0.05, 0.2).unwrap();
        let put = EuropeanContract::new(OptionFlavor::Put, 100.0, 1.0).unwrap();
        let paths = Matrix::from_vec(1, 2, vec![100.0, 80.0]).unwrap();
        let delta = put.pv_paths(&paths, &gbm).unwrap().others.unwrap();
        assert!(delta[0] < 0.0);
    }

    #[test]
    fn test_rejects_wrong_path_width() {
        let gbm = GbmProcess::new(0.05, 0.05, 0.2).unwrap();
        let call = EuropeanContract::new(OptionFlavor::Call, 100.0, 1.0).unwrap();
        let paths = Matrix::zeros(3, 4);
        assert!(call.pv_paths(&paths, &gbm).is_err());
    }
}
