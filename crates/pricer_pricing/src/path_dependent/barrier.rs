//! Discretely monitored barrier options.
//!
//! - **Up-and-In**: Option activates when price reaches the barrier from below
//! - **Up-and-Out**: Option deactivates when price reaches the barrier from below
//! - **Down-and-In**: Option activates when price reaches the barrier from above
//! - **Down-and-Out**: Option deactivates when price reaches the barrier from above
//!
//! The barrier is checked on `monitoring_steps` equally spaced dates in
//! `(0, T]`; the last one is expiry. No rebate is paid.

use pricer_core::types::{OptionFlavor, PricingError};
use pricer_models::models::GbmProcess;

use super::{check_expiry, check_path_width, check_price, gbm_paths};
use crate::mc::{Matrix, OptionContract, PathValuation};

/// Barrier type enumeration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BarrierType {
    /// Up-and-In: activates when price reaches the barrier from below
    UpIn,
    /// Up-and-Out: deactivates when price reaches the barrier from below
    UpOut,
    /// Down-and-In: activates when price reaches the barrier from above
    DownIn,
    /// Down-and-Out: deactivates when price reaches the barrier from above
    DownOut,
}

impl BarrierType {
    /// Returns true if this is an "up" barrier.
    #[inline]
    pub fn is_up(&self) -> bool {
        matches!(self, BarrierType::UpIn | BarrierType::UpOut)
    }

    /// Returns true if this is an "in" barrier (knock-in).
    #[inline]
    pub fn is_in(&self) -> bool {
        matches!(self, BarrierType::UpIn | BarrierType::DownIn)
    }

    #[inline]
    fn breached(&self, spot: f64, barrier: f64) -> bool {
        if self.is_up() {
            spot >= barrier
        } else {
            spot <= barrier
        }
    }
}

/// Knock-in or knock-out vanilla on a discretely monitored barrier.
#[derive(Clone, Debug, PartialEq)]
pub struct BarrierContract {
    flavor: OptionFlavor,
    strike: f64,
    barrier: f64,
    barrier_type: BarrierType,
    expiry: f64,
    monitoring_times: Vec<f64>,
}

impl BarrierContract {
    /// # Errors
    /// `NumericDomain` for a non-positive strike or barrier;
    /// `InvalidConfiguration` for a non-positive expiry or zero monitoring
    /// steps.
    pub fn new(
        flavor: OptionFlavor,
        strike: f64,
        barrier: f64,
        barrier_type: BarrierType,
        expiry: f64,
        monitoring_steps: usize,
    ) -> Result<Self, PricingError> {
        check_price("strike", strike)?;
        check_price("barrier", barrier)?;
        check_expiry(expiry)?;
        if monitoring_steps == 0 {
            return Err(PricingError::InvalidConfiguration(
                "barrier needs at least one monitoring date".to_string(),
            ));
        }
        let dt = expiry / monitoring_steps as f64;
        let mut monitoring_times: Vec<f64> = (1..=monitoring_steps).map(|i| i as f64 * dt).collect();
        // land exactly on expiry
        if let Some(last) = monitoring_times.last_mut() {
            *last = expiry;
        }
        Ok(Self {
            flavor,
            strike,
            barrier,
            barrier_type,
            expiry,
            monitoring_times,
        })
    }

    /// Random numbers consumed per path, one per monitoring date.
    #[inline]
    pub fn knots(&self) -> usize {
        self.monitoring_times.len()
    }

    /// Barrier level.
    #[inline]
    pub fn barrier(&self) -> f64 {
        self.barrier
    }

    /// Barrier type.
    #[inline]
    pub fn barrier_type(&self) -> BarrierType {
        self.barrier_type
    }

    /// Monitoring dates, the last being expiry.
    #[inline]
    pub fn monitoring_times(&self) -> &[f64] {
        &self.monitoring_times
    }

    fn payoff(&self, observed: &[f64]) -> f64 {
        let hit = observed
            .iter()
            .any(|&s| self.barrier_type.breached(s, self.barrier));
        match (hit == self.barrier_type.is_in(), observed.last()) {
            (true, Some(&terminal)) => self.flavor.intrinsic(terminal, self.strike),
            _ => 0.0,
        }
    }
}

impl OptionContract for BarrierContract {
    type Process = GbmProcess<f64>;
    type Auxiliary = ();

    fn paths_given_draws(
        &self,
        spot: f64,
        process: &Self::Process,
        draws: &Matrix,
    ) -> Result<Matrix, PricingError> {
        gbm_paths(spot, process, &self.monitoring_times, draws)
    }

    fn pv_paths(
        &self,
        paths: &Matrix,
        process: &Self::Process,
    ) -> Result<PathValuation<()>, PricingError> {
        check_path_width(paths, self.monitoring_times.len() + 1)?;
        let df = process.discount(self.expiry);
        let pv = paths.iter_rows().map(|row| df * self.payoff(&row[1..])).collect();
        Ok(PathValuation::new(pv))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // ================================================================
    // BarrierType
    // ================================================================

    #[test]
    fn test_barrier_type_flags() {
        assert!(BarrierType::UpIn.is_up() && BarrierType::UpIn.is_in());
        assert!(BarrierType::UpOut.is_up() && !BarrierType::UpOut.is_in());
        assert!(!BarrierType::DownIn.is_up() && BarrierType::DownIn.is_in());
        assert!(!BarrierType::DownOut.is_up() && !BarrierType::DownOut.is_in());
    }

    // ================================================================
    // Construction
    // ================================================================

    #[test]
    fn test_monitoring_grid() {
        let c = BarrierContract::new(OptionFlavor::Call, 100.0, 120.0, BarrierType::UpOut, 1.0, 4).unwrap();
        assert_eq!(c.knots(), 4);
        assert_eq!(c.monitoring_times(), &[0.25, 0.5, 0.75, 1.0]);
    }

    #[test]
    fn test_validation() {
        assert!(matches!(
            BarrierContract::new(OptionFlavor::Call, 100.0, 0.0, BarrierType::UpOut, 1.0, 4),
            Err(PricingError::NumericDomain(_))
        ));
        assert!(matches!(
            BarrierContract::new(OptionFlavor::Call, 100.0, 120.0, BarrierType::UpOut, 1.0, 0),
            Err(PricingError::InvalidConfiguration(_))
        ));
    }

    // ================================================================
    // Payoff
    // ================================================================

    #[test]
    fn test_up_and_out_knocked_by_intermediate_date() {
        let gbm = GbmProcess::new(0.0, 0.0, 0.2).unwrap();
        let c = BarrierContract::new(OptionFlavor::Call, 100.0, 120.0, BarrierType::UpOut, 1.0, 3).unwrap();
        let paths = Matrix::from_vec(
            2,
            4,
            vec![
                100.0, 110.0, 121.0, 115.0, // touched
                100.0, 105.0, 119.0, 115.0, // survived
            ],
        )
        .unwrap();
        let pv = c.pv_paths(&paths, &gbm).unwrap().pv;
        assert_eq!(pv, vec![0.0, 15.0]);
    }

    #[test]
    fn test_barrier_at_level_counts_as_hit() {
        let gbm = GbmProcess::new(0.0, 0.0, 0.2).unwrap();
        let c = BarrierContract::new(OptionFlavor::Put, 100.0, 90.0, BarrierType::DownIn, 1.0, 2).unwrap();
        let paths = Matrix::from_vec(1, 3, vec![100.0, 90.0, 95.0]).unwrap();
        assert_eq!(c.pv_paths(&paths, &gbm).unwrap().pv, vec![5.0]);
    }

    #[test]
    fn test_in_plus_out_equals_vanilla_pathwise() {
        let gbm = GbmProcess::new(0.03, 0.01, 0.25).unwrap();
        let draws = Matrix::from_vec(
            3,
            4,
            vec![0.5, 0.7, -0.2, 0.9, -1.0, -0.4, 0.3, 0.2, 1.5, 1.2, -2.0, 0.1],
        )
        .unwrap();
        let out = BarrierContract::new(OptionFlavor::Call, 100.0, 110.0, BarrierType::UpOut, 1.0, 4).unwrap();
        let knock_in = BarrierContract::new(OptionFlavor::Call, 100.0, 110.0, BarrierType::UpIn, 1.0, 4).unwrap();

        let paths = out.paths_given_draws(100.0, &gbm, &draws).unwrap();
        let pv_out = out.pv_paths(&paths, &gbm).unwrap().pv;
        let pv_in = knock_in.pv_paths(&paths, &gbm).unwrap().pv;

        let df = gbm.discount(1.0);
        for (i, row) in paths.iter_rows().enumerate() {
            let vanilla = df * (row[4] - 100.0).max(0.0);
            assert_relative_eq!(pv_in[i] + pv_out[i], vanilla, epsilon = 1e-12);
        }
    }
}
