//! Monte Carlo estimates against the closed-form and approximate prices of
//! pricer_models.

use std::sync::Arc;

use approx::assert_relative_eq;
use pricer_core::types::OptionFlavor;
use pricer_models::analytical::asian::{
    discrete_asian_curran, discrete_asian_moment_matching, DiscreteAsianParams,
};
use pricer_models::analytical::{norm_cdf, BlackScholes};
use pricer_models::models::GbmProcess;
use pricer_pricing::mc::{Backend, MonteCarloConfig, MonteCarloEngine};
use pricer_pricing::path_dependent::{
    ArithmeticAsianContract, BarrierContract, BarrierType, EuropeanContract,
};
use pricer_pricing::rng::Entropy;

fn engine(batch_size: usize, iterations: usize) -> MonteCarloEngine {
    let config = MonteCarloConfig::builder()
        .batch_size(batch_size)
        .num_iterations(iterations)
        .backend(Backend::ThreadPool)
        .build()
        .unwrap();
    MonteCarloEngine::new(config).unwrap()
}

// ================================================================
// European
// ================================================================

#[test]
fn test_european_call_within_three_standard_errors() {
    let bs = BlackScholes::new(100.0, 0.02, 0.0, 0.056).unwrap();
    let exact = bs.price(OptionFlavor::Call, 104.0, 0.5);
    assert_relative_eq!(exact, 0.339_143_607_796_344_8, epsilon = 1e-10);

    let call = Arc::new(EuropeanContract::new(OptionFlavor::Call, 104.0, 0.5).unwrap());
    let gbm = Arc::new(GbmProcess::new(0.02, 0.0, 0.056).unwrap());
    let result = engine(20_000, 20)
        .calc(&call, 100.0, &gbm, call.knots(), false, Some(Entropy::new(2024)))
        .unwrap();

    assert!(
        (result.pv - exact).abs() < 3.0 * result.std_error,
        "mc {} +/- {} vs {}",
        result.pv,
        result.std_error,
        exact
    );
}

#[test]
fn test_standard_error_shrinks_with_iterations() {
    let put = Arc::new(EuropeanContract::new(OptionFlavor::Put, 100.0, 1.0).unwrap());
    let gbm = Arc::new(GbmProcess::new(0.05, 0.05, 0.2).unwrap());
    let entropy = Some(Entropy::new(17));

    let few = engine(2_000, 4)
        .calc(&put, 100.0, &gbm, 1, false, entropy)
        .unwrap();
    let many = engine(2_000, 64)
        .calc(&put, 100.0, &gbm, 1, false, entropy)
        .unwrap();
    assert!(many.std_error < few.std_error);
}

#[test]
fn test_pathwise_delta_matches_black_scholes() {
    let call = Arc::new(EuropeanContract::new(OptionFlavor::Call, 100.0, 1.0).unwrap());
    let gbm = Arc::new(GbmProcess::new(0.05, 0.05, 0.2).unwrap());
    let result = engine(20_000, 20)
        .calc(&call, 100.0, &gbm, 1, true, Some(Entropy::new(5)))
        .unwrap();

    let outputs = result.other_outputs.expect("pathwise deltas requested");
    assert_eq!(outputs.len(), 20);
    let n: usize = outputs.iter().map(Vec::len).sum();
    let delta = outputs.iter().flatten().sum::<f64>() / n as f64;

    let exact = BlackScholes::new(100.0, 0.05, 0.05, 0.2)
        .unwrap()
        .delta(OptionFlavor::Call, 100.0, 1.0);
    assert_relative_eq!(delta, exact, epsilon = 5e-3);
}

#[test]
fn test_bump_and_revalue_greeks() {
    let call = Arc::new(EuropeanContract::new(OptionFlavor::Call, 100.0, 1.0).unwrap());
    let gbm = Arc::new(GbmProcess::new(0.05, 0.05, 0.2).unwrap());
    let greeks = engine(20_000, 20)
        .calc_greeks(&call, 100.0, &gbm, 1, 0.01, Some(Entropy::new(6)))
        .unwrap();

    let bs = BlackScholes::new(100.0, 0.05, 0.05, 0.2).unwrap();
    assert!((greeks.pv - bs.price(OptionFlavor::Call, 100.0, 1.0)).abs() < 4.0 * greeks.std_error);
    assert_relative_eq!(greeks.delta, bs.delta(OptionFlavor::Call, 100.0, 1.0), epsilon = 5e-3);
    assert_relative_eq!(greeks.gamma, bs.gamma(100.0, 1.0), epsilon = 2e-3);
}

// ================================================================
// Discrete Asian
// ================================================================

fn assert_asian_close(params: &DiscreteAsianParams, entropy: u64) {
    let gbm = Arc::new(GbmProcess::new(params.rate, params.carry, params.volatility).unwrap());
    let e = engine(40_000, 20);

    for flavor in [OptionFlavor::Call, OptionFlavor::Put] {
        let contract = Arc::new(ArithmeticAsianContract::from_params(flavor, params).unwrap());
        let mc = e
            .calc(&contract, params.spot, &gbm, contract.knots(), false, Some(Entropy::new(entropy)))
            .unwrap();

        let curran = discrete_asian_curran(flavor, params).unwrap();
        let hhm = discrete_asian_moment_matching(flavor, params).unwrap();

        assert!(
            (curran - mc.pv).abs() < 4.0 * mc.std_error + 0.005 * curran,
            "{flavor}: curran {curran} vs mc {} +/- {}",
            mc.pv,
            mc.std_error
        );
        assert!(
            (hhm - mc.pv).abs() < 4.0 * mc.std_error + 0.015 * hhm,
            "{flavor}: moment matching {hhm} vs mc {} +/- {}",
            mc.pv,
            mc.std_error
        );
    }
}

#[test]
fn test_asian_quarterly_fixings() {
    let params = DiscreteAsianParams::new(100.0, 100.0, vec![0.25, 0.5, 0.75, 1.0], 1.0, 0.05, 0.05, 0.25);
    assert_asian_close(&params, 101);
}

#[test]
fn test_asian_monthly_fixings_on_futures() {
    let fixings = (1..=12).map(|i| i as f64 / 12.0).collect();
    let params = DiscreteAsianParams::new(100.0, 95.0, fixings, 1.0, 0.03, 0.0, 0.4);
    assert_asian_close(&params, 202);
}

#[test]
fn test_asian_partially_fixed_period() {
    let params = DiscreteAsianParams::new(
        100.0,
        100.0,
        vec![-0.2, -0.1, 0.1, 0.2, 0.3, 0.4],
        0.4,
        0.05,
        0.02,
        0.3,
    )
    .with_realized_average(103.0);
    assert_asian_close(&params, 303);
}

#[test]
fn test_asian_determined_payoff_matches_exactly() {
    // m·SA >= n·K: the put is worthless on every path
    let params = DiscreteAsianParams::new(100.0, 90.0, vec![-0.2, -0.1, 0.3], 0.3, 0.05, 0.05, 0.3)
        .with_realized_average(140.0);
    let gbm = Arc::new(GbmProcess::new(0.05, 0.05, 0.3).unwrap());
    let put = Arc::new(ArithmeticAsianContract::from_params(OptionFlavor::Put, &params).unwrap());
    let mc = engine(1_000, 4)
        .calc(&put, 100.0, &gbm, put.knots(), false, Some(Entropy::new(1)))
        .unwrap();
    assert_eq!(mc.pv, 0.0);
    assert_eq!(discrete_asian_curran(OptionFlavor::Put, &params).unwrap(), 0.0);
}

// ================================================================
// Barrier
// ================================================================

/// Continuously monitored down-and-out call, strike above barrier.
fn down_and_out_call(s: f64, k: f64, h: f64, t: f64, r: f64, b: f64, v: f64) -> f64 {
    let mu = (b - 0.5 * v * v) / (v * v);
    let vt = v * t.sqrt();
    let x1 = (s / k).ln() / vt + (1.0 + mu) * vt;
    let y1 = (h * h / (s * k)).ln() / vt + (1.0 + mu) * vt;
    let carry = ((b - r) * t).exp();
    let df = (-r * t).exp();

    let a = s * carry * norm_cdf(x1) - k * df * norm_cdf(x1 - vt);
    let c = s * carry * (h / s).powf(2.0 * (mu + 1.0)) * norm_cdf(y1)
        - k * df * (h / s).powf(2.0 * mu) * norm_cdf(y1 - vt);
    a - c
}

#[test]
fn test_discrete_barrier_against_shifted_continuous_formula() {
    let (spot, strike, barrier, expiry, r, b, vol, steps) = (100.0, 100.0, 90.0, 1.0, 0.05, 0.05, 0.25, 50);
    // discrete monitoring ~ continuous barrier shifted by exp(-0.5826 σ sqrt(dt))
    let shifted = barrier * (-0.5826 * vol * (expiry / steps as f64).sqrt()).exp();
    let expected = down_and_out_call(spot, strike, shifted, expiry, r, b, vol);
    assert_relative_eq!(expected, 9.983_102_432_418_134, epsilon = 1e-6);

    let contract = Arc::new(
        BarrierContract::new(OptionFlavor::Call, strike, barrier, BarrierType::DownOut, expiry, steps).unwrap(),
    );
    let gbm = Arc::new(GbmProcess::new(r, b, vol).unwrap());
    let mc = engine(20_000, 20)
        .calc(&contract, spot, &gbm, contract.knots(), false, Some(Entropy::new(77)))
        .unwrap();

    assert!(
        (mc.pv - expected).abs() < 4.0 * mc.std_error + 0.01 * expected,
        "mc {} +/- {} vs {}",
        mc.pv,
        mc.std_error,
        expected
    );
}
