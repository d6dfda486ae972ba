//! Result ordering and repeatability under parallel evaluation.

use std::thread;
use std::time::Duration;

use rand::Rng;

use crate::catalog::Catalog;
use crate::error::EvaluationError;
use crate::parameters::ParameterSet;
use crate::sweep::{SweepOptions, sweep, sweep_with};

/// Grid points near the start of the range take longest, so completion order
/// is roughly the reverse of grid order.
fn reverse_latency(parameters: &ParameterSet) -> Result<f64, EvaluationError> {
    let years = parameters.get("vesting_years").unwrap_or_default();
    let delay = (20.0 - years).max(0.0) * 0.5;
    thread::sleep(Duration::from_micros((delay * 1_000.0) as u64));
    Ok(years * 3.0)
}

#[test]
fn test_order_preserved_under_reversed_completion() {
    let catalog = Catalog::eso();
    let baseline = ParameterSet::from_catalog(&catalog);
    let options = SweepOptions::default().workers(8);

    let result = sweep_with(
        &baseline,
        catalog.get("vesting_years").unwrap(),
        &reverse_latency,
        &options,
        None,
    )
    .unwrap();

    assert_eq!(result.len(), 80);
    let values = result.override_values();
    assert!(values.windows(2).all(|w| w[0] < w[1]));
    for point in result.iter() {
        assert!((point.valuation - point.override_value * 3.0).abs() < 1e-9);
    }
}

#[test]
fn test_deterministic_gateway_is_idempotent() {
    let catalog = Catalog::eso();
    let baseline = ParameterSet::from_catalog(&catalog);
    let variable = catalog.get("risk_free_rate").unwrap();
    let gateway = |p: &ParameterSet| -> Result<f64, EvaluationError> {
        let rate = p.get("risk_free_rate").unwrap_or_default();
        Ok(p.get("stock_price").unwrap_or_default() * (-rate).exp())
    };

    let first = sweep(&baseline, variable, &gateway).unwrap();
    let second = sweep(&baseline, variable, &gateway).unwrap();

    assert_eq!(first, second);
}

/// A stochastic oracle changes valuations between runs but never the grid.
#[test]
fn test_noisy_gateway_keeps_grid() {
    let catalog = Catalog::eso();
    let baseline = ParameterSet::from_catalog(&catalog);
    let variable = catalog.get("exit_rate").unwrap();
    let gateway = |p: &ParameterSet| -> Result<f64, EvaluationError> {
        let noise: f64 = rand::rng().random_range(-1e-3..1e-3);
        Ok(p.get("exit_rate").unwrap_or_default() + noise)
    };

    let first = sweep(&baseline, variable, &gateway).unwrap();
    let second = sweep(&baseline, variable, &gateway).unwrap();

    assert_eq!(first.override_values(), second.override_values());
    for (a, b) in first.valuations().iter().zip(second.valuations()) {
        assert!((a - b).abs() < 2e-3);
    }
}

#[test]
fn test_worker_count_does_not_change_result() {
    let catalog = Catalog::eso();
    let baseline = ParameterSet::from_catalog(&catalog);
    let variable = catalog.get("expiration_years").unwrap();
    let gateway = |p: &ParameterSet| -> Result<f64, EvaluationError> {
        Ok(p.get("expiration_years").unwrap_or_default().sqrt())
    };

    let serial = sweep_with(&baseline, variable, &gateway, &SweepOptions::default().workers(1), None).unwrap();
    let parallel = sweep_with(&baseline, variable, &gateway, &SweepOptions::default().workers(6), None).unwrap();

    assert_eq!(serial, parallel);
}
