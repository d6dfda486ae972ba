//! Worked scenarios on the default option catalog.

use crate::catalog::Catalog;
use crate::error::EvaluationError;
use crate::parameters::ParameterSet;
use crate::sweep::{SweepRange, sweep};

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

/// Stub oracle that doubles whichever variable `name` is being swept.
fn doubling(name: &'static str) -> impl Fn(&ParameterSet) -> Result<f64, EvaluationError> {
    move |parameters: &ParameterSet| Ok(parameters.get(name).unwrap_or_default() * 2.0)
}

/// Volatility has bounds 0-200 % and no step: step = 2.0 / 20 = 0.1,
/// twenty points, values reported in percent but valuations unscaled.
#[test]
fn test_volatility_sweep_scenario() {
    let catalog = Catalog::eso();
    let baseline = ParameterSet::from_catalog(&catalog);
    assert_eq!(baseline.get("strike_price"), Some(10.0));
    assert_eq!(baseline.get("stock_price"), Some(10.0));
    assert_eq!(baseline.get("volatility"), Some(0.3));

    let result = sweep(&baseline, catalog.get("volatility").unwrap(), &doubling("volatility")).unwrap();

    assert_eq!(result.len(), 20);
    for (i, point) in result.iter().enumerate() {
        let raw = 0.1 * i as f64;
        assert_close(point.override_value, raw * 100.0);
        assert_close(point.valuation, raw * 2.0);
    }
    assert_close(result.points[0].override_value, 0.0);
    assert_close(result.points[0].valuation, 0.0);
    assert_close(result.points[1].override_value, 10.0);
    assert_close(result.points[1].valuation, 0.2);
    assert_close(result.points[19].override_value, 190.0);
    assert_close(result.points[19].valuation, 3.8);
}

/// Strike price has no maximum: max = 2 x initial = 20, step 1, twenty points.
#[test]
fn test_strike_price_sweep_scenario() {
    let catalog = Catalog::eso();
    let baseline = ParameterSet::from_catalog(&catalog);

    let result = sweep(&baseline, catalog.get("strike_price").unwrap(), &doubling("strike_price")).unwrap();

    assert!(!result.percentage);
    assert_eq!(
        result.override_values(),
        (0..20).map(f64::from).collect::<Vec<_>>()
    );
    assert_eq!(
        result.valuations(),
        (0..20).map(|i| f64::from(i) * 2.0).collect::<Vec<_>>()
    );
}

/// Every percent variable reports grid values scaled by exactly 100.
#[test]
fn test_percentage_variables_scaled_once() {
    let catalog = Catalog::eso();
    let baseline = ParameterSet::from_catalog(&catalog);

    for variable in catalog.iter().filter(|v| v.percentage) {
        let grid = SweepRange::for_variable(variable).unwrap().grid();
        let gateway = |_: &ParameterSet| -> Result<f64, EvaluationError> { Ok(1.0) };
        let result = sweep(&baseline, variable, &gateway).unwrap();

        assert_eq!(result.len(), grid.len(), "{}", variable.name);
        for (point, raw) in result.iter().zip(&grid) {
            assert_eq!(point.override_value, raw * 100.0, "{}", variable.name);
            assert_eq!(point.valuation, 1.0);
        }
    }
}

/// Non-percent variables are reported unscaled, ascending, below their maximum.
#[test]
fn test_bounded_variables_stay_below_max() {
    let catalog = Catalog::eso();
    let baseline = ParameterSet::from_catalog(&catalog);
    let gateway = |_: &ParameterSet| -> Result<f64, EvaluationError> { Ok(0.0) };

    for variable in catalog.iter().filter(|v| v.is_bounded()) {
        let result = sweep(&baseline, variable, &gateway).unwrap();
        let max = variable.to_display(variable.max_value.unwrap());
        let values = result.override_values();

        assert!(values.windows(2).all(|w| w[0] < w[1]), "{}", variable.name);
        assert!(*values.last().unwrap() < max, "{}", variable.name);
    }
}

/// Only the swept variable changes between calls; everything else is the baseline.
#[test]
fn test_baseline_held_fixed() {
    use std::sync::Mutex;

    let catalog = Catalog::eso();
    let baseline = ParameterSet::from_catalog(&catalog).with_override("stock_price", 13.0);
    let seen = Mutex::new(Vec::new());
    let gateway = |parameters: &ParameterSet| -> Result<f64, EvaluationError> {
        seen.lock().unwrap().push(parameters.clone());
        Ok(0.0)
    };

    sweep(&baseline, catalog.get("exit_rate").unwrap(), &gateway).unwrap();

    let seen = seen.into_inner().unwrap();
    assert_eq!(seen.len(), 20);
    for parameters in &seen {
        assert_eq!(parameters.iterations, baseline.iterations);
        assert_eq!(parameters.m, baseline.m);
        for (name, value) in baseline.iter().filter(|(name, _)| *name != "exit_rate") {
            assert_eq!(parameters.get(name), Some(value), "{name}");
        }
    }
    assert_eq!(baseline.get("exit_rate"), Some(0.2));
}
