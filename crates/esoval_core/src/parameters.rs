//! Parameter sets: the complete named inputs handed to the valuation gateway.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::error::ConfigurationError;

/// Precision knob passed to the pricing oracle when none is configured.
pub const DEFAULT_ITERATIONS: u32 = 100;

/// Full set of valuation inputs, keyed by variable name.
///
/// Values are stored in their canonical units (percentages as fractions).
/// Serializes as a single flat mapping: one entry per variable plus
/// `iterations` and `m`, which is the shape the oracle receives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSet {
    #[serde(flatten)]
    values: FxHashMap<String, f64>,
    /// Iteration / precision count for the oracle
    pub iterations: u32,
    /// Reserved oracle knob, passed through untouched
    pub m: Option<f64>,
}

impl ParameterSet {
    /// Empty set with the default session constants.
    #[must_use]
    pub fn new() -> Self {
        Self {
            values: FxHashMap::default(),
            iterations: DEFAULT_ITERATIONS,
            m: None,
        }
    }

    /// Baseline built from every descriptor's initial value.
    ///
    /// Descriptors without an initial value are left unset; [`validate`](Self::validate)
    /// reports them until they are supplied.
    #[must_use]
    pub fn from_catalog(catalog: &Catalog) -> Self {
        let mut set = Self::new();
        for variable in catalog {
            if let Some(value) = variable.initial_value {
                set.values.insert(variable.name.clone(), value);
            }
        }
        set
    }

    /// Baseline from user-entered values in display units.
    ///
    /// Percentage inputs are divided by 100 here and nowhere else; inputs for
    /// variables with bounds are checked against them.
    pub fn with_display_inputs<I, S>(catalog: &Catalog, inputs: I) -> Result<Self, ConfigurationError>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: AsRef<str>,
    {
        let mut set = Self::from_catalog(catalog);
        for (name, display) in inputs {
            let variable = catalog.require(name.as_ref())?;
            let value = variable.check_display_value(display)?;
            set.values.insert(variable.name.clone(), value);
        }
        set.validate(catalog)?;
        Ok(set)
    }

    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_m(mut self, m: Option<f64>) -> Self {
        self.m = m;
        self
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    pub fn set(&mut self, name: impl Into<String>, value: f64) {
        self.values.insert(name.into(), value);
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Copy of this set with one variable replaced. The original is untouched.
    #[must_use]
    pub fn with_override(&self, name: &str, value: f64) -> Self {
        let mut modified = self.clone();
        modified.values.insert(name.to_string(), value);
        modified
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Check the set is fully populated for `catalog`, finite, and has a
    /// usable iteration count.
    pub fn validate(&self, catalog: &Catalog) -> Result<(), ConfigurationError> {
        if self.iterations < 1 {
            return Err(ConfigurationError::InvalidIterations {
                iterations: self.iterations,
            });
        }

        for variable in catalog {
            let Some(value) = self.get(&variable.name) else {
                return Err(ConfigurationError::MissingInitialValue {
                    name: variable.name.clone(),
                });
            };
            if !value.is_finite() {
                return Err(ConfigurationError::NonFinite {
                    name: variable.name.clone(),
                    value,
                });
            }
        }

        if let Some(extra) = self.values.keys().find(|name| catalog.get(name).is_none()) {
            return Err(ConfigurationError::UnknownVariable {
                name: extra.clone(),
            });
        }

        if let Some(m) = self.m
            && !m.is_finite()
        {
            return Err(ConfigurationError::NonFinite {
                name: "m".to_string(),
                value: m,
            });
        }

        Ok(())
    }
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::VariableDescriptor;

    #[test]
    fn test_from_catalog_uses_initial_values() {
        let catalog = Catalog::eso();
        let set = ParameterSet::from_catalog(&catalog);

        assert_eq!(set.len(), catalog.len());
        assert_eq!(set.get("strike_price"), Some(10.0));
        assert_eq!(set.get("volatility"), Some(0.3));
        assert_eq!(set.iterations, DEFAULT_ITERATIONS);
        assert_eq!(set.m, None);
        assert!(set.validate(&catalog).is_ok());
    }

    #[test]
    fn test_display_inputs_scaled_once() {
        let catalog = Catalog::eso();
        let set = ParameterSet::with_display_inputs(
            &catalog,
            [("volatility", 45.0), ("stock_price", 12.0)],
        )
        .unwrap();

        assert!((set.get("volatility").unwrap() - 0.45).abs() < 1e-12);
        assert_eq!(set.get("stock_price"), Some(12.0));
        // Untouched variables keep their defaults
        assert_eq!(set.get("exit_rate"), Some(0.2));
    }

    #[test]
    fn test_display_inputs_rejects_unknown_and_out_of_bounds() {
        let catalog = Catalog::eso();
        assert_eq!(
            ParameterSet::with_display_inputs(&catalog, [("bogus", 1.0)]),
            Err(ConfigurationError::UnknownVariable {
                name: "bogus".to_string()
            })
        );
        assert!(matches!(
            ParameterSet::with_display_inputs(&catalog, [("dividend_rate", 25.0)]),
            Err(ConfigurationError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn test_override_does_not_mutate_baseline() {
        let catalog = Catalog::eso();
        let baseline = ParameterSet::from_catalog(&catalog);
        let modified = baseline.with_override("stock_price", 42.0);

        assert_eq!(baseline.get("stock_price"), Some(10.0));
        assert_eq!(modified.get("stock_price"), Some(42.0));
        assert_eq!(modified.get("strike_price"), baseline.get("strike_price"));
    }

    #[test]
    fn test_validate_reports_missing_values() {
        let catalog = Catalog::new(vec![
            VariableDescriptor::new("spot", "Spot").initial(1.0),
            VariableDescriptor::new("notional", "Notional"),
        ])
        .unwrap();

        let mut set = ParameterSet::from_catalog(&catalog);
        assert_eq!(
            set.validate(&catalog),
            Err(ConfigurationError::MissingInitialValue {
                name: "notional".to_string()
            })
        );

        set.set("notional", 1_000.0);
        assert!(set.validate(&catalog).is_ok());
    }

    #[test]
    fn test_validate_iterations_and_finiteness() {
        let catalog = Catalog::eso();
        let set = ParameterSet::from_catalog(&catalog).with_iterations(0);
        assert_eq!(
            set.validate(&catalog),
            Err(ConfigurationError::InvalidIterations { iterations: 0 })
        );

        let set = ParameterSet::from_catalog(&catalog).with_override("stock_price", f64::INFINITY);
        assert!(matches!(
            set.validate(&catalog),
            Err(ConfigurationError::NonFinite { .. })
        ));

        let set = ParameterSet::from_catalog(&catalog).with_override("extra", 1.0);
        assert!(matches!(
            set.validate(&catalog),
            Err(ConfigurationError::UnknownVariable { .. })
        ));
    }

    #[test]
    fn test_serializes_as_flat_mapping() {
        let catalog = Catalog::eso();
        let set = ParameterSet::from_catalog(&catalog);
        let json = serde_json::to_value(&set).unwrap();

        assert_eq!(json["iterations"], 100);
        assert!(json["m"].is_null());
        assert_eq!(json["strike_price"], 10.0);
        assert_eq!(json.as_object().unwrap().len(), catalog.len() + 2);

        let back: ParameterSet = serde_json::from_value(json).unwrap();
        assert_eq!(back, set);
    }
}
