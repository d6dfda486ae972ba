//! Parameter catalog: static descriptions of every tunable valuation input.
//!
//! Descriptors carry no behavior beyond unit conversion and bounds checks, so
//! adding a variable here needs no change to the gateway or the sweep engine.

use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;
use crate::percent::{Fraction, Percent};

/// Description of a single tunable variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableDescriptor {
    /// Stable identifier, used as the key in a [`ParameterSet`](crate::ParameterSet)
    pub name: String,
    /// Human label for presentation
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_value: Option<f64>,
    /// Stored as a fraction, entered and displayed as 0-100
    #[serde(default)]
    pub percentage: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step_size: Option<f64>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub tooltip: String,
}

impl VariableDescriptor {
    pub fn new(name: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            display_name: display_name.into(),
            initial_value: None,
            min_value: None,
            max_value: None,
            percentage: false,
            step_size: None,
            tooltip: String::new(),
        }
    }

    pub fn initial(mut self, value: f64) -> Self {
        self.initial_value = Some(value);
        self
    }

    pub fn min(mut self, value: f64) -> Self {
        self.min_value = Some(value);
        self
    }

    pub fn max(mut self, value: f64) -> Self {
        self.max_value = Some(value);
        self
    }

    pub fn bounds(self, min: f64, max: f64) -> Self {
        self.min(min).max(max)
    }

    pub fn step(mut self, step: f64) -> Self {
        self.step_size = Some(step);
        self
    }

    pub fn percentage(mut self) -> Self {
        self.percentage = true;
        self
    }

    pub fn tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.tooltip = tooltip.into();
        self
    }

    /// Both bounds present. Bounded variables are edited with a slider,
    /// open-ended ones with free numeric entry.
    #[must_use]
    pub fn is_bounded(&self) -> bool {
        self.min_value.is_some() && self.max_value.is_some()
    }

    /// Convert a stored value to display units.
    #[must_use]
    pub fn to_display(&self, value: f64) -> f64 {
        if self.percentage {
            Percent::from(Fraction(value)).value()
        } else {
            value
        }
    }

    /// Convert a display-unit value back to its stored form.
    #[must_use]
    pub fn from_display(&self, display: f64) -> f64 {
        if self.percentage {
            Fraction::from(Percent(display)).value()
        } else {
            display
        }
    }

    /// Bounds in display units.
    #[must_use]
    pub fn display_bounds(&self) -> (Option<f64>, Option<f64>) {
        (
            self.min_value.map(|v| self.to_display(v)),
            self.max_value.map(|v| self.to_display(v)),
        )
    }

    /// Format a stored value the way the dashboard shows it.
    #[must_use]
    pub fn format_value(&self, value: f64) -> String {
        if self.percentage {
            Percent::from(Fraction(value)).to_string()
        } else {
            format!("{value}")
        }
    }

    /// Validate a user-entered display value and return it in stored units.
    ///
    /// Each bound that is present is enforced, as an input widget would.
    pub fn check_display_value(&self, display: f64) -> Result<f64, ConfigurationError> {
        if !display.is_finite() {
            return Err(ConfigurationError::NonFinite {
                name: self.name.clone(),
                value: display,
            });
        }

        let (min, max) = self.display_bounds();
        let min = min.unwrap_or(f64::NEG_INFINITY);
        let max = max.unwrap_or(f64::INFINITY);
        if display < min || display > max {
            return Err(ConfigurationError::OutOfBounds {
                name: self.name.clone(),
                value: display,
                min,
                max,
            });
        }

        Ok(self.from_display(display))
    }
}

/// Ordered, name-unique list of variable descriptors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<VariableDescriptor>", into = "Vec<VariableDescriptor>")]
pub struct Catalog {
    variables: Vec<VariableDescriptor>,
}

impl Catalog {
    pub fn new(variables: Vec<VariableDescriptor>) -> Result<Self, ConfigurationError> {
        for (i, variable) in variables.iter().enumerate() {
            if variables[..i].iter().any(|v| v.name == variable.name) {
                return Err(ConfigurationError::DuplicateVariable {
                    name: variable.name.clone(),
                });
            }
        }
        Ok(Self { variables })
    }

    /// Employee stock option inputs.
    #[must_use]
    pub fn eso() -> Self {
        Self {
            variables: vec![
                VariableDescriptor::new("strike_price", "Strike price")
                    .initial(10.0)
                    .min(0.0)
                    .step(1.0)
                    .tooltip("Price the employee pays per share on exercise"),
                VariableDescriptor::new("stock_price", "Stock price")
                    .initial(10.0)
                    .min(0.0)
                    .step(1.0)
                    .tooltip("Current market price of the underlying share"),
                VariableDescriptor::new("volatility", "Volatility (yearly)")
                    .initial(0.3)
                    .bounds(0.0, 2.0)
                    .percentage()
                    .tooltip("Annualized volatility of the share price"),
                VariableDescriptor::new("risk_free_rate", "Risk-free rate (yearly)")
                    .initial(0.04)
                    .bounds(0.0, 2.0)
                    .percentage()
                    .tooltip("Continuously compounded risk-free interest rate"),
                VariableDescriptor::new("dividend_rate", "Dividend rate (yearly)")
                    .initial(0.004)
                    .bounds(0.0, 0.2)
                    .percentage()
                    .tooltip("Continuous dividend yield of the underlying"),
                VariableDescriptor::new("exit_rate", "Employee exit rate (yearly)")
                    .initial(0.2)
                    .bounds(0.0, 1.0)
                    .percentage()
                    .tooltip("Yearly probability that the employee leaves the company"),
                VariableDescriptor::new("vesting_years", "Vesting period (years)")
                    .initial(3.0)
                    .bounds(0.0, 20.0)
                    .step(0.25)
                    .tooltip("Time until the option can first be exercised"),
                VariableDescriptor::new("expiration_years", "Expiration (years)")
                    .initial(5.0)
                    .bounds(0.0, 20.0)
                    .step(0.25)
                    .tooltip("Time until the option expires"),
            ],
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &VariableDescriptor> {
        self.variables.iter()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&VariableDescriptor> {
        self.variables.iter().find(|v| v.name == name)
    }

    /// Look up a descriptor, failing with [`ConfigurationError::UnknownVariable`].
    pub fn require(&self, name: &str) -> Result<&VariableDescriptor, ConfigurationError> {
        self.get(name)
            .ok_or_else(|| ConfigurationError::UnknownVariable {
                name: name.to_string(),
            })
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.variables.iter().map(|v| v.name.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::eso()
    }
}

impl TryFrom<Vec<VariableDescriptor>> for Catalog {
    type Error = ConfigurationError;

    fn try_from(variables: Vec<VariableDescriptor>) -> Result<Self, Self::Error> {
        Self::new(variables)
    }
}

impl From<Catalog> for Vec<VariableDescriptor> {
    fn from(catalog: Catalog) -> Self {
        catalog.variables
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a VariableDescriptor;
    type IntoIter = std::slice::Iter<'a, VariableDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.variables.iter()
    }
}
