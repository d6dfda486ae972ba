//! Sweep range derivation and grid generation.

use serde::{Deserialize, Serialize};

use crate::catalog::VariableDescriptor;
use crate::error::ConfigurationError;

/// Number of intervals used to derive a step when a descriptor has none.
pub const DEFAULT_STEP_DIVISIONS: f64 = 20.0;

/// Largest grid a sweep will generate. Each point is one oracle call.
pub const MAX_GRID_POINTS: usize = 100_000;

/// Half-open range `[min, max)` walked in increments of `step`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SweepRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl SweepRange {
    /// Validate an explicit range.
    pub fn new(name: &str, min: f64, max: f64, step: f64) -> Result<Self, ConfigurationError> {
        if !(step.is_finite() && step > 0.0) {
            return Err(ConfigurationError::InvalidStep {
                name: name.to_string(),
                step,
            });
        }
        if !(min.is_finite() && max.is_finite() && min < max) {
            return Err(ConfigurationError::EmptyRange {
                name: name.to_string(),
                min,
                max,
            });
        }
        let points = ((max - min) / step).ceil();
        if points > MAX_GRID_POINTS as f64 {
            return Err(ConfigurationError::TooManyPoints {
                name: name.to_string(),
                points,
                limit: MAX_GRID_POINTS,
            });
        }
        Ok(Self { min, max, step })
    }

    /// Derive the sweep range for a descriptor.
    ///
    /// - `min` defaults to 0.
    /// - `max` defaults to twice the initial value.
    /// - `step` defaults to a twentieth of the declared bounds, which requires
    ///   both bounds to be declared; a derived `max` does not count.
    pub fn for_variable(variable: &VariableDescriptor) -> Result<Self, ConfigurationError> {
        let name = variable.name.as_str();
        let min = variable.min_value.unwrap_or(0.0);

        let max = match (variable.max_value, variable.initial_value) {
            (Some(max), _) => max,
            (None, Some(initial)) => 2.0 * initial,
            (None, None) => {
                return Err(ConfigurationError::MissingUpperBound {
                    name: name.to_string(),
                });
            }
        };

        let step = match (variable.step_size, variable.min_value, variable.max_value) {
            (Some(step), _, _) => step,
            (None, Some(lo), Some(hi)) => (hi - lo) / DEFAULT_STEP_DIVISIONS,
            (None, _, _) => {
                return Err(ConfigurationError::MissingStepBounds {
                    name: name.to_string(),
                });
            }
        };

        Self::new(name, min, max, step)
    }

    /// Number of grid points.
    #[must_use]
    pub fn len(&self) -> usize {
        let mut count = ((self.max - self.min) / self.step).ceil().max(0.0) as usize;
        // Rounding can put the last candidate on or past `max`
        while count > 0 && self.point(count - 1) >= self.max {
            count -= 1;
        }
        count
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Ascending grid `min, min + step, ...`, every value strictly below `max`.
    ///
    /// Points are computed as `min + i * step` rather than by accumulation so
    /// rounding error does not grow along the grid.
    #[must_use]
    pub fn grid(&self) -> Vec<f64> {
        (0..self.len()).map(|i| self.point(i)).collect()
    }

    fn point(&self, i: usize) -> f64 {
        self.min + self.step * i as f64
    }
}
