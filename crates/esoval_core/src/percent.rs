//! Fraction / percent conversion boundary.
//!
//! Rates are stored as fractions (`0.3`) and edited or displayed as percents
//! (`30.0`). Converting between the two goes through these newtypes so the
//! factor of 100 is applied in exactly one place.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A rate stored as a fraction of one.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fraction(pub f64);

/// A rate scaled to 0-100 for display and entry.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Percent(pub f64);

impl Fraction {
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }
}

impl Percent {
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }
}

impl From<Fraction> for Percent {
    fn from(fraction: Fraction) -> Self {
        Percent(fraction.0 * 100.0)
    }
}

impl From<Percent> for Fraction {
    fn from(percent: Percent) -> Self {
        Fraction(percent.0 / 100.0)
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1} %", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fraction_to_percent() {
        assert_eq!(Percent::from(Fraction(0.3)).value(), 30.0);
        assert_eq!(Percent::from(Fraction(0.0)).value(), 0.0);
    }

    #[test]
    fn test_percent_to_fraction() {
        assert!((Fraction::from(Percent(4.0)).value() - 0.04).abs() < 1e-12);
        assert_eq!(Fraction::from(Percent(200.0)).value(), 2.0);
    }

    #[test]
    fn test_percent_display_one_decimal() {
        assert_eq!(Percent(30.0).to_string(), "30.0 %");
        assert_eq!(Percent::from(Fraction(0.004)).to_string(), "0.4 %");
    }
}
