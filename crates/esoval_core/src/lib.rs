//! Employee stock option valuation front-end library.
//!
//! This crate holds the logic behind the option valuation dashboard:
//! - A catalog of tunable valuation inputs with bounds, steps and
//!   percent/fraction display conventions
//! - Parameter sets handed to an external pricing oracle
//! - A valuation gateway trait, plus a bridge to an oracle run as a
//!   separate program
//! - Sensitivity sweeps that vary one input across its range in parallel
//!
//! The pricing model itself is not part of this crate. Anything that
//! implements [`ValuationGateway`] can be plugged in.

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod catalog;
pub mod error;
pub mod gateway;
pub mod parameters;
pub mod percent;
pub mod sweep;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use catalog::{Catalog, VariableDescriptor};
pub use error::{ConfigurationError, EvaluationError, SweepError};
pub use gateway::{CommandGateway, ValuationGateway, headline_value};
pub use parameters::{DEFAULT_ITERATIONS, ParameterSet};
pub use percent::{Fraction, Percent};
pub use sweep::{
    MAX_GRID_POINTS, SweepOptions, SweepPoint, SweepProgress, SweepRange, SweepResult, sweep,
    sweep_with,
};
