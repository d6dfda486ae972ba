//! Sensitivity sweeps over a single free variable.
//!
//! A sweep holds a baseline parameter set fixed, overrides one variable across
//! a grid derived from its descriptor, and values every grid point through the
//! gateway:
//!
//! ```ignore
//! use esoval_core::{Catalog, ParameterSet, sweep};
//!
//! let catalog = Catalog::eso();
//! let baseline = ParameterSet::from_catalog(&catalog);
//! let result = sweep(&baseline, catalog.require("volatility")?, &gateway)?;
//!
//! for point in result.iter() {
//!     println!("{:>6.1} {:.4}", point.override_value, point.valuation);
//! }
//! ```

mod engine;
mod progress;
mod range;

pub use engine::*;
pub use progress::*;
pub use range::*;
