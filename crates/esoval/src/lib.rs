//! Command-line front-end for employee stock option valuation.
//!
//! Loads a session (inputs, oracle, catalog), values the baseline and
//! renders sensitivity sweeps. The valuation logic lives in `esoval_core`.

pub mod commands;
pub mod logging;
pub mod report;
pub mod session;

#[cfg(test)]
mod tests;

pub use logging::init_logging;
pub use report::OutputFormat;
pub use session::{OracleConfig, SESSION_FILE, SessionConfig, SessionError, parse_assignment};
