//! Sweep engine tests against test-double gateways
//!
//! Tests are organized by topic:
//! - `scenarios` - Worked dashboard scenarios with exact expected series
//! - `ordering` - Grid order under out-of-order completion, idempotence, noise
//! - `failures` - Gateway failures, cancellation and worker pool behavior

mod ordering;
mod scenarios;
