//! Valuation gateway: the boundary to the external option-pricing oracle.
//!
//! The oracle is opaque. It may be a deterministic formula or a randomized
//! simulation, so callers must not assume two identical calls agree exactly.

mod command;

pub use command::CommandGateway;

use crate::error::EvaluationError;
use crate::parameters::ParameterSet;

/// Maps a fully populated parameter set to a single valuation.
///
/// Implementations are invoked concurrently from sweep workers and must not
/// rely on per-call mutable state.
pub trait ValuationGateway: Send + Sync {
    fn evaluate(&self, parameters: &ParameterSet) -> Result<f64, EvaluationError>;
}

impl<F> ValuationGateway for F
where
    F: Fn(&ParameterSet) -> Result<f64, EvaluationError> + Send + Sync,
{
    fn evaluate(&self, parameters: &ParameterSet) -> Result<f64, EvaluationError> {
        self(parameters)
    }
}

/// Invoke the gateway and reject non-finite valuations.
pub(crate) fn evaluate_checked<G>(gateway: &G, parameters: &ParameterSet) -> Result<f64, EvaluationError>
where
    G: ValuationGateway + ?Sized,
{
    let value = gateway.evaluate(parameters)?;
    if !value.is_finite() {
        return Err(EvaluationError::NonFinite {
            value,
            parameters: Box::new(parameters.clone()),
        });
    }
    Ok(value)
}

/// The single serial valuation of the baseline shown as the headline number.
pub fn headline_value<G>(gateway: &G, baseline: &ParameterSet) -> Result<f64, EvaluationError>
where
    G: ValuationGateway + ?Sized,
{
    let value = evaluate_checked(gateway, baseline)?;
    tracing::debug!(value, "headline valuation");
    Ok(value)
}
