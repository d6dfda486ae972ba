use std::time::Duration;

use thiserror::Error;

use crate::parameters::ParameterSet;

/// A catalog entry or parameter set lacks information needed to value or
/// sweep it. Raised before any gateway call and never retried.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    #[error("unknown variable `{name}`")]
    UnknownVariable { name: String },

    #[error("variable `{name}` is defined more than once")]
    DuplicateVariable { name: String },

    #[error("variable `{name}` has no initial value and none was supplied")]
    MissingInitialValue { name: String },

    #[error("variable `{name}` has neither a maximum nor an initial value to derive one from")]
    MissingUpperBound { name: String },

    #[error("variable `{name}` has no step size and lacks the bounds needed to derive one")]
    MissingStepBounds { name: String },

    #[error("variable `{name}` has a non-positive step size ({step})")]
    InvalidStep { name: String, step: f64 },

    #[error("variable `{name}` has an empty sweep range [{min}, {max})")]
    EmptyRange { name: String, min: f64, max: f64 },

    #[error("variable `{name}` would sweep {points} points (limit {limit})")]
    TooManyPoints {
        name: String,
        points: f64,
        limit: usize,
    },

    #[error("{value} is outside the bounds of `{name}` [{min}, {max}]")]
    OutOfBounds {
        name: String,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("non-finite value for `{name}`: {value}")]
    NonFinite { name: String, value: f64 },

    #[error("iteration count must be at least 1 (got {iterations})")]
    InvalidIterations { iterations: u32 },
}

/// The valuation gateway rejected a parameter set or failed while pricing it.
///
/// Every variant carries the parameter set that was being valued.
#[derive(Debug, Clone, Error)]
pub enum EvaluationError {
    #[error("pricing oracle rejected the inputs: {reason}")]
    Rejected {
        reason: String,
        parameters: Box<ParameterSet>,
    },

    #[error("pricing oracle failed: {reason}")]
    Failed {
        reason: String,
        parameters: Box<ParameterSet>,
    },

    #[error("pricing oracle produced unreadable output: {output:?}")]
    MalformedOutput {
        output: String,
        parameters: Box<ParameterSet>,
    },

    #[error("pricing oracle returned a non-finite valuation ({value})")]
    NonFinite {
        value: f64,
        parameters: Box<ParameterSet>,
    },

    #[error("pricing oracle timed out after {after:?}")]
    Timeout {
        after: Duration,
        parameters: Box<ParameterSet>,
    },
}

impl EvaluationError {
    pub fn rejected(reason: impl Into<String>, parameters: &ParameterSet) -> Self {
        EvaluationError::Rejected {
            reason: reason.into(),
            parameters: Box::new(parameters.clone()),
        }
    }

    pub fn failed(reason: impl Into<String>, parameters: &ParameterSet) -> Self {
        EvaluationError::Failed {
            reason: reason.into(),
            parameters: Box::new(parameters.clone()),
        }
    }

    /// The parameter set the oracle was asked to value.
    #[must_use]
    pub fn parameters(&self) -> &ParameterSet {
        match self {
            EvaluationError::Rejected { parameters, .. }
            | EvaluationError::Failed { parameters, .. }
            | EvaluationError::MalformedOutput { parameters, .. }
            | EvaluationError::NonFinite { parameters, .. }
            | EvaluationError::Timeout { parameters, .. } => parameters,
        }
    }
}

/// Failure of a whole sweep. No partial series is ever returned alongside it.
#[derive(Debug, Error)]
pub enum SweepError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// `value` is the raw grid value (never display-scaled).
    #[error("valuation failed for {variable} = {value}: {source}")]
    Evaluation {
        variable: String,
        value: f64,
        #[source]
        source: EvaluationError,
    },

    #[error("sweep cancelled")]
    Cancelled,

    #[error("could not start worker pool: {0}")]
    Pool(String),
}
