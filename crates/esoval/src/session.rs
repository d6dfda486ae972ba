//! Session configuration (native file storage)
//!
//! A session file fixes everything the dashboard widgets would: the inputs in
//! display units, the oracle precision, and which pricing oracle to run.
//!
//! ```yaml
//! iterations: 100
//! inputs:
//!   stock_price: 12.0
//!   volatility: 45.0      # percent
//! oracle:
//!   program: python3
//!   args: ["-m", "esovalue_oracle"]
//!   timeout_secs: 30
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

use esoval_core::{
    Catalog, CommandGateway, ConfigurationError, DEFAULT_ITERATIONS, ParameterSet, SweepOptions,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// File name of the session inside the data directory.
pub const SESSION_FILE: &str = "session.yaml";

/// How to launch the external pricing oracle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OracleConfig {
    pub program: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
    /// Per-valuation time limit in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<f64>,
}

/// Contents of `session.yaml`. Every field is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Oracle iteration / precision count
    pub iterations: u32,
    /// Reserved oracle knob
    #[serde(skip_serializing_if = "Option::is_none")]
    pub m: Option<f64>,
    /// Input values in display units, keyed by variable name
    pub inputs: BTreeMap<String, f64>,
    /// Sweep worker threads (defaults to CPU count)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workers: Option<usize>,
    /// Replacement catalog; the option catalog is used when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog: Option<Catalog>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oracle: Option<OracleConfig>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            m: None,
            inputs: BTreeMap::new(),
            workers: None,
            catalog: None,
            oracle: None,
        }
    }
}

/// Error types for session loading
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to read session file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse session file: {0}")]
    Parse(String),

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error("no pricing oracle configured (set `oracle.program` or pass --oracle)")]
    NoOracle,

    #[error("--oracle-arg given but no oracle program is configured (pass --oracle)")]
    OracleArgsWithoutProgram,

    #[error("invalid oracle timeout: {0}")]
    InvalidTimeout(f64),
}

impl SessionConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self, SessionError> {
        serde_saphyr::from_str(yaml).map_err(|e| SessionError::Parse(e.to_string()))
    }

    pub fn to_yaml(&self) -> Result<String, SessionError> {
        serde_saphyr::to_string(self).map_err(|e| SessionError::Parse(e.to_string()))
    }

    /// Load a session file, falling back to defaults when it does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, SessionError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no session file, using defaults");
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        let session = Self::from_yaml(&content)?;
        tracing::info!(path = %path.display(), inputs = session.inputs.len(), "loaded session");
        Ok(session)
    }

    /// Apply `name=value` overrides from the command line (display units).
    pub fn apply_overrides(&mut self, overrides: &[(String, f64)]) {
        for (name, value) in overrides {
            self.inputs.insert(name.clone(), *value);
        }
    }

    /// Apply `--oracle` / `--oracle-arg` from the command line.
    ///
    /// A new program replaces the session's program and arguments but keeps
    /// its timeout. Arguments alone replace the arguments of the session's
    /// oracle, and are an error when there is none.
    pub fn apply_oracle_override(
        &mut self,
        program: Option<String>,
        args: Vec<String>,
    ) -> Result<(), SessionError> {
        if let Some(program) = program {
            let timeout_secs = self.oracle.as_ref().and_then(|o| o.timeout_secs);
            self.oracle = Some(OracleConfig {
                program,
                args,
                timeout_secs,
            });
        } else if !args.is_empty() {
            let oracle = self
                .oracle
                .as_mut()
                .ok_or(SessionError::OracleArgsWithoutProgram)?;
            oracle.args = args;
        }
        Ok(())
    }

    #[must_use]
    pub fn catalog(&self) -> Catalog {
        self.catalog.clone().unwrap_or_else(Catalog::eso)
    }

    /// Validated baseline parameter set for `catalog`.
    pub fn baseline(&self, catalog: &Catalog) -> Result<ParameterSet, SessionError> {
        let baseline = ParameterSet::with_display_inputs(
            catalog,
            self.inputs.iter().map(|(name, value)| (name.as_str(), *value)),
        )?
        .with_iterations(self.iterations)
        .with_m(self.m);
        baseline.validate(catalog)?;
        Ok(baseline)
    }

    #[must_use]
    pub fn sweep_options(&self) -> SweepOptions {
        let options = SweepOptions::default();
        match self.workers {
            Some(workers) => options.workers(workers),
            None => options,
        }
    }

    /// Gateway for the configured oracle.
    pub fn gateway(&self) -> Result<CommandGateway, SessionError> {
        let oracle = self.oracle.as_ref().ok_or(SessionError::NoOracle)?;
        let mut gateway = CommandGateway::new(&oracle.program).args(&oracle.args);
        if let Some(secs) = oracle.timeout_secs {
            if !(secs.is_finite() && secs > 0.0) {
                return Err(SessionError::InvalidTimeout(secs));
            }
            gateway = gateway.timeout(Duration::from_secs_f64(secs));
        }
        Ok(gateway)
    }
}

/// Parse a `name=value` command-line assignment.
pub fn parse_assignment(s: &str) -> Result<(String, f64), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got `{s}`"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing variable name in `{s}`"));
    }
    let value = value
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("invalid value for `{name}`: {e}"))?;
    Ok((name.to_string(), value))
}
