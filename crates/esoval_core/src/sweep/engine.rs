//! Single-variable sweep evaluation with parallel, order-preserving gather.

use std::time::Instant;

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::catalog::VariableDescriptor;
use crate::error::{ConfigurationError, SweepError};
use crate::gateway::{ValuationGateway, evaluate_checked};
use crate::parameters::ParameterSet;

use super::{SweepProgress, SweepRange};

/// Tuning for a sweep run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepOptions {
    /// Number of worker threads (defaults to CPU count)
    #[serde(default = "default_workers")]
    pub workers: usize,
}

/// Available hardware parallelism, or 1 if it cannot be determined.
#[must_use]
pub fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

impl Default for SweepOptions {
    fn default() -> Self {
        Self {
            workers: default_workers(),
        }
    }
}

impl SweepOptions {
    /// Use `workers` threads; zero means the hardware default.
    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = if workers == 0 {
            default_workers()
        } else {
            workers
        };
        self
    }
}

/// One point of a sweep series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SweepPoint {
    /// Override value in display units (percent variables scaled by 100)
    pub override_value: f64,
    /// Valuation at this point, never scaled
    pub valuation: f64,
}

/// Ordered valuation series for one free variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepResult {
    /// Name of the swept variable
    pub variable: String,
    /// Display label, used as the horizontal axis title
    pub label: String,
    /// Whether `override_value`s are percent-scaled
    pub percentage: bool,
    /// Points in ascending `override_value` order
    pub points: Vec<SweepPoint>,
}

impl SweepResult {
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SweepPoint> {
        self.points.iter()
    }

    #[must_use]
    pub fn override_values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.override_value).collect()
    }

    #[must_use]
    pub fn valuations(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.valuation).collect()
    }
}

/// Sweep `variable` across its range with default options.
pub fn sweep<G>(
    baseline: &ParameterSet,
    variable: &VariableDescriptor,
    gateway: &G,
) -> Result<SweepResult, SweepError>
where
    G: ValuationGateway + ?Sized,
{
    sweep_with(baseline, variable, gateway, &SweepOptions::default(), None)
}

/// Sweep `variable` across its range, holding every other input at `baseline`.
///
/// Grid points are valued in parallel on a pool of `options.workers` threads
/// that lives only for this call; every worker is joined before it returns.
/// The series keeps grid order whatever order the valuations finish in.
///
/// The first gateway failure aborts the sweep. Cancelling `progress` stops
/// further points from being dispatched and yields [`SweepError::Cancelled`].
pub fn sweep_with<G>(
    baseline: &ParameterSet,
    variable: &VariableDescriptor,
    gateway: &G,
    options: &SweepOptions,
    progress: Option<&SweepProgress>,
) -> Result<SweepResult, SweepError>
where
    G: ValuationGateway + ?Sized,
{
    if !baseline.contains(&variable.name) {
        return Err(ConfigurationError::UnknownVariable {
            name: variable.name.clone(),
        }
        .into());
    }

    let range = SweepRange::for_variable(variable)?;
    let grid = range.grid();
    let workers = options.workers.max(1);

    if let Some(p) = progress {
        p.reset(grid.len());
    }

    tracing::debug!(
        variable = %variable.name,
        min = range.min,
        max = range.max,
        step = range.step,
        points = grid.len(),
        workers,
        "starting sweep"
    );

    let start = Instant::now();
    let point = |value: f64| evaluate_point(baseline, variable, gateway, value, progress);

    let valuations = match evaluate_grid(&grid, workers, point) {
        Ok(valuations) => valuations,
        Err(e) => {
            tracing::warn!(variable = %variable.name, error = %e, "sweep aborted");
            return Err(e);
        }
    };

    let points = grid
        .iter()
        .zip(valuations)
        .map(|(&value, valuation)| SweepPoint {
            override_value: variable.to_display(value),
            valuation,
        })
        .collect::<Vec<_>>();

    tracing::info!(
        variable = %variable.name,
        points = points.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "sweep complete"
    );

    Ok(SweepResult {
        variable: variable.name.clone(),
        label: variable.display_name.clone(),
        percentage: variable.percentage,
        points,
    })
}

fn evaluate_point<G>(
    baseline: &ParameterSet,
    variable: &VariableDescriptor,
    gateway: &G,
    value: f64,
    progress: Option<&SweepProgress>,
) -> Result<f64, SweepError>
where
    G: ValuationGateway + ?Sized,
{
    if let Some(p) = progress
        && p.is_cancelled()
    {
        return Err(SweepError::Cancelled);
    }

    let parameters = baseline.with_override(&variable.name, value);
    let valuation =
        evaluate_checked(gateway, &parameters).map_err(|source| SweepError::Evaluation {
            variable: variable.name.clone(),
            value,
            source,
        })?;

    tracing::trace!(variable = %variable.name, value, valuation, "grid point valued");

    if let Some(p) = progress {
        p.increment();
    }
    Ok(valuation)
}

/// Value every grid point, returning valuations in grid order.
#[cfg(feature = "parallel")]
fn evaluate_grid<F>(grid: &[f64], workers: usize, point: F) -> Result<Vec<f64>, SweepError>
where
    F: Fn(f64) -> Result<f64, SweepError> + Sync,
{
    rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("esoval-sweep-{i}"))
        .build_scoped(
            |thread| thread.run(),
            |pool| {
                pool.install(|| {
                    grid.par_iter()
                        .map(|&value| point(value))
                        .collect::<Result<Vec<_>, _>>()
                })
            },
        )
        .map_err(|e| SweepError::Pool(e.to_string()))?
}

#[cfg(not(feature = "parallel"))]
fn evaluate_grid<F>(grid: &[f64], _workers: usize, point: F) -> Result<Vec<f64>, SweepError>
where
    F: Fn(f64) -> Result<f64, SweepError> + Sync,
{
    grid.iter().map(|&value| point(value)).collect()
}
